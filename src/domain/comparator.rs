//! Composite comparator for the screener table.
//!
//! Column rules:
//! - no column: score then upside, descending, or ascending under the
//!   all-down quadrant; missing values take `MISSING_SENTINEL`
//! - `score`: score then upside in the sort direction, nulls last
//! - `daily_supertrend`: fixed domain order (UP first when descending, DOWN
//!   first when ascending), no-data last, then score and upside
//! - symbol, sector, industry, init_trend: case-insensitive text, blanks last
//! - everything else: numeric, nulls last
//!
//! Nulls-last never depends on the sort direction.

use std::cmp::Ordering;

use super::predicate::range_value;
use super::criteria::RangeField;
use super::stock::{Direction, StockRecord, Timeframe};
use super::view_state::{Quadrant, SortColumn, SortDirection, SortState, ViewState};

/// Stand-in for a missing score or upside in the default ordering.
pub const MISSING_SENTINEL: f64 = -999.0;

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

fn directed(ord: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Ascending => ord,
        SortDirection::Descending => ord.reverse(),
    }
}

/// Missing values after present ones regardless of direction; present
/// values compared by `cmp` and flipped by direction.
fn nulls_last<T>(
    a: Option<T>,
    b: Option<T>,
    direction: SortDirection,
    cmp: impl FnOnce(&T, &T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => directed(cmp(&x, &y), direction),
    }
}

fn or_sentinel(value: Option<f64>) -> f64 {
    value.unwrap_or(MISSING_SENTINEL)
}

fn compare_default(a: &StockRecord, b: &StockRecord, quadrant: Quadrant) -> Ordering {
    let direction = match quadrant {
        Quadrant::AllDown => SortDirection::Ascending,
        Quadrant::All | Quadrant::AllUp => SortDirection::Descending,
    };
    directed(
        cmp_f64(or_sentinel(a.total_score()), or_sentinel(b.total_score())),
        direction,
    )
    .then_with(|| {
        directed(
            cmp_f64(or_sentinel(a.upside), or_sentinel(b.upside)),
            direction,
        )
    })
}

fn compare_score(a: &StockRecord, b: &StockRecord, direction: SortDirection) -> Ordering {
    match (a.total_score(), b.total_score()) {
        (None, None) => Ordering::Equal,
        (sa, sb) => nulls_last(sa, sb, direction, |x, y| cmp_f64(*x, *y))
            .then_with(|| nulls_last(a.upside, b.upside, direction, |x, y| cmp_f64(*x, *y))),
    }
}

/// Domain rank of a supertrend direction: lower sorts first.
fn supertrend_rank(d: Direction, direction: SortDirection) -> u8 {
    match (direction, d) {
        (SortDirection::Descending, Direction::Up) => 0,
        (SortDirection::Descending, Direction::Down) => 1,
        (SortDirection::Ascending, Direction::Down) => 0,
        (SortDirection::Ascending, Direction::Up) => 1,
    }
}

fn compare_supertrend(a: &StockRecord, b: &StockRecord, direction: SortDirection) -> Ordering {
    match (a.supertrend_direction(), b.supertrend_direction()) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(da), Some(db)) => supertrend_rank(da, direction)
            .cmp(&supertrend_rank(db, direction))
            .then_with(|| {
                directed(
                    cmp_f64(or_sentinel(a.total_score()), or_sentinel(b.total_score())),
                    direction,
                )
            })
            .then_with(|| {
                directed(
                    cmp_f64(or_sentinel(a.upside), or_sentinel(b.upside)),
                    direction,
                )
            }),
    }
}

fn text_value(record: &StockRecord, column: SortColumn) -> Option<String> {
    let raw = match column {
        SortColumn::Symbol => Some(record.symbol.clone()),
        SortColumn::Sector => record.sector.clone(),
        SortColumn::Industry => record.industry.clone(),
        SortColumn::InitTrend => record.initial_trend_direction().map(|d| d.to_string()),
        _ => None,
    };
    raw.map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty() && s != "-")
}

/// Numeric value behind a sortable column.
pub fn numeric_value(record: &StockRecord, column: SortColumn) -> Option<f64> {
    let field = match column {
        SortColumn::Monthly => return record.support_distances.get(Timeframe::Monthly),
        SortColumn::Weekly => return record.support_distances.get(Timeframe::Weekly),
        SortColumn::Daily => return record.support_distances.get(Timeframe::Daily),
        SortColumn::Hourly => return record.support_distances.get(Timeframe::Hourly),
        SortColumn::Min15 => return record.support_distances.get(Timeframe::FifteenMin),
        SortColumn::DailySupertrend => {
            return record.daily_supertrend.as_ref().and_then(|s| s.level);
        }
        SortColumn::Cmp => RangeField::CmpChange,
        SortColumn::BigTrend => RangeField::BigTrend,
        SortColumn::Dist => RangeField::Dist,
        SortColumn::Score => RangeField::Score,
        SortColumn::Upside => RangeField::Upside,
        SortColumn::TwoYrHigh => RangeField::TwoYrHigh,
        SortColumn::InstHold => RangeField::InstHold,
        SortColumn::Mcap => RangeField::Mcap,
        SortColumn::Roe => RangeField::Roe,
        SortColumn::Pe => RangeField::Pe,
        SortColumn::Pb => RangeField::Pb,
        SortColumn::De => RangeField::De,
        SortColumn::Rev => RangeField::Rev,
        SortColumn::Earn => RangeField::Earn,
        SortColumn::DivYield => RangeField::DivYield,
        SortColumn::NetIncome => RangeField::NetIncome,
        SortColumn::EntEbitda => RangeField::EntEbitda,
        SortColumn::EntRev => RangeField::EntRev,
        SortColumn::DailyRsi => RangeField::DailyRsi,
        SortColumn::DailyAdx => RangeField::DailyAdx,
        SortColumn::DailyBbPct => RangeField::DailyBbPct,
        SortColumn::WeeklyBbPct => RangeField::WeeklyBbPct,
        SortColumn::MonthlyBbPct => RangeField::MonthlyBbPct,
        SortColumn::Symbol | SortColumn::Sector | SortColumn::Industry | SortColumn::InitTrend => {
            return None;
        }
    };
    range_value(record, field)
}

pub fn compare_by(
    a: &StockRecord,
    b: &StockRecord,
    sort: SortState,
    quadrant: Quadrant,
) -> Ordering {
    let Some(column) = sort.column else {
        return compare_default(a, b, quadrant);
    };
    match column {
        SortColumn::Score => compare_score(a, b, sort.direction),
        SortColumn::DailySupertrend => compare_supertrend(a, b, sort.direction),
        c if c.is_alphabetic() => nulls_last(
            text_value(a, c),
            text_value(b, c),
            sort.direction,
            |x, y| x.cmp(y),
        ),
        c => nulls_last(
            numeric_value(a, c),
            numeric_value(b, c),
            sort.direction,
            |x, y| cmp_f64(*x, *y),
        ),
    }
}

pub fn compare(a: &StockRecord, b: &StockRecord, view: &ViewState) -> Ordering {
    compare_by(a, b, view.sort, view.quadrant)
}

/// Stable sort of record references under the view's ordering.
pub fn sort_records<'a>(records: &mut [&'a StockRecord], view: &ViewState) {
    records.sort_by(|a, b| compare(a, b, view));
}
