//! Composite filter predicate.
//!
//! `matches` is a short-circuit AND over the quadrant selector, the
//! membership selector, the text and direction filters and every active
//! range column.

use super::criteria::{FilterCriteria, RangeField};
use super::membership::ReferenceIndex;
use super::stock::{CmpLabel, Direction, InstHolding, StockRecord, Timeframe};
use super::view_state::{MembershipFilter, Quadrant, ViewState};

fn all_aligned(record: &StockRecord, want: Direction) -> bool {
    Timeframe::ALL
        .iter()
        .all(|tf| record.direction(*tf) == Some(want))
        && record.biggest_trend_direction() == Some(want)
        && record.initial_trend_direction() == Some(want)
        && record.cmp_label == Some(CmpLabel::Yes)
}

/// All five timeframes, the biggest and initial trends UP, and CMP confirmed.
/// Any missing input makes the record not all-up.
pub fn is_all_up(record: &StockRecord) -> bool {
    all_aligned(record, Direction::Up)
}

pub fn is_all_down(record: &StockRecord) -> bool {
    all_aligned(record, Direction::Down)
}

pub fn quadrant_matches(record: &StockRecord, quadrant: Quadrant) -> bool {
    match quadrant {
        Quadrant::All => true,
        Quadrant::AllUp => is_all_up(record),
        Quadrant::AllDown => is_all_down(record),
    }
}

pub fn membership_matches(
    record: &StockRecord,
    filter: MembershipFilter,
    index: &ReferenceIndex,
) -> bool {
    match filter {
        MembershipFilter::All => true,
        MembershipFilter::Member => index.contains(&record.symbol),
        MembershipFilter::NonMember => !index.contains(&record.symbol),
    }
}

/// Case-insensitive substring match. An empty filter passes; so does a
/// record that has no value for the column.
fn text_matches(value: Option<&str>, filter: &str) -> bool {
    if filter.is_empty() {
        return true;
    }
    match value {
        Some(v) => v.to_lowercase().contains(&filter.to_lowercase()),
        None => true,
    }
}

/// Numeric value a range column filters on.
pub fn range_value(record: &StockRecord, field: RangeField) -> Option<f64> {
    let f = &record.fundamentals;
    match field {
        RangeField::CmpChange => record.cmp_change_pct,
        RangeField::BigTrend => record.biggest_trend.as_ref().and_then(|t| t.distance_pct),
        RangeField::Dist => record.max_distance,
        RangeField::Score => record.scores.total,
        RangeField::Upside => record.upside,
        RangeField::TwoYrHigh => record.two_yr_high_pct,
        RangeField::InstHold => record.inst_holding_pct.and_then(|h| h.percent()),
        RangeField::Mcap => record.market_cap,
        RangeField::Roe => f.roe,
        RangeField::Pe => f.pe,
        RangeField::Pb => f.pb,
        RangeField::De => f.debt_to_equity,
        RangeField::Rev => f.revenue_growth,
        RangeField::Earn => f.earnings_growth,
        RangeField::DivYield => f.dividend_yield,
        RangeField::NetIncome => f.net_income_to_common,
        RangeField::EntEbitda => f.enterprise_to_ebitda,
        RangeField::EntRev => f.enterprise_to_revenue,
        RangeField::DailyRsi => record.daily_rsi,
        RangeField::DailyAdx => record.daily_adx,
        RangeField::DailyBbPct => record.daily_bb_pct,
        RangeField::WeeklyBbPct => record.weekly_bb_pct,
        RangeField::MonthlyBbPct => record.monthly_bb_pct,
    }
}

pub fn criteria_match(record: &StockRecord, criteria: &FilterCriteria) -> bool {
    if !text_matches(record.sector.as_deref(), &criteria.sector) {
        return false;
    }
    if !text_matches(record.industry.as_deref(), &criteria.industry) {
        return false;
    }

    if !criteria
        .monthly_trend
        .matches(record.direction(Timeframe::Monthly))
        || !criteria
            .weekly_trend
            .matches(record.direction(Timeframe::Weekly))
        || !criteria
            .daily_trend
            .matches(record.direction(Timeframe::Daily))
        || !criteria
            .daily_supertrend
            .matches(record.supertrend_direction())
    {
        return false;
    }

    criteria.active_ranges().all(|(field, range)| match field {
        // Only active ranges get here, so the NA sentinel fails.
        RangeField::InstHold => match record.inst_holding_pct {
            Some(InstHolding::Percent(v)) => range.passes(Some(v)),
            Some(InstHolding::NotAvailable) | None => false,
        },
        _ => range.passes(range_value(record, field)),
    })
}

pub fn matches(record: &StockRecord, view: &ViewState, index: &ReferenceIndex) -> bool {
    quadrant_matches(record, view.quadrant)
        && membership_matches(record, view.membership, index)
        && criteria_match(record, &view.criteria)
}
