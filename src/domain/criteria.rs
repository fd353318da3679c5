//! Column filter criteria.
//!
//! `FilterCriteria` is an immutable value: the `with_*` builders consume and
//! return a new criteria set, and presets replace it wholesale.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::range_filter::RangeFilter;
use super::stock::Direction;

/// Equality filter on a direction; `All` passes every record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DirectionFilter {
    #[default]
    All,
    Only(Direction),
}

impl DirectionFilter {
    pub fn matches(&self, value: Option<Direction>) -> bool {
        match self {
            DirectionFilter::All => true,
            DirectionFilter::Only(want) => value == Some(*want),
        }
    }
}

impl FromStr for DirectionFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(DirectionFilter::All);
        }
        s.parse::<Direction>().map(DirectionFilter::Only)
    }
}

impl fmt::Display for DirectionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectionFilter::All => write!(f, "all"),
            DirectionFilter::Only(d) => write!(f, "{d}"),
        }
    }
}

/// Numeric columns that carry a min/max filter pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RangeField {
    CmpChange,
    BigTrend,
    Dist,
    Score,
    Upside,
    TwoYrHigh,
    InstHold,
    Mcap,
    Roe,
    Pe,
    Pb,
    De,
    Rev,
    Earn,
    DivYield,
    NetIncome,
    EntEbitda,
    EntRev,
    DailyRsi,
    DailyAdx,
    DailyBbPct,
    WeeklyBbPct,
    MonthlyBbPct,
}

impl RangeField {
    pub const ALL: [RangeField; 23] = [
        RangeField::CmpChange,
        RangeField::BigTrend,
        RangeField::Dist,
        RangeField::Score,
        RangeField::Upside,
        RangeField::TwoYrHigh,
        RangeField::InstHold,
        RangeField::Mcap,
        RangeField::Roe,
        RangeField::Pe,
        RangeField::Pb,
        RangeField::De,
        RangeField::Rev,
        RangeField::Earn,
        RangeField::DivYield,
        RangeField::NetIncome,
        RangeField::EntEbitda,
        RangeField::EntRev,
        RangeField::DailyRsi,
        RangeField::DailyAdx,
        RangeField::DailyBbPct,
        RangeField::WeeklyBbPct,
        RangeField::MonthlyBbPct,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RangeField::CmpChange => "cmp_change",
            RangeField::BigTrend => "big_trend",
            RangeField::Dist => "dist",
            RangeField::Score => "score",
            RangeField::Upside => "upside",
            RangeField::TwoYrHigh => "two_yr_high",
            RangeField::InstHold => "inst_hold",
            RangeField::Mcap => "mcap",
            RangeField::Roe => "roe",
            RangeField::Pe => "pe",
            RangeField::Pb => "pb",
            RangeField::De => "de",
            RangeField::Rev => "rev",
            RangeField::Earn => "earn",
            RangeField::DivYield => "div_yield",
            RangeField::NetIncome => "net_income",
            RangeField::EntEbitda => "ent_ebitda",
            RangeField::EntRev => "ent_rev",
            RangeField::DailyRsi => "daily_rsi",
            RangeField::DailyAdx => "daily_adx",
            RangeField::DailyBbPct => "daily_bb_pct",
            RangeField::WeeklyBbPct => "weekly_bb_pct",
            RangeField::MonthlyBbPct => "monthly_bb_pct",
        }
    }
}

impl FromStr for RangeField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        RangeField::ALL
            .iter()
            .copied()
            .find(|f| f.as_str() == key)
            .ok_or_else(|| format!("unknown range field: {}", s.trim()))
    }
}

impl fmt::Display for RangeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw min/max text as entered; blank means unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RangeBounds {
    pub min: String,
    pub max: String,
}

impl RangeBounds {
    pub fn new(min: impl Into<String>, max: impl Into<String>) -> Self {
        Self {
            min: min.into(),
            max: max.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.min.trim().is_empty() && self.max.trim().is_empty()
    }

    pub fn filter(&self) -> RangeFilter {
        RangeFilter::from_bounds(&self.min, &self.max)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterCriteria {
    pub sector: String,
    pub industry: String,
    pub monthly_trend: DirectionFilter,
    pub weekly_trend: DirectionFilter,
    pub daily_trend: DirectionFilter,
    pub daily_supertrend: DirectionFilter,
    ranges: BTreeMap<RangeField, RangeBounds>,
}

impl FilterCriteria {
    /// All-blank criteria: every record passes.
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn with_sector(mut self, text: impl Into<String>) -> Self {
        self.sector = text.into();
        self
    }

    pub fn with_industry(mut self, text: impl Into<String>) -> Self {
        self.industry = text.into();
        self
    }

    pub fn with_monthly(mut self, filter: DirectionFilter) -> Self {
        self.monthly_trend = filter;
        self
    }

    pub fn with_weekly(mut self, filter: DirectionFilter) -> Self {
        self.weekly_trend = filter;
        self
    }

    pub fn with_daily(mut self, filter: DirectionFilter) -> Self {
        self.daily_trend = filter;
        self
    }

    pub fn with_supertrend(mut self, filter: DirectionFilter) -> Self {
        self.daily_supertrend = filter;
        self
    }

    pub fn with_range(
        mut self,
        field: RangeField,
        min: impl Into<String>,
        max: impl Into<String>,
    ) -> Self {
        let bounds = RangeBounds::new(min, max);
        if bounds.is_blank() {
            self.ranges.remove(&field);
        } else {
            self.ranges.insert(field, bounds);
        }
        self
    }

    pub fn with_min(self, field: RangeField, min: impl Into<String>) -> Self {
        self.with_range(field, min, "")
    }

    pub fn with_max(self, field: RangeField, max: impl Into<String>) -> Self {
        self.with_range(field, "", max)
    }

    pub fn bounds(&self, field: RangeField) -> RangeBounds {
        self.ranges.get(&field).cloned().unwrap_or_default()
    }

    pub fn range(&self, field: RangeField) -> RangeFilter {
        self.ranges
            .get(&field)
            .map(RangeBounds::filter)
            .unwrap_or_default()
    }

    /// Range filters with at least one valid bound.
    pub fn active_ranges(&self) -> impl Iterator<Item = (RangeField, RangeFilter)> + '_ {
        self.ranges
            .iter()
            .map(|(field, bounds)| (*field, bounds.filter()))
            .filter(|(_, f)| f.is_active())
    }

    pub fn is_blank(&self) -> bool {
        *self == Self::blank()
    }
}
