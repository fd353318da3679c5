//! View state: criteria, top-level selectors and sort order.
//!
//! The presentation layer owns a `ViewState` and replaces it on every user
//! action; the engine only ever reads it.

use std::fmt;
use std::str::FromStr;

use super::criteria::FilterCriteria;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Quadrant {
    #[default]
    All,
    AllUp,
    AllDown,
}

impl FromStr for Quadrant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "all" => Ok(Quadrant::All),
            "all_up" => Ok(Quadrant::AllUp),
            "all_down" => Ok(Quadrant::AllDown),
            other => Err(format!("unknown quadrant: {other}")),
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quadrant::All => write!(f, "all"),
            Quadrant::AllUp => write!(f, "all_up"),
            Quadrant::AllDown => write!(f, "all_down"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum MembershipFilter {
    #[default]
    All,
    Member,
    NonMember,
}

impl FromStr for MembershipFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "all" => Ok(MembershipFilter::All),
            "member" | "nifty50" => Ok(MembershipFilter::Member),
            "non_member" | "non_nifty50" => Ok(MembershipFilter::NonMember),
            other => Err(format!("unknown membership filter: {other}")),
        }
    }
}

impl fmt::Display for MembershipFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MembershipFilter::All => write!(f, "all"),
            MembershipFilter::Member => write!(f, "member"),
            MembershipFilter::NonMember => write!(f, "non_member"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(format!("unknown sort direction: {other}")),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "asc"),
            SortDirection::Descending => write!(f, "desc"),
        }
    }
}

/// Sortable table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    Symbol,
    Sector,
    Industry,
    Monthly,
    Weekly,
    Daily,
    Hourly,
    Min15,
    Cmp,
    BigTrend,
    InitTrend,
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
    DailySupertrend,
    DailyBbPct,
    WeeklyBbPct,
    MonthlyBbPct,
}

impl SortColumn {
    pub const ALL: [SortColumn; 33] = [
        SortColumn::Symbol,
        SortColumn::Sector,
        SortColumn::Industry,
        SortColumn::Monthly,
        SortColumn::Weekly,
        SortColumn::Daily,
        SortColumn::Hourly,
        SortColumn::Min15,
        SortColumn::Cmp,
        SortColumn::BigTrend,
        SortColumn::InitTrend,
        SortColumn::Dist,
        SortColumn::Score,
        SortColumn::Upside,
        SortColumn::TwoYrHigh,
        SortColumn::InstHold,
        SortColumn::Mcap,
        SortColumn::Roe,
        SortColumn::Pe,
        SortColumn::Pb,
        SortColumn::De,
        SortColumn::Rev,
        SortColumn::Earn,
        SortColumn::DivYield,
        SortColumn::NetIncome,
        SortColumn::EntEbitda,
        SortColumn::EntRev,
        SortColumn::DailyRsi,
        SortColumn::DailyAdx,
        SortColumn::DailySupertrend,
        SortColumn::DailyBbPct,
        SortColumn::WeeklyBbPct,
        SortColumn::MonthlyBbPct,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::Symbol => "symbol",
            SortColumn::Sector => "sector",
            SortColumn::Industry => "industry",
            SortColumn::Monthly => "monthly",
            SortColumn::Weekly => "weekly",
            SortColumn::Daily => "daily",
            SortColumn::Hourly => "hourly",
            SortColumn::Min15 => "min15",
            SortColumn::Cmp => "cmp",
            SortColumn::BigTrend => "big_trend",
            SortColumn::InitTrend => "init_trend",
            SortColumn::Dist => "dist",
            SortColumn::Score => "score",
            SortColumn::Upside => "upside",
            SortColumn::TwoYrHigh => "two_yr_high",
            SortColumn::InstHold => "inst_hold",
            SortColumn::Mcap => "mcap",
            SortColumn::Roe => "roe",
            SortColumn::Pe => "pe",
            SortColumn::Pb => "pb",
            SortColumn::De => "de",
            SortColumn::Rev => "rev",
            SortColumn::Earn => "earn",
            SortColumn::DivYield => "div_yield",
            SortColumn::NetIncome => "net_income",
            SortColumn::EntEbitda => "ent_ebitda",
            SortColumn::EntRev => "ent_rev",
            SortColumn::DailyRsi => "daily_rsi",
            SortColumn::DailyAdx => "daily_adx",
            SortColumn::DailySupertrend => "daily_supertrend",
            SortColumn::DailyBbPct => "daily_bb_pct",
            SortColumn::WeeklyBbPct => "weekly_bb_pct",
            SortColumn::MonthlyBbPct => "monthly_bb_pct",
        }
    }

    /// Unknown or stale identifiers resolve to `None`, i.e. no sort column.
    pub fn parse(identifier: &str) -> Option<SortColumn> {
        let key = identifier.trim().to_ascii_lowercase();
        SortColumn::ALL.iter().copied().find(|c| c.as_str() == key)
    }

    pub fn is_alphabetic(&self) -> bool {
        matches!(
            self,
            SortColumn::Symbol | SortColumn::Sector | SortColumn::Industry | SortColumn::InitTrend
        )
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SortState {
    pub column: Option<SortColumn>,
    pub direction: SortDirection,
}

impl SortState {
    /// `{none, descending}`.
    pub fn initial() -> Self {
        Self::default()
    }

    pub fn by(column: SortColumn, direction: SortDirection) -> Self {
        Self {
            column: Some(column),
            direction,
        }
    }

    /// Build from an identifier that may be unknown; unknown identifiers
    /// degrade to no column.
    pub fn from_identifier(identifier: &str, direction: SortDirection) -> Self {
        Self {
            column: SortColumn::parse(identifier),
            direction,
        }
    }

    /// Header click: the same column flips direction, a new column starts
    /// descending.
    pub fn toggled(&self, column: SortColumn) -> Self {
        if self.column == Some(column) {
            Self {
                column: self.column,
                direction: self.direction.flipped(),
            }
        } else {
            Self::by(column, SortDirection::Descending)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ViewState {
    pub criteria: FilterCriteria,
    pub quadrant: Quadrant,
    pub membership: MembershipFilter,
    pub sort: SortState,
}

impl ViewState {
    pub fn with_criteria(&self, criteria: FilterCriteria) -> Self {
        Self {
            criteria,
            ..self.clone()
        }
    }

    pub fn with_quadrant(&self, quadrant: Quadrant) -> Self {
        Self {
            quadrant,
            ..self.clone()
        }
    }

    pub fn with_membership(&self, membership: MembershipFilter) -> Self {
        Self {
            membership,
            ..self.clone()
        }
    }

    pub fn with_sort(&self, sort: SortState) -> Self {
        Self {
            sort,
            ..self.clone()
        }
    }
}
