//! Stock record model for one screener snapshot.
//!
//! Records are immutable once loaded. Every numeric field is optional: a value
//! that is absent upstream, or arrives as a sentinel such as `"-"` or `"NA"`,
//! is `None` and never zero.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::lenient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Direction {
    #[serde(rename = "UP")]
    Up,
    #[serde(rename = "DOWN")]
    Down,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "UP" => Ok(Direction::Up),
            "DOWN" => Ok(Direction::Down),
            other => Err(format!("unknown direction: {other}")),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "UP"),
            Direction::Down => write!(f, "DOWN"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timeframe {
    Monthly,
    Weekly,
    Daily,
    Hourly,
    FifteenMin,
}

impl Timeframe {
    pub const ALL: [Timeframe; 5] = [
        Timeframe::Monthly,
        Timeframe::Weekly,
        Timeframe::Daily,
        Timeframe::Hourly,
        Timeframe::FifteenMin,
    ];
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timeframe::Monthly => write!(f, "monthly"),
            Timeframe::Weekly => write!(f, "weekly"),
            Timeframe::Daily => write!(f, "daily"),
            Timeframe::Hourly => write!(f, "1hour"),
            Timeframe::FifteenMin => write!(f, "15min"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CmpLabel {
    #[serde(rename = "YES")]
    Yes,
    #[serde(rename = "NO")]
    No,
}

/// Institutional holding percent, which upstream reports as a number or as a
/// "not available" sentinel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InstHolding {
    Percent(f64),
    NotAvailable,
}

impl InstHolding {
    pub fn percent(&self) -> Option<f64> {
        match self {
            InstHolding::Percent(v) => Some(*v),
            InstHolding::NotAvailable => None,
        }
    }
}

impl Serialize for InstHolding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            InstHolding::Percent(v) => serializer.serialize_f64(*v),
            InstHolding::NotAvailable => serializer.serialize_str("NA"),
        }
    }
}

/// Per-timeframe UDTS directions.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Udts {
    #[serde(default, deserialize_with = "lenient::direction")]
    pub monthly: Option<Direction>,
    #[serde(default, deserialize_with = "lenient::direction")]
    pub weekly: Option<Direction>,
    #[serde(default, deserialize_with = "lenient::direction")]
    pub daily: Option<Direction>,
    #[serde(rename = "1hour", default, deserialize_with = "lenient::direction")]
    pub hourly: Option<Direction>,
    #[serde(rename = "15min", default, deserialize_with = "lenient::direction")]
    pub fifteen_min: Option<Direction>,
}

impl Udts {
    pub fn get(&self, timeframe: Timeframe) -> Option<Direction> {
        match timeframe {
            Timeframe::Monthly => self.monthly,
            Timeframe::Weekly => self.weekly,
            Timeframe::Daily => self.daily,
            Timeframe::Hourly => self.hourly,
            Timeframe::FifteenMin => self.fifteen_min,
        }
    }

    pub fn is_empty(&self) -> bool {
        Timeframe::ALL.iter().all(|tf| self.get(*tf).is_none())
    }
}

/// Per-timeframe numeric values (support prices or support distances).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TimeframeValues {
    #[serde(default, deserialize_with = "lenient::number")]
    pub monthly: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub weekly: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub daily: Option<f64>,
    #[serde(rename = "1hour", default, deserialize_with = "lenient::number")]
    pub hourly: Option<f64>,
    #[serde(rename = "15min", default, deserialize_with = "lenient::number")]
    pub fifteen_min: Option<f64>,
}

impl TimeframeValues {
    pub fn get(&self, timeframe: Timeframe) -> Option<f64> {
        match timeframe {
            Timeframe::Monthly => self.monthly,
            Timeframe::Weekly => self.weekly,
            Timeframe::Daily => self.daily,
            Timeframe::Hourly => self.hourly,
            Timeframe::FifteenMin => self.fifteen_min,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TrendCandle {
    #[serde(default, deserialize_with = "lenient::text")]
    pub datetime: Option<String>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub open: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub high: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub low: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub close: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct BiggestTrend {
    #[serde(default, deserialize_with = "lenient::direction")]
    pub direction: Option<Direction>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub support: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub distance_pct: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub cmp_diff: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub low: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub high: Option<f64>,
    #[serde(default)]
    pub start_candle: Option<TrendCandle>,
    #[serde(default)]
    pub end_candle: Option<TrendCandle>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct InitialTrend {
    #[serde(default, deserialize_with = "lenient::direction")]
    pub direction: Option<Direction>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub support: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Scores {
    #[serde(default, deserialize_with = "lenient::number")]
    pub total: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Fundamentals {
    #[serde(default, deserialize_with = "lenient::number")]
    pub roe: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub pe: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub pb: Option<f64>,
    #[serde(rename = "de", alias = "debt_to_equity", default, deserialize_with = "lenient::number")]
    pub debt_to_equity: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub revenue_growth: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub earnings_growth: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub dividend_yield: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub net_income_to_common: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub enterprise_to_ebitda: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub enterprise_to_revenue: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Supertrend {
    #[serde(default, deserialize_with = "lenient::direction")]
    pub direction: Option<Direction>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub level: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StockRecord {
    pub symbol: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub sector: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub industry: Option<String>,
    #[serde(default)]
    pub udts: Option<Udts>,
    #[serde(default)]
    pub supports: TimeframeValues,
    #[serde(default)]
    pub support_distances: TimeframeValues,
    #[serde(default, deserialize_with = "lenient::number")]
    pub cmp: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub cmp_change_pct: Option<f64>,
    #[serde(default, deserialize_with = "lenient::cmp_label")]
    pub cmp_label: Option<CmpLabel>,
    #[serde(default)]
    pub biggest_trend: Option<BiggestTrend>,
    #[serde(default)]
    pub initial_trend: Option<InitialTrend>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub max_distance: Option<f64>,
    #[serde(default)]
    pub scores: Scores,
    #[serde(default, deserialize_with = "lenient::number")]
    pub upside: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub target_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::count")]
    pub analyst_count: Option<u32>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub two_yr_high_pct: Option<f64>,
    #[serde(default, deserialize_with = "lenient::inst_holding")]
    pub inst_holding_pct: Option<InstHolding>,
    #[serde(rename = "market_cap_tkc", alias = "market_cap", default, deserialize_with = "lenient::number")]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub fundamentals: Fundamentals,
    #[serde(default, deserialize_with = "lenient::number")]
    pub daily_rsi: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub daily_adx: Option<f64>,
    #[serde(default)]
    pub daily_supertrend: Option<Supertrend>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub daily_bb_pct: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub weekly_bb_pct: Option<f64>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub monthly_bb_pct: Option<f64>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_triple_up: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub is_triple_down: bool,
}

impl StockRecord {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            ..Default::default()
        }
    }

    pub fn direction(&self, timeframe: Timeframe) -> Option<Direction> {
        self.udts.as_ref().and_then(|u| u.get(timeframe))
    }

    pub fn total_score(&self) -> Option<f64> {
        self.scores.total
    }

    pub fn biggest_trend_direction(&self) -> Option<Direction> {
        self.biggest_trend.as_ref().and_then(|t| t.direction)
    }

    pub fn initial_trend_direction(&self) -> Option<Direction> {
        self.initial_trend.as_ref().and_then(|t| t.direction)
    }

    pub fn supertrend_direction(&self) -> Option<Direction> {
        self.daily_supertrend.as_ref().and_then(|s| s.direction)
    }

    /// Returns true when the precomputed triple flags agree with the
    /// monthly/weekly/daily directions and are mutually exclusive.
    pub fn triple_flags_consistent(&self) -> bool {
        let m = self.direction(Timeframe::Monthly);
        let w = self.direction(Timeframe::Weekly);
        let d = self.direction(Timeframe::Daily);
        let up = super::trend_score::is_fully_up(m, w, d);
        let down = super::trend_score::is_fully_down(m, w, d);
        self.is_triple_up == up && self.is_triple_down == down
    }
}

/// One atomic delivery of stock records.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub stocks: Vec<StockRecord>,
    pub timestamp: Option<DateTime<FixedOffset>>,
}

impl Snapshot {
    pub fn new(stocks: Vec<StockRecord>) -> Self {
        Self {
            stocks,
            timestamp: None,
        }
    }

    pub fn len(&self) -> usize {
        self.stocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stocks.is_empty()
    }
}
