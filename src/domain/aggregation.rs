//! Sector and industry trend aggregation.
//!
//! Groups records by sector or industry, summarises each group by the median
//! Triple Score of its members, and ranks members within a selected group.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::stock::StockRecord;
use super::trend_score::TripleScore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Sector,
    Industry,
}

impl GroupKey {
    /// Non-blank group name of a record under this key.
    pub fn of<'a>(&self, record: &'a StockRecord) -> Option<&'a str> {
        let name = match self {
            GroupKey::Sector => record.sector.as_deref(),
            GroupKey::Industry => record.industry.as_deref(),
        };
        name.filter(|n| !n.trim().is_empty())
    }
}

impl FromStr for GroupKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sector" => Ok(GroupKey::Sector),
            "industry" => Ok(GroupKey::Industry),
            other => Err(format!("unknown group key: {other}")),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Sector => write!(f, "sector"),
            GroupKey::Industry => write!(f, "industry"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub name: String,
    pub median_score: f64,
    pub member_count: usize,
    pub fully_up_count: usize,
    pub pct_fully_up: f64,
    pub fully_down_count: usize,
    pub pct_fully_down: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GroupTrends {
    pub up_trends: Vec<GroupSummary>,
    pub down_trends: Vec<GroupSummary>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Median of the given scores; the mean of the middle two for an even count.
/// Returns `None` for an empty slice.
pub fn median(scores: &[i32]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let mut sorted = scores.to_vec();
    sorted.sort_unstable();
    let n = sorted.len();
    let mid = if n % 2 == 0 {
        (f64::from(sorted[n / 2 - 1]) + f64::from(sorted[n / 2])) / 2.0
    } else {
        f64::from(sorted[n / 2])
    };
    Some(mid)
}

fn summarise(name: &str, members: &[TripleScore]) -> Option<GroupSummary> {
    let scores: Vec<i32> = members.iter().map(|t| t.score).collect();
    let median_score = median(&scores)?;
    let n = members.len();
    let fully_up_count = members.iter().filter(|t| t.fully_up).count();
    let fully_down_count = members.iter().filter(|t| t.fully_down).count();
    let pct = |count: usize| round2(count as f64 / n as f64 * 100.0);

    Some(GroupSummary {
        name: name.to_string(),
        median_score: round2(median_score),
        member_count: n,
        fully_up_count,
        pct_fully_up: pct(fully_up_count),
        fully_down_count,
        pct_fully_down: pct(fully_down_count),
    })
}

/// Per-group summaries in first-appearance order. Records without a group
/// name or without a `udts` block do not take part; a block whose directions
/// are all unknown still counts, with a Triple Score of 0.
pub fn summarise_groups<'a, I>(records: I, key: GroupKey) -> Vec<GroupSummary>
where
    I: IntoIterator<Item = &'a StockRecord>,
{
    let mut order: Vec<&str> = Vec::new();
    let mut groups: HashMap<&str, Vec<TripleScore>> = HashMap::new();

    for record in records {
        let Some(name) = key.of(record) else {
            continue;
        };
        if record.udts.is_none() {
            continue;
        }
        groups
            .entry(name)
            .or_insert_with(|| {
                order.push(name);
                Vec::new()
            })
            .push(TripleScore::of(record));
    }

    order
        .into_iter()
        .filter_map(|name| groups.get(name).and_then(|m| summarise(name, m)))
        .collect()
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Rank groups into up trends (median above zero) and down trends (median
/// below zero), each truncated to `top_n`. Zero-median groups appear in
/// neither list.
pub fn aggregate<'a, I>(records: I, key: GroupKey, top_n: usize) -> GroupTrends
where
    I: IntoIterator<Item = &'a StockRecord>,
{
    let summaries = summarise_groups(records, key);

    let mut up_trends: Vec<GroupSummary> = summaries
        .iter()
        .filter(|g| g.median_score > 0.0)
        .cloned()
        .collect();
    up_trends.sort_by(|a, b| {
        cmp_f64(b.median_score, a.median_score)
            .then_with(|| cmp_f64(b.pct_fully_up, a.pct_fully_up))
    });
    up_trends.truncate(top_n);

    let mut down_trends: Vec<GroupSummary> = summaries
        .into_iter()
        .filter(|g| g.median_score < 0.0)
        .collect();
    down_trends.sort_by(|a, b| {
        cmp_f64(a.median_score, b.median_score)
            .then_with(|| cmp_f64(b.pct_fully_down, a.pct_fully_down))
    });
    down_trends.truncate(top_n);

    GroupTrends {
        up_trends,
        down_trends,
    }
}

/// Records whose group name equals `name` exactly.
pub fn group_members<'a, I>(records: I, key: GroupKey, name: &str) -> Vec<&'a StockRecord>
where
    I: IntoIterator<Item = &'a StockRecord>,
{
    records
        .into_iter()
        .filter(|r| key.of(r) == Some(name))
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedMember<'a> {
    pub record: &'a StockRecord,
    pub triple: TripleScore,
}

impl RankedMember<'_> {
    /// Upside used for ranking; missing counts as zero.
    pub fn upside(&self) -> f64 {
        self.record.upside.unwrap_or(0.0)
    }
}

/// Order the members of one group.
///
/// Up branch: Triple Score descending, fully-up first, fully-down first,
/// then upside descending. Down branch: Triple Score ascending, then upside
/// ascending, with no alignment tie-break.
pub fn rank_members<'a>(members: &[&'a StockRecord], is_down_branch: bool) -> Vec<RankedMember<'a>> {
    let mut ranked: Vec<RankedMember<'a>> = members
        .iter()
        .map(|&r| RankedMember {
            record: r,
            triple: TripleScore::of(r),
        })
        .collect();

    if is_down_branch {
        ranked.sort_by(|a, b| {
            a.triple
                .score
                .cmp(&b.triple.score)
                .then_with(|| cmp_f64(a.upside(), b.upside()))
        });
    } else {
        ranked.sort_by(|a, b| {
            b.triple
                .score
                .cmp(&a.triple.score)
                .then_with(|| b.triple.fully_up.cmp(&a.triple.fully_up))
                .then_with(|| b.triple.fully_down.cmp(&a.triple.fully_down))
                .then_with(|| cmp_f64(b.upside(), a.upside()))
        });
    }
    ranked
}
