//! Filtered and sorted views over one snapshot, plus header counts.

use serde::Serialize;

use super::comparator::sort_records;
use super::membership::ReferenceIndex;
use super::predicate::{is_all_down, is_all_up, matches};
use super::stock::{Snapshot, StockRecord};
use super::view_state::ViewState;

/// One page of the screener table.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection<'a> {
    pub rows: Vec<&'a StockRecord>,
    /// Records passing the filter before truncation.
    pub filtered_count: usize,
    pub total: usize,
}

impl Projection<'_> {
    pub fn is_truncated(&self) -> bool {
        self.rows.len() < self.filtered_count
    }
}

/// Filter, sort, then truncate to `page_size` rows.
pub fn project<'a>(
    snapshot: &'a Snapshot,
    view: &ViewState,
    index: &ReferenceIndex,
    page_size: usize,
) -> Projection<'a> {
    let mut rows: Vec<&StockRecord> = snapshot
        .stocks
        .iter()
        .filter(|r| matches(r, view, index))
        .collect();
    let filtered_count = rows.len();
    sort_records(&mut rows, view);
    rows.truncate(page_size);

    tracing::debug!(
        total = snapshot.len(),
        filtered = filtered_count,
        shown = rows.len(),
        quadrant = %view.quadrant,
        membership = %view.membership,
        "projected snapshot"
    );

    Projection {
        rows,
        filtered_count,
        total: snapshot.len(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SummaryCounts {
    pub total: usize,
    pub members: usize,
    pub non_members: usize,
    pub triple_up: usize,
    pub triple_down: usize,
    /// Triple up plus triple down.
    pub triple: usize,
    pub all_up: usize,
    pub all_down: usize,
    pub filtered: usize,
}

impl SummaryCounts {
    /// Header counts over the whole snapshot. Triple counts use the
    /// precomputed upstream flags; `filtered` applies the current view.
    pub fn compute(snapshot: &Snapshot, view: &ViewState, index: &ReferenceIndex) -> Self {
        let mut counts = SummaryCounts {
            total: snapshot.len(),
            ..Default::default()
        };
        for record in &snapshot.stocks {
            if index.contains(&record.symbol) {
                counts.members += 1;
            } else {
                counts.non_members += 1;
            }
            if record.is_triple_up {
                counts.triple_up += 1;
            }
            if record.is_triple_down {
                counts.triple_down += 1;
            }
            if is_all_up(record) {
                counts.all_up += 1;
            }
            if is_all_down(record) {
                counts.all_down += 1;
            }
            if matches(record, view, index) {
                counts.filtered += 1;
            }
        }
        counts.triple = counts.triple_up + counts.triple_down;
        counts
    }
}
