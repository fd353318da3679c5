//! Triple Score: signed composite of the monthly, weekly and daily UDTS.

use super::stock::{Direction, StockRecord, Timeframe};

pub const DIRECTION_WEIGHT: i32 = 100;

fn contribution(direction: Option<Direction>) -> i32 {
    match direction {
        Some(Direction::Up) => DIRECTION_WEIGHT,
        Some(Direction::Down) => -DIRECTION_WEIGHT,
        None => 0,
    }
}

/// Sum of +100 (UP), -100 (DOWN) or 0 (absent) per timeframe. The result is
/// always one of -300, -200, -100, 0, 100, 200, 300.
pub fn score(
    monthly: Option<Direction>,
    weekly: Option<Direction>,
    daily: Option<Direction>,
) -> i32 {
    contribution(monthly) + contribution(weekly) + contribution(daily)
}

pub fn is_fully_up(
    monthly: Option<Direction>,
    weekly: Option<Direction>,
    daily: Option<Direction>,
) -> bool {
    [monthly, weekly, daily]
        .iter()
        .all(|d| *d == Some(Direction::Up))
}

pub fn is_fully_down(
    monthly: Option<Direction>,
    weekly: Option<Direction>,
    daily: Option<Direction>,
) -> bool {
    [monthly, weekly, daily]
        .iter()
        .all(|d| *d == Some(Direction::Down))
}

/// Triple Score and alignment flags for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripleScore {
    pub score: i32,
    pub fully_up: bool,
    pub fully_down: bool,
}

impl TripleScore {
    pub fn of(record: &StockRecord) -> Self {
        let m = record.direction(Timeframe::Monthly);
        let w = record.direction(Timeframe::Weekly);
        let d = record.direction(Timeframe::Daily);
        Self {
            score: score(m, w, d),
            fully_up: is_fully_up(m, w, d),
            fully_down: is_fully_down(m, w, d),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UP: Option<Direction> = Some(Direction::Up);
    const DOWN: Option<Direction> = Some(Direction::Down);

    #[test]
    fn all_up_is_300() {
        assert_eq!(score(UP, UP, UP), 300);
        assert!(is_fully_up(UP, UP, UP));
        assert!(!is_fully_down(UP, UP, UP));
    }

    #[test]
    fn all_down_is_minus_300() {
        assert_eq!(score(DOWN, DOWN, DOWN), -300);
        assert!(is_fully_down(DOWN, DOWN, DOWN));
    }

    #[test]
    fn mixed_directions_cancel() {
        assert_eq!(score(UP, DOWN, None), 0);
        assert_eq!(score(DOWN, UP, UP), 100);
        assert_eq!(score(None, None, DOWN), -100);
    }

    #[test]
    fn missing_direction_is_not_fully_aligned() {
        assert!(!is_fully_up(UP, UP, None));
        assert!(!is_fully_down(None, DOWN, DOWN));
        assert!(!is_fully_up(None, None, None));
        assert!(!is_fully_down(None, None, None));
    }

    #[test]
    fn triple_score_of_record_without_udts() {
        let record = StockRecord::new("EMPTY");
        let t = TripleScore::of(&record);
        assert_eq!(t.score, 0);
        assert!(!t.fully_up);
        assert!(!t.fully_down);
    }
}
