//! Named filter presets.
//!
//! A preset is a complete replacement of the view state: quadrant and
//! membership back to `all`, sort back to `{none, descending}`, and a fixed
//! criteria bundle. It never merges with what was there before.

use std::fmt;
use std::str::FromStr;

use super::criteria::{DirectionFilter, FilterCriteria, RangeField};
use super::error::ScreenerError;
use super::stock::Direction;
use super::view_state::{MembershipFilter, Quadrant, SortState, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    /// Monthly and weekly UP with strong fundamentals.
    BestUpUp,
    /// Monthly DOWN turning up on the weekly and daily.
    BestTurn,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::BestUpUp, Preset::BestTurn];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::BestUpUp => "best-up-up",
            Preset::BestTurn => "best-turn",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Preset::BestUpUp => "Best Up-Up",
            Preset::BestTurn => "Best Turn",
        }
    }

    /// The fixed criteria bundle this preset installs.
    pub fn criteria(&self) -> FilterCriteria {
        let (monthly, daily) = match self {
            Preset::BestUpUp => (DirectionFilter::Only(Direction::Up), DirectionFilter::All),
            Preset::BestTurn => (
                DirectionFilter::Only(Direction::Down),
                DirectionFilter::Only(Direction::Up),
            ),
        };
        quality_fundamentals(
            FilterCriteria::blank()
                .with_monthly(monthly)
                .with_weekly(DirectionFilter::Only(Direction::Up))
                .with_daily(daily),
        )
    }
}

fn quality_fundamentals(criteria: FilterCriteria) -> FilterCriteria {
    criteria
        .with_min(RangeField::TwoYrHigh, "15")
        .with_min(RangeField::Mcap, "20")
        .with_min(RangeField::Roe, "15")
        .with_max(RangeField::Pe, "50")
        .with_max(RangeField::De, "50")
        .with_min(RangeField::Rev, "0")
        .with_min(RangeField::Earn, "0")
        .with_min(RangeField::NetIncome, "50")
}

impl FromStr for Preset {
    type Err = ScreenerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match key.as_str() {
            "bestupup" | "bestuu" | "upup" => Ok(Preset::BestUpUp),
            "bestturn" | "turn" => Ok(Preset::BestTurn),
            _ => Err(ScreenerError::UnknownPreset(s.trim().to_string())),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn apply(preset: Preset) -> ViewState {
    ViewState {
        criteria: preset.criteria(),
        quadrant: Quadrant::All,
        membership: MembershipFilter::All,
        sort: SortState::initial(),
    }
}

/// Blank criteria and initial sort; quadrant and membership are untouched.
pub fn clear_all(view: &ViewState) -> ViewState {
    view.with_criteria(FilterCriteria::blank())
        .with_sort(SortState::initial())
}
