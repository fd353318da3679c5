//! Inclusive numeric range filter over possibly-missing values.
//!
//! A bound is active only when its text is a valid decimal. Once any bound is
//! active, a row without a usable value is rejected instead of being compared
//! as zero.

use super::lenient::parse_numeric;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RangeFilter {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl RangeFilter {
    pub fn from_bounds(min: &str, max: &str) -> Self {
        Self {
            min: parse_numeric(min),
            max: parse_numeric(max),
        }
    }

    pub fn is_active(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    pub fn passes(&self, value: Option<f64>) -> bool {
        if !self.is_active() {
            return true;
        }
        let Some(v) = value.filter(|v| v.is_finite()) else {
            return false;
        };
        match (self.min, self.max) {
            (Some(lo), Some(hi)) => v >= lo && v <= hi,
            (Some(lo), None) => v >= lo,
            (None, Some(hi)) => v <= hi,
            (None, None) => true,
        }
    }

    /// Same rule for raw text values such as `"-"` or `""`.
    pub fn passes_raw(&self, value: Option<&str>) -> bool {
        self.passes(value.and_then(parse_numeric))
    }
}

/// `passes(value, min, max)` in one call.
pub fn passes(value: Option<f64>, min: &str, max: &str) -> bool {
    RangeFilter::from_bounds(min, max).passes(value)
}
