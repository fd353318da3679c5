//! Core screening engine: record model, filtering, sorting and aggregation.

pub mod stock;
pub mod lenient;
pub mod trend_score;
pub mod range_filter;
pub mod criteria;
pub mod view_state;
pub mod membership;
pub mod predicate;
pub mod comparator;
pub mod aggregation;
pub mod presets;
pub mod projection;
pub mod config_validation;
pub mod error;
