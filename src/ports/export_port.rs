//! Export port trait for projected screener rows.

use crate::domain::error::ScreenerError;
use crate::domain::stock::StockRecord;

/// Port for writing a filtered and sorted view.
pub trait ExportPort {
    fn write(&self, rows: &[&StockRecord], output_path: &str) -> Result<(), ScreenerError>;
}
