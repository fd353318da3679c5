//! CSV export adapter implementing ExportPort.
//!
//! One row per record in display order. Missing values are written as empty
//! cells, never as zero.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::domain::error::ScreenerError;
use crate::domain::stock::{CmpLabel, StockRecord, Timeframe};
use crate::domain::trend_score::TripleScore;
use crate::ports::export_port::ExportPort;

#[derive(Serialize)]
struct ExportRow<'a> {
    symbol: &'a str,
    sector: Option<&'a str>,
    industry: Option<&'a str>,
    monthly: Option<String>,
    weekly: Option<String>,
    daily: Option<String>,
    #[serde(rename = "1hour")]
    hourly: Option<String>,
    #[serde(rename = "15min")]
    fifteen_min: Option<String>,
    triple_score: i32,
    cmp: Option<f64>,
    cmp_change_pct: Option<f64>,
    cmp_label: Option<&'static str>,
    big_trend: Option<String>,
    big_trend_distance_pct: Option<f64>,
    initial_trend: Option<String>,
    max_distance: Option<f64>,
    score: Option<f64>,
    upside: Option<f64>,
    target_price: Option<f64>,
    two_yr_high_pct: Option<f64>,
    inst_holding_pct: Option<String>,
    market_cap: Option<f64>,
    roe: Option<f64>,
    pe: Option<f64>,
    pb: Option<f64>,
    de: Option<f64>,
    revenue_growth: Option<f64>,
    earnings_growth: Option<f64>,
    dividend_yield: Option<f64>,
    net_income: Option<f64>,
    ev_ebitda: Option<f64>,
    ev_revenue: Option<f64>,
    daily_rsi: Option<f64>,
    daily_adx: Option<f64>,
    daily_supertrend: Option<String>,
    daily_supertrend_level: Option<f64>,
    daily_bb_pct: Option<f64>,
    weekly_bb_pct: Option<f64>,
    monthly_bb_pct: Option<f64>,
}

impl<'a> ExportRow<'a> {
    fn from_record(r: &'a StockRecord) -> Self {
        let dir = |tf: Timeframe| r.direction(tf).map(|d| d.to_string());
        let f = &r.fundamentals;
        Self {
            symbol: &r.symbol,
            sector: r.sector.as_deref(),
            industry: r.industry.as_deref(),
            monthly: dir(Timeframe::Monthly),
            weekly: dir(Timeframe::Weekly),
            daily: dir(Timeframe::Daily),
            hourly: dir(Timeframe::Hourly),
            fifteen_min: dir(Timeframe::FifteenMin),
            triple_score: TripleScore::of(r).score,
            cmp: r.cmp,
            cmp_change_pct: r.cmp_change_pct,
            cmp_label: r.cmp_label.map(|l| match l {
                CmpLabel::Yes => "YES",
                CmpLabel::No => "NO",
            }),
            big_trend: r.biggest_trend_direction().map(|d| d.to_string()),
            big_trend_distance_pct: r.biggest_trend.as_ref().and_then(|t| t.distance_pct),
            initial_trend: r.initial_trend_direction().map(|d| d.to_string()),
            max_distance: r.max_distance,
            score: r.total_score(),
            upside: r.upside,
            target_price: r.target_price,
            two_yr_high_pct: r.two_yr_high_pct,
            inst_holding_pct: r.inst_holding_pct.map(|h| match h.percent() {
                Some(v) => v.to_string(),
                None => "NA".to_string(),
            }),
            market_cap: r.market_cap,
            roe: f.roe,
            pe: f.pe,
            pb: f.pb,
            de: f.debt_to_equity,
            revenue_growth: f.revenue_growth,
            earnings_growth: f.earnings_growth,
            dividend_yield: f.dividend_yield,
            net_income: f.net_income_to_common,
            ev_ebitda: f.enterprise_to_ebitda,
            ev_revenue: f.enterprise_to_revenue,
            daily_rsi: r.daily_rsi,
            daily_adx: r.daily_adx,
            daily_supertrend: r.supertrend_direction().map(|d| d.to_string()),
            daily_supertrend_level: r.daily_supertrend.as_ref().and_then(|s| s.level),
            daily_bb_pct: r.daily_bb_pct,
            weekly_bb_pct: r.weekly_bb_pct,
            monthly_bb_pct: r.monthly_bb_pct,
        }
    }
}

pub struct CsvExportAdapter;

impl CsvExportAdapter {
    /// Render rows to CSV text with a header line.
    pub fn render(rows: &[&StockRecord]) -> Result<String, ScreenerError> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for record in rows {
            wtr.serialize(ExportRow::from_record(record))
                .map_err(|e| ScreenerError::Export {
                    reason: format!("failed to encode {}: {}", record.symbol, e),
                })?;
        }
        let bytes = wtr.into_inner().map_err(|e| ScreenerError::Export {
            reason: format!("failed to flush CSV: {}", e),
        })?;
        String::from_utf8(bytes).map_err(|e| ScreenerError::Export {
            reason: format!("CSV output is not UTF-8: {}", e),
        })
    }
}

impl ExportPort for CsvExportAdapter {
    fn write(&self, rows: &[&StockRecord], output_path: &str) -> Result<(), ScreenerError> {
        let content = Self::render(rows)?;
        if let Some(parent) = Path::new(output_path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(output_path, content).map_err(|e| ScreenerError::Export {
            reason: format!("failed to write {}: {}", output_path, e),
        })?;
        tracing::info!(path = output_path, rows = rows.len(), "exported view");
        Ok(())
    }
}
