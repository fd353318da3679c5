//! Lenient serde helpers for upstream snapshot fields.
//!
//! Upstream records mix JSON numbers, numeric strings, `"-"`, `"NA"` and
//! `null` in the same column. Everything that is not a finite number
//! deserialises to `None` so that missing data can never be read as zero.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use super::stock::{CmpLabel, Direction, InstHolding};

#[derive(Deserialize)]
#[serde(untagged)]
enum Raw {
    Number(f64),
    Text(String),
    Bool(bool),
    Other(IgnoredAny),
}

/// Parse raw text as a finite number. Blank, `"-"`, `"NA"` and anything
/// unparsable yield `None`.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Raw> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(Raw::Number(v)) if v.is_finite() => Some(v),
        Some(Raw::Text(s)) => parse_numeric(&s),
        _ => None,
    })
}

pub fn count<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(number(deserializer)?
        .filter(|v| *v >= 0.0 && v.fract() == 0.0 && *v <= u32::MAX as f64)
        .map(|v| v as u32))
}

pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Raw> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(Raw::Text(s)) if !s.trim().is_empty() => Some(s),
        _ => None,
    })
}

pub fn direction<'de, D>(deserializer: D) -> Result<Option<Direction>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Raw> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(Raw::Text(s)) => s.parse().ok(),
        _ => None,
    })
}

pub fn cmp_label<'de, D>(deserializer: D) -> Result<Option<CmpLabel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Raw> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(Raw::Text(s)) => match s.trim().to_ascii_uppercase().as_str() {
            "YES" => Some(CmpLabel::Yes),
            "NO" => Some(CmpLabel::No),
            _ => None,
        },
        Some(Raw::Bool(b)) => Some(if b { CmpLabel::Yes } else { CmpLabel::No }),
        _ => None,
    })
}

pub fn inst_holding<'de, D>(deserializer: D) -> Result<Option<InstHolding>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Raw> = Option::deserialize(deserializer)?;
    Ok(match raw {
        Some(Raw::Number(v)) if v.is_finite() => Some(InstHolding::Percent(v)),
        Some(Raw::Text(s)) if s.trim().is_empty() => None,
        Some(Raw::Text(s)) => Some(
            parse_numeric(&s)
                .map(InstHolding::Percent)
                .unwrap_or(InstHolding::NotAvailable),
        ),
        _ => None,
    })
}

pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<Raw> = Option::deserialize(deserializer)?;
    Ok(matches!(raw, Some(Raw::Bool(true))))
}
