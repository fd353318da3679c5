//! Reference index membership (NIFTY 50 by default).
//!
//! The symbol set is static external data; the engine only tests membership.

use std::collections::HashSet;

pub const NIFTY50_SYMBOLS: [&str; 50] = [
    "ADANIENT", "ADANIPORTS", "APOLLOHOSP", "ASIANPAINT", "AXISBANK", "BAJAJ-AUTO", "BAJFINANCE",
    "BAJAJFINSV", "BEL", "BHARTIARTL", "CIPLA", "COALINDIA", "DRREDDY", "EICHERMOT", "ETERNAL",
    "GRASIM", "HCLTECH", "HDFCBANK", "HDFCLIFE", "HINDALCO", "HINDUNILVR", "ICICIBANK", "ITC",
    "INFY", "INDIGO", "JSWSTEEL", "JIOFIN", "KOTAKBANK", "LT", "M&M", "MARUTI", "MAXHEALTH",
    "NTPC", "NESTLEIND", "ONGC", "POWERGRID", "RELIANCE", "SBILIFE", "SHRIRAMFIN", "SBIN",
    "SUNPHARMA", "TCS", "TATACONSUM", "TMPV", "TATASTEEL", "TECHM", "TITAN", "TRENT",
    "ULTRACEMCO", "WIPRO",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceIndex {
    pub name: String,
    symbols: HashSet<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum MembershipError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),
}

impl ReferenceIndex {
    pub fn new(name: impl Into<String>, symbols: impl IntoIterator<Item = String>) -> Self {
        Self {
            name: name.into(),
            symbols: symbols.into_iter().map(|s| s.trim().to_uppercase()).collect(),
        }
    }

    pub fn nifty50() -> Self {
        Self::new("NIFTY 50", NIFTY50_SYMBOLS.iter().map(|s| s.to_string()))
    }

    pub fn empty() -> Self {
        Self::new("", Vec::new())
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Default for ReferenceIndex {
    fn default() -> Self {
        Self::nifty50()
    }
}

/// Parse a comma separated symbol list. Symbols are upper-cased; empty
/// tokens and duplicates are rejected.
pub fn parse_symbols(input: &str) -> Result<Vec<String>, MembershipError> {
    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(MembershipError::EmptyToken);
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(MembershipError::DuplicateSymbol(symbol));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nifty50_has_fifty_distinct_symbols() {
        let index = ReferenceIndex::nifty50();
        assert_eq!(index.len(), 50);
        assert!(index.contains("M&M"));
        assert!(index.contains("BAJAJ-AUTO"));
        assert!(!index.contains("ZOMATO"));
    }

    #[test]
    fn membership_is_case_sensitive_on_lookup() {
        let index = ReferenceIndex::new("custom", vec!["infy".to_string()]);
        assert!(index.contains("INFY"));
        assert!(!index.contains("infy"));
    }

    #[test]
    fn parse_symbols_basic() {
        let result = parse_symbols(" tcs, INFY ,wipro").unwrap();
        assert_eq!(result, vec!["TCS", "INFY", "WIPRO"]);
    }

    #[test]
    fn parse_symbols_empty_token() {
        assert!(matches!(
            parse_symbols("TCS,,INFY"),
            Err(MembershipError::EmptyToken)
        ));
    }

    #[test]
    fn parse_symbols_duplicate() {
        let result = parse_symbols("TCS,INFY,tcs");
        assert!(matches!(result, Err(MembershipError::DuplicateSymbol(s)) if s == "TCS"));
    }
}
