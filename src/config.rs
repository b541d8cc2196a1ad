//! Environment-driven settings and scan parameters.

use crate::error::ScanError;
use chrono::{NaiveDate, Utc};
use std::env;
use std::path::Path;

pub const DEFAULT_DATABASE_URL: &str = "host=localhost user=aitrade password=aitrade1 dbname=aitrade";
pub const DEFAULT_LOOKBACK_DAYS: u32 = 5;
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Deployment environment (`APP_ENV`), defaults to `sandbox`.
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

pub fn get_database_url() -> String {
    env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

pub fn get_webhook_url() -> Option<String> {
    env::var("WEBHOOK_URL").ok().filter(|url| !url.trim().is_empty())
}

pub fn get_scan_concurrency() -> usize {
    env::var("SCAN_CONCURRENCY")
        .ok()
        .and_then(|c| c.parse().ok())
        .filter(|&c: &usize| c > 0)
        .unwrap_or(DEFAULT_CONCURRENCY)
}

/// Parameters of one scan run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Trailing calendar days, ending at `as_of`, in which matches are reported.
    pub lookback_days: u32,
    /// Last date considered. Bars after it are never loaded.
    pub as_of: NaiveDate,
    /// Explicit universe; `None` scans every symbol in the store.
    pub symbols: Option<Vec<String>>,
    /// Skip symbols whose latest market cap is below this (or unknown).
    pub min_market_cap: Option<f64>,
    pub concurrency: usize,
    pub persist_indicators: bool,
    /// Recent enriched bars kept per matched symbol, newest first. 0 disables.
    pub history_bars: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            as_of: Utc::now().date_naive(),
            symbols: None,
            min_market_cap: None,
            concurrency: DEFAULT_CONCURRENCY,
            persist_indicators: false,
            history_bars: 0,
        }
    }
}

/// One ticker per line; blank lines and `#` comments are skipped.
pub fn read_tickers_from_file(path: impl AsRef<Path>) -> Result<Vec<String>, ScanError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|source| ScanError::TickerFile {
        path: path.display().to_string(),
        source,
    })?;

    Ok(parse_tickers(&contents))
}

fn parse_tickers(contents: &str) -> Vec<String> {
    let mut tickers: Vec<String> = Vec::new();
    for line in contents.lines() {
        let ticker = line.trim();
        if ticker.is_empty() || ticker.starts_with('#') {
            continue;
        }
        if !tickers.iter().any(|t| t == ticker) {
            tickers.push(ticker.to_string());
        }
    }
    tickers
}
