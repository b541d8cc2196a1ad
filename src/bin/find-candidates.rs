//! find-candidates
//!
//! Scans stored daily bars for trade candidates and prints them as JSON.
//! Exits non-zero only when the store cannot be reached or queried.

use candidate_scan::config::{self, ScanConfig};
use candidate_scan::core::Scanner;
use candidate_scan::db::PostgresStore;
use candidate_scan::indicators::IndicatorEngine;
use candidate_scan::logging;
use candidate_scan::report::CandidateReport;
use candidate_scan::services::WebhookClient;
use candidate_scan::signals::SelectionCriteria;
use chrono::{NaiveDate, Utc};
use clap::Parser;
use dotenvy::dotenv;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(version, about = "Find trade candidates from stored daily price bars")]
struct Cli {
    /// Report matches from the trailing N calendar days
    #[arg(long, alias = "lookbackdays", default_value_t = config::DEFAULT_LOOKBACK_DAYS,
          value_parser = clap::value_parser!(u32).range(1..))]
    history_days: u32,

    /// Last date to consider (YYYY-MM-DD), defaults to today (UTC)
    #[arg(long, value_name = "DATE")]
    as_of: Option<NaiveDate>,

    /// File with one ticker per line; scans every stored symbol otherwise
    #[arg(long, value_name = "FILE")]
    ticker_file: Option<PathBuf>,

    #[arg(long, default_value_t = 2.0)]
    min_price: f64,

    #[arg(long, default_value_t = 22.0)]
    max_price: f64,

    /// RSI must be at or below this value
    #[arg(long, default_value_t = 30.0)]
    rsilimit: f64,

    /// Max spread between MA50 and MA200
    #[arg(long, default_value_t = 0.3)]
    ma50ma200delta: f64,

    #[arg(long, default_value_t = 20.0)]
    adxminlimit: f64,

    #[arg(long, default_value_t = 40.0)]
    adxmaxlimit: f64,

    /// Only report bars where MACD crossed above its signal line
    #[arg(long)]
    require_macd_cross: bool,

    /// Skip symbols whose latest market cap is below this value
    #[arg(long)]
    min_market_cap: Option<f64>,

    /// Write computed indicators back to stock_data
    #[arg(long)]
    persist_indicators: bool,

    /// Emit the last N enriched bars for each candidate under "history"
    #[arg(long, value_name = "N", default_value_t = 0)]
    emit_history: usize,

    /// Also POST the report to WEBHOOK_URL
    #[arg(long)]
    webhook: bool,

    /// Symbols processed concurrently (defaults to SCAN_CONCURRENCY or 8)
    #[arg(long)]
    concurrency: Option<usize>,

    /// Log verbosity 0-5
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=5))]
    debuglevel: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    let cli = Cli::parse();
    logging::init_logging(cli.debuglevel);

    let env = config::get_environment();
    info!(environment = %env, version = env!("CARGO_PKG_VERSION"), "Starting find-candidates");

    let symbols = match &cli.ticker_file {
        Some(path) => Some(config::read_tickers_from_file(path)?),
        None => None,
    };

    let scan_config = ScanConfig {
        lookback_days: cli.history_days,
        as_of: cli.as_of.unwrap_or_else(|| Utc::now().date_naive()),
        symbols,
        min_market_cap: cli.min_market_cap,
        concurrency: cli.concurrency.unwrap_or_else(config::get_scan_concurrency),
        persist_indicators: cli.persist_indicators,
        history_bars: cli.emit_history,
    };

    let criteria = SelectionCriteria {
        min_close: cli.min_price,
        max_close: cli.max_price,
        rsi_limit: cli.rsilimit,
        max_ma_spread: cli.ma50ma200delta,
        adx_min: cli.adxminlimit,
        adx_max: cli.adxmaxlimit,
        require_macd_cross: cli.require_macd_cross,
    };
    info!(?criteria, "Selection criteria");

    let store = Arc::new(PostgresStore::new(config::get_database_url()));
    store.init_schema().await?;

    let persist = scan_config.persist_indicators;
    let mut scanner = Scanner::new(store.clone(), IndicatorEngine::default(), criteria, scan_config);
    if persist {
        scanner = scanner.with_cache(store.clone());
    }

    let outcome = scanner.run().await?;
    let report = CandidateReport::from_group(&outcome.candidates).with_history(&outcome.history);
    if report.is_empty() {
        info!("No trading candidates found");
    } else {
        info!(candidates = report.candidates.len(), "Found trading candidates");
    }

    println!("{}", report.to_json_pretty()?);

    if cli.webhook {
        match config::get_webhook_url() {
            Some(url) => {
                if let Err(e) = WebhookClient::new(url).send(&report).await {
                    error!(error = %e, "Failed to deliver report to webhook");
                }
            }
            None => warn!("--webhook given but WEBHOOK_URL is not set"),
        }
    }

    Ok(())
}
