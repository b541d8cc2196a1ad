//! Scan pipeline: load -> compute indicators -> select, per symbol.

use crate::config::ScanConfig;
use crate::error::{LoadError, ScanError};
use crate::indicators::IndicatorEngine;
use crate::models::candidates::CandidateGroup;
use crate::models::indicators::IndicatorRecord;
use std::collections::BTreeMap;
use crate::services::market_data::{DateRange, IndicatorCache, PriceSeriesLoader};
use crate::signals::{CandidateSelector, LookbackWindow, Predicate};
use futures_util::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// What happened to one symbol during a scan.
#[derive(Debug, Clone, PartialEq)]
pub enum SymbolOutcome {
    Matched {
        symbol: String,
        records: Vec<IndicatorRecord>,
        /// Last `history_bars` records of the series, newest first.
        history: Vec<IndicatorRecord>,
    },
    NoMatch,
    /// No bars in the store.
    NotFound,
    /// Market cap missing or below the configured floor.
    Filtered,
}

/// Result of a full scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOutcome {
    pub candidates: CandidateGroup,
    /// Recent history per matched symbol; empty unless `history_bars > 0`.
    pub history: BTreeMap<String, Vec<IndicatorRecord>>,
    pub scanned: usize,
    pub not_found: usize,
    pub filtered: usize,
}

pub struct Scanner<L: ?Sized, P> {
    loader: Arc<L>,
    cache: Option<Arc<dyn IndicatorCache>>,
    engine: IndicatorEngine,
    selector: CandidateSelector<P>,
    config: ScanConfig,
}

impl<L, P> Scanner<L, P>
where
    L: PriceSeriesLoader + ?Sized,
    P: Predicate,
{
    pub fn new(loader: Arc<L>, engine: IndicatorEngine, predicate: P, config: ScanConfig) -> Self {
        let window = LookbackWindow::new(config.as_of, config.lookback_days);
        Self {
            loader,
            cache: None,
            engine,
            selector: CandidateSelector::new(predicate, window),
            config,
        }
    }

    /// Persist computed indicators for every loaded symbol.
    pub fn with_cache(mut self, cache: Arc<dyn IndicatorCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Run the scan. Store failures abort; missing symbols are skipped.
    pub async fn run(&self) -> Result<ScanOutcome, ScanError> {
        let start = Instant::now();
        let symbols = self.resolve_universe().await?;
        info!(
            symbols = symbols.len(),
            as_of = %self.config.as_of,
            lookback_days = self.config.lookback_days,
            "Scanning for trade candidates"
        );

        let outcomes: Vec<SymbolOutcome> = stream::iter(symbols)
            .map(|symbol| async move { self.scan_symbol(&symbol).await })
            .buffer_unordered(self.config.concurrency.max(1))
            .try_collect()
            .await?;

        let mut result = ScanOutcome {
            scanned: outcomes.len(),
            ..ScanOutcome::default()
        };
        for outcome in outcomes {
            match outcome {
                SymbolOutcome::Matched {
                    symbol,
                    records,
                    history,
                } => {
                    if !history.is_empty() {
                        result.history.insert(symbol.clone(), history);
                    }
                    result.candidates.insert(symbol, records);
                }
                SymbolOutcome::NoMatch => {}
                SymbolOutcome::NotFound => result.not_found += 1,
                SymbolOutcome::Filtered => result.filtered += 1,
            }
        }

        info!(
            scanned = result.scanned,
            candidates = result.candidates.len(),
            not_found = result.not_found,
            filtered = result.filtered,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Scan complete"
        );
        Ok(result)
    }

    async fn resolve_universe(&self) -> Result<Vec<String>, ScanError> {
        match &self.config.symbols {
            Some(symbols) => Ok(symbols.clone()),
            None => Ok(self.loader.list_symbols().await?),
        }
    }

    /// Load, enrich and select one symbol.
    pub async fn scan_symbol(&self, symbol: &str) -> Result<SymbolOutcome, ScanError> {
        if let Some(floor) = self.config.min_market_cap {
            let cap = self
                .loader
                .latest_market_cap(symbol, self.config.as_of)
                .await?;
            if !cap.is_some_and(|cap| cap >= floor) {
                debug!(symbol = %symbol, market_cap = ?cap, floor, "Below market cap floor, skipping");
                return Ok(SymbolOutcome::Filtered);
            }
        }

        let bars = match self
            .loader
            .load_bars(symbol, DateRange::until(self.config.as_of))
            .await
        {
            Ok(bars) => bars,
            Err(LoadError::NotFound { symbol }) => {
                warn!(symbol = %symbol, "No bars found, skipping");
                return Ok(SymbolOutcome::NotFound);
            }
            Err(LoadError::Store(e)) => return Err(e.into()),
        };

        let records = self.engine.compute(&bars);

        if let Some(cache) = &self.cache {
            cache.store_indicators(symbol, &records).await?;
        }

        let matches = self.selector.select_symbol(&records);
        debug!(symbol = %symbol, bars = bars.len(), matches = matches.len(), "Symbol scanned");

        if matches.is_empty() {
            Ok(SymbolOutcome::NoMatch)
        } else {
            let history = records
                .iter()
                .rev()
                .take(self.config.history_bars)
                .cloned()
                .collect();
            Ok(SymbolOutcome::Matched {
                symbol: symbol.to_string(),
                records: matches,
                history,
            })
        }
    }
}
