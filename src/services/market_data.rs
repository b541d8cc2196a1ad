//! Price series loading interface and an in-memory implementation.

use crate::error::{LoadError, StoreError};
use crate::models::indicators::{Bar, IndicatorRecord};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};
use tokio::sync::RwLock;

/// Inclusive date range. Open ends mean "all history" on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn until(end: NaiveDate) -> Self {
        Self {
            start: None,
            end: Some(end),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

#[async_trait]
pub trait PriceSeriesLoader: Send + Sync {
    /// All symbols with stored bars, sorted.
    async fn list_symbols(&self) -> Result<Vec<String>, StoreError>;

    /// Bars for `symbol` within `range`, ascending by date.
    ///
    /// Fails with [`LoadError::NotFound`] when the symbol has no bars.
    async fn load_bars(&self, symbol: &str, range: DateRange) -> Result<Vec<Bar>, LoadError>;

    /// Most recent market capitalisation on or before `on_or_before`.
    async fn latest_market_cap(
        &self,
        _symbol: &str,
        _on_or_before: NaiveDate,
    ) -> Result<Option<f64>, StoreError> {
        Ok(None)
    }
}

/// Write side for computed indicators. Stored values are a cache only.
#[async_trait]
pub trait IndicatorCache: Send + Sync {
    async fn store_indicators(
        &self,
        symbol: &str,
        records: &[IndicatorRecord],
    ) -> Result<(), StoreError>;
}

/// Loader backed by process memory, used for dry runs and tests.
#[derive(Default)]
pub struct InMemoryLoader {
    bars: RwLock<BTreeMap<String, Vec<Bar>>>,
    market_caps: RwLock<BTreeMap<String, Vec<(NaiveDate, f64)>>>,
    cached: RwLock<BTreeMap<String, Vec<IndicatorRecord>>>,
    failing: RwLock<HashSet<String>>,
}

impl InMemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert bars, keeping each symbol sorted with one bar per date.
    pub async fn insert_bars(&self, bars: impl IntoIterator<Item = Bar>) {
        let mut store = self.bars.write().await;
        for bar in bars {
            let series = store.entry(bar.symbol.clone()).or_default();
            match series.binary_search_by(|b| b.date.cmp(&bar.date)) {
                Ok(pos) => series[pos] = bar,
                Err(pos) => series.insert(pos, bar),
            }
        }
    }

    pub async fn insert_market_cap(&self, symbol: &str, date: NaiveDate, market_cap: f64) {
        let mut caps = self.market_caps.write().await;
        let entries = caps.entry(symbol.to_string()).or_default();
        entries.retain(|(d, _)| *d != date);
        entries.push((date, market_cap));
        entries.sort_by_key(|(d, _)| *d);
    }

    /// Make every load of `symbol` fail as if the store went away.
    pub async fn fail_on(&self, symbol: &str) {
        self.failing.write().await.insert(symbol.to_string());
    }

    pub async fn cached_indicators(&self, symbol: &str) -> Option<Vec<IndicatorRecord>> {
        self.cached.read().await.get(symbol).cloned()
    }
}

#[async_trait]
impl PriceSeriesLoader for InMemoryLoader {
    async fn list_symbols(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.bars.read().await.keys().cloned().collect())
    }

    async fn load_bars(&self, symbol: &str, range: DateRange) -> Result<Vec<Bar>, LoadError> {
        if self.failing.read().await.contains(symbol) {
            return Err(StoreError::Unavailable(format!("injected failure for {}", symbol)).into());
        }

        let bars: Vec<Bar> = self
            .bars
            .read()
            .await
            .get(symbol)
            .map(|series| {
                series
                    .iter()
                    .filter(|bar| range.contains(bar.date))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        if bars.is_empty() {
            return Err(LoadError::NotFound {
                symbol: symbol.to_string(),
            });
        }

        Ok(bars)
    }

    async fn latest_market_cap(
        &self,
        symbol: &str,
        on_or_before: NaiveDate,
    ) -> Result<Option<f64>, StoreError> {
        Ok(self.market_caps.read().await.get(symbol).and_then(|entries| {
            entries
                .iter()
                .rev()
                .find(|(date, _)| *date <= on_or_before)
                .map(|(_, cap)| *cap)
        }))
    }
}

#[async_trait]
impl IndicatorCache for InMemoryLoader {
    async fn store_indicators(
        &self,
        symbol: &str,
        records: &[IndicatorRecord],
    ) -> Result<(), StoreError> {
        self.cached
            .write()
            .await
            .insert(symbol.to_string(), records.to_vec());
        Ok(())
    }
}
