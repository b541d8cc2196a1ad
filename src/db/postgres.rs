//! Postgres-backed price store (`stock_data` / `market_cap` tables)

use crate::error::{LoadError, StoreError};
use crate::models::indicators::{Bar, IndicatorRecord};
use crate::services::market_data::{DateRange, IndicatorCache, PriceSeriesLoader};
use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use std::ops::{Deref, DerefMut};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_postgres::{Client, NoTls, Row};
use tracing::{debug, warn};

const DEFAULT_CONNECT_ATTEMPTS: usize = 3;

/// A client that lives for exactly one store operation.
///
/// Dropping it closes the connection and stops its driver task, on success
/// and on every error path alike.
struct ScopedClient {
    client: Client,
    driver: JoinHandle<()>,
}

impl Deref for ScopedClient {
    type Target = Client;

    fn deref(&self) -> &Client {
        &self.client
    }
}

impl DerefMut for ScopedClient {
    fn deref_mut(&mut self) -> &mut Client {
        &mut self.client
    }
}

impl Drop for ScopedClient {
    fn drop(&mut self) {
        self.driver.abort();
    }
}

pub struct PostgresStore {
    url: String,
    connect_attempts: usize,
}

impl PostgresStore {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connect_attempts: DEFAULT_CONNECT_ATTEMPTS,
        }
    }

    pub fn with_connect_attempts(mut self, attempts: usize) -> Self {
        self.connect_attempts = attempts.max(1);
        self
    }

    async fn connect(&self) -> Result<ScopedClient, StoreError> {
        let url = self.url.as_str();
        let (client, connection) = (|| tokio_postgres::connect(url, NoTls))
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(Duration::from_millis(200))
                    .with_max_times(self.connect_attempts - 1),
            )
            .notify(|e, delay| {
                warn!(error = %e, delay_ms = delay.as_millis() as u64, "Store connection failed, retrying");
            })
            .await
            .map_err(StoreError::Connect)?;

        let driver = tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::error!(error = %e, "Store connection error");
            }
        });

        Ok(ScopedClient { client, driver })
    }

    /// Create the tables if missing. Also serves as a connectivity check.
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        let client = self.connect().await?;

        client
            .batch_execute(
                "CREATE TABLE IF NOT EXISTS stock_data (
                    symbol VARCHAR(16) NOT NULL,
                    timestamp TIMESTAMP NOT NULL,
                    close DOUBLE PRECISION NOT NULL,
                    open DOUBLE PRECISION,
                    high DOUBLE PRECISION,
                    low DOUBLE PRECISION,
                    volume BIGINT,
                    rsi DOUBLE PRECISION,
                    ma50 DOUBLE PRECISION,
                    ma200 DOUBLE PRECISION,
                    macd DOUBLE PRECISION,
                    macd_signal DOUBLE PRECISION,
                    bb_upper DOUBLE PRECISION,
                    bb_middle DOUBLE PRECISION,
                    bb_lower DOUBLE PRECISION,
                    adx DOUBLE PRECISION,
                    PRIMARY KEY (symbol, timestamp)
                );
                CREATE TABLE IF NOT EXISTS market_cap (
                    date DATE NOT NULL,
                    symbol VARCHAR(16) NOT NULL,
                    marketcap DOUBLE PRECISION,
                    PRIMARY KEY (symbol, date)
                );",
            )
            .await?;

        Ok(())
    }
}

/// Indicator columns are written onto the rows already stored for a day.
/// Ingested timestamps carry the provider's time of day, so rows are matched
/// on the day range rather than an exact timestamp.
const UPDATE_INDICATORS_SQL: &str = "UPDATE stock_data SET
        rsi = $4, ma50 = $5, ma200 = $6, macd = $7, macd_signal = $8,
        bb_upper = $9, bb_middle = $10, bb_lower = $11, adx = $12
     WHERE symbol = $1 AND timestamp >= $2 AND timestamp < $3";

/// Convert one `stock_data` row.
fn bar_from_row(symbol: &str, row: &Row) -> Result<(Bar, bool), StoreError> {
    bar_from_columns(
        symbol,
        row.try_get(0)?,
        row.try_get(1)?,
        row.try_get(2)?,
        row.try_get(3)?,
        row.try_get(4)?,
        row.try_get(5)?,
    )
}

/// Build a bar from raw column values.
///
/// Missing open/high/low fall back to close; the returned flag is set when
/// that happened.
fn bar_from_columns(
    symbol: &str,
    timestamp: NaiveDateTime,
    open: Option<f64>,
    high: Option<f64>,
    low: Option<f64>,
    close: f64,
    volume: Option<i64>,
) -> Result<(Bar, bool), StoreError> {
    if !close.is_finite() {
        return Err(StoreError::Malformed {
            symbol: symbol.to_string(),
            reason: format!("non-finite close on {}", timestamp.date()),
        });
    }

    let filled = open.is_none() || high.is_none() || low.is_none();
    let bar = Bar::new(
        symbol,
        timestamp.date(),
        open.unwrap_or(close),
        high.unwrap_or(close),
        low.unwrap_or(close),
        close,
        volume.and_then(|v| u64::try_from(v).ok()).unwrap_or(0),
    );

    Ok((bar, filled))
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

/// `[start, end)` covering every timestamp on `date`.
fn day_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let end = date
        .checked_add_days(Days::new(1))
        .map(start_of_day)
        .unwrap_or(NaiveDateTime::MAX);
    (start_of_day(date), end)
}

#[async_trait]
impl PriceSeriesLoader for PostgresStore {
    async fn list_symbols(&self) -> Result<Vec<String>, StoreError> {
        let client = self.connect().await?;
        let rows = client
            .query("SELECT DISTINCT symbol FROM stock_data ORDER BY symbol", &[])
            .await?;

        rows.iter()
            .map(|row| row.try_get::<_, String>(0).map_err(StoreError::from))
            .collect()
    }

    async fn load_bars(&self, symbol: &str, range: DateRange) -> Result<Vec<Bar>, LoadError> {
        let client = self.connect().await?;

        let from: Option<NaiveDateTime> = range.start.map(start_of_day);
        let until: Option<NaiveDateTime> = range.end.map(|end| day_bounds(end).1);

        let rows = client
            .query(
                "SELECT timestamp, open, high, low, close, volume
                 FROM stock_data
                 WHERE symbol = $1
                   AND ($2::timestamp IS NULL OR timestamp >= $2)
                   AND ($3::timestamp IS NULL OR timestamp < $3)
                 ORDER BY timestamp ASC",
                &[&symbol, &from, &until],
            )
            .await
            .map_err(StoreError::from)?;

        let mut bars: Vec<Bar> = Vec::with_capacity(rows.len());
        let mut filled_rows = 0usize;
        for row in &rows {
            let (bar, filled) = bar_from_row(symbol, row)?;
            if filled {
                filled_rows += 1;
            }
            match bars.last_mut() {
                // Intraday duplicates collapse to the day's last row.
                Some(last) if last.date == bar.date => {
                    debug!(symbol = %symbol, date = %bar.date, "Collapsing duplicate daily row");
                    *last = bar;
                }
                _ => bars.push(bar),
            }
        }

        if bars.is_empty() {
            return Err(LoadError::NotFound {
                symbol: symbol.to_string(),
            });
        }

        if filled_rows > 0 {
            warn!(
                symbol = %symbol,
                rows = filled_rows,
                "Missing open/high/low replaced by close; ADX sees a zero range on those bars"
            );
        }

        debug!(symbol = %symbol, count = bars.len(), "Loaded bars");
        Ok(bars)
    }

    async fn latest_market_cap(
        &self,
        symbol: &str,
        on_or_before: NaiveDate,
    ) -> Result<Option<f64>, StoreError> {
        let client = self.connect().await?;
        let row = client
            .query_opt(
                "SELECT marketcap FROM market_cap
                 WHERE symbol = $1 AND date <= $2
                 ORDER BY date DESC
                 LIMIT 1",
                &[&symbol, &on_or_before],
            )
            .await?;

        match row {
            Some(row) => Ok(row.try_get::<_, Option<f64>>(0)?),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl IndicatorCache for PostgresStore {
    async fn store_indicators(
        &self,
        symbol: &str,
        records: &[IndicatorRecord],
    ) -> Result<(), StoreError> {
        if records.is_empty() {
            return Ok(());
        }

        let mut client = self.connect().await?;
        let tx = client.transaction().await?;
        let statement = tx.prepare(UPDATE_INDICATORS_SQL).await?;

        let mut updated = 0u64;
        for record in records {
            let (from, until) = day_bounds(record.date());
            updated += tx
                .execute(
                    &statement,
                    &[
                        &symbol,
                        &from,
                        &until,
                        &record.rsi,
                        &record.ma50,
                        &record.ma200,
                        &record.macd,
                        &record.macd_signal,
                        &record.bb_upper,
                        &record.bb_middle,
                        &record.bb_lower,
                        &record.adx,
                    ],
                )
                .await?;
        }

        tx.commit().await?;
        debug!(symbol = %symbol, records = records.len(), rows = updated, "Stored indicators");
        Ok(())
    }
}
