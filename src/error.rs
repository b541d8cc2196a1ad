//! Error taxonomy for the scan pipeline.

use thiserror::Error;

/// Failures talking to the price store. Always fatal for a run.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to connect to store: {0}")]
    Connect(#[source] tokio_postgres::Error),

    #[error("store query failed: {0}")]
    Query(#[from] tokio_postgres::Error),

    #[error("malformed row for {symbol}: {reason}")]
    Malformed { symbol: String, reason: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Outcome of loading a single symbol's series.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The symbol has no bars in the requested range. The batch skips it.
    #[error("no bars found for {symbol}")]
    NotFound { symbol: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Top-level error returned by a scan run.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to read ticker file {path}: {source}")]
    TickerFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("webhook delivery failed: {0}")]
    Webhook(#[from] reqwest::Error),

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
}
