//! Trade candidate scanner.
//!
//! Loads daily OHLCV bars per symbol, derives technical indicators
//! (RSI, MA50/MA200, MACD, Bollinger Bands, ADX) and reports the symbols
//! whose recent bars satisfy a selection rule.

pub mod common;
pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod models;
pub mod report;
pub mod services;
pub mod signals;

pub use error::{LoadError, ScanError, StoreError};
