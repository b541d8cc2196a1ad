use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One trading day for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    pub fn new(
        symbol: impl Into<String>,
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// A bar enriched with its computed indicators.
///
/// `None` means the series did not yet have enough history for that
/// indicator on this date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRecord {
    pub bar: Bar,
    pub rsi: Option<f64>,
    pub ma50: Option<f64>,
    pub ma200: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    pub adx: Option<f64>,
}

impl IndicatorRecord {
    pub fn new(bar: Bar) -> Self {
        Self {
            bar,
            rsi: None,
            ma50: None,
            ma200: None,
            macd: None,
            macd_signal: None,
            bb_upper: None,
            bb_middle: None,
            bb_lower: None,
            adx: None,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.bar.symbol
    }

    pub fn date(&self) -> NaiveDate {
        self.bar.date
    }

    pub fn close(&self) -> f64 {
        self.bar.close
    }

    pub fn with_rsi(mut self, rsi: f64) -> Self {
        self.rsi = Some(rsi);
        self
    }

    pub fn with_moving_averages(mut self, ma50: f64, ma200: f64) -> Self {
        self.ma50 = Some(ma50);
        self.ma200 = Some(ma200);
        self
    }

    pub fn with_macd(mut self, macd: f64, signal: f64) -> Self {
        self.macd = Some(macd);
        self.macd_signal = Some(signal);
        self
    }

    pub fn with_bollinger(mut self, upper: f64, middle: f64, lower: f64) -> Self {
        self.bb_upper = Some(upper);
        self.bb_middle = Some(middle);
        self.bb_lower = Some(lower);
        self
    }

    pub fn with_adx(mut self, adx: f64) -> Self {
        self.adx = Some(adx);
        self
    }
}
