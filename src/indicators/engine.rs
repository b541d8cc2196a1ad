//! Per-symbol indicator computation over an ascending bar series.

use crate::indicators::momentum::{MACD, RSI};
use crate::indicators::trend::{ADX, SMA};
use crate::indicators::volatility::BollingerBands;
use crate::models::indicators::{Bar, IndicatorRecord};
use serde::{Deserialize, Serialize};

/// Lookback settings for every indicator the engine produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPeriods {
    pub rsi: usize,
    pub ma_fast: usize,
    pub ma_slow: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger: usize,
    pub bollinger_std_dev: f64,
    pub adx: usize,
}

impl Default for IndicatorPeriods {
    fn default() -> Self {
        Self {
            rsi: 14,
            ma_fast: 50,
            ma_slow: 200,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger: 20,
            bollinger_std_dev: 2.0,
            adx: 14,
        }
    }
}

/// Turns one symbol's bars into one [`IndicatorRecord`] per bar.
///
/// Holds no state between calls; every `compute` starts fresh, so
/// symbols never influence each other and reruns are bit-identical.
#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    periods: IndicatorPeriods,
}

impl IndicatorEngine {
    pub fn new(periods: IndicatorPeriods) -> Self {
        Self { periods }
    }

    pub fn periods(&self) -> &IndicatorPeriods {
        &self.periods
    }

    /// `bars` must be a single symbol sorted by ascending date.
    pub fn compute(&self, bars: &[Bar]) -> Vec<IndicatorRecord> {
        let p = &self.periods;
        let mut rsi = RSI::new(p.rsi);
        let mut ma_fast = SMA::new(p.ma_fast);
        let mut ma_slow = SMA::new(p.ma_slow);
        let mut macd = MACD::new(p.macd_fast, p.macd_slow, p.macd_signal);
        let mut bollinger = BollingerBands::new(p.bollinger, p.bollinger_std_dev);
        let mut adx = ADX::new(p.adx);

        bars.iter()
            .map(|bar| {
                let mut record = IndicatorRecord::new(bar.clone());
                record.rsi = rsi.update(bar.close);
                record.ma50 = ma_fast.update(bar.close);
                record.ma200 = ma_slow.update(bar.close);

                if let Some(value) = macd.update(bar.close) {
                    record.macd = Some(value.macd);
                    record.macd_signal = value.signal;
                }

                if let Some(bands) = bollinger.update(bar.close) {
                    record.bb_upper = Some(bands.upper);
                    record.bb_middle = Some(bands.middle);
                    record.bb_lower = Some(bands.lower);
                }

                record.adx = adx.update(bar.high, bar.low, bar.close);
                record
            })
            .collect()
    }
}
