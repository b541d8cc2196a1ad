//! Bollinger Bands indicator

use crate::common::math;
use std::collections::VecDeque;

pub const DEFAULT_BOLLINGER_PERIOD: usize = 20;
pub const DEFAULT_BOLLINGER_STD_DEV: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerValue {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Streaming Bollinger Bands
///
/// Middle Band = SMA(period)
/// Upper Band = Middle + (std_dev * sample standard deviation)
/// Lower Band = Middle - (std_dev * sample standard deviation)
#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    std_dev: f64,
    window: VecDeque<f64>,
}

impl BollingerBands {
    pub fn new(period: usize, std_dev: f64) -> Self {
        let period = period.max(2);
        Self {
            period,
            std_dev: std_dev.abs(),
            window: VecDeque::with_capacity(period),
        }
    }

    pub fn update(&mut self, close: f64) -> Option<BollingerValue> {
        if self.window.len() == self.period {
            self.window.pop_front();
        }
        self.window.push_back(close);

        let closes = self.window.make_contiguous();
        let middle = math::sma(closes, self.period)?;
        let std = math::standard_deviation(closes, self.period)?;

        Some(BollingerValue {
            upper: middle + self.std_dev * std,
            middle,
            lower: middle - self.std_dev * std,
        })
    }
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self::new(DEFAULT_BOLLINGER_PERIOD, DEFAULT_BOLLINGER_STD_DEV)
    }
}
