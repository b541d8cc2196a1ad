//! MACD (Moving Average Convergence Divergence) indicator

use crate::indicators::trend::EMA;

pub const DEFAULT_MACD_PERIODS: (usize, usize, usize) = (12, 26, 9);

/// One MACD reading. `signal` is `None` until the signal EMA has seeded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdValue {
    pub macd: f64,
    pub signal: Option<f64>,
}

impl MacdValue {
    pub fn histogram(&self) -> Option<f64> {
        self.signal.map(|signal| self.macd - signal)
    }
}

/// Streaming MACD.
///
/// MACD = EMA(fast) - EMA(slow)
/// Signal = EMA(signal) of MACD
///
/// Every EMA is seeded by the simple average of its first `period` inputs,
/// so MACD appears after `slow` bars and the signal after `slow + signal - 1`.
#[derive(Debug, Clone)]
pub struct MACD {
    fast: EMA,
    slow: EMA,
    signal: EMA,
}

impl MACD {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        Self {
            fast: EMA::new(fast_period),
            slow: EMA::new(slow_period),
            signal: EMA::new(signal_period),
        }
    }

    pub fn update(&mut self, close: f64) -> Option<MacdValue> {
        let fast = self.fast.update(close);
        let slow = self.slow.update(close);
        let macd = fast? - slow?;
        let signal = self.signal.update(macd);

        Some(MacdValue { macd, signal })
    }
}

impl Default for MACD {
    fn default() -> Self {
        let (fast, slow, signal) = DEFAULT_MACD_PERIODS;
        Self::new(fast, slow, signal)
    }
}
