//! RSI (Relative Strength Index) indicator

use crate::common::math;

pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Streaming RSI with Wilder's smoothing.
///
/// RSI = 100 - (100 / (1 + RS))
/// RS = Average Gain / Average Loss
///
/// The averages are seeded with the simple mean of the first `period`
/// changes, so the first value appears on the bar at index `period`.
#[derive(Debug, Clone)]
pub struct RSI {
    period: usize,
    prev_close: Option<f64>,
    changes: usize,
    avg_gain: f64,
    avg_loss: f64,
}

impl RSI {
    pub fn new(period: usize) -> Self {
        Self {
            period: period.max(1),
            prev_close: None,
            changes: 0,
            avg_gain: 0.0,
            avg_loss: 0.0,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Feed the next close. Returns the RSI once enough changes are seen.
    pub fn update(&mut self, close: f64) -> Option<f64> {
        let prev = self.prev_close.replace(close)?;
        let change = close - prev;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);

        self.changes += 1;
        if self.changes < self.period {
            self.avg_gain += gain;
            self.avg_loss += loss;
            return None;
        }

        if self.changes == self.period {
            let n = self.period as f64;
            self.avg_gain = (self.avg_gain + gain) / n;
            self.avg_loss = (self.avg_loss + loss) / n;
        } else {
            self.avg_gain = math::wilder_average(self.avg_gain, gain, self.period);
            self.avg_loss = math::wilder_average(self.avg_loss, loss, self.period);
        }

        Some(rsi_from_averages(self.avg_gain, self.avg_loss))
    }
}

impl Default for RSI {
    fn default() -> Self {
        Self::new(DEFAULT_RSI_PERIOD)
    }
}

/// Convert smoothed averages into an RSI value in [0, 100].
///
/// - No movement at all (both averages zero) is neutral: 50.
/// - Gains with no losses saturate at 100.
pub fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }

    let rs = avg_gain / avg_loss;
    (100.0 - (100.0 / (1.0 + rs))).clamp(0.0, 100.0)
}

/// RSI series aligned with `closes` (`None` during warm-up).
pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut rsi = RSI::new(period);
    closes.iter().map(|&close| rsi.update(close)).collect()
}
