//! ADX (Average Directional Index) indicator

use crate::common::math;

pub const DEFAULT_ADX_PERIOD: usize = 14;

/// Streaming ADX.
///
/// ADX measures trend strength regardless of direction:
///   1. +DM / -DM from high/low deltas, TR from high/low/prior close
///   2. Wilder-smooth all three over `period` bar-to-bar transitions
///   3. +DI = 100 * +DM / TR, -DI = 100 * -DM / TR
///   4. DX = 100 * |+DI - -DI| / (+DI + -DI), 0 when the sum is 0
///   5. ADX = Wilder average of DX, seeded by the mean of the first `period` DX
///
/// With the default period the first value lands on bar index 27: 14 bars of
/// smoothing plus 14 DX values, a lookback of `2 * period - 1` (the TA-Lib
/// convention), so 28 bars are needed.
#[derive(Debug, Clone)]
pub struct ADX {
    period: usize,
    prev: Option<(f64, f64, f64)>,
    transitions: usize,
    smoothed_tr: f64,
    smoothed_plus_dm: f64,
    smoothed_minus_dm: f64,
    dx_seed: Vec<f64>,
    value: Option<f64>,
}

impl ADX {
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            prev: None,
            transitions: 0,
            smoothed_tr: 0.0,
            smoothed_plus_dm: 0.0,
            smoothed_minus_dm: 0.0,
            dx_seed: Vec::with_capacity(period),
            value: None,
        }
    }

    pub fn update(&mut self, high: f64, low: f64, close: f64) -> Option<f64> {
        let (prev_high, prev_low, prev_close) = self.prev.replace((high, low, close))?;

        let tr = math::true_range(high, low, prev_close);
        let up_move = high - prev_high;
        let down_move = prev_low - low;
        let plus_dm = if up_move > down_move && up_move > 0.0 {
            up_move
        } else {
            0.0
        };
        let minus_dm = if down_move > up_move && down_move > 0.0 {
            down_move
        } else {
            0.0
        };

        self.transitions += 1;
        let n = self.period as f64;
        if self.transitions <= self.period {
            self.smoothed_tr += tr;
            self.smoothed_plus_dm += plus_dm;
            self.smoothed_minus_dm += minus_dm;
            if self.transitions < self.period {
                return None;
            }
        } else {
            self.smoothed_tr = self.smoothed_tr - self.smoothed_tr / n + tr;
            self.smoothed_plus_dm = self.smoothed_plus_dm - self.smoothed_plus_dm / n + plus_dm;
            self.smoothed_minus_dm = self.smoothed_minus_dm - self.smoothed_minus_dm / n + minus_dm;
        }

        let dx = directional_index(self.smoothed_plus_dm, self.smoothed_minus_dm, self.smoothed_tr);

        match self.value {
            Some(prev) => {
                self.value = Some(math::wilder_average(prev, dx, self.period));
            }
            None => {
                self.dx_seed.push(dx);
                if self.dx_seed.len() == self.period {
                    self.value = math::sma(&self.dx_seed, self.period);
                    self.dx_seed.clear();
                }
            }
        }

        self.value
    }
}

impl Default for ADX {
    fn default() -> Self {
        Self::new(DEFAULT_ADX_PERIOD)
    }
}

/// DX from smoothed directional movement and true range.
///
/// Flat ranges (TR = 0) and bars without directional movement give 0.
fn directional_index(plus_dm: f64, minus_dm: f64, tr: f64) -> f64 {
    if tr <= 0.0 {
        return 0.0;
    }

    let plus_di = 100.0 * plus_dm / tr;
    let minus_di = 100.0 * minus_dm / tr;
    let di_sum = plus_di + minus_di;
    if di_sum == 0.0 {
        return 0.0;
    }

    (100.0 * (plus_di - minus_di).abs() / di_sum).clamp(0.0, 100.0)
}
