//! EMA (Exponential Moving Average) indicator

use crate::common::math;

/// Streaming EMA seeded by the simple average of the first `period` values.
#[derive(Debug, Clone)]
pub struct EMA {
    period: usize,
    seed: Vec<f64>,
    value: Option<f64>,
}

impl EMA {
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            seed: Vec::with_capacity(period),
            value: None,
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    pub fn update(&mut self, value: f64) -> Option<f64> {
        match self.value {
            Some(prev) => {
                self.value = Some(math::ema_from_previous(value, prev, self.period));
            }
            None => {
                self.seed.push(value);
                if self.seed.len() == self.period {
                    self.value = math::sma(&self.seed, self.period);
                    self.seed.clear();
                }
            }
        }
        self.value
    }
}
