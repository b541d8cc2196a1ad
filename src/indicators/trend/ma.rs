//! Simple moving average over a trailing window of closes

use crate::common::math;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct SMA {
    period: usize,
    window: VecDeque<f64>,
}

impl SMA {
    pub fn new(period: usize) -> Self {
        let period = period.max(1);
        Self {
            period,
            window: VecDeque::with_capacity(period),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Mean of the last `period` values including `value`.
    pub fn update(&mut self, value: f64) -> Option<f64> {
        if self.window.len() == self.period {
            self.window.pop_front();
        }
        self.window.push_back(value);
        math::sma(self.window.make_contiguous(), self.period)
    }
}
