//! Technical indicators and the per-symbol indicator engine.

pub mod engine;
pub mod momentum;
pub mod trend;
pub mod volatility;

pub use engine::{IndicatorEngine, IndicatorPeriods};
