//! Shared data models spanning the pipeline stages.

pub mod candidates;
pub mod indicators;

pub use candidates::CandidateGroup;
pub use indicators::{Bar, IndicatorRecord};
