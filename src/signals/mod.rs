//! Candidate selection: rules and the windowed selector.

pub mod criteria;
pub mod selector;

pub use criteria::*;
pub use selector::*;
