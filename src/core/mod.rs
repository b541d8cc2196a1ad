//! Core application primitives (scan orchestration)

pub mod scanner;

pub use scanner::*;
