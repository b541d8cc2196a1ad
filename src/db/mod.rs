//! Relational store access for daily bars and market caps.

pub mod postgres;

pub use postgres::PostgresStore;
