//! External collaborators: price loading and report delivery.

pub mod market_data;
pub mod webhook;

pub use market_data::{DateRange, InMemoryLoader, IndicatorCache, PriceSeriesLoader};
pub use webhook::WebhookClient;
