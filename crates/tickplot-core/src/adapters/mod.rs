//! Market-data provider adapters.

pub mod alphavantage;

pub use alphavantage::{detect_provider_error, AlphaVantageClient};
