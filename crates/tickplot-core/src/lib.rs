//! # Tickplot Core
//!
//! Fetches a stock time series from Alpha Vantage, keeps the observations in a
//! date range and draws them as an SVG chart.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Alpha Vantage client and in-band error detection |
//! | [`chart`] | SVG line/bar chart over Open, High, Low, Close |
//! | [`domain`] | Symbol, date range, time-series function, OHLC points |
//! | [`error`] | Validation and request errors |
//! | [`extract`] | Range filtering over the provider's date-keyed series |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`service`] | The per-request pipeline |
//! | [`symbols`] | CSV symbol list |
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │ Web form / CLI  │
//! └────────┬────────┘
//!          │ ChartForm
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  ChartService   │────▶│ Symbol list (CSV)│
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ AlphaVantage    │────▶│ HTTP Client      │
//! │ Client          │     │ (reqwest)        │
//! └────────┬────────┘     └──────────────────┘
//!          │ JSON body
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Series extract  │────▶│ SVG chart file   │
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Security
//!
//! - The API key comes from the environment and is never logged
//! - Symbols are validated before they reach the query string

pub mod adapters;
pub mod chart;
pub mod domain;
pub mod error;
pub mod extract;
pub mod http_client;
pub mod service;
pub mod symbols;

pub use adapters::{detect_provider_error, AlphaVantageClient};

pub use chart::{Chart, ChartSeries, CHART_FILE_NAME, SERIES_NAMES};

pub use domain::{
    today, ChartKind, DateRange, OhlcPoint, SeriesExtract, Symbol, TimeSeriesFunction,
};

pub use error::{ChartError, ValidationError};

pub use extract::{extract_in_range, extract_series, latest_date_key, Extraction, RangeFallback};

pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

pub use service::{ChartForm, ChartOutcome, ChartRequest, ChartService, ServiceConfig};

pub use symbols::{load_symbols, read_symbols, resolve_symbol};
