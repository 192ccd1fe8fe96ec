//! # Domain Models
//!
//! Typed form inputs and the observations extracted from the provider.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Symbol`] | Validated ticker symbol |
//! | [`DateRange`] | Inclusive `start <= end <= today` range |
//! | [`TimeSeriesFunction`] | Daily, weekly, monthly or 5-minute intraday series |
//! | [`ChartKind`] | Line or bar chart |
//! | [`OhlcPoint`] | One open/high/low/close observation |
//! | [`SeriesExtract`] | Parallel label and price sequences |

mod date_range;
mod function;
mod series;
mod symbol;

pub use date_range::{today, DateRange};
pub use function::{ChartKind, TimeSeriesFunction};
pub use series::{OhlcPoint, SeriesExtract};
pub use symbol::Symbol;
