use thiserror::Error;

use crate::http_client::HttpError;

/// Validation errors raised while turning form input into typed requests.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },
    #[error("unknown symbol '{symbol}'")]
    UnknownSymbol { symbol: String },

    #[error("All fields are required")]
    MissingField { field: &'static str },

    #[error("Invalid date format. Use YYYY-MM-DD")]
    InvalidDateFormat { value: String },
    #[error("End date must be after start date")]
    DateOrdering { start: String, end: String },
    #[error("End date cannot be in the future")]
    FutureDate { end: String },

    #[error(
        "invalid time series '{value}', expected one of TIME_SERIES_DAILY, TIME_SERIES_WEEKLY, TIME_SERIES_MONTHLY, TIME_SERIES_INTRADAY"
    )]
    InvalidTimeSeries { value: String },
    #[error("unsupported chart type '{value}', expected line or bar")]
    UnsupportedChartType { value: String },
}

/// Top-level error for a chart request. The `Display` text is what the user sees.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("API Error: Invalid symbol or function.")]
    Provider { message: String },

    #[error("API limit reached: {message}")]
    ProviderThrottled { message: String },

    #[error("market data request failed: {0}")]
    Transport(#[from] HttpError),

    #[error("market data response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("malformed {field} price '{value}' at {key}")]
    MalformedPrice {
        key: String,
        field: &'static str,
        value: String,
    },

    #[error("No data available for the selected date range")]
    NoDataInRange { start: String, end: String },

    #[error("failed to read symbol list: {0}")]
    SymbolList(#[from] csv::Error),

    #[error("failed to write chart: {0}")]
    Io(#[from] std::io::Error),
}

impl ChartError {
    /// Stable dotted code used in log events.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Validation(ValidationError::MissingField { .. }) => "request.missing_field",
            Self::Validation(
                ValidationError::InvalidDateFormat { .. }
                | ValidationError::DateOrdering { .. }
                | ValidationError::FutureDate { .. },
            ) => "request.invalid_dates",
            Self::Validation(_) => "request.invalid",
            Self::Provider { .. } => "provider.error",
            Self::ProviderThrottled { .. } => "provider.throttled",
            Self::Transport(_) => "provider.transport",
            Self::Decode(_) => "provider.decode",
            Self::MalformedPrice { .. } => "provider.malformed_price",
            Self::NoDataInRange { .. } => "series.no_data",
            Self::SymbolList(_) => "symbols.read",
            Self::Io(_) => "chart.io",
        }
    }

    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_match_form_wording() {
        let missing = ChartError::from(ValidationError::MissingField { field: "startDate" });
        assert_eq!(missing.to_string(), "All fields are required");

        let empty = ChartError::NoDataInRange {
            start: String::from("2024-01-01"),
            end: String::from("2024-01-02"),
        };
        assert_eq!(
            empty.to_string(),
            "No data available for the selected date range"
        );
    }

    #[test]
    fn date_errors_share_a_code() {
        let error = ChartError::from(ValidationError::FutureDate {
            end: String::from("2999-01-01"),
        });
        assert_eq!(error.code(), "request.invalid_dates");
        assert!(error.is_validation());
    }
}
