use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Alpha Vantage time-series endpoints offered by the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeSeriesFunction {
    #[serde(rename = "TIME_SERIES_DAILY")]
    Daily,
    #[serde(rename = "TIME_SERIES_WEEKLY")]
    Weekly,
    #[serde(rename = "TIME_SERIES_MONTHLY")]
    Monthly,
    #[serde(rename = "TIME_SERIES_INTRADAY")]
    Intraday,
}

impl TimeSeriesFunction {
    pub const ALL: [Self; 4] = [Self::Daily, Self::Weekly, Self::Monthly, Self::Intraday];

    /// Sampling interval requested for intraday series.
    pub const INTRADAY_INTERVAL: &'static str = "5min";

    /// Value of the `function` query parameter.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "TIME_SERIES_DAILY",
            Self::Weekly => "TIME_SERIES_WEEKLY",
            Self::Monthly => "TIME_SERIES_MONTHLY",
            Self::Intraday => "TIME_SERIES_INTRADAY",
        }
    }

    /// Key of the time-series object in the provider's response.
    pub const fn series_key(self) -> &'static str {
        match self {
            Self::Daily => "Time Series (Daily)",
            Self::Weekly => "Weekly Time Series",
            Self::Monthly => "Monthly Time Series",
            Self::Intraday => "Time Series (5min)",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily",
            Self::Weekly => "Weekly",
            Self::Monthly => "Monthly",
            Self::Intraday => "Intraday (5 min)",
        }
    }

    pub const fn is_intraday(self) -> bool {
        matches!(self, Self::Intraday)
    }

    /// Extra query parameters beyond function/symbol/apikey.
    pub fn extra_params(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Intraday => &[("interval", Self::INTRADAY_INTERVAL)],
            _ => &[],
        }
    }
}

impl Display for TimeSeriesFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeSeriesFunction {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "TIME_SERIES_DAILY" | "DAILY" => Ok(Self::Daily),
            "TIME_SERIES_WEEKLY" | "WEEKLY" => Ok(Self::Weekly),
            "TIME_SERIES_MONTHLY" | "MONTHLY" => Ok(Self::Monthly),
            "TIME_SERIES_INTRADAY" | "INTRADAY" => Ok(Self::Intraday),
            _ => Err(ValidationError::InvalidTimeSeries {
                value: value.to_owned(),
            }),
        }
    }
}

/// Chart style selected in the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
}

impl ChartKind {
    pub const ALL: [Self; 2] = [Self::Line, Self::Bar];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Line => "line",
            Self::Bar => "bar",
        }
    }
}

impl Display for ChartKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "line" => Ok(Self::Line),
            "bar" => Ok(Self::Bar),
            _ => Err(ValidationError::UnsupportedChartType {
                value: value.to_owned(),
            }),
        }
    }
}
