//! Range filtering over the provider's date-keyed series.
//!
//! Keys are compared to the range bounds as plain strings. This is only sound
//! because both sides are zero-padded ISO dates (`YYYY-MM-DD`); intraday keys
//! (`YYYY-MM-DD HH:MM:SS`) are compared by their date part and emitted whole.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ChartError, OhlcPoint, SeriesExtract, TimeSeriesFunction};

const OPEN_FIELD: &str = "1. open";
const HIGH_FIELD: &str = "2. high";
const LOW_FIELD: &str = "3. low";
const CLOSE_FIELD: &str = "4. close";

/// What to do when nothing falls inside the requested range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeFallback {
    /// Report the empty range.
    #[default]
    Disabled,
    /// Retry once with the latest available date as the end bound.
    ClampToLatest,
}

/// Result of [`extract_in_range`].
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub series: SeriesExtract,
    /// End bound actually used; differs from the requested one after a fallback.
    pub end_key: String,
    pub fell_back: bool,
}

/// Keep the rows whose date lies in `start_key..=end_key`, in encounter order.
///
/// A response without the function's series yields an empty extract. Missing
/// price fields read as `0.0`.
pub fn extract_series(
    body: &Value,
    function: TimeSeriesFunction,
    start_key: &str,
    end_key: &str,
) -> Result<SeriesExtract, ChartError> {
    let Some(series) = body.get(function.series_key()).and_then(Value::as_object) else {
        return Ok(SeriesExtract::default());
    };

    let mut extract = SeriesExtract::default();
    for (key, values) in series {
        let date = date_part(key, function);
        if start_key <= date && date <= end_key {
            extract.push(OhlcPoint {
                label: key.clone(),
                open: price(values, key, OPEN_FIELD)?,
                high: price(values, key, HIGH_FIELD)?,
                low: price(values, key, LOW_FIELD)?,
                close: price(values, key, CLOSE_FIELD)?,
            });
        }
    }

    Ok(extract)
}

/// Latest date present in the function's series, if any.
pub fn latest_date_key(body: &Value, function: TimeSeriesFunction) -> Option<String> {
    body.get(function.series_key())
        .and_then(Value::as_object)?
        .keys()
        .map(|key| date_part(key, function))
        .max()
        .map(str::to_owned)
}

/// Extract the range, applying `fallback` once when nothing matched.
pub fn extract_in_range(
    body: &Value,
    function: TimeSeriesFunction,
    start_key: &str,
    end_key: &str,
    fallback: RangeFallback,
) -> Result<Extraction, ChartError> {
    let series = extract_series(body, function, start_key, end_key)?;
    if !series.is_empty() || fallback == RangeFallback::Disabled {
        return Ok(Extraction {
            series,
            end_key: end_key.to_owned(),
            fell_back: false,
        });
    }

    let Some(latest) = latest_date_key(body, function) else {
        return Ok(Extraction {
            series,
            end_key: end_key.to_owned(),
            fell_back: false,
        });
    };

    tracing::info!(requested_end = end_key, latest_end = %latest, "no rows in range; retrying with latest available date");
    let series = extract_series(body, function, start_key, &latest)?;
    Ok(Extraction {
        series,
        end_key: latest,
        fell_back: true,
    })
}

fn date_part(key: &str, function: TimeSeriesFunction) -> &str {
    if function.is_intraday() {
        key.split_whitespace().next().unwrap_or(key)
    } else {
        key
    }
}

fn price(values: &Value, key: &str, field: &'static str) -> Result<f64, ChartError> {
    let malformed = |value: &Value| ChartError::MalformedPrice {
        key: key.to_owned(),
        field,
        value: value.to_string(),
    };

    match values.get(field) {
        None | Some(Value::Null) => Ok(0.0),
        Some(Value::Number(number)) => number.as_f64().ok_or_else(|| malformed(&Value::Number(number.clone()))),
        Some(Value::String(text)) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| malformed(&Value::String(text.clone()))),
        Some(other) => Err(malformed(other)),
    }
}
