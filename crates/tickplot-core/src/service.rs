//! The chart pipeline run for every form submission.
//!
//! validate fields -> validate dates -> fetch -> provider error check ->
//! extract (optional fallback) -> render -> write. The first failure aborts.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::Date;

use crate::adapters::{detect_provider_error, AlphaVantageClient};
use crate::chart::{Chart, CHART_FILE_NAME};
use crate::extract::{extract_in_range, RangeFallback};
use crate::symbols::{load_symbols, resolve_symbol, DEFAULT_SYMBOLS_FILE};
use crate::{
    today, ChartError, ChartKind, DateRange, Symbol, TimeSeriesFunction, ValidationError,
};

/// Raw form submission. Field names follow the HTML form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartForm {
    #[serde(rename = "stock_symbols", default)]
    pub symbol: Option<String>,
    #[serde(rename = "chartType", default)]
    pub chart_type: Option<String>,
    #[serde(rename = "timeSeries", default)]
    pub time_series: Option<String>,
    #[serde(rename = "startDate", default)]
    pub start_date: Option<String>,
    #[serde(rename = "endDate", default)]
    pub end_date: Option<String>,
}

impl ChartForm {
    /// Check presence of every field, then parse each one.
    pub fn validate(&self, known: &[Symbol], today: Date) -> Result<ChartRequest, ValidationError> {
        let symbol = required(&self.symbol, "stock_symbols")?;
        let chart_type = required(&self.chart_type, "chartType")?;
        let time_series = required(&self.time_series, "timeSeries")?;
        let start_date = required(&self.start_date, "startDate")?;
        let end_date = required(&self.end_date, "endDate")?;

        let symbol = resolve_symbol(symbol, known)?;

        Ok(ChartRequest {
            symbol,
            kind: chart_type.parse()?,
            function: time_series.parse()?,
            range: DateRange::validate(start_date, end_date, today)?,
        })
    }
}

fn required<'a>(value: &'a Option<String>, field: &'static str) -> Result<&'a str, ValidationError> {
    match value.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(ValidationError::MissingField { field }),
    }
}

/// Validated chart request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartRequest {
    pub symbol: Symbol,
    pub kind: ChartKind,
    pub function: TimeSeriesFunction,
    pub range: DateRange,
}

/// Successful pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOutcome {
    pub request: ChartRequest,
    pub points: usize,
    /// End bound used for extraction; later than requested only after a fallback.
    pub end_key: String,
    pub fell_back: bool,
    pub chart_path: PathBuf,
}

/// Paths and policies for [`ChartService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub symbols_path: PathBuf,
    pub chart_path: PathBuf,
    pub fallback: RangeFallback,
}

impl ServiceConfig {
    /// Chart written as `stock_price_chart.svg` inside `static_dir`.
    pub fn with_static_dir(static_dir: impl AsRef<Path>) -> Self {
        Self {
            chart_path: static_dir.as_ref().join(CHART_FILE_NAME),
            ..Self::default()
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            symbols_path: PathBuf::from(DEFAULT_SYMBOLS_FILE),
            chart_path: Path::new("static").join(CHART_FILE_NAME),
            fallback: RangeFallback::Disabled,
        }
    }
}

/// Runs chart requests against Alpha Vantage.
#[derive(Debug, Clone)]
pub struct ChartService {
    client: AlphaVantageClient,
    config: ServiceConfig,
}

impl ChartService {
    pub fn new(client: AlphaVantageClient, config: ServiceConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Symbol list, read fresh on every call.
    pub fn symbols(&self) -> Result<Vec<Symbol>, ChartError> {
        load_symbols(&self.config.symbols_path)
    }

    /// Handle one form submission against today's date.
    pub async fn handle(&self, form: &ChartForm) -> Result<ChartOutcome, ChartError> {
        self.handle_on(form, today()).await
    }

    pub async fn handle_on(&self, form: &ChartForm, today: Date) -> Result<ChartOutcome, ChartError> {
        let result = self.validate_and_render(form, today).await;
        if let Err(error) = &result {
            tracing::warn!(code = error.code(), %error, "chart request failed");
        }
        result
    }

    async fn validate_and_render(
        &self,
        form: &ChartForm,
        today: Date,
    ) -> Result<ChartOutcome, ChartError> {
        let known = self.symbols()?;
        let request = form.validate(&known, today)?;
        self.render(request).await
    }

    /// Fetch, extract and draw an already validated request.
    pub async fn render(&self, request: ChartRequest) -> Result<ChartOutcome, ChartError> {
        let body = self.client.time_series(&request.symbol, request.function).await?;
        detect_provider_error(&body, request.function)?;

        let start_key = request.range.start_key();
        let end_key = request.range.end_key();
        let extraction = extract_in_range(
            &body,
            request.function,
            &start_key,
            &end_key,
            self.config.fallback,
        )?;

        if extraction.series.is_empty() {
            return Err(ChartError::NoDataInRange {
                start: start_key,
                end: extraction.end_key,
            });
        }

        let chart = Chart::new(request.kind, &request.symbol, &extraction.series);
        let chart_path = chart.write_svg(&self.config.chart_path)?;

        tracing::info!(
            symbol = %request.symbol,
            function = %request.function,
            kind = %request.kind,
            points = extraction.series.len(),
            fell_back = extraction.fell_back,
            path = %chart_path.display(),
            "chart rendered"
        );

        Ok(ChartOutcome {
            points: extraction.series.len(),
            end_key: extraction.end_key,
            fell_back: extraction.fell_back,
            chart_path,
            request,
        })
    }
}
