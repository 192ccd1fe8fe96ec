use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use serde_json::Value;

use crate::http_client::{HttpClient, HttpError, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::{ChartError, Symbol, TimeSeriesFunction};

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";
pub const API_KEY_ENV: &str = "TICKPLOT_ALPHAVANTAGE_API_KEY";
pub const BASE_URL_ENV: &str = "TICKPLOT_ALPHAVANTAGE_URL";

const ERROR_MESSAGE_KEY: &str = "Error Message";
const NOTICE_KEYS: [&str; 2] = ["Note", "Information"];

/// Alpha Vantage time-series client. One GET per call, no retries.
#[derive(Clone)]
pub struct AlphaVantageClient {
    http_client: Arc<dyn HttpClient>,
    api_key: String,
    base_url: String,
    timeout_ms: u64,
}

impl AlphaVantageClient {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            base_url: String::from(DEFAULT_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Build a client from `TICKPLOT_ALPHAVANTAGE_API_KEY` (default `demo`) and
    /// `TICKPLOT_ALPHAVANTAGE_URL`.
    pub fn from_env(http_client: Arc<dyn HttpClient>) -> Self {
        let api_key = std::env::var(API_KEY_ENV).unwrap_or_else(|_| String::from("demo"));
        let client = Self::new(http_client, api_key);
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => client.with_base_url(url),
            _ => client,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Query URL for `function` on `symbol`, including the API key.
    pub fn query_url(&self, symbol: &Symbol, function: TimeSeriesFunction) -> String {
        let mut url = format!(
            "{}?function={}&symbol={}&apikey={}",
            self.base_url,
            function.as_str(),
            urlencoding::encode(symbol.as_str()),
            urlencoding::encode(&self.api_key)
        );
        for (name, value) in function.extra_params() {
            url.push('&');
            url.push_str(name);
            url.push('=');
            url.push_str(value);
        }
        url
    }

    /// Fetch the raw JSON body for one time series.
    ///
    /// The provider's own error payload is returned unchanged; see
    /// [`detect_provider_error`].
    pub async fn time_series(
        &self,
        symbol: &Symbol,
        function: TimeSeriesFunction,
    ) -> Result<Value, ChartError> {
        let request = HttpRequest::get(self.query_url(symbol, function))
            .with_header("accept", "application/json")
            .with_timeout_ms(self.timeout_ms);

        tracing::info!(%symbol, %function, "requesting alphavantage time series");
        let response = self.http_client.execute(request).await?;

        if !response.is_success() {
            return Err(ChartError::Transport(HttpError::new(format!(
                "alphavantage returned status {}",
                response.status
            ))));
        }

        let body: Value = serde_json::from_str(&response.body)?;
        tracing::debug!(%symbol, %function, bytes = response.body.len(), "alphavantage response decoded");
        Ok(body)
    }
}

impl Debug for AlphaVantageClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlphaVantageClient")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

/// Turn the provider's in-band error payloads into errors.
///
/// `"Error Message"` means an invalid symbol or function. A `"Note"` or
/// `"Information"` notice without the requested series is the rate-limit reply.
pub fn detect_provider_error(body: &Value, function: TimeSeriesFunction) -> Result<(), ChartError> {
    if let Some(message) = body.get(ERROR_MESSAGE_KEY) {
        return Err(ChartError::Provider {
            message: text_of(message),
        });
    }

    if body.get(function.series_key()).is_none() {
        if let Some(notice) = NOTICE_KEYS.iter().find_map(|key| body.get(*key)) {
            return Err(ChartError::ProviderThrottled {
                message: text_of(notice),
            });
        }
    }

    Ok(())
}

fn text_of(value: &Value) -> String {
    value
        .as_str()
        .map(str::to_owned)
        .unwrap_or_else(|| value.to_string())
}
