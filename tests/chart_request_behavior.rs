//! Behavior-driven tests for the chart request pipeline
//!
//! These tests drive `ChartService` end to end with a canned provider and a
//! scratch static directory, checking what the user sees and what lands on disk.

use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tempfile::{tempdir, TempDir};
use tickplot_core::{
    AlphaVantageClient, ChartError, ChartForm, ChartService, HttpClient, HttpError, HttpRequest,
    HttpResponse, RangeFallback, ServiceConfig, ValidationError, SERIES_NAMES,
};
use time::macros::date;
use time::Date;

const TODAY: Date = date!(2024 - 02 - 01);

const DAILY_BODY: &str = r#"{
    "Meta Data": {"1. Information": "Daily Prices", "2. Symbol": "IBM"},
    "Time Series (Daily)": {
        "2024-01-03": {"1. open": "162.83", "2. high": "163.29", "3. low": "160.50", "4. close": "161.64", "5. volume": "4086133"},
        "2024-01-02": {"1. open": "161.00", "2. high": "163.29", "3. low": "160.00", "4. close": "162.83", "5. volume": "4115400"},
        "2023-12-29": {"1. open": "162.75", "2. high": "163.30", "3. low": "162.00", "4. close": "163.55", "5. volume": "3382800"}
    }
}"#;

const INTRADAY_BODY: &str = r#"{
    "Time Series (5min)": {
        "2024-01-03 09:40:00": {"1. open": "161.10", "2. high": "161.50", "3. low": "160.90", "4. close": "161.20"},
        "2024-01-03 09:35:00": {"1. open": "161.00", "2. high": "161.30", "3. low": "160.80", "4. close": "161.10"},
        "2024-01-02 16:00:00": {"1. open": "162.70", "2. high": "162.90", "3. low": "162.60", "4. close": "162.83"}
    }
}"#;

#[derive(Debug)]
struct CannedProvider {
    body: String,
    requests: Mutex<Vec<HttpRequest>>,
}

impl CannedProvider {
    fn new(body: &str) -> Arc<Self> {
        Arc::new(Self {
            body: body.to_owned(),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn request_count(&self) -> usize {
        self.requests.lock().expect("request log").len()
    }

    fn last_url(&self) -> String {
        self.requests
            .lock()
            .expect("request log")
            .last()
            .map(|request| request.url.clone())
            .unwrap_or_default()
    }
}

impl HttpClient for CannedProvider {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.requests.lock().expect("request log").push(request);
        let body = self.body.clone();
        Box::pin(async move { Ok(HttpResponse::ok_json(body)) })
    }
}

struct Harness {
    dir: TempDir,
    provider: Arc<CannedProvider>,
    service: ChartService,
}

impl Harness {
    fn new(body: &str, fallback: RangeFallback) -> Self {
        let dir = tempdir().expect("tempdir");
        let provider = CannedProvider::new(body);
        let mut config = ServiceConfig::with_static_dir(dir.path().join("static"));
        config.symbols_path = dir.path().join("stocks.csv");
        config.fallback = fallback;

        let client = AlphaVantageClient::new(provider.clone(), "test-key");
        Self {
            service: ChartService::new(client, config),
            provider,
            dir,
        }
    }

    fn with_symbols(self, csv: &str) -> Self {
        std::fs::write(self.dir.path().join("stocks.csv"), csv).expect("write symbols");
        self
    }

    fn chart_path(&self) -> &Path {
        &self.service.config().chart_path
    }
}

fn form(symbol: &str, series: &str, chart: &str, start: &str, end: &str) -> ChartForm {
    ChartForm {
        symbol: Some(symbol.to_owned()),
        chart_type: Some(chart.to_owned()),
        time_series: Some(series.to_owned()),
        start_date: Some(start.to_owned()),
        end_date: Some(end.to_owned()),
    }
}

// =============================================================================
// Chart Request: Successful Rendering
// =============================================================================

#[tokio::test]
async fn when_range_has_data_user_gets_a_chart_with_four_series() {
    // Given: A provider returning three daily rows
    let harness = Harness::new(DAILY_BODY, RangeFallback::Disabled);

    // When: The user asks for the first two January sessions
    let outcome = harness
        .service
        .handle_on(
            &form("IBM", "TIME_SERIES_DAILY", "line", "2024-01-01", "2024-01-31"),
            TODAY,
        )
        .await
        .expect("chart should render");

    // Then: Both rows are charted and the SVG carries Open/High/Low/Close
    assert_eq!(outcome.points, 2);
    assert!(!outcome.fell_back);
    assert_eq!(outcome.chart_path, harness.chart_path());

    let svg = std::fs::read_to_string(harness.chart_path()).expect("chart file");
    assert!(svg.contains("Stock Price for IBM"));
    assert!(svg.contains(r#"data-categories="2""#));
    for name in SERIES_NAMES {
        assert!(svg.contains(&format!(r#"data-series="{name}""#)));
    }
}

#[tokio::test]
async fn when_intraday_is_requested_query_and_labels_follow_five_minute_series() {
    // Given: An intraday provider response
    let harness = Harness::new(INTRADAY_BODY, RangeFallback::Disabled);

    // When: The user asks for a single day of intraday bars as a bar chart
    let outcome = harness
        .service
        .handle_on(
            &form("ibm", "TIME_SERIES_INTRADAY", "BAR", "2024-01-03", "2024-01-03"),
            TODAY,
        )
        .await
        .expect("chart should render");

    // Then: Only the matching day is charted, labels lose their seconds
    assert_eq!(outcome.points, 2);
    assert!(harness.provider.last_url().ends_with("&interval=5min"));

    let svg = std::fs::read_to_string(harness.chart_path()).expect("chart file");
    assert!(svg.contains("2024-01-03 09:35<"));
    assert!(!svg.contains("09:35:00"));
    assert!(!svg.contains("2024-01-02 16:00"));
}

// =============================================================================
// Chart Request: Validation Failures
// =============================================================================

#[tokio::test]
async fn when_dates_are_invalid_no_request_reaches_the_provider() {
    let cases = [
        ("2024/01/01", "2024-01-31", "Invalid date format. Use YYYY-MM-DD"),
        ("2024-01-31", "2024-01-01", "End date must be after start date"),
        ("2024-01-01", "2024-02-02", "End date cannot be in the future"),
    ];

    for (start, end, message) in cases {
        // Given: A fresh service
        let harness = Harness::new(DAILY_BODY, RangeFallback::Disabled);

        // When: The user submits a bad range
        let error = harness
            .service
            .handle_on(&form("IBM", "TIME_SERIES_DAILY", "line", start, end), TODAY)
            .await
            .expect_err("bad dates should fail");

        // Then: The form's message is shown and the provider is never called
        assert_eq!(error.to_string(), message);
        assert_eq!(harness.provider.request_count(), 0);
        assert!(!harness.chart_path().exists());
    }
}

#[tokio::test]
async fn when_a_field_is_missing_user_is_told_all_fields_are_required() {
    let harness = Harness::new(DAILY_BODY, RangeFallback::Disabled);
    let mut incomplete = form("IBM", "TIME_SERIES_DAILY", "line", "2024-01-01", "2024-01-31");
    incomplete.time_series = None;

    let error = harness
        .service
        .handle_on(&incomplete, TODAY)
        .await
        .expect_err("missing field should fail");

    assert_eq!(error.to_string(), "All fields are required");
    assert_eq!(harness.provider.request_count(), 0);
}

#[tokio::test]
async fn when_symbol_is_not_listed_request_is_rejected() {
    // Given: A symbol list without IBM
    let harness =
        Harness::new(DAILY_BODY, RangeFallback::Disabled).with_symbols("Symbol,Name\nAAPL,Apple\n");

    // When: The user submits IBM
    let error = harness
        .service
        .handle_on(
            &form("IBM", "TIME_SERIES_DAILY", "line", "2024-01-01", "2024-01-31"),
            TODAY,
        )
        .await
        .expect_err("unlisted symbol should fail");

    // Then: Validation fails before any fetch
    assert!(matches!(
        error,
        ChartError::Validation(ValidationError::UnknownSymbol { .. })
    ));
    assert_eq!(harness.provider.request_count(), 0);
}

#[tokio::test]
async fn when_listed_ticker_starts_with_a_digit_it_is_charted() {
    // Given: A symbol list carrying a Hong Kong listing
    let harness = Harness::new(DAILY_BODY, RangeFallback::Disabled)
        .with_symbols("Symbol\n0700.HK\nIBM\n");

    // When: The user submits it in lowercase
    let outcome = harness
        .service
        .handle_on(
            &form("0700.hk", "TIME_SERIES_DAILY", "line", "2024-01-01", "2024-01-31"),
            TODAY,
        )
        .await
        .expect("listed symbol should render");

    // Then: Membership alone admits it and the listed spelling is queried
    assert_eq!(outcome.request.symbol.as_str(), "0700.HK");
    assert!(harness.provider.last_url().contains("symbol=0700.HK"));
}

// =============================================================================
// Chart Request: Provider Outcomes
// =============================================================================

#[tokio::test]
async fn when_provider_reports_error_message_no_chart_is_written() {
    // Given: The provider rejects the symbol
    let harness = Harness::new(
        r#"{"Error Message": "Invalid API call. Please retry or visit the documentation."}"#,
        RangeFallback::Disabled,
    );

    // When: The user submits the form
    let error = harness
        .service
        .handle_on(
            &form("IBM", "TIME_SERIES_DAILY", "line", "2024-01-01", "2024-01-31"),
            TODAY,
        )
        .await
        .expect_err("provider error should fail");

    // Then: The API error message is shown and nothing is written
    assert!(matches!(error, ChartError::Provider { .. }));
    assert_eq!(error.to_string(), "API Error: Invalid symbol or function.");
    assert_eq!(harness.provider.request_count(), 1);
    assert!(!harness.chart_path().exists());
}

#[tokio::test]
async fn when_range_is_empty_without_fallback_user_sees_no_data_message() {
    let harness = Harness::new(DAILY_BODY, RangeFallback::Disabled);

    let error = harness
        .service
        .handle_on(
            &form("IBM", "TIME_SERIES_DAILY", "line", "2023-11-01", "2023-11-30"),
            TODAY,
        )
        .await
        .expect_err("empty range should fail");

    assert!(matches!(error, ChartError::NoDataInRange { .. }));
    assert_eq!(
        error.to_string(),
        "No data available for the selected date range"
    );
    assert!(!harness.chart_path().exists());
}

#[tokio::test]
async fn when_fallback_is_enabled_empty_range_extends_to_latest_data() {
    // Given: Fallback to the latest available date
    let harness = Harness::new(DAILY_BODY, RangeFallback::ClampToLatest);

    // When: The range ends before the provider's data starts
    let outcome = harness
        .service
        .handle_on(
            &form("IBM", "TIME_SERIES_DAILY", "line", "2023-11-01", "2023-11-30"),
            TODAY,
        )
        .await
        .expect("fallback should find data");

    // Then: The end bound moves to the latest date and a single fetch was made
    assert!(outcome.fell_back);
    assert_eq!(outcome.end_key, "2024-01-03");
    assert_eq!(outcome.points, 3);
    assert_eq!(harness.provider.request_count(), 1);
}

#[tokio::test]
async fn when_provider_is_throttling_user_sees_limit_message() {
    let harness = Harness::new(
        r#"{"Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute."}"#,
        RangeFallback::ClampToLatest,
    );

    let error = harness
        .service
        .handle_on(
            &form("IBM", "TIME_SERIES_DAILY", "line", "2024-01-01", "2024-01-31"),
            TODAY,
        )
        .await
        .expect_err("throttled response should fail");

    assert!(matches!(error, ChartError::ProviderThrottled { .. }));
    assert_eq!(error.code(), "provider.throttled");
}
