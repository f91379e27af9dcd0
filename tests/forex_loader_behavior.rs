//! Behavior-driven tests for the forex loader.
//!
//! These tests drive `ForexLoader` through the real adapters with a recording
//! HTTP client, so each scenario checks both the dispatch decision and the
//! request that would reach the vendor.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use fxterm_core::{
    normalizer::supported_intervals, CoreError, ForexLoadRequest, ForexLoader, ForexSource,
    FxtermConfig, HttpClient, HttpError, HttpRequest, HttpResponse, Resolution, SourceErrorKind,
    ValidationError,
};
use time::macros::date;

struct RecordingHttpClient {
    status: u16,
    body: String,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingHttpClient {
    fn responding(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            status,
            body: body.to_owned(),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .clone()
    }
}

impl HttpClient for RecordingHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        self.requests
            .lock()
            .expect("request store should not be poisoned")
            .push(request);
        let response = HttpResponse {
            status: self.status,
            body: self.body.clone(),
        };
        Box::pin(async move { Ok(response) })
    }
}

fn keyed_loader(client: Arc<RecordingHttpClient>) -> ForexLoader {
    let config = FxtermConfig {
        alphavantage_api_key: Some(String::from("av-key")),
        polygon_api_key: Some(String::from("polygon-key")),
        ..FxtermConfig::default()
    };
    ForexLoader::builder()
        .with_config(config)
        .with_http_client(client)
        .build()
}

fn eurusd(source: &str) -> ForexLoadRequest {
    ForexLoadRequest::new("USD", "EUR")
        .with_source(source)
        .with_start_date(date!(2024 - 01 - 02))
}

const POLYGON_BODY: &str = r#"{"status": "OK", "results": [
    {"v": 10, "o": 1.0941, "c": 1.0935, "h": 1.0944, "l": 1.0931, "t": 1704186000000}
]}"#;

const YAHOO_BODY: &str = r#"{"chart": {"result": [{
    "timestamp": [1704240000],
    "indicators": {"quote": [{
        "open": [1.094], "high": [1.095], "low": [1.089], "close": [1.092], "volume": [0]
    }]}
}], "error": null}}"#;

// =============================================================================
// Loader: Soft Failures
// =============================================================================

#[tokio::test]
async fn when_source_is_unknown_system_returns_empty_series_without_calling_out() {
    // Given: A loader with every adapter registered
    let client = RecordingHttpClient::responding(200, "{}");
    let loader = keyed_loader(client.clone());

    // When: The request names a source nobody knows
    let outcome = loader
        .load(&eurusd("Unknown"))
        .await
        .expect("unknown source is a soft failure");

    // Then: The series is empty, a diagnostic is returned and no HTTP call happened
    assert!(outcome.series.is_empty());
    assert_eq!(outcome.source, None);
    assert_eq!(outcome.warnings, vec![String::from("Source Unknown not supported")]);
    assert!(client.requests().is_empty());
}

#[tokio::test]
async fn when_alphavantage_interval_is_unmapped_at_intraday_resolution_system_returns_empty() {
    // Given: Alpha Vantage has no 2min interval
    let client = RecordingHttpClient::responding(200, "{}");
    let loader = keyed_loader(client.clone());

    // When: The request asks for 2min at a non-daily resolution
    let request = eurusd("AlphaVantage")
        .with_interval("2min")
        .with_resolution(Resolution::Intraday);
    let outcome = loader.load(&request).await.expect("soft failure");

    // Then: Nothing is loaded and the diagnostic lists the valid choices
    assert!(outcome.series.is_empty());
    assert_eq!(outcome.source, Some(ForexSource::AlphaVantage));
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].starts_with("Interval not supported by Alpha Vantage."));
    assert!(outcome.warnings[0].contains("1min, 5min, 15min, 30min, 60min"));
    assert!(client.requests().is_empty());
}

#[tokio::test]
async fn when_oanda_is_requested_system_reports_it_as_unsupported() {
    let loader = keyed_loader(RecordingHttpClient::responding(200, "{}"));

    let outcome = loader.load(&eurusd("Oanda")).await.expect("soft failure");

    assert!(outcome.series.is_empty());
    assert_eq!(outcome.warnings, vec![String::from("Source Oanda not supported")]);
}

// =============================================================================
// Loader: Provider Dispatch
// =============================================================================

#[tokio::test]
async fn when_polygon_gets_15min_system_requests_multiplier_15_minute_bars() {
    // Given: Polygon answers with one aggregate
    let client = RecordingHttpClient::responding(200, POLYGON_BODY);
    let loader = keyed_loader(client.clone());

    // When: A 15min Polygon load is dispatched
    let outcome = loader
        .load(&eurusd("Polygon").with_interval("15min"))
        .await
        .expect("polygon load should succeed");

    // Then: The adapter was called with multiplier 15 and timespan "minute"
    assert_eq!(outcome.source, Some(ForexSource::Polygon));
    assert_eq!(outcome.series.ticker, "EURUSD");
    assert_eq!(outcome.series.len(), 1);

    let requests = client.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0]
        .url
        .contains("/C:EURUSD/range/15/minute/2024-01-02/"));
}

#[tokio::test]
async fn when_yahoo_loads_daily_data_system_uses_equals_x_ticker_and_1d_interval() {
    let client = RecordingHttpClient::responding(200, YAHOO_BODY);
    let loader = keyed_loader(client.clone());

    let outcome = loader
        .load(&eurusd("YahooFinance"))
        .await
        .expect("yahoo load should succeed");

    assert_eq!(outcome.series.ticker, "EURUSD=X");
    assert_eq!(outcome.series.len(), 1);
    assert!(outcome.warnings.is_empty());

    let requests = client.requests();
    assert!(requests[0].url.ends_with("/EURUSD%3DX"));
    assert_eq!(requests[0].query_value("interval"), Some("1d"));
}

#[tokio::test]
async fn when_vendor_row_opens_above_its_high_system_still_returns_it() {
    // Given: Yahoo sends two rows, the first with open above high
    let body = r#"{"chart": {"result": [{
        "timestamp": [1704240000, 1704326400],
        "indicators": {"quote": [{
            "open": [1.1050, 1.0920], "high": [1.1040, 1.0960],
            "low": [1.0980, 1.0900], "close": [1.1000, 1.0945], "volume": [0, 0]
        }]}
    }], "error": null}}"#;
    let loader = keyed_loader(RecordingHttpClient::responding(200, body));

    // When: The daily series is loaded
    let outcome = loader
        .load(&eurusd("YahooFinance"))
        .await
        .expect("yahoo load should succeed");

    // Then: Every vendor row comes back, unchanged
    assert_eq!(outcome.series.len(), 2);
    assert_eq!(outcome.series.bars[0].open, 1.1050);
    assert_eq!(outcome.series.bars[0].high, 1.1040);
}

#[tokio::test]
async fn when_alphavantage_gets_minute_interval_system_switches_to_intraday_function() {
    let body = r#"{"Time Series FX (5min)": {
        "2024-01-03 10:05:00": {"1. open": "1.1", "2. high": "1.2", "3. low": "1.0", "4. close": "1.15"}
    }}"#;
    let client = RecordingHttpClient::responding(200, body);
    let loader = keyed_loader(client.clone());

    let outcome = loader
        .load(&eurusd("AlphaVantage").with_interval("5min"))
        .await
        .expect("alphavantage load should succeed");

    assert_eq!(outcome.series.len(), 1);
    let requests = client.requests();
    assert_eq!(requests[0].query_value("function"), Some("FX_INTRADAY"));
    assert_eq!(requests[0].query_value("interval"), Some("5min"));
}

// =============================================================================
// Loader: Hard Failures
// =============================================================================

#[tokio::test]
async fn when_polygon_interval_has_no_multiplier_system_returns_parse_error() {
    let loader = keyed_loader(RecordingHttpClient::responding(200, POLYGON_BODY));

    let err = loader
        .load(&eurusd("Polygon").with_interval("minute"))
        .await
        .expect_err("interval without digits must fail");

    assert!(matches!(
        err,
        CoreError::Validation(ValidationError::InvalidInterval { .. })
    ));
}

#[tokio::test]
async fn when_polygon_key_is_missing_system_reports_unregistered_adapter() {
    let loader = ForexLoader::builder()
        .with_http_client(RecordingHttpClient::responding(200, POLYGON_BODY))
        .build();

    let err = loader
        .load(&eurusd("Polygon"))
        .await
        .expect_err("no polygon adapter without a key");

    let CoreError::Source(error) = err else {
        panic!("expected a source error, got {err:?}");
    };
    assert_eq!(error.kind(), SourceErrorKind::AdapterNotRegistered);
}

#[tokio::test]
async fn when_vendor_rate_limits_system_surfaces_rate_limited_error() {
    let loader = keyed_loader(RecordingHttpClient::responding(429, ""));

    let err = loader
        .load(&eurusd("YahooFinance"))
        .await
        .expect_err("429 must fail");

    let CoreError::Source(error) = err else {
        panic!("expected a source error, got {err:?}");
    };
    assert_eq!(error.kind(), SourceErrorKind::RateLimited);
    assert_eq!(error.code(), "source.rate_limited");
}

// =============================================================================
// Loader: Interval Coverage
// =============================================================================

#[tokio::test]
async fn every_supported_alphavantage_interval_dispatches() {
    for interval in supported_intervals(ForexSource::AlphaVantage) {
        let client = RecordingHttpClient::responding(200, r#"{"Time Series FX (Daily)": {}}"#);
        let loader = keyed_loader(client.clone());

        let outcome = loader
            .load(&eurusd("AlphaVantage").with_interval(*interval))
            .await
            .unwrap_or_else(|e| panic!("{interval} should dispatch: {e}"));

        assert!(outcome.warnings.is_empty(), "{interval} produced warnings");
        assert_eq!(client.requests().len(), 1, "{interval} did not reach the vendor");
    }
}
