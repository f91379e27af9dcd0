use std::sync::Arc;

use serde::Deserialize;
use time::OffsetDateTime;
use tracing::debug;

use crate::data_source::{
    mismatched_request, HistoricalFuture, HistoricalProvider, ProviderRequest, SourceError,
    YahooRequest,
};
use crate::http_client::{HttpClient, HttpRequest};
use crate::{ForexSource, HistoricalSeries, UtcDateTime};

use super::vendor_bar;

const YAHOO_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const DAILY_MINUTES: u32 = 1440;

/// Yahoo Finance chart adapter for `XXXYYY=X` currency tickers.
#[derive(Clone)]
pub struct YahooAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: u64,
}

impl YahooAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: String::from(YAHOO_CHART_URL),
            timeout_ms: 10_000,
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

    fn build_request(&self, req: &YahooRequest) -> HttpRequest {
        let period1 = UtcDateTime::from_date(req.start_date)
            .into_inner()
            .unix_timestamp();
        let period2 = OffsetDateTime::now_utc().unix_timestamp();

        HttpRequest::get(format!(
            "{}/{}",
            self.base_url,
            urlencoding::encode(&req.ticker)
        ))
        .with_query("period1", period1.to_string())
        .with_query("period2", period2.to_string())
        .with_query("interval", chart_interval(req.interval_minutes))
        .with_query("includePrePost", "false")
        .with_header("referer", "https://finance.yahoo.com/")
        .with_timeout_ms(self.timeout_ms)
    }

    async fn fetch(&self, req: YahooRequest) -> Result<HistoricalSeries, SourceError> {
        debug!(
            ticker = %req.ticker,
            interval_minutes = req.interval_minutes,
            "requesting yahoo chart"
        );

        let response = self
            .http_client
            .execute(self.build_request(&req))
            .await
            .map_err(|e| SourceError::unavailable(format!("yahoo transport error: {}", e.message())))?;

        if response.status == 429 {
            return Err(SourceError::rate_limited("yahoo returned status 429"));
        }
        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "yahoo returned status {}",
                response.status
            )));
        }

        let chart_response: YahooChartResponse = serde_json::from_str(&response.body)
            .map_err(|e| SourceError::internal(format!("failed to parse yahoo chart: {e}")))?;

        if let Some(error) = chart_response.chart.error {
            return Err(SourceError::invalid_request(format!(
                "yahoo chart API error: {} ({})",
                error.description, error.code
            )));
        }

        let Some(result) = chart_response
            .chart
            .result
            .and_then(|results| results.into_iter().next())
        else {
            return Ok(HistoricalSeries::new(req.ticker, Vec::new()));
        };

        let timestamps = result.timestamp.unwrap_or_default();
        let Some(quote) = result.indicators.quote.into_iter().next() else {
            return Ok(HistoricalSeries::new(req.ticker, Vec::new()));
        };

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts_value) in timestamps.iter().enumerate() {
            let ts = UtcDateTime::from_unix_seconds(ts_value)
                .map_err(|e| SourceError::internal(format!("invalid timestamp: {e}")))?;

            // Only create a bar when every OHLC value is present
            if let (Some(Some(open)), Some(Some(high)), Some(Some(low)), Some(Some(close))) = (
                quote.open.get(i),
                quote.high.get(i),
                quote.low.get(i),
                quote.close.get(i),
            ) {
                let volume = quote.volume.get(i).copied().flatten();
                bars.extend(vendor_bar(
                    ForexSource::YahooFinance,
                    ts,
                    [*open, *high, *low, *close],
                    volume,
                ));
            }
        }

        Ok(HistoricalSeries::new(req.ticker, bars))
    }
}

impl HistoricalProvider for YahooAdapter {
    fn id(&self) -> ForexSource {
        ForexSource::YahooFinance
    }

    fn historical<'a>(&'a self, req: ProviderRequest) -> HistoricalFuture<'a> {
        Box::pin(async move {
            match req {
                ProviderRequest::Yahoo(req) => self.fetch(req).await,
                other => Err(mismatched_request(self.id(), &other)),
            }
        })
    }
}

fn chart_interval(minutes: u32) -> String {
    if minutes == DAILY_MINUTES {
        String::from("1d")
    } else {
        format!("{minutes}m")
    }
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Deserialize)]
struct YahooChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooChartIndicators {
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::{PolygonRequest, SourceErrorKind};
    use crate::http_client::{HttpError, HttpResponse};
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex;
    use time::macros::date;

    struct CannedHttpClient {
        response: HttpResponse,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl HttpClient for CannedHttpClient {
        fn execute<'a>(
            &'a self,
            request: HttpRequest,
        ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);
            let response = self.response.clone();
            Box::pin(async move { Ok(response) })
        }
    }

    fn canned(status: u16, body: &str) -> Arc<CannedHttpClient> {
        Arc::new(CannedHttpClient {
            response: HttpResponse {
                status,
                body: body.to_owned(),
            },
            requests: Mutex::new(Vec::new()),
        })
    }

    fn request(minutes: u32) -> ProviderRequest {
        ProviderRequest::Yahoo(YahooRequest {
            ticker: String::from("EURUSD=X"),
            start_date: date!(2024 - 01 - 01),
            interval_minutes: minutes,
        })
    }

    #[tokio::test]
    async fn parses_chart_and_skips_incomplete_rows() {
        let body = r#"{"chart": {"result": [{
            "timestamp": [1704153600, 1704240000, 1704326400],
            "indicators": {"quote": [{
                "open": [1.104, null, 1.092],
                "high": [1.105, 1.095, 1.096],
                "low": [1.093, 1.089, 1.090],
                "close": [1.094, 1.092, 1.0945],
                "volume": [0, 0, 0]
            }]}
        }], "error": null}}"#;
        let client = canned(200, body);
        let adapter = YahooAdapter::new(client.clone());

        let series = adapter.historical(request(1440)).await.expect("must parse");
        assert_eq!(series.ticker, "EURUSD=X");
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars[0].ts.format_rfc3339(), "2024-01-02T00:00:00Z");
        assert_eq!(series.bars[1].volume, Some(0.0));

        let requests = client.requests.lock().expect("lock");
        assert!(requests[0].url.ends_with("/EURUSD%3DX"));
        assert_eq!(requests[0].query_value("interval"), Some("1d"));
        assert_eq!(requests[0].query_value("period1"), Some("1704067200"));
    }

    #[tokio::test]
    async fn intraday_minutes_become_minute_codes() {
        let client = canned(200, r#"{"chart": {"result": [], "error": null}}"#);
        let adapter = YahooAdapter::new(client.clone());

        let series = adapter.historical(request(15)).await.expect("must parse");
        assert!(series.is_empty());

        let requests = client.requests.lock().expect("lock");
        assert_eq!(requests[0].query_value("interval"), Some("15m"));
    }

    #[tokio::test]
    async fn chart_error_is_reported() {
        let body = r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found"}}}"#;
        let adapter = YahooAdapter::new(canned(200, body));

        let err = adapter.historical(request(1440)).await.expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::InvalidRequest);
        assert!(err.message().contains("No data found"));
    }

    #[tokio::test]
    async fn too_many_requests_is_rate_limited() {
        let adapter = YahooAdapter::new(canned(429, ""));
        let err = adapter.historical(request(1440)).await.expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::RateLimited);
    }

    #[tokio::test]
    async fn rejects_requests_for_other_sources() {
        let adapter = YahooAdapter::new(canned(200, "{}"));
        let req = ProviderRequest::Polygon(PolygonRequest {
            ticker: String::from("EURUSD"),
            multiplier: 1,
            timespan: String::from("day"),
            from_date: date!(2024 - 01 - 01),
        });

        let err = adapter.historical(req).await.expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::InvalidRequest);
    }
}
