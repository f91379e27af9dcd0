use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::data_source::{
    mismatched_request, AlphaVantageRequest, HistoricalFuture, HistoricalProvider,
    ProviderRequest, SourceError,
};
use crate::http_client::{HttpClient, HttpRequest};
use crate::{Bar, ForexSource, HistoricalSeries, Resolution, UtcDateTime};

use super::vendor_bar;

const ALPHAVANTAGE_QUERY_URL: &str = "https://www.alphavantage.co/query";
const TIME_SERIES_PREFIX: &str = "Time Series FX";

/// Alpha Vantage FX time-series adapter.
#[derive(Clone)]
pub struct AlphaVantageAdapter {
    http_client: Arc<dyn HttpClient>,
    api_key: String,
    base_url: String,
    timeout_ms: u64,
}

impl AlphaVantageAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            base_url: String::from(ALPHAVANTAGE_QUERY_URL),
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

    fn build_request(&self, req: &AlphaVantageRequest) -> HttpRequest {
        let mut request = HttpRequest::get(&self.base_url)
            .with_query("function", function_name(req.resolution))
            .with_query("from_symbol", &req.from_symbol)
            .with_query("to_symbol", &req.to_symbol)
            .with_query("outputsize", "full")
            .with_query("apikey", &self.api_key)
            .with_timeout_ms(self.timeout_ms);

        if req.resolution == Resolution::Intraday {
            request = request.with_query("interval", format!("{}min", req.interval_minutes));
        }
        request
    }

    async fn fetch(&self, req: AlphaVantageRequest) -> Result<HistoricalSeries, SourceError> {
        debug!(
            from = %req.from_symbol,
            to = %req.to_symbol,
            resolution = %req.resolution,
            interval_minutes = req.interval_minutes,
            "requesting alphavantage fx series"
        );

        let response = self
            .http_client
            .execute(self.build_request(&req))
            .await
            .map_err(|e| {
                SourceError::unavailable(format!("alphavantage transport error: {}", e.message()))
            })?;

        if !response.is_success() {
            return Err(SourceError::unavailable(format!(
                "alphavantage returned status {}",
                response.status
            )));
        }

        let payload: AlphaVantageFxResponse = serde_json::from_str(&response.body)
            .map_err(|e| SourceError::internal(format!("failed to parse alphavantage fx series: {e}")))?;

        if let Some(message) = payload.error_message {
            return Err(SourceError::invalid_request(format!(
                "alphavantage rejected the request: {message}"
            )));
        }
        if let Some(note) = payload.note.or(payload.information) {
            return Err(SourceError::rate_limited(format!("alphavantage: {note}")));
        }

        let points = payload
            .rest
            .into_iter()
            .find(|(key, _)| key.starts_with(TIME_SERIES_PREFIX))
            .map(|(_, value)| value)
            .ok_or_else(|| SourceError::internal("no time series data in alphavantage response"))?;
        let points: BTreeMap<String, AlphaVantagePoint> = serde_json::from_value(points)
            .map_err(|e| SourceError::internal(format!("malformed alphavantage time series: {e}")))?;

        let mut bars = Vec::with_capacity(points.len());
        for (timestamp, point) in points {
            let ts = UtcDateTime::parse_vendor(&timestamp)
                .map_err(|e| SourceError::internal(format!("invalid timestamp: {e}")))?;

            // Intraday output is already bounded by the vendor window.
            if req.resolution != Resolution::Intraday && ts.date() <= req.start_date {
                continue;
            }

            if let Some(bar) = point.into_bar(ts) {
                bars.push(bar);
            }
        }

        let ticker = format!("{}{}", req.from_symbol, req.to_symbol);
        Ok(HistoricalSeries::new(ticker, bars))
    }
}

impl HistoricalProvider for AlphaVantageAdapter {
    fn id(&self) -> ForexSource {
        ForexSource::AlphaVantage
    }

    fn historical<'a>(&'a self, req: ProviderRequest) -> HistoricalFuture<'a> {
        Box::pin(async move {
            match req {
                ProviderRequest::AlphaVantage(req) => self.fetch(req).await,
                other => Err(mismatched_request(self.id(), &other)),
            }
        })
    }
}

const fn function_name(resolution: Resolution) -> &'static str {
    match resolution {
        Resolution::Intraday => "FX_INTRADAY",
        Resolution::Daily => "FX_DAILY",
        Resolution::Weekly => "FX_WEEKLY",
        Resolution::Monthly => "FX_MONTHLY",
    }
}

#[derive(Debug, Deserialize)]
struct AlphaVantageFxResponse {
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
    #[serde(flatten)]
    rest: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct AlphaVantagePoint {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
}

impl AlphaVantagePoint {
    fn into_bar(self, ts: UtcDateTime) -> Option<Bar> {
        let parsed = [&self.open, &self.high, &self.low, &self.close]
            .map(|value| value.trim().parse::<f64>());
        let [Ok(open), Ok(high), Ok(low), Ok(close)] = parsed else {
            warn!(ts = %ts, "skipping alphavantage row with unparsable prices");
            return None;
        };
        vendor_bar(ForexSource::AlphaVantage, ts, [open, high, low, close], None)
    }
}
