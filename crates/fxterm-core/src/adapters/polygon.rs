use std::sync::Arc;

use serde::Deserialize;
use time::OffsetDateTime;
use tracing::debug;

use crate::data_source::{
    mismatched_request, HistoricalFuture, HistoricalProvider, PolygonRequest, ProviderRequest,
    SourceError,
};
use crate::domain::format_date;
use crate::http_client::{HttpAuth, HttpClient, HttpRequest};
use crate::{ForexSource, HistoricalSeries, UtcDateTime};

use super::vendor_bar;

const POLYGON_AGGS_URL: &str = "https://api.polygon.io/v2/aggs/ticker";
const MAX_AGGREGATES: u32 = 50_000;

/// Polygon currency aggregates adapter (`C:` tickers).
#[derive(Clone)]
pub struct PolygonAdapter {
    http_client: Arc<dyn HttpClient>,
    auth: HttpAuth,
    base_url: String,
    timeout_ms: u64,
}

impl PolygonAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            auth: HttpAuth::BearerToken(api_key.into()),
            base_url: String::from(POLYGON_AGGS_URL),
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

    fn build_request(&self, req: &PolygonRequest) -> HttpRequest {
        let to_date = OffsetDateTime::now_utc().date();
        HttpRequest::get(format!(
            "{}/C:{}/range/{}/{}/{}/{}",
            self.base_url,
            req.ticker,
            req.multiplier,
            req.timespan,
            format_date(req.from_date),
            format_date(to_date),
        ))
        .with_query("adjusted", "true")
        .with_query("sort", "asc")
        .with_query("limit", MAX_AGGREGATES.to_string())
        .with_auth(&self.auth)
        .with_timeout_ms(self.timeout_ms)
    }

    async fn fetch(&self, req: PolygonRequest) -> Result<HistoricalSeries, SourceError> {
        debug!(
            ticker = %req.ticker,
            multiplier = req.multiplier,
            timespan = %req.timespan,
            "requesting polygon aggregates"
        );

        let response = self
            .http_client
            .execute(self.build_request(&req))
            .await
            .map_err(|e| SourceError::unavailable(format!("polygon transport error: {}", e.message())))?;

        if response.status == 429 {
            return Err(SourceError::rate_limited("polygon returned status 429"));
        }

        if !response.is_success() {
            // Error bodies are JSON when Polygon itself answers, HTML from proxies.
            let detail = serde_json::from_str::<PolygonAggsResponse>(&response.body)
                .ok()
                .and_then(PolygonAggsResponse::detail)
                .unwrap_or_else(|| format!("status {}", response.status));
            return Err(SourceError::unavailable(format!(
                "polygon request failed: {detail}"
            )));
        }

        let payload: PolygonAggsResponse = serde_json::from_str(&response.body).map_err(|e| {
            SourceError::internal(format!("failed to parse polygon aggregates: {e}"))
        })?;

        if payload.status.eq_ignore_ascii_case("ERROR") {
            let detail = payload
                .detail()
                .unwrap_or_else(|| String::from("status ERROR"));
            return Err(SourceError::unavailable(format!(
                "polygon request failed: {detail}"
            )));
        }

        let mut bars = Vec::new();
        for agg in payload.results.unwrap_or_default() {
            let ts = UtcDateTime::from_unix_millis(agg.t)
                .map_err(|e| SourceError::internal(format!("invalid timestamp: {e}")))?;
            bars.extend(vendor_bar(
                ForexSource::Polygon,
                ts,
                [agg.o, agg.h, agg.l, agg.c],
                agg.v,
            ));
        }

        Ok(HistoricalSeries::new(req.ticker, bars))
    }
}

impl HistoricalProvider for PolygonAdapter {
    fn id(&self) -> ForexSource {
        ForexSource::Polygon
    }

    fn historical<'a>(&'a self, req: ProviderRequest) -> HistoricalFuture<'a> {
        Box::pin(async move {
            match req {
                ProviderRequest::Polygon(req) => self.fetch(req).await,
                other => Err(mismatched_request(self.id(), &other)),
            }
        })
    }
}

#[derive(Debug, Deserialize)]
struct PolygonAggsResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    results: Option<Vec<PolygonAggregate>>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl PolygonAggsResponse {
    fn detail(self) -> Option<String> {
        self.error.or(self.message)
    }
}

#[derive(Debug, Deserialize)]
struct PolygonAggregate {
    t: i64,
    o: f64,
    h: f64,
    l: f64,
    c: f64,
    #[serde(default)]
    v: Option<f64>,
}
