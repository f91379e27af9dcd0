//! Historical forex request dispatch.
//!
//! [`ForexLoader::load`] picks the adapter for the requested source, converts
//! the generic interval into that vendor's native form and returns whatever
//! series the adapter produces. Unsupported sources and unsupported intervals
//! are soft failures: the outcome carries an empty series and a warning, and
//! callers must treat an empty series as "no data".

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use time::{Date, Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::adapters::{AlphaVantageAdapter, PolygonAdapter, YahooAdapter};
use crate::config::FxtermConfig;
use crate::data_source::{
    AlphaVantageRequest, HistoricalProvider, PolygonRequest, ProviderRequest, SourceError,
    YahooRequest,
};
use crate::domain::{format_date, NativeInterval, DEFAULT_INTERVAL};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::normalizer::{
    mapped_intervals, native_interval, parse_polygon_timeframe, yahoo_code_minutes,
};
use crate::{CoreError, ForexSource, HistoricalSeries, Resolution, ValidationError};

const DAILY_YAHOO_CODE: &str = "1440m";

/// Parameters of one historical forex request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForexLoadRequest {
    pub to_symbol: String,
    pub from_symbol: String,
    pub resolution: Resolution,
    /// Generic interval such as `1min` or `1day`.
    pub interval: String,
    pub start_date: Date,
    /// Source identifier, e.g. `YahooFinance`. Unknown values are a soft failure.
    pub source: String,
    pub verbose: bool,
}

impl ForexLoadRequest {
    /// Daily Yahoo Finance request covering the last year.
    pub fn new(to_symbol: impl Into<String>, from_symbol: impl Into<String>) -> Self {
        Self {
            to_symbol: to_symbol.into(),
            from_symbol: from_symbol.into(),
            resolution: Resolution::Daily,
            interval: String::from(DEFAULT_INTERVAL),
            start_date: default_start_date(),
            source: String::from(ForexSource::YahooFinance.as_str()),
            verbose: true,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_interval(mut self, interval: impl Into<String>) -> Self {
        self.interval = interval.into();
        self
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_start_date(mut self, start_date: Date) -> Self {
        self.start_date = start_date;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// One year before today (UTC).
pub fn default_start_date() -> Date {
    OffsetDateTime::now_utc().date() - Duration::days(365)
}

/// Result of a dispatched request.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOutcome {
    /// Source the request resolved to, if it was recognized.
    pub source: Option<ForexSource>,
    pub series: HistoricalSeries,
    /// Human-readable diagnostics for soft failures.
    pub warnings: Vec<String>,
}

impl LoadOutcome {
    fn empty(source: Option<ForexSource>) -> Self {
        Self {
            source,
            series: HistoricalSeries::empty(),
            warnings: Vec::new(),
        }
    }

    fn with_warning(mut self, warning: String) -> Self {
        warn!("{warning}");
        self.warnings.push(warning);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Adapter registry and dispatch table.
pub struct ForexLoader {
    adapters: HashMap<ForexSource, Arc<dyn HistoricalProvider>>,
}

impl ForexLoader {
    pub fn new(adapters: Vec<Arc<dyn HistoricalProvider>>) -> Self {
        let adapters = adapters
            .into_iter()
            .map(|adapter| (adapter.id(), adapter))
            .collect();
        Self { adapters }
    }

    pub fn builder() -> ForexLoaderBuilder {
        ForexLoaderBuilder::default()
    }

    /// Sources with a registered adapter, in declaration order.
    pub fn registered_sources(&self) -> Vec<ForexSource> {
        ForexSource::ALL
            .into_iter()
            .filter(|source| self.adapters.contains_key(source))
            .collect()
    }

    /// Load forex data for two given symbols.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::InvalidInterval`] when a Polygon interval cannot be
    ///   split into multiplier and unit, when a Yahoo code is not a minute
    ///   count, or when a daily request names an interval the source cannot map.
    /// - [`SourceError`] when the adapter is missing or fails.
    pub async fn load(&self, request: &ForexLoadRequest) -> Result<LoadOutcome, CoreError> {
        debug!(
            from = %request.from_symbol,
            to = %request.to_symbol,
            source = %request.source,
            interval = %request.interval,
            resolution = %request.resolution,
            start_date = %format_date(request.start_date),
            "loading forex series"
        );

        let Ok(source) = ForexSource::from_str(&request.source) else {
            return Ok(unsupported_source(&request.source));
        };

        let provider_request = match source {
            ForexSource::YahooFinance | ForexSource::AlphaVantage => {
                let Some(native) = native_interval(source, &request.interval) else {
                    if request.resolution != Resolution::Daily {
                        return Ok(unsupported_interval(source, request.verbose));
                    }
                    return Err(ValidationError::InvalidInterval {
                        value: request.interval.clone(),
                        reason: "no mapping for the requested source",
                    }
                    .into());
                };

                if source == ForexSource::AlphaVantage {
                    alphavantage_request(request, native)?
                } else {
                    yahoo_request(request, native)?
                }
            }
            ForexSource::Polygon => polygon_request(request)?,
            ForexSource::Oanda => return Ok(unsupported_source(source.as_str())),
        };

        let adapter = self
            .adapters
            .get(&source)
            .ok_or_else(|| SourceError::adapter_not_registered(source))?;

        let series = adapter.historical(provider_request).await?;
        Ok(LoadOutcome {
            source: Some(source),
            series,
            warnings: Vec::new(),
        })
    }
}

fn unsupported_source(source: &str) -> LoadOutcome {
    LoadOutcome::empty(None).with_warning(format!("Source {source} not supported"))
}

fn unsupported_interval(source: ForexSource, verbose: bool) -> LoadOutcome {
    let outcome = LoadOutcome::empty(Some(source));
    if !verbose {
        return outcome;
    }

    outcome.with_warning(format!(
        "Interval not supported by {}. Need to be one of the following options: {}",
        source.display_name(),
        mapped_intervals(source).join(", ")
    ))
}

fn alphavantage_request(
    request: &ForexLoadRequest,
    native: NativeInterval,
) -> Result<ProviderRequest, CoreError> {
    let NativeInterval::Minutes(interval_minutes) = native else {
        return Err(SourceError::internal(format!(
            "alphavantage expects a minute interval, got {native:?}"
        ))
        .into());
    };

    let resolution = if request.interval.contains("min") {
        Resolution::Intraday
    } else {
        request.resolution
    };

    Ok(ProviderRequest::AlphaVantage(AlphaVantageRequest {
        to_symbol: request.to_symbol.clone(),
        from_symbol: request.from_symbol.clone(),
        resolution,
        interval_minutes,
        start_date: request.start_date,
    }))
}

fn yahoo_request(
    request: &ForexLoadRequest,
    native: NativeInterval,
) -> Result<ProviderRequest, CoreError> {
    let NativeInterval::Code(code) = native else {
        return Err(SourceError::internal(format!(
            "yahoo expects an interval code, got {native:?}"
        ))
        .into());
    };

    let code = if request.interval == DEFAULT_INTERVAL {
        DAILY_YAHOO_CODE
    } else {
        code
    };
    let interval_minutes = yahoo_code_minutes(code)?;
    let ticker = format!("{}{}=X", request.from_symbol, request.to_symbol);

    if request.verbose {
        info!(
            "Loading {} data for {ticker} with starting period {}",
            if interval_minutes == 1440 { "Daily" } else { "Intraday" },
            format_date(request.start_date)
        );
    }

    Ok(ProviderRequest::Yahoo(YahooRequest {
        ticker,
        start_date: request.start_date,
        interval_minutes,
    }))
}

fn polygon_request(request: &ForexLoadRequest) -> Result<ProviderRequest, CoreError> {
    let NativeInterval::Timeframe {
        multiplier,
        timespan,
    } = parse_polygon_timeframe(&request.interval)?
    else {
        return Err(SourceError::internal("polygon expects a multiplier timeframe").into());
    };

    Ok(ProviderRequest::Polygon(PolygonRequest {
        ticker: format!("{}{}", request.from_symbol, request.to_symbol),
        multiplier,
        timespan,
        from_date: request.start_date,
    }))
}

/// Builder wiring adapters from configuration.
///
/// Yahoo Finance needs no key and is always registered. Alpha Vantage and
/// Polygon are registered only when an API key is configured; requests for
/// them otherwise fail with `source.adapter_not_registered`.
#[derive(Default)]
pub struct ForexLoaderBuilder {
    config: FxtermConfig,
    http_client: Option<Arc<dyn HttpClient>>,
}

impl ForexLoaderBuilder {
    pub fn with_config(mut self, config: FxtermConfig) -> Self {
        self.config = config;
        self
    }

    /// Shares one transport across all adapters instead of a fresh reqwest client.
    pub fn with_http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn build(self) -> ForexLoader {
        let http_client: Arc<dyn HttpClient> = match self.http_client {
            Some(http_client) => http_client,
            None => Arc::new(ReqwestHttpClient::new()),
        };
        let timeout_ms = self.config.http_timeout_ms;

        let mut adapters: Vec<Arc<dyn HistoricalProvider>> = vec![Arc::new(
            YahooAdapter::new(http_client.clone()).with_timeout_ms(timeout_ms),
        )];

        if let Some(key) = self.config.alphavantage_api_key {
            adapters.push(Arc::new(
                AlphaVantageAdapter::new(http_client.clone(), key).with_timeout_ms(timeout_ms),
            ));
        }

        if let Some(key) = self.config.polygon_api_key {
            adapters.push(Arc::new(
                PolygonAdapter::new(http_client, key).with_timeout_ms(timeout_ms),
            ));
        }

        ForexLoader::new(adapters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_source::HistoricalFuture;
    use std::sync::Mutex;
    use time::macros::date;

    struct RecordingProvider {
        source: ForexSource,
        requests: Mutex<Vec<ProviderRequest>>,
    }

    impl RecordingProvider {
        fn serving(source: ForexSource) -> Arc<Self> {
            Arc::new(Self {
                source,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn last_request(&self) -> Option<ProviderRequest> {
            self.requests.lock().expect("lock").last().cloned()
        }
    }

    impl HistoricalProvider for RecordingProvider {
        fn id(&self) -> ForexSource {
            self.source
        }

        fn historical<'a>(&'a self, req: ProviderRequest) -> HistoricalFuture<'a> {
            self.requests.lock().expect("lock").push(req);
            Box::pin(async { Ok(HistoricalSeries::new("RECORDED", Vec::new())) })
        }
    }

    fn loader_with(provider: Arc<RecordingProvider>) -> ForexLoader {
        let provider: Arc<dyn HistoricalProvider> = provider;
        ForexLoader::new(vec![provider])
    }

    fn request(source: &str) -> ForexLoadRequest {
        ForexLoadRequest::new("USD", "EUR")
            .with_source(source)
            .with_start_date(date!(2024 - 01 - 01))
    }

    #[tokio::test]
    async fn alphavantage_minute_interval_forces_intraday() {
        let provider = RecordingProvider::serving(ForexSource::AlphaVantage);
        let loader = loader_with(provider.clone());

        let req = request("AlphaVantage")
            .with_interval("5min")
            .with_resolution(Resolution::Weekly);
        let outcome = loader.load(&req).await.expect("must dispatch");
        assert_eq!(outcome.source, Some(ForexSource::AlphaVantage));

        let Some(ProviderRequest::AlphaVantage(sent)) = provider.last_request() else {
            panic!("expected an alphavantage request");
        };
        assert_eq!(sent.resolution, Resolution::Intraday);
        assert_eq!(sent.interval_minutes, 5);
        assert_eq!(sent.from_symbol, "EUR");
        assert_eq!(sent.to_symbol, "USD");
    }

    #[tokio::test]
    async fn alphavantage_daily_keeps_resolution() {
        let provider = RecordingProvider::serving(ForexSource::AlphaVantage);
        let loader = loader_with(provider.clone());

        loader
            .load(&request("AlphaVantage"))
            .await
            .expect("must dispatch");

        let Some(ProviderRequest::AlphaVantage(sent)) = provider.last_request() else {
            panic!("expected an alphavantage request");
        };
        assert_eq!(sent.resolution, Resolution::Daily);
        assert_eq!(sent.interval_minutes, 1);
    }

    #[tokio::test]
    async fn yahoo_daily_interval_becomes_1440_minutes() {
        let provider = RecordingProvider::serving(ForexSource::YahooFinance);
        let loader = loader_with(provider.clone());

        loader.load(&request("YahooFinance")).await.expect("must dispatch");

        let Some(ProviderRequest::Yahoo(sent)) = provider.last_request() else {
            panic!("expected a yahoo request");
        };
        assert_eq!(sent.ticker, "EURUSD=X");
        assert_eq!(sent.interval_minutes, 1440);
        assert_eq!(sent.start_date, date!(2024 - 01 - 01));
    }

    #[tokio::test]
    async fn yahoo_hour_alias_maps_to_sixty_minutes() {
        let provider = RecordingProvider::serving(ForexSource::YahooFinance);
        let loader = loader_with(provider.clone());

        loader
            .load(&request("YahooFinance").with_interval("1hour"))
            .await
            .expect("must dispatch");

        let Some(ProviderRequest::Yahoo(sent)) = provider.last_request() else {
            panic!("expected a yahoo request");
        };
        assert_eq!(sent.interval_minutes, 60);
    }

    #[tokio::test]
    async fn yahoo_non_minute_code_is_a_parse_error() {
        let loader = loader_with(RecordingProvider::serving(ForexSource::YahooFinance));
        let err = loader
            .load(&request("YahooFinance").with_interval("1week"))
            .await
            .expect_err("must fail");
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidInterval { .. })
        ));
    }

    #[tokio::test]
    async fn unmapped_interval_with_daily_resolution_is_an_error() {
        let loader = loader_with(RecordingProvider::serving(ForexSource::AlphaVantage));
        let err = loader
            .load(&request("AlphaVantage").with_interval("2min"))
            .await
            .expect_err("must fail");
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn quiet_unsupported_interval_has_no_warning() {
        let provider = RecordingProvider::serving(ForexSource::AlphaVantage);
        let loader = loader_with(provider.clone());

        let outcome = loader
            .load(
                &request("AlphaVantage")
                    .with_interval("2min")
                    .with_resolution(Resolution::Intraday)
                    .with_verbose(false),
            )
            .await
            .expect("soft failure");
        assert!(outcome.is_empty());
        assert!(outcome.warnings.is_empty());
        assert!(provider.last_request().is_none());
    }

    #[tokio::test]
    async fn oanda_is_recognized_but_not_loadable() {
        let loader = loader_with(RecordingProvider::serving(ForexSource::YahooFinance));
        let outcome = loader.load(&request("Oanda")).await.expect("soft failure");
        assert!(outcome.is_empty());
        assert_eq!(outcome.warnings, vec![String::from("Source Oanda not supported")]);
    }

    #[tokio::test]
    async fn missing_adapter_is_reported() {
        let loader = ForexLoader::new(Vec::new());
        let err = loader
            .load(&request("Polygon").with_interval("1day"))
            .await
            .expect_err("must fail");
        let CoreError::Source(source_error) = err else {
            panic!("expected a source error");
        };
        assert_eq!(source_error.code(), "source.adapter_not_registered");
    }

    #[test]
    fn builder_registers_keyed_sources_only() {
        let loader = ForexLoader::builder().build();
        assert_eq!(loader.registered_sources(), vec![ForexSource::YahooFinance]);

        let config = FxtermConfig {
            alphavantage_api_key: Some(String::from("av")),
            polygon_api_key: Some(String::from("pg")),
            ..FxtermConfig::default()
        };
        let loader = ForexLoader::builder().with_config(config).build();
        assert_eq!(
            loader.registered_sources(),
            vec![
                ForexSource::YahooFinance,
                ForexSource::AlphaVantage,
                ForexSource::Polygon
            ]
        );
    }

    #[test]
    fn default_request_matches_documented_defaults() {
        let req = ForexLoadRequest::new("USD", "EUR");
        assert_eq!(req.resolution, Resolution::Daily);
        assert_eq!(req.interval, "1day");
        assert_eq!(req.source, "YahooFinance");
        assert!(req.verbose);
        assert_eq!(req.start_date, default_start_date());
    }
}
