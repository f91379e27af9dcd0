//! # fxterm Core
//!
//! Forex historical-data dispatch, symbol validation and candle charting.
//!
//! ## Overview
//!
//! - **Provider dispatch** routes a load request to Yahoo Finance, Alpha
//!   Vantage or Polygon with the interval converted to each vendor's format
//! - **Interval normalization** maps generic intervals (`1min`, `1day`, ...)
//!   onto provider-native codes
//! - **Symbol reference store** holds the currency codes Yahoo Finance quotes
//! - **Symbol parsing** turns free-form pair input into a canonical code
//! - **Candle charts** render a loaded series through a pluggable backend
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider adapters (Yahoo Finance, Alpha Vantage, Polygon) |
//! | [`chart`] | Candle chart configuration, backends and rendering |
//! | [`config`] | Environment-driven configuration |
//! | [`data_source`] | Provider trait, native request shapes, source errors |
//! | [`dispatcher`] | `ForexLoader` and its request/outcome types |
//! | [`domain`] | Pairs, resolutions, bars, series, timestamps |
//! | [`envelope`] | Response envelope with metadata |
//! | [`error`] | Core error types |
//! | [`http_client`] | HTTP client abstraction |
//! | [`normalizer`] | Interval tables and conversions |
//! | [`reference`] | Currency reference store |
//! | [`source`] | Source identifiers |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fxterm_core::{ForexLoadRequest, ForexLoader, FxtermConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let loader = ForexLoader::builder()
//!         .with_config(FxtermConfig::from_env())
//!         .build();
//!
//!     let request = ForexLoadRequest::new("USD", "EUR").with_interval("1hour");
//!     let outcome = loader.load(&request).await?;
//!     println!("{} bars", outcome.series.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / User     │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │  ForexLoader    │────▶│ Interval         │
//! │  (dispatch)     │     │ Normalizer       │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ Provider        │────▶│ HTTP Client      │
//! │ (Adapter Trait) │     │ (reqwest)        │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ HistoricalSeries│────▶│ Chart Renderer   │
//! └─────────────────┘     └──────────────────┘
//! ```
//!
//! ## Error Handling
//!
//! Unsupported sources and intervals are not errors: the loader returns an
//! empty series plus a warning. Everything else is a [`CoreError`]:
//!
//! ```rust
//! use fxterm_core::{CoreError, SourceErrorKind};
//!
//! fn describe(error: &CoreError) -> &'static str {
//!     match error {
//!         CoreError::Validation(_) => "bad input",
//!         CoreError::Source(source) if source.kind() == SourceErrorKind::RateLimited => {
//!             "slow down"
//!         }
//!         _ => "failed",
//!     }
//! }
//! ```

pub mod adapters;
pub mod chart;
pub mod config;
pub mod data_source;
pub mod dispatcher;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod normalizer;
pub mod reference;
pub mod source;

// Adapter implementations
pub use adapters::{AlphaVantageAdapter, PolygonAdapter, YahooAdapter};

// Charting
pub use chart::{
    display_candle, AxisHandle, CandleChartConfig, ChartDocument, ChartDocumentBackend,
    ChartError, ChartTheme, PlotBackend,
};

pub use config::FxtermConfig;

// Provider trait and request shapes
pub use data_source::{
    AlphaVantageRequest, HistoricalProvider, PolygonRequest, ProviderRequest, SourceError,
    SourceErrorKind, YahooRequest,
};

// Dispatch
pub use dispatcher::{ForexLoadRequest, ForexLoader, ForexLoaderBuilder, LoadOutcome};

// Domain models
pub use domain::{
    parse_forex_symbol, Bar, CurrencyPair, HistoricalSeries, NativeInterval, Resolution,
    UtcDateTime, DEFAULT_INTERVAL,
};

// Envelope types
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};

// Error types
pub use error::{CoreError, ReferenceDataError, ValidationError};

// HTTP client types
pub use http_client::{HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};

// Interval normalization
pub use normalizer::{mapped_intervals, native_interval, supported_intervals};

// Symbol reference data
pub use reference::{check_valid_yf_forex_currency, SymbolReferenceStore};

pub use source::ForexSource;
