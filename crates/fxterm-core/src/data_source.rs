//! Provider adapter contract and request types.
//!
//! Every vendor takes the historical-series request in its own shape, so the
//! dispatcher builds one [`ProviderRequest`] variant per vendor after
//! normalizing the interval. Adapters implement [`HistoricalProvider`].
//!
//! | Source | Request | Native interval |
//! |--------|---------|-----------------|
//! | Alpha Vantage | [`AlphaVantageRequest`] | minutes + resolution |
//! | Yahoo Finance | [`YahooRequest`] | minutes |
//! | Polygon | [`PolygonRequest`] | multiplier + timespan |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use time::Date;

use crate::{ForexSource, HistoricalSeries, Resolution};

/// Adapter-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    InvalidRequest,
    AdapterNotRegistered,
    Internal,
}

/// Structured error raised by provider adapters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub fn adapter_not_registered(source: ForexSource) -> Self {
        Self {
            kind: SourceErrorKind::AdapterNotRegistered,
            message: format!("source adapter '{source}' is not registered"),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::AdapterNotRegistered => "source.adapter_not_registered",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Alpha Vantage FX time-series request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlphaVantageRequest {
    pub to_symbol: String,
    pub from_symbol: String,
    pub resolution: Resolution,
    /// Bar length in minutes, only sent for intraday resolution.
    pub interval_minutes: u32,
    pub start_date: Date,
}

/// Yahoo Finance chart request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YahooRequest {
    /// Yahoo currency ticker, e.g. `EURUSD=X`.
    pub ticker: String,
    pub start_date: Date,
    /// Bar length in minutes; 1440 selects daily bars.
    pub interval_minutes: u32,
}

/// Polygon aggregates request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolygonRequest {
    /// Pair code without prefix, e.g. `EURUSD`.
    pub ticker: String,
    pub multiplier: u32,
    pub timespan: String,
    pub from_date: Date,
}

/// Provider-native request produced by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderRequest {
    AlphaVantage(AlphaVantageRequest),
    Yahoo(YahooRequest),
    Polygon(PolygonRequest),
}

impl ProviderRequest {
    pub const fn source(&self) -> ForexSource {
        match self {
            Self::AlphaVantage(_) => ForexSource::AlphaVantage,
            Self::Yahoo(_) => ForexSource::YahooFinance,
            Self::Polygon(_) => ForexSource::Polygon,
        }
    }
}

pub type HistoricalFuture<'a> =
    Pin<Box<dyn Future<Output = Result<HistoricalSeries, SourceError>> + Send + 'a>>;

/// Historical-series adapter contract.
///
/// Implementations must be `Send + Sync`; the dispatcher holds them behind
/// `Arc`.
pub trait HistoricalProvider: Send + Sync {
    /// Source this adapter serves.
    fn id(&self) -> ForexSource;

    /// Fetches the series described by `req`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request variant belongs to another
    /// source, the vendor is unreachable, or its payload cannot be parsed.
    fn historical<'a>(&'a self, req: ProviderRequest) -> HistoricalFuture<'a>;
}

pub(crate) fn mismatched_request(expected: ForexSource, req: &ProviderRequest) -> SourceError {
    SourceError::invalid_request(format!(
        "{expected} adapter cannot serve a {} request",
        req.source()
    ))
}
