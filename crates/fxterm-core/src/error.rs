use std::path::PathBuf;

use thiserror::Error;

use crate::chart::ChartError;
use crate::data_source::SourceError;

/// Validation and contract errors exposed by `fxterm-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("input symbol should be 6 characters: '{value}'")]
    InvalidSymbolFormat { value: String },
    #[error("{code} not found in YahooFinance supported currency codes")]
    UnsupportedCurrency { code: String },

    #[error("invalid interval '{value}': {reason}")]
    InvalidInterval { value: String, reason: &'static str },
    #[error("invalid resolution '{value}', expected one of i, d, w, m")]
    InvalidResolution { value: String },
    #[error("invalid source '{value}', expected one of YahooFinance, AlphaVantage, Oanda, Polygon")]
    InvalidSource { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },
    #[error("date must be formatted as YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("schema_version must match vMAJOR.MINOR.PATCH: '{value}'")]
    InvalidSchemaVersion { value: String },
    #[error("error code must not be empty")]
    EmptyErrorCode,
    #[error("error message must not be empty")]
    EmptyErrorMessage,
}

/// Failure to read the bundled currency reference file.
#[derive(Debug, Error)]
pub enum ReferenceDataError {
    #[error("cannot read currency reference file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("currency reference file '{}' is malformed: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("bundled currency reference list is malformed: {0}")]
    Bundled(#[source] serde_json::Error),
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    ReferenceData(#[from] ReferenceDataError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
