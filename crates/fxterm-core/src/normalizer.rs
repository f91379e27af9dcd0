//! Interval normalization tables.
//!
//! Requests use a provider-agnostic vocabulary (`1min`, `15min`, `1day`, ...).
//! Each vendor wants something else: Yahoo Finance takes string codes, Alpha
//! Vantage takes a minute count and Polygon takes a multiplier plus a timespan
//! unit. Lookups never fall back to a default; the dispatcher decides what a
//! miss means.

use crate::domain::NativeInterval;
use crate::{ForexSource, ValidationError};

const YAHOO_SUPPORTED: &[&str] = &[
    "1min", "5min", "15min", "30min", "60min", "90min", "1hour", "1day",
];

const ALPHAVANTAGE_SUPPORTED: &[&str] = &["1min", "5min", "15min", "30min", "60min"];

const YAHOO_NATIVE: &[(&str, &str)] = &[
    ("1min", "1m"),
    ("2min", "2m"),
    ("5min", "5m"),
    ("15min", "15m"),
    ("30min", "30m"),
    ("60min", "60m"),
    ("90min", "90m"),
    ("1hour", "60m"),
    ("1day", "1d"),
    ("5day", "5d"),
    ("1week", "1wk"),
    ("1month", "1mo"),
    ("3month", "3mo"),
];

const ALPHAVANTAGE_NATIVE: &[(&str, u32)] = &[
    ("1min", 1),
    ("5min", 5),
    ("15min", 15),
    ("30min", 30),
    ("60min", 60),
    ("1day", 1),
];

/// Generic intervals a source advertises as supported.
pub fn supported_intervals(source: ForexSource) -> &'static [&'static str] {
    match source {
        ForexSource::YahooFinance => YAHOO_SUPPORTED,
        ForexSource::AlphaVantage => ALPHAVANTAGE_SUPPORTED,
        ForexSource::Oanda | ForexSource::Polygon => &[],
    }
}

/// Generic intervals that have a native mapping for `source`.
pub fn mapped_intervals(source: ForexSource) -> Vec<&'static str> {
    match source {
        ForexSource::YahooFinance => YAHOO_NATIVE.iter().map(|(key, _)| *key).collect(),
        ForexSource::AlphaVantage => ALPHAVANTAGE_NATIVE.iter().map(|(key, _)| *key).collect(),
        ForexSource::Oanda | ForexSource::Polygon => Vec::new(),
    }
}

/// Native representation of `interval` for table-driven sources.
pub fn native_interval(source: ForexSource, interval: &str) -> Option<NativeInterval> {
    match source {
        ForexSource::YahooFinance => YAHOO_NATIVE
            .iter()
            .find(|(key, _)| *key == interval)
            .map(|(_, code)| NativeInterval::Code(code)),
        ForexSource::AlphaVantage => ALPHAVANTAGE_NATIVE
            .iter()
            .find(|(key, _)| *key == interval)
            .map(|(_, minutes)| NativeInterval::Minutes(*minutes)),
        ForexSource::Oanda | ForexSource::Polygon => None,
    }
}

/// Splits an interval such as `15min` into a multiplier and a timespan unit,
/// expanding `min` to `minute`.
///
/// Stricter than a plain digit/letter split: a bare number such as `15` is
/// rejected instead of producing an empty timespan.
pub fn parse_polygon_timeframe(interval: &str) -> Result<NativeInterval, ValidationError> {
    let split_at = interval
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(interval.len());
    let (digits, unit) = interval.split_at(split_at);

    if digits.is_empty() {
        return Err(ValidationError::InvalidInterval {
            value: interval.to_owned(),
            reason: "expected a leading multiplier",
        });
    }
    if unit.is_empty() || !unit.chars().all(|ch| ch.is_ascii_alphabetic()) {
        return Err(ValidationError::InvalidInterval {
            value: interval.to_owned(),
            reason: "expected a trailing timespan unit",
        });
    }

    let multiplier = digits
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidInterval {
            value: interval.to_owned(),
            reason: "multiplier out of range",
        })?;

    let timespan = if unit == "min" { "minute" } else { unit };

    Ok(NativeInterval::Timeframe {
        multiplier,
        timespan: timespan.to_owned(),
    })
}

/// Converts a Yahoo minute code (`15m`, `1440m`) into a bar length in minutes.
pub fn yahoo_code_minutes(code: &str) -> Result<u32, ValidationError> {
    code.replace('m', "")
        .parse::<u32>()
        .map_err(|_| ValidationError::InvalidInterval {
            value: code.to_owned(),
            reason: "not expressible as a minute count",
        })
}
