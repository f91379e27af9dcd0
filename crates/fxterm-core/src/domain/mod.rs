//! # Domain Models
//!
//! Canonical forex types shared by the dispatcher, adapters and chart renderer.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`CurrencyPair`] | Base/quote currency codes of a pair |
//! | [`Resolution`] | Coarse sampling marker (`i`, `d`, `w`, `m`) |
//! | [`NativeInterval`] | Provider-native interval after normalization |
//! | [`Bar`] | OHLC record with optional volume |
//! | [`HistoricalSeries`] | Timestamp-ordered bars for one ticker |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! Free-form pair input goes through [`parse_forex_symbol`]:
//!
//! ```rust
//! use fxterm_core::parse_forex_symbol;
//!
//! assert_eq!(parse_forex_symbol("EUR/USD").unwrap(), "EURUSD");
//! assert_eq!(parse_forex_symbol("gbpjpy").unwrap(), "GBPJPY");
//! assert!(parse_forex_symbol("ABCDE").is_err());
//! ```

mod interval;
mod models;
mod pair;
mod timestamp;

pub use interval::{NativeInterval, Resolution, DEFAULT_INTERVAL};
pub use models::{Bar, HistoricalSeries};
pub use pair::{parse_forex_symbol, CurrencyPair};
pub use timestamp::{format_date, parse_date, UtcDateTime};
