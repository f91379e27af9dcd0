use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Historical-data vendors a forex request can be dispatched to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ForexSource {
    YahooFinance,
    AlphaVantage,
    Oanda,
    Polygon,
}

impl ForexSource {
    pub const ALL: [Self; 4] = [
        Self::YahooFinance,
        Self::AlphaVantage,
        Self::Oanda,
        Self::Polygon,
    ];

    /// Identifier accepted on the command line and in requests.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::YahooFinance => "YahooFinance",
            Self::AlphaVantage => "AlphaVantage",
            Self::Oanda => "Oanda",
            Self::Polygon => "Polygon",
        }
    }

    /// Human-readable vendor name used in diagnostics.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::YahooFinance => "Yahoo Finance",
            Self::AlphaVantage => "Alpha Vantage",
            Self::Oanda => "Oanda",
            Self::Polygon => "Polygon",
        }
    }
}

impl Display for ForexSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForexSource {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|source| source.as_str() == value.trim())
            .ok_or_else(|| ValidationError::InvalidSource {
                value: value.to_owned(),
            })
    }
}
