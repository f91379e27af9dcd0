use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::ValidationError;

const PAIR_LEN: usize = 6;
const PAIR_SEPARATORS: [char; 2] = ['-', '/'];

/// Parse potential forex symbols.
///
/// Input carrying a `-` or `/` separator has every occurrence of the first
/// separator found removed and is returned with its original case. Without a
/// separator the input must be exactly six characters and is uppercased.
pub fn parse_forex_symbol(input: &str) -> Result<String, ValidationError> {
    debug!(input, "parsing forex symbol");

    for separator in PAIR_SEPARATORS {
        if input.contains(separator) {
            return Ok(input.replace(separator, ""));
        }
    }

    if input.chars().count() != PAIR_LEN {
        return Err(ValidationError::InvalidSymbolFormat {
            value: input.to_owned(),
        });
    }

    Ok(input.to_uppercase())
}

/// Base (`from_symbol`) and quote (`to_symbol`) currency of a forex pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub from_symbol: String,
    pub to_symbol: String,
}

impl CurrencyPair {
    pub fn new(from_symbol: impl AsRef<str>, to_symbol: impl AsRef<str>) -> Self {
        Self {
            from_symbol: from_symbol.as_ref().trim().to_ascii_uppercase(),
            to_symbol: to_symbol.as_ref().trim().to_ascii_uppercase(),
        }
    }

    /// Parses user input such as `eur/usd`, `EUR-USD` or `eurusd` into its two legs.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let canonical = parse_forex_symbol(input.trim())?;
        let is_valid = canonical.len() == PAIR_LEN
            && canonical.chars().all(|ch| ch.is_ascii_alphabetic());
        if !is_valid {
            return Err(ValidationError::InvalidSymbolFormat {
                value: input.to_owned(),
            });
        }

        let (from_symbol, to_symbol) = canonical.split_at(PAIR_LEN / 2);
        Ok(Self::new(from_symbol, to_symbol))
    }

    /// Six-character pair code without separator, e.g. `EURUSD`.
    pub fn code(&self) -> String {
        format!("{}{}", self.from_symbol, self.to_symbol)
    }
}

impl Display for CurrencyPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.from_symbol, self.to_symbol)
    }
}
