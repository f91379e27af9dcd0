//! Currency reference list used to validate single currency codes.
//!
//! The list is a JSON array of records carrying a `from_symbol` field. The
//! default list is compiled into the crate; a file on disk can replace it.
//! [`SymbolReferenceStore::global`] parses it once per process and keeps it for
//! the process lifetime; nothing invalidates it.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::Deserialize;
use tracing::debug;

use crate::error::{CoreError, ReferenceDataError};
use crate::{FxtermConfig, ValidationError};

/// Yahoo Finance currency list compiled into the binary.
pub const BUNDLED_REFERENCE_JSON: &str = include_str!("../data/yahoofinance_forex.json");

static GLOBAL_STORE: OnceLock<SymbolReferenceStore> = OnceLock::new();

#[derive(Debug, Deserialize)]
struct ReferenceRecord {
    from_symbol: String,
}

/// Sorted, de-duplicated set of supported currency codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolReferenceStore {
    currencies: BTreeSet<String>,
}

impl SymbolReferenceStore {
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            currencies: codes
                .into_iter()
                .map(|code| code.as_ref().trim().to_ascii_uppercase())
                .filter(|code| !code.is_empty())
                .collect(),
        }
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ReferenceDataError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading currency reference file");

        let raw = fs::read_to_string(path).map_err(|source| ReferenceDataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw).map_err(|source| ReferenceDataError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        let records: Vec<ReferenceRecord> = serde_json::from_str(raw)?;
        Ok(Self::from_codes(
            records.into_iter().map(|record| record.from_symbol),
        ))
    }

    /// Store built from the compiled-in currency list.
    pub fn bundled() -> Result<Self, ReferenceDataError> {
        Self::from_json_str(BUNDLED_REFERENCE_JSON).map_err(ReferenceDataError::Bundled)
    }

    /// Process-wide store backed by the compiled-in list.
    pub fn global() -> Result<&'static Self, CoreError> {
        Self::global_with(Self::bundled)
    }

    /// Process-wide store, reading `path` if it has not been loaded yet.
    ///
    /// The path only matters for the first successful call; later calls reuse
    /// the memoized set.
    pub fn global_from(path: impl Into<PathBuf>) -> Result<&'static Self, CoreError> {
        let path = path.into();
        Self::global_with(|| Self::load_from_path(path))
    }

    /// Process-wide store honoring the configured override file, if any.
    pub fn global_for(config: &FxtermConfig) -> Result<&'static Self, CoreError> {
        match &config.reference_file {
            Some(path) => Self::global_from(path),
            None => Self::global(),
        }
    }

    fn global_with(
        load: impl FnOnce() -> Result<Self, ReferenceDataError>,
    ) -> Result<&'static Self, CoreError> {
        if let Some(store) = GLOBAL_STORE.get() {
            return Ok(store);
        }

        let store = load()?;
        Ok(GLOBAL_STORE.get_or_init(|| store))
    }

    /// Supported codes in ascending order.
    pub fn currencies(&self) -> impl Iterator<Item = &str> {
        self.currencies.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }

    pub fn contains(&self, code: &str) -> bool {
        self.currencies.contains(&code.to_uppercase())
    }

    /// Uppercases `code` and checks it against the store.
    pub fn validate(&self, code: &str) -> Result<String, ValidationError> {
        let normalized = code.to_uppercase();
        if self.currencies.contains(&normalized) {
            return Ok(normalized);
        }

        Err(ValidationError::UnsupportedCurrency { code: normalized })
    }
}

/// Check if a currency code is supported on Yahoo Finance, parsing the
/// bundled reference list on first use.
pub fn check_valid_yf_forex_currency(fx_symbol: &str) -> Result<String, CoreError> {
    debug!(fx_symbol, "validating currency code");
    let store = SymbolReferenceStore::global()?;
    Ok(store.validate(fx_symbol)?)
}
