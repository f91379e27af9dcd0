use std::env;
use std::path::PathBuf;

const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;

/// Runtime configuration read from the environment.
///
/// | Setting | Primary Env Var | Fallback Env Var |
/// |---------|-----------------|------------------|
/// | Alpha Vantage key | `FXTERM_ALPHAVANTAGE_API_KEY` | `ALPHAVANTAGE_API_KEY` |
/// | Polygon key | `FXTERM_POLYGON_API_KEY` | `POLYGON_API_KEY` |
/// | Reference file | `FXTERM_FOREX_REFERENCE` | compiled-in list |
/// | HTTP timeout | `FXTERM_HTTP_TIMEOUT_MS` | 10000 |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FxtermConfig {
    pub alphavantage_api_key: Option<String>,
    pub polygon_api_key: Option<String>,
    /// Replacement currency list; `None` uses the compiled-in one.
    pub reference_file: Option<PathBuf>,
    pub http_timeout_ms: u64,
}

impl Default for FxtermConfig {
    fn default() -> Self {
        Self {
            alphavantage_api_key: None,
            polygon_api_key: None,
            reference_file: None,
            http_timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
        }
    }
}

impl FxtermConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            alphavantage_api_key: env_with_fallback(
                "FXTERM_ALPHAVANTAGE_API_KEY",
                "ALPHAVANTAGE_API_KEY",
            ),
            polygon_api_key: env_with_fallback("FXTERM_POLYGON_API_KEY", "POLYGON_API_KEY"),
            reference_file: env::var_os("FXTERM_FOREX_REFERENCE")
                .filter(|value| !value.is_empty())
                .map(PathBuf::from)
                .or(defaults.reference_file),
            http_timeout_ms: env::var("FXTERM_HTTP_TIMEOUT_MS")
                .ok()
                .and_then(|value| value.trim().parse().ok())
                .unwrap_or(defaults.http_timeout_ms),
        }
    }
}

fn env_with_fallback(primary: &str, fallback: &str) -> Option<String> {
    env::var(primary)
        .or_else(|_| env::var(fallback))
        .ok()
        .filter(|value| !value.trim().is_empty())
}
