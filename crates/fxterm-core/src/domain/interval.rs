use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Default interval of a forex load request.
pub const DEFAULT_INTERVAL: &str = "1day";

/// Coarse sampling marker, distinct from the finer-grained interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "i")]
    Intraday,
    #[default]
    #[serde(rename = "d")]
    Daily,
    #[serde(rename = "w")]
    Weekly,
    #[serde(rename = "m")]
    Monthly,
}

impl Resolution {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Intraday => "i",
            Self::Daily => "d",
            Self::Weekly => "w",
            Self::Monthly => "m",
        }
    }
}

impl Display for Resolution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "i" => Ok(Self::Intraday),
            "d" => Ok(Self::Daily),
            "w" => Ok(Self::Weekly),
            "m" => Ok(Self::Monthly),
            other => Err(ValidationError::InvalidResolution {
                value: other.to_owned(),
            }),
        }
    }
}

/// Provider-native interval representation produced by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeInterval {
    /// Vendor interval code such as `15m` or `1wk`.
    Code(&'static str),
    /// Bar length in minutes.
    Minutes(u32),
    /// Multiplier applied to a timespan unit, e.g. `15 x minute`.
    Timeframe { multiplier: u32, timespan: String },
}
