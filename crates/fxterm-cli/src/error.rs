use fxterm_core::{ChartError, CoreError, ReferenceDataError, ValidationError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    ReferenceData(#[from] ReferenceDataError),

    #[error(transparent)]
    Chart(#[from] ChartError),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Command(_) => 2,
            Self::Serialization(_) => 4,
            Self::Chart(_) => 6,
            Self::ReferenceData(_) => 7,
            Self::Io(_) => 10,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Validation(error) => Self::Validation(error),
            CoreError::ReferenceData(error) => Self::ReferenceData(error),
            CoreError::Chart(error) => Self::Chart(error),
            CoreError::Serialization(error) => Self::Serialization(error),
            CoreError::Source(error) => Self::Command(error.to_string()),
        }
    }
}
