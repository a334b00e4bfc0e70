//! Domain error types.

use crate::domain::universe::UniverseError;

/// Top-level error type for dipscan.
#[derive(Debug, thiserror::Error)]
pub enum DipError {
    #[error("data error: {reason}")]
    Data { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Universe(#[from] UniverseError),

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&DipError> for std::process::ExitCode {
    fn from(err: &DipError) -> Self {
        let code: u8 = match err {
            DipError::Io(_) => 1,
            DipError::ConfigParse { .. }
            | DipError::ConfigMissing { .. }
            | DipError::ConfigInvalid { .. }
            | DipError::Universe(_) => 2,
            DipError::Data { .. } => 3,
            DipError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
