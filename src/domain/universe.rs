//! Screening universe and per-instrument skip diagnostics.
//!
//! Parses ticker lists from configuration. Instruments that cannot be
//! backtested are recorded as [`SkippedCode`]s instead of aborting the run.

use std::collections::HashSet;
use std::fmt;

/// ETFs the screener is built around.
pub const ETF_UNIVERSE: [&str; 8] = ["SPY", "QQQ", "VTI", "IWM", "XLK", "XLF", "XLV", "XLE"];

/// Selection used when no codes are configured.
pub const DEFAULT_CODES: [&str; 2] = ["SPY", "QQQ"];

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in code list")]
    EmptyToken,

    #[error("duplicate code: {0}")]
    DuplicateCode(String),
}

pub fn parse_codes(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut codes = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let code = trimmed.to_uppercase();
        if !seen.insert(code.clone()) {
            return Err(UniverseError::DuplicateCode(code));
        }
        codes.push(code);
    }

    Ok(codes)
}

pub fn default_codes() -> Vec<String> {
    DEFAULT_CODES.iter().map(|c| c.to_string()).collect()
}

pub fn is_in_universe(code: &str) -> bool {
    ETF_UNIVERSE.contains(&code)
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedCode {
    pub code: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    LoaderFailed { reason: String },
    /// Covers an empty series as well as a short one.
    InsufficientData { rows: usize, minimum: usize },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::LoaderFailed { reason } => write!(f, "{}", reason),
            SkipReason::InsufficientData { rows: 0, minimum } => {
                write!(f, "no data found, minimum {} rows required", minimum)
            }
            SkipReason::InsufficientData { rows, minimum } => {
                write!(f, "only {} usable rows, minimum {} required", rows, minimum)
            }
        }
    }
}
