//! Configuration validation.
//!
//! Validates all config fields before a backtest runs. Missing keys fall back
//! to defaults; present keys must parse and fall within their range.

use crate::domain::error::DipError;
use crate::domain::indicator::{DEFAULT_HIGH_WINDOW, DEFAULT_MOMENTUM_WINDOW};
use crate::domain::metrics::DEFAULT_HISTOGRAM_BINS;
use crate::domain::signal::{DEFAULT_DROP_THRESHOLD_PCT, DEFAULT_MOMENTUM_THRESHOLD};
use crate::domain::trade::{DEFAULT_HOLDING_MONTHS, DEFAULT_INITIAL_CAPITAL};
use crate::domain::universe::parse_codes;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::ops::RangeInclusive;
use std::str::FromStr;

pub const DROP_THRESHOLD_PCT_RANGE: RangeInclusive<f64> = 10.0..=70.0;
pub const MOMENTUM_THRESHOLD_RANGE: RangeInclusive<f64> = 10.0..=50.0;
pub const HOLDING_MONTHS_RANGE: RangeInclusive<i64> = 6..=24;

pub fn validate_backtest_config(config: &dyn ConfigPort, today: NaiveDate) -> Result<(), DipError> {
    validate_initial_capital(config)?;
    validate_dates(config, today)?;
    validate_codes(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), DipError> {
    validate_drop_threshold(config)?;
    validate_momentum_threshold(config)?;
    validate_holding_months(config)?;
    validate_windows(config)?;
    validate_histogram_bins(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> DipError {
    DipError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// Reads a numeric key, rejecting values that are present but unparseable.
pub fn read_number<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: T,
) -> Result<T, DipError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(s) => s
            .trim()
            .parse()
            .map_err(|_| invalid(section, key, format!("{:?} is not a number", s))),
    }
}

fn validate_initial_capital(config: &dyn ConfigPort) -> Result<(), DipError> {
    let value = read_number(config, "backtest", "initial_capital", DEFAULT_INITIAL_CAPITAL)?;
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(
            "backtest",
            "initial_capital",
            "initial_capital must be positive",
        ));
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort, today: NaiveDate) -> Result<(), DipError> {
    let start_date = match config.get_string("backtest", "start_date") {
        Some(s) => parse_date(&s, "start_date")?,
        None => {
            return Err(DipError::ConfigMissing {
                section: "backtest".to_string(),
                key: "start_date".to_string(),
            })
        }
    };
    let end_date = match config.get_string("backtest", "end_date") {
        Some(s) => parse_date(&s, "end_date")?,
        None => today,
    };

    if start_date >= end_date {
        return Err(invalid(
            "backtest",
            "start_date",
            "start_date must be before end_date",
        ));
    }
    Ok(())
}

pub fn parse_date(value: &str, field: &str) -> Result<NaiveDate, DipError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        invalid(
            "backtest",
            field,
            format!("invalid {} format, expected YYYY-MM-DD", field),
        )
    })
}

fn validate_codes(config: &dyn ConfigPort) -> Result<(), DipError> {
    if let Some(codes) = config.get_string("backtest", "codes") {
        parse_codes(&codes)?;
    }
    Ok(())
}

fn validate_drop_threshold(config: &dyn ConfigPort) -> Result<(), DipError> {
    let value = read_number(config, "strategy", "drop_threshold_pct", DEFAULT_DROP_THRESHOLD_PCT)?;
    if !DROP_THRESHOLD_PCT_RANGE.contains(&value) {
        return Err(invalid(
            "strategy",
            "drop_threshold_pct",
            "drop_threshold_pct must be between 10 and 70",
        ));
    }
    Ok(())
}

fn validate_momentum_threshold(config: &dyn ConfigPort) -> Result<(), DipError> {
    let value = read_number(config, "strategy", "momentum_threshold", DEFAULT_MOMENTUM_THRESHOLD)?;
    if !MOMENTUM_THRESHOLD_RANGE.contains(&value) {
        return Err(invalid(
            "strategy",
            "momentum_threshold",
            "momentum_threshold must be between 10 and 50",
        ));
    }
    Ok(())
}

fn validate_holding_months(config: &dyn ConfigPort) -> Result<(), DipError> {
    let value = read_number(config, "strategy", "holding_months", DEFAULT_HOLDING_MONTHS as i64)?;
    if !HOLDING_MONTHS_RANGE.contains(&value) {
        return Err(invalid(
            "strategy",
            "holding_months",
            "holding_months must be between 6 and 24",
        ));
    }
    Ok(())
}

fn validate_windows(config: &dyn ConfigPort) -> Result<(), DipError> {
    for (key, default) in [
        ("high_window", DEFAULT_HIGH_WINDOW),
        ("momentum_window", DEFAULT_MOMENTUM_WINDOW),
    ] {
        let value = read_number(config, "strategy", key, default as i64)?;
        if value < 1 {
            return Err(invalid("strategy", key, format!("{} must be at least 1", key)));
        }
    }
    Ok(())
}

fn validate_histogram_bins(config: &dyn ConfigPort) -> Result<(), DipError> {
    let value = read_number(config, "report", "histogram_bins", DEFAULT_HISTOGRAM_BINS as i64)?;
    if value < 1 {
        return Err(invalid(
            "report",
            "histogram_bins",
            "histogram_bins must be at least 1",
        ));
    }
    Ok(())
}
