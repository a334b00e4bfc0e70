//! Core domain types and logic.

pub mod price_series;
pub mod indicator;
pub mod signal;
pub mod trade;
pub mod ledger;
pub mod metrics;
pub mod backtest;
pub mod universe;
pub mod config_validation;
pub mod error;
