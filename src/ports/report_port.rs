//! Report presentation port trait.

use crate::domain::backtest::{BacktestConfig, BacktestResult};
use crate::domain::error::DipError;
use std::io::Write;

/// Port for presenting a finished backtest.
pub trait ReportPort {
    fn write(
        &self,
        result: &BacktestResult,
        config: &BacktestConfig,
        out: &mut dyn Write,
    ) -> Result<(), DipError>;
}
