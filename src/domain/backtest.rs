//! Backtest pipeline: loader, indicators, scanner, simulator, ledger.
//!
//! Each instrument is processed independently and in configuration order;
//! its trades are appended to the shared [`Ledger`].

use crate::domain::indicator::{compute_indicator_rows, IndicatorParams};
use crate::domain::ledger::Ledger;
use crate::domain::metrics::{InstrumentSummary, Summary, DEFAULT_HISTOGRAM_BINS};
use crate::domain::price_series::{CleanedSeries, PriceSeries};
use crate::domain::signal::{scan_signals, SignalParams};
use crate::domain::trade::{simulate_trade, Trade, DEFAULT_HOLDING_MONTHS, DEFAULT_INITIAL_CAPITAL};
use crate::domain::universe::{SkipReason, SkippedCode};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub codes: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_capital: f64,
    pub holding_months: u32,
    pub signal: SignalParams,
    pub indicators: IndicatorParams,
    pub histogram_bins: usize,
}

impl BacktestConfig {
    /// Defaults for everything except the instruments and date range.
    pub fn new(codes: Vec<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            codes,
            start_date,
            end_date,
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            holding_months: DEFAULT_HOLDING_MONTHS,
            signal: SignalParams::default(),
            indicators: IndicatorParams::default(),
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

/// Outcome of one instrument's pass through the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesBacktest {
    pub trades: Vec<Trade>,
    pub signals: usize,
    /// Signals whose exit date had no exact price observation.
    pub unmatched_exits: usize,
}

pub fn backtest_series(series: &PriceSeries, config: &BacktestConfig) -> SeriesBacktest {
    let rows = compute_indicator_rows(series, &config.indicators);
    let signals = scan_signals(&rows, &config.signal);

    let mut trades = Vec::with_capacity(signals.len());
    let mut unmatched_exits = 0;

    for signal in &signals {
        match simulate_trade(signal, series, config.holding_months, config.initial_capital) {
            Some(trade) => trades.push(trade),
            None => {
                debug!(symbol = series.symbol(), entry = %signal.date, "no exit observation");
                unmatched_exits += 1;
            }
        }
    }

    SeriesBacktest {
        trades,
        signals: signals.len(),
        unmatched_exits,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentRun {
    pub code: String,
    pub rows: usize,
    pub invalid_rows: usize,
    pub signals: usize,
    pub trades: usize,
    pub unmatched_exits: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BacktestResult {
    pub ledger: Ledger,
    pub runs: Vec<InstrumentRun>,
    pub skipped: Vec<SkippedCode>,
}

impl BacktestResult {
    pub fn summary(&self, bin_count: usize) -> Option<Summary> {
        Summary::compute(&self.ledger, bin_count)
    }

    pub fn per_instrument(&self) -> Vec<InstrumentSummary> {
        InstrumentSummary::compute_per_instrument(&self.ledger)
    }
}

/// Fetches and cleans one instrument, or says why it must be skipped.
pub fn load_series(
    data_port: &dyn DataPort,
    code: &str,
    config: &BacktestConfig,
) -> Result<CleanedSeries, SkipReason> {
    let raw = data_port
        .fetch_closes(code, config.start_date, config.end_date)
        .map_err(|e| SkipReason::LoaderFailed {
            reason: e.to_string(),
        })?;

    let cleaned = PriceSeries::from_raw(code, raw);
    if cleaned.invalid_rows > 0 {
        warn!(
            symbol = code,
            rows = cleaned.invalid_rows,
            "excluded rows with invalid closes"
        );
    }

    let minimum = config.indicators.min_rows();
    if cleaned.series.len() < minimum {
        return Err(SkipReason::InsufficientData {
            rows: cleaned.series.len(),
            minimum,
        });
    }

    Ok(cleaned)
}

pub fn run_backtest(data_port: &dyn DataPort, config: &BacktestConfig) -> BacktestResult {
    let mut result = BacktestResult::default();

    for code in &config.codes {
        let cleaned = match load_series(data_port, code, config) {
            Ok(c) => c,
            Err(reason) => {
                warn!(symbol = %code, %reason, "skipping instrument");
                result.skipped.push(SkippedCode {
                    code: code.clone(),
                    reason,
                });
                continue;
            }
        };

        let outcome = backtest_series(&cleaned.series, config);
        info!(
            symbol = %code,
            rows = cleaned.series.len(),
            first = ?cleaned.series.first_date(),
            last = ?cleaned.series.last_date(),
            signals = outcome.signals,
            trades = outcome.trades.len(),
            "instrument processed"
        );

        result.runs.push(InstrumentRun {
            code: code.clone(),
            rows: cleaned.series.len(),
            invalid_rows: cleaned.invalid_rows,
            signals: outcome.signals,
            trades: outcome.trades.len(),
            unmatched_exits: outcome.unmatched_exits,
        });
        result.ledger.extend(outcome.trades);
    }

    result
}
