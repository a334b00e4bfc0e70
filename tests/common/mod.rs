#![allow(dead_code)]

use chrono::{Months, NaiveDate};
use dipscan::domain::backtest::BacktestConfig;
use dipscan::domain::error::DipError;
pub use dipscan::domain::price_series::RawQuote;
use dipscan::ports::data_port::DataPort;
use std::collections::HashMap;
use std::process::ExitCode;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<RawQuote>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_quotes(mut self, code: &str, quotes: Vec<RawQuote>) -> Self {
        self.data.insert(code.to_string(), quotes);
        self
    }

    pub fn with_error(mut self, code: &str, reason: &str) -> Self {
        self.errors.insert(code.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_closes(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<RawQuote>, DipError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(DipError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|quotes| {
                quotes
                    .iter()
                    .filter(|q| q.date >= start_date && q.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    fn list_symbols(&self) -> Result<Vec<String>, DipError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        symbol: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DipError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(DipError::Data {
                reason: reason.clone(),
            });
        }
        match self.data.get(symbol) {
            Some(quotes) if !quotes.is_empty() => {
                let min = quotes.iter().map(|q| q.date).min().unwrap();
                let max = quotes.iter().map(|q| q.date).max().unwrap();
                Ok(Some((min, max, quotes.len())))
            }
            _ => Ok(None),
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One quote per calendar day starting at `start`.
pub fn daily_quotes(start: NaiveDate, closes: &[f64]) -> Vec<RawQuote> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| RawQuote {
            date: start + chrono::Duration::days(i as i64),
            close: Some(close),
        })
        .collect()
}

pub const SERIES_START: (i32, u32, u32) = (2018, 1, 1);

pub fn series_start() -> NaiveDate {
    date(SERIES_START.0, SERIES_START.1, SERIES_START.2)
}

pub fn full_range_config(codes: &[&str]) -> BacktestConfig {
    BacktestConfig::new(
        codes.iter().map(|c| c.to_string()).collect(),
        date(2017, 1, 1),
        date(2022, 12, 31),
    )
}

/// A year at 100, ten daily declines of 4 down to 60, then straight back to
/// 100 and flat through 2021.
///
/// With the default windows the dip produces exactly three signals (closes
/// 68, 64 and 60). The close 14 months after the 60 entry is 90.
pub struct DipScenario {
    pub quotes: Vec<RawQuote>,
    pub entry_dates: Vec<NaiveDate>,
    pub low_entry: NaiveDate,
    pub low_exit: NaiveDate,
}

pub fn dip_scenario() -> DipScenario {
    let start = series_start();
    let end = date(2021, 12, 31);
    let days = (end - start).num_days() as usize + 1;

    let mut closes = vec![100.0; days];
    for k in 1..=10 {
        closes[251 + k] = 100.0 - 4.0 * k as f64;
    }

    let day = |i: usize| start + chrono::Duration::days(i as i64);
    let entry_dates = vec![day(259), day(260), day(261)];
    let low_entry = day(261);
    let low_exit = low_entry.checked_add_months(Months::new(14)).unwrap();
    let exit_index = (low_exit - start).num_days() as usize;
    closes[exit_index] = 90.0;

    DipScenario {
        quotes: daily_quotes(start, &closes),
        entry_dates,
        low_entry,
        low_exit,
    }
}

/// Steady uptrend, never 30% below its high.
pub fn rising_quotes(count: usize) -> Vec<RawQuote> {
    let closes: Vec<f64> = (0..count).map(|i| 100.0 + 0.1 * i as f64).collect();
    daily_quotes(series_start(), &closes)
}

pub fn is_success(code: ExitCode) -> bool {
    format!("{:?}", code) == format!("{:?}", ExitCode::SUCCESS)
}

pub fn exit_code_is(code: ExitCode, expected: u8) -> bool {
    format!("{:?}", code) == format!("{:?}", ExitCode::from(expected))
}
