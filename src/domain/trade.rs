//! Fixed-holding-period trade simulation.

use crate::domain::indicator::IndicatorRow;
use crate::domain::price_series::PriceSeries;
use chrono::{Months, NaiveDate};

pub const DEFAULT_HOLDING_MONTHS: u32 = 14;
pub const DEFAULT_INITIAL_CAPITAL: f64 = 50_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub instrument: String,
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub entry_price: f64,
    pub exit_price: f64,
    /// Fractional notional shares bought with the full capital.
    pub shares: f64,
    pub profit: f64,
    pub roi_percent: f64,
}

impl Trade {
    pub fn holding_days(&self) -> i64 {
        (self.exit_date - self.entry_date).num_days()
    }

    pub fn is_win(&self) -> bool {
        self.profit > 0.0
    }
}

/// Calendar-month offset; month-end dates clamp (Jan 31 + 1 month = Feb 28/29).
pub fn exit_date_for(entry_date: NaiveDate, holding_months: u32) -> Option<NaiveDate> {
    entry_date.checked_add_months(Months::new(holding_months))
}

/// Buy at the signal close, sell at the exact exit-date close. `None` when the
/// exit date has no observation in `series`.
pub fn simulate_trade(
    signal: &IndicatorRow,
    series: &PriceSeries,
    holding_months: u32,
    capital: f64,
) -> Option<Trade> {
    let exit_date = exit_date_for(signal.date, holding_months)?;
    let exit_price = series.close_on(exit_date)?;
    let entry_price = signal.close;

    let shares = capital / entry_price;
    let profit = shares * exit_price - capital;

    Some(Trade {
        instrument: series.symbol().to_string(),
        entry_date: signal.date,
        exit_date,
        entry_price,
        exit_price,
        shares,
        profit,
        roi_percent: 100.0 * profit / capital,
    })
}
