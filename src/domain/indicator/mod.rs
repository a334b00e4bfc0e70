//! Indicator engine: trailing high, drawdown and momentum per trading day.
//!
//! Both indicators are computed over the full series; only rows where every
//! field is defined are emitted as [`IndicatorRow`]s.

pub mod rsi;
pub mod trailing_high;

use crate::domain::price_series::PriceSeries;
use chrono::NaiveDate;

pub const DEFAULT_HIGH_WINDOW: usize = 252;
pub const DEFAULT_MOMENTUM_WINDOW: usize = 14;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorParams {
    /// Trailing-high lookback in trading days.
    pub high_window: usize,
    /// RSI lookback in trading days.
    pub momentum_window: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            high_window: DEFAULT_HIGH_WINDOW,
            momentum_window: DEFAULT_MOMENTUM_WINDOW,
        }
    }
}

impl IndicatorParams {
    /// Fewest closes before any row can be fully defined.
    pub fn min_rows(&self) -> usize {
        self.high_window.max(self.momentum_window + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub close: f64,
    pub trailing_high: f64,
    /// `(close - trailing_high) / trailing_high`, never positive.
    pub drawdown: f64,
    /// Bounded to `[0, 100]`.
    pub momentum: f64,
}

pub fn compute_indicator_rows(series: &PriceSeries, params: &IndicatorParams) -> Vec<IndicatorRow> {
    let closes: Vec<f64> = series.points().iter().map(|p| p.close).collect();
    let highs = trailing_high::calculate_trailing_high(&closes, params.high_window);
    let momentum = rsi::calculate_rsi(&closes, params.momentum_window);

    series
        .points()
        .iter()
        .zip(highs)
        .zip(momentum)
        .filter_map(|((point, high), momentum)| {
            let high = high.filter(|h| *h > 0.0)?;
            let momentum = momentum?;
            Some(IndicatorRow {
                date: point.date,
                close: point.close,
                trailing_high: high,
                drawdown: (point.close - high) / high,
                momentum,
            })
        })
        .collect()
}
