//! Ledger aggregation: summary statistics and ROI distribution.

use crate::domain::ledger::Ledger;
use crate::domain::trade::Trade;

pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width bins over `[min, max]`; the last bin is closed on the right.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub bins: Vec<HistogramBin>,
}

impl Histogram {
    /// A single bin is produced when every value is identical. Returns an
    /// empty histogram for no values or zero bins.
    pub fn from_values(values: &[f64], bin_count: usize) -> Self {
        if values.is_empty() || bin_count == 0 {
            return Self { bins: vec![] };
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if min == max {
            return Self {
                bins: vec![HistogramBin {
                    lower: min,
                    upper: max,
                    count: values.len(),
                }],
            };
        }

        let width = (max - min) / bin_count as f64;
        let mut bins: Vec<HistogramBin> = (0..bin_count)
            .map(|i| HistogramBin {
                lower: min + width * i as f64,
                upper: if i + 1 == bin_count {
                    max
                } else {
                    min + width * (i + 1) as f64
                },
                count: 0,
            })
            .collect();

        for &v in values {
            let idx = (((v - min) / width) as usize).min(bin_count - 1);
            bins[idx].count += 1;
        }

        Self { bins }
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub trade_count: usize,
    pub mean_roi: f64,
    pub total_profit: f64,
    pub min_roi: f64,
    pub max_roi: f64,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub win_rate: f64,
    pub avg_holding_days: f64,
    pub histogram: Histogram,
}

impl Summary {
    /// `None` means no qualifying trades, which is a normal outcome.
    pub fn compute(ledger: &Ledger, bin_count: usize) -> Option<Self> {
        let trades: Vec<&Trade> = ledger.iter().collect();
        Self::from_trades(&trades, bin_count)
    }

    fn from_trades(trades: &[&Trade], bin_count: usize) -> Option<Self> {
        if trades.is_empty() {
            return None;
        }

        let n = trades.len() as f64;
        let rois: Vec<f64> = trades.iter().map(|t| t.roi_percent).collect();
        let total_profit: f64 = trades.iter().map(|t| t.profit).sum();
        let trades_won = trades.iter().filter(|t| t.is_win()).count();
        let trades_lost = trades.iter().filter(|t| t.profit < 0.0).count();
        let total_days: i64 = trades.iter().map(|t| t.holding_days()).sum();

        Some(Summary {
            trade_count: trades.len(),
            mean_roi: rois.iter().sum::<f64>() / n,
            total_profit,
            min_roi: rois.iter().copied().fold(f64::INFINITY, f64::min),
            max_roi: rois.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            trades_won,
            trades_lost,
            win_rate: trades_won as f64 / n,
            avg_holding_days: total_days as f64 / n,
            histogram: Histogram::from_values(&rois, bin_count),
        })
    }
}

/// Secondary per-instrument view over the same ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct InstrumentSummary {
    pub instrument: String,
    pub trade_count: usize,
    pub mean_roi: f64,
    pub total_profit: f64,
    pub win_rate: f64,
}

impl InstrumentSummary {
    pub fn compute_per_instrument(ledger: &Ledger) -> Vec<Self> {
        ledger
            .by_instrument()
            .into_iter()
            .map(|(instrument, trades)| {
                let n = trades.len() as f64;
                InstrumentSummary {
                    instrument: instrument.to_string(),
                    trade_count: trades.len(),
                    mean_roi: trades.iter().map(|t| t.roi_percent).sum::<f64>() / n,
                    total_profit: trades.iter().map(|t| t.profit).sum(),
                    win_rate: trades.iter().filter(|t| t.is_win()).count() as f64 / n,
                }
            })
            .collect()
    }
}
