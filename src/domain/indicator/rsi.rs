//! RSI-style momentum oscillator.
//!
//! Simple rolling means over the last `period` day-over-day changes:
//! - avg_gain: mean of positive changes (losses count as 0)
//! - avg_loss: mean of loss magnitudes (gains count as 0)
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0 and avg_gain > 0: RSI = 100.
//! If both are 0 the window is flat and RSI is undefined.
//!
//! Warmup: the first `period` closes have no value (need `period` changes).

pub fn calculate_rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut values = vec![None; closes.len()];
    if period == 0 || closes.len() <= period {
        return values;
    }

    let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    for (i, value) in values.iter_mut().enumerate().skip(period) {
        // changes[i - 1] is close[i] - close[i - 1]
        let window = &changes[i - period..i];
        let avg_gain = window.iter().filter(|c| **c > 0.0).sum::<f64>() / period as f64;
        let avg_loss = window.iter().filter(|c| **c < 0.0).map(|c| -c).sum::<f64>() / period as f64;
        *value = rsi_from_averages(avg_gain, avg_loss);
    }

    values
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        if avg_gain > 0.0 { Some(100.0) } else { None }
    } else {
        Some(100.0 - (100.0 / (1.0 + avg_gain / avg_loss)))
    }
}
