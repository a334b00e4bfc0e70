//! Trailing high-water mark: max close over the last `window` closes,
//! undefined until the window is full.

pub fn calculate_trailing_high(closes: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut values = vec![None; closes.len()];
    if window == 0 || closes.len() < window {
        return values;
    }

    for (i, w) in closes.windows(window).enumerate() {
        let high = w.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        values[i + window - 1] = Some(high);
    }

    values
}
