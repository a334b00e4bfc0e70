//! Dip signal scanner.

use crate::domain::indicator::IndicatorRow;

pub const DEFAULT_DROP_THRESHOLD_PCT: f64 = 30.0;
pub const DEFAULT_MOMENTUM_THRESHOLD: f64 = 30.0;

/// Entry condition: `drawdown <= -drop_threshold && momentum < momentum_threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalParams {
    /// Fraction below the trailing high, e.g. 0.30 for a 30% drop.
    pub drop_threshold: f64,
    pub momentum_threshold: f64,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            drop_threshold: DEFAULT_DROP_THRESHOLD_PCT / 100.0,
            momentum_threshold: DEFAULT_MOMENTUM_THRESHOLD,
        }
    }
}

impl SignalParams {
    pub fn is_signal(&self, row: &IndicatorRow) -> bool {
        row.drawdown <= -self.drop_threshold && row.momentum < self.momentum_threshold
    }
}

/// Every qualifying row in date order. Adjacent qualifying days each signal.
pub fn scan_signals<'a>(rows: &'a [IndicatorRow], params: &SignalParams) -> Vec<&'a IndicatorRow> {
    rows.iter().filter(|row| params.is_signal(row)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(day: u32, drawdown: f64, momentum: f64) -> IndicatorRow {
        IndicatorRow {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            close: 100.0 * (1.0 + drawdown),
            trailing_high: 100.0,
            drawdown,
            momentum,
        }
    }

    #[test]
    fn default_thresholds() {
        let params = SignalParams::default();
        assert!((params.drop_threshold - 0.30).abs() < f64::EPSILON);
        assert!((params.momentum_threshold - 30.0).abs() < f64::EPSILON);
    }

    #[test]
    fn drop_threshold_is_inclusive() {
        let params = SignalParams::default();
        assert!(params.is_signal(&row(1, -0.30, 20.0)));
        assert!(!params.is_signal(&row(1, -0.29, 20.0)));
    }

    #[test]
    fn momentum_threshold_is_strict() {
        let params = SignalParams::default();
        assert!(!params.is_signal(&row(1, -0.40, 30.0)));
        assert!(params.is_signal(&row(1, -0.40, 29.99)));
    }

    #[test]
    fn adjacent_days_all_signal() {
        let rows = vec![
            row(1, -0.35, 25.0),
            row(2, -0.36, 24.0),
            row(3, -0.10, 10.0),
            row(4, -0.50, 45.0),
            row(5, -0.31, 5.0),
        ];
        let signals = scan_signals(&rows, &SignalParams::default());
        let days: Vec<_> = signals.iter().map(|r| r.date).collect();
        assert_eq!(
            days,
            vec![rows[0].date, rows[1].date, rows[4].date]
        );
    }

    #[test]
    fn configurable_thresholds() {
        let params = SignalParams {
            drop_threshold: 0.10,
            momentum_threshold: 50.0,
        };
        let rows = vec![row(1, -0.12, 45.0)];
        assert_eq!(scan_signals(&rows, &params).len(), 1);
        assert!(scan_signals(&rows, &SignalParams::default()).is_empty());
    }
}
