//! Property tests over randomly generated close series.

use chrono::NaiveDate;
use dipscan::domain::backtest::{backtest_series, BacktestConfig};
use dipscan::domain::indicator::{compute_indicator_rows, IndicatorParams};
use dipscan::domain::ledger::Ledger;
use dipscan::domain::metrics::Summary;
use dipscan::domain::price_series::{PricePoint, PriceSeries};
use proptest::prelude::*;

fn series_from(closes: &[f64]) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2015, 1, 1).unwrap();
    PriceSeries::new(
        "SPY",
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                date: start + chrono::Duration::days(i as i64),
                close,
            })
            .collect(),
    )
}

fn closes_strategy() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0f64..500.0, 20..400)
}

fn config_for(high_window: usize, momentum_window: usize, holding_months: u32) -> BacktestConfig {
    let mut config = BacktestConfig::new(
        vec!["SPY".into()],
        NaiveDate::from_ymd_opt(2015, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2017, 12, 31).unwrap(),
    );
    config.indicators = IndicatorParams {
        high_window,
        momentum_window,
    };
    config.holding_months = holding_months;
    config
}

proptest! {
    #[test]
    fn drawdown_is_never_positive(
        closes in closes_strategy(),
        high_window in 1usize..60,
        momentum_window in 1usize..30,
    ) {
        let series = series_from(&closes);
        let params = IndicatorParams { high_window, momentum_window };
        for row in compute_indicator_rows(&series, &params) {
            prop_assert!(row.drawdown <= 0.0, "drawdown {} on {}", row.drawdown, row.date);
            prop_assert!(row.drawdown > -1.0);
            prop_assert!(row.trailing_high >= row.close);
        }
    }

    #[test]
    fn momentum_stays_within_bounds(
        closes in closes_strategy(),
        momentum_window in 1usize..30,
    ) {
        let series = series_from(&closes);
        let params = IndicatorParams { high_window: 5, momentum_window };
        for row in compute_indicator_rows(&series, &params) {
            prop_assert!((0.0..=100.0).contains(&row.momentum), "momentum {}", row.momentum);
        }
    }

    #[test]
    fn rows_start_after_the_longest_window(
        closes in closes_strategy(),
        high_window in 1usize..60,
        momentum_window in 1usize..30,
    ) {
        let series = series_from(&closes);
        let params = IndicatorParams { high_window, momentum_window };
        let rows = compute_indicator_rows(&series, &params);
        prop_assert!(rows.len() <= closes.len().saturating_sub(params.min_rows() - 1));
        if let Some(first) = rows.first() {
            let index = series.points().iter().position(|p| p.date == first.date).unwrap();
            prop_assert!(index + 1 >= params.min_rows());
        }
    }

    #[test]
    fn trades_exit_on_exact_observations(
        closes in closes_strategy(),
        high_window in 2usize..40,
        momentum_window in 2usize..20,
        holding_months in 1u32..6,
    ) {
        let series = series_from(&closes);
        let config = config_for(high_window, momentum_window, holding_months);
        let outcome = backtest_series(&series, &config);

        prop_assert_eq!(outcome.trades.len() + outcome.unmatched_exits, outcome.signals);
        for trade in &outcome.trades {
            prop_assert_eq!(series.close_on(trade.exit_date), Some(trade.exit_price));
            prop_assert_eq!(series.close_on(trade.entry_date), Some(trade.entry_price));
            prop_assert!(trade.exit_date > trade.entry_date);
        }
    }

    #[test]
    fn histogram_counts_every_trade(
        closes in closes_strategy(),
        bins in 1usize..30,
    ) {
        let series = series_from(&closes);
        let config = config_for(10, 5, 1);
        let ledger: Ledger = backtest_series(&series, &config).trades.into_iter().collect();
        match Summary::compute(&ledger, bins) {
            None => prop_assert!(ledger.is_empty()),
            Some(summary) => {
                prop_assert_eq!(summary.histogram.total(), summary.trade_count);
                prop_assert!(summary.histogram.bins.len() <= bins);
                prop_assert!(summary.min_roi <= summary.mean_roi + 1e-9);
                prop_assert!(summary.mean_roi <= summary.max_roi + 1e-9);
            }
        }
    }
}
