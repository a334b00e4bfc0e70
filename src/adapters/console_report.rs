//! Plain-text report adapter: trade table, headline metrics, ROI histogram.

use crate::domain::backtest::{BacktestConfig, BacktestResult};
use crate::domain::error::DipError;
use crate::domain::metrics::{Histogram, InstrumentSummary, Summary};
use crate::domain::trade::Trade;
use crate::domain::universe::SkippedCode;
use crate::ports::report_port::ReportPort;
use std::io::Write;

pub const NO_TRADES_MESSAGE: &str = "No qualifying trades found for the selected criteria.";

const HISTOGRAM_WIDTH: usize = 40;

#[derive(Debug, Default)]
pub struct ConsoleReport;

impl ConsoleReport {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, result: &BacktestResult, config: &BacktestConfig) -> String {
        let mut out = String::new();

        out.push_str(&format_parameters(config));
        out.push('\n');

        if !result.skipped.is_empty() {
            out.push_str(&format_skipped(&result.skipped));
            out.push('\n');
        }

        match result.summary(config.histogram_bins) {
            None => {
                out.push_str(NO_TRADES_MESSAGE);
                out.push('\n');
            }
            Some(summary) => {
                out.push_str(&format!(
                    "Found {} qualifying trades.\n\n",
                    summary.trade_count
                ));
                out.push_str(&format_trade_table(result.ledger.trades()));
                out.push('\n');
                out.push_str(&format_summary(&summary));
                out.push('\n');
                out.push_str(&format_per_instrument(&result.per_instrument()));
                out.push('\n');
                out.push_str(&format_histogram(&summary.histogram));
            }
        }

        out
    }
}

impl ReportPort for ConsoleReport {
    fn write(
        &self,
        result: &BacktestResult,
        config: &BacktestConfig,
        out: &mut dyn Write,
    ) -> Result<(), DipError> {
        out.write_all(self.render(result, config).as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

fn format_parameters(config: &BacktestConfig) -> String {
    format!(
        "Strategy: buy when {:.0}% below the {}-day high and RSI({}) < {:.0}, hold {} months\n\
         Universe: {} ({} to {}), capital ${} per trade\n",
        config.signal.drop_threshold * 100.0,
        config.indicators.high_window,
        config.indicators.momentum_window,
        config.signal.momentum_threshold,
        config.holding_months,
        config.codes.join(", "),
        config.start_date,
        config.end_date,
        format_money(config.initial_capital),
    )
}

pub fn format_skipped(skipped: &[SkippedCode]) -> String {
    let mut out = String::new();
    for s in skipped {
        out.push_str(&format!("Skipping {}: {}.\n", s.code, s.reason));
    }
    out
}

pub fn format_trade_table(trades: &[Trade]) -> String {
    if trades.is_empty() {
        return format!("{}\n", NO_TRADES_MESSAGE);
    }

    let mut out = format!(
        "{:<6} {:<10}  {:<10}  {:>10}  {:>10}  {:>12}  {:>8}\n",
        "ETF", "Buy Date", "Sell Date", "Buy Price", "Sell Price", "Profit ($)", "ROI (%)"
    );

    for trade in trades {
        out.push_str(&format!(
            "{:<6} {:<10}  {:<10}  {:>10.2}  {:>10.2}  {:>12.2}  {:>8.2}\n",
            trade.instrument,
            trade.entry_date.to_string(),
            trade.exit_date.to_string(),
            trade.entry_price,
            trade.exit_price,
            trade.profit,
            trade.roi_percent,
        ));
    }

    out
}

pub fn format_summary(summary: &Summary) -> String {
    format!(
        "Average ROI per Trade (%): {:.2}%\n\
         Total Profit ($):          ${}\n\
         ROI range:                 {:.2}% to {:.2}%\n\
         Win rate:                  {:.1}% ({} won, {} lost)\n\
         Avg holding period:        {:.0} days\n",
        summary.mean_roi,
        format_money(summary.total_profit),
        summary.min_roi,
        summary.max_roi,
        summary.win_rate * 100.0,
        summary.trades_won,
        summary.trades_lost,
        summary.avg_holding_days,
    )
}

pub fn format_per_instrument(results: &[InstrumentSummary]) -> String {
    let mut out = format!(
        "{:<6} {:>6}  {:>9}  {:>14}  {:>8}\n",
        "ETF", "Trades", "Mean ROI", "Total Profit", "Win Rate"
    );
    for r in results {
        out.push_str(&format!(
            "{:<6} {:>6}  {:>8.2}%  {:>14}  {:>7.1}%\n",
            r.instrument,
            r.trade_count,
            r.mean_roi,
            format_money(r.total_profit),
            r.win_rate * 100.0,
        ));
    }
    out
}

pub fn format_histogram(histogram: &Histogram) -> String {
    let mut out = String::from("ROI % Distribution\n");
    let max_count = histogram.max_count();

    for bin in &histogram.bins {
        let bar_len = if max_count > 0 {
            (bin.count * HISTOGRAM_WIDTH).div_ceil(max_count)
        } else {
            0
        };
        out.push_str(&format!(
            "{:>9.2} .. {:>9.2} | {:<width$} {}\n",
            bin.lower,
            bin.upper,
            "#".repeat(bar_len),
            bin.count,
            width = HISTOGRAM_WIDTH,
        ));
    }

    out
}

/// Two decimals with thousands separators, e.g. `-1,234,567.89`.
pub fn format_money(value: f64) -> String {
    let formatted = format!("{:.2}", value.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, frac_part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger::Ledger;
    use crate::domain::universe::SkipReason;
    use chrono::NaiveDate;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn sample_trade(instrument: &str, entry_price: f64, exit_price: f64) -> Trade {
        let capital = 50_000.0;
        let shares = capital / entry_price;
        let profit = shares * exit_price - capital;
        Trade {
            instrument: instrument.to_string(),
            entry_date: d(2020, 3, 16),
            exit_date: d(2021, 5, 16),
            entry_price,
            exit_price,
            shares,
            profit,
            roi_percent: 100.0 * profit / capital,
        }
    }

    fn sample_config() -> BacktestConfig {
        BacktestConfig::new(vec!["SPY".into(), "QQQ".into()], d(2010, 1, 1), d(2024, 12, 31))
    }

    #[test]
    fn format_money_groups_thousands() {
        assert_eq!(format_money(0.0), "0.00");
        assert_eq!(format_money(999.994), "999.99");
        assert_eq!(format_money(1_000.0), "1,000.00");
        assert_eq!(format_money(25_000.0), "25,000.00");
        assert_eq!(format_money(1_234_567.891), "1,234,567.89");
        assert_eq!(format_money(-4_321.5), "-4,321.50");
        assert_eq!(format_money(-0.001), "0.00");
    }

    #[test]
    fn trade_table_rounds_to_two_decimals() {
        let table = format_trade_table(&[sample_trade("SPY", 60.0, 90.0)]);
        assert!(table.starts_with("ETF"));
        assert!(table.contains("2020-03-16"));
        assert!(table.contains("2021-05-16"));
        assert!(table.contains("25000.00"));
        assert!(table.contains("50.00"));
    }

    #[test]
    fn empty_trade_table() {
        assert_eq!(format_trade_table(&[]), format!("{}\n", NO_TRADES_MESSAGE));
    }

    #[test]
    fn histogram_bars_scale_to_max() {
        let h = Histogram::from_values(&[0.0, 0.0, 10.0], 2);
        let text = format_histogram(&h);
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains(&"#".repeat(HISTOGRAM_WIDTH)));
        assert!(lines[1].ends_with(" 2"));
        assert!(lines[2].contains(&"#".repeat(HISTOGRAM_WIDTH / 2)));
        assert!(lines[2].ends_with(" 1"));
    }

    #[test]
    fn render_empty_ledger_reports_no_trades() {
        let result = BacktestResult::default();
        let text = ConsoleReport::new().render(&result, &sample_config());
        assert!(text.contains(NO_TRADES_MESSAGE));
        assert!(!text.contains("Found"));
    }

    #[test]
    fn render_includes_skips_and_summary() {
        let ledger: Ledger = vec![sample_trade("SPY", 60.0, 90.0)].into_iter().collect();
        let result = BacktestResult {
            ledger,
            runs: vec![],
            skipped: vec![SkippedCode {
                code: "QQQ".into(),
                reason: SkipReason::InsufficientData {
                    rows: 0,
                    minimum: 252,
                },
            }],
        };
        let text = ConsoleReport::new().render(&result, &sample_config());
        assert!(text.contains("Skipping QQQ: no data found, minimum 252 rows required."));
        assert!(text.contains("Found 1 qualifying trades."));
        assert!(text.contains("Average ROI per Trade (%): 50.00%"));
        assert!(text.contains("$25,000.00"));
        assert!(text.contains("ROI % Distribution"));
    }

    #[test]
    fn write_sends_render_to_writer() {
        let report = ConsoleReport::new();
        let config = sample_config();
        let result = BacktestResult::default();
        let mut buf: Vec<u8> = Vec::new();
        report.write(&result, &config, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), report.render(&result, &config));
    }
}
