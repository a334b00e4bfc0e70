//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info};

use crate::adapters::console_report::ConsoleReport;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig};
use crate::domain::config_validation::{
    parse_date, read_number, validate_backtest_config, validate_strategy_config,
};
use crate::domain::error::DipError;
use crate::domain::indicator::{IndicatorParams, DEFAULT_HIGH_WINDOW, DEFAULT_MOMENTUM_WINDOW};
use crate::domain::metrics::DEFAULT_HISTOGRAM_BINS;
use crate::domain::signal::{SignalParams, DEFAULT_DROP_THRESHOLD_PCT, DEFAULT_MOMENTUM_THRESHOLD};
use crate::domain::trade::{DEFAULT_HOLDING_MONTHS, DEFAULT_INITIAL_CAPITAL};
use crate::domain::universe::{default_codes, is_in_universe, parse_codes, ETF_UNIVERSE};
use crate::logging::{init_logging, level_for};
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "dipscan", about = "Buy-the-dip ETF screener and backtester")]
pub struct Cli {
    /// Debug-level diagnostics
    #[arg(short, long, global = true)]
    pub verbose: bool,
    /// Only warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan for dip signals and backtest them
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[command(flatten)]
        overrides: Overrides,
        /// Validate configuration and print it without loading data
        #[arg(long)]
        dry_run: bool,
    },
    /// List symbols available in a CSV data directory
    ListSymbols {
        #[arg(long)]
        data_dir: PathBuf,
    },
    /// Show data range for symbol(s)
    Info {
        #[arg(long)]
        data_dir: PathBuf,
        #[arg(long)]
        code: Option<String>,
    },
    /// Print the ETF screening universe
    Universe,
}

/// Command-line values that take precedence over the config file.
#[derive(Args, Debug, Default, Clone)]
pub struct Overrides {
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
    /// Comma-separated tickers
    #[arg(long)]
    pub codes: Option<String>,
    /// Drop from trailing high, in percent (10-70)
    #[arg(long)]
    pub drop_pct: Option<f64>,
    /// RSI buy threshold (10-50)
    #[arg(long)]
    pub momentum: Option<f64>,
    /// Holding period in months (6-24)
    #[arg(long)]
    pub holding_months: Option<u32>,
    /// Capital committed to each trade
    #[arg(long)]
    pub capital: Option<f64>,
    #[arg(long)]
    pub start_date: Option<String>,
    #[arg(long)]
    pub end_date: Option<String>,
}

pub fn run(cli: Cli) -> ExitCode {
    init_logging(level_for(cli.verbose, cli.quiet));

    match cli.command {
        Command::Backtest {
            config,
            overrides,
            dry_run,
        } => {
            if dry_run {
                run_dry_run(&config, &overrides)
            } else {
                run_backtest(&config, &overrides)
            }
        }
        Command::ListSymbols { data_dir } => run_list_symbols(&data_dir),
        Command::Info { data_dir, code } => run_info(&data_dir, code.as_deref()),
        Command::Universe => run_universe(),
    }
}

fn report_error(err: &DipError) -> ExitCode {
    error!("{err}");
    ExitCode::from(err)
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, DipError> {
    FileConfigAdapter::from_file(path).map_err(|e| DipError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

pub fn apply_overrides(adapter: &mut FileConfigAdapter, overrides: &Overrides) {
    if let Some(dir) = &overrides.data_dir {
        adapter.set("data", "directory", dir.display().to_string());
    }
    if let Some(codes) = &overrides.codes {
        adapter.set("backtest", "codes", codes.clone());
    }
    if let Some(v) = overrides.drop_pct {
        adapter.set("strategy", "drop_threshold_pct", v.to_string());
    }
    if let Some(v) = overrides.momentum {
        adapter.set("strategy", "momentum_threshold", v.to_string());
    }
    if let Some(v) = overrides.holding_months {
        adapter.set("strategy", "holding_months", v.to_string());
    }
    if let Some(v) = overrides.capital {
        adapter.set("backtest", "initial_capital", v.to_string());
    }
    if let Some(v) = &overrides.start_date {
        adapter.set("backtest", "start_date", v.clone());
    }
    if let Some(v) = &overrides.end_date {
        adapter.set("backtest", "end_date", v.clone());
    }
}

/// Loads, overrides and validates the configuration in one step.
pub fn prepare_config(
    path: &Path,
    overrides: &Overrides,
    today: NaiveDate,
) -> Result<(FileConfigAdapter, BacktestConfig), DipError> {
    info!("Loading config from {}", path.display());
    let mut adapter = load_config(path)?;
    apply_overrides(&mut adapter, overrides);
    validate_backtest_config(&adapter, today)?;
    validate_strategy_config(&adapter)?;
    let config = build_backtest_config(&adapter, today)?;
    Ok((adapter, config))
}

pub fn build_backtest_config(
    adapter: &dyn ConfigPort,
    today: NaiveDate,
) -> Result<BacktestConfig, DipError> {
    let start_str = adapter
        .get_string("backtest", "start_date")
        .ok_or_else(|| DipError::ConfigMissing {
            section: "backtest".into(),
            key: "start_date".into(),
        })?;
    let start_date = parse_date(&start_str, "start_date")?;
    let end_date = match adapter.get_string("backtest", "end_date") {
        Some(s) => parse_date(&s, "end_date")?,
        None => today,
    };

    let drop_pct = read_number(adapter, "strategy", "drop_threshold_pct", DEFAULT_DROP_THRESHOLD_PCT)?;
    let momentum_threshold =
        read_number(adapter, "strategy", "momentum_threshold", DEFAULT_MOMENTUM_THRESHOLD)?;

    Ok(BacktestConfig {
        codes: resolve_codes(adapter)?,
        start_date,
        end_date,
        initial_capital: read_number(adapter, "backtest", "initial_capital", DEFAULT_INITIAL_CAPITAL)?,
        holding_months: read_number(adapter, "strategy", "holding_months", DEFAULT_HOLDING_MONTHS)?,
        signal: SignalParams {
            drop_threshold: drop_pct / 100.0,
            momentum_threshold,
        },
        indicators: IndicatorParams {
            high_window: read_number(adapter, "strategy", "high_window", DEFAULT_HIGH_WINDOW)?,
            momentum_window: read_number(adapter, "strategy", "momentum_window", DEFAULT_MOMENTUM_WINDOW)?,
        },
        histogram_bins: read_number(adapter, "report", "histogram_bins", DEFAULT_HISTOGRAM_BINS)?,
    })
}

pub fn resolve_codes(config: &dyn ConfigPort) -> Result<Vec<String>, DipError> {
    match config.get_string("backtest", "codes") {
        Some(codes) => Ok(parse_codes(&codes)?),
        None => Ok(default_codes()),
    }
}

pub fn resolve_data_dir(config: &dyn ConfigPort) -> Result<PathBuf, DipError> {
    config
        .get_string("data", "directory")
        .map(PathBuf::from)
        .ok_or_else(|| DipError::ConfigMissing {
            section: "data".into(),
            key: "directory".into(),
        })
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn run_backtest(config_path: &Path, overrides: &Overrides) -> ExitCode {
    let (adapter, config) = match prepare_config(config_path, overrides, today()) {
        Ok(c) => c,
        Err(e) => return report_error(&e),
    };
    let data_dir = match resolve_data_dir(&adapter) {
        Ok(d) => d,
        Err(e) => return report_error(&e),
    };

    let data_port = CsvAdapter::new(data_dir);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_backtest_pipeline(&data_port, &config, &ConsoleReport::new(), &mut out)
}

/// Runs every configured instrument and hands the result to `report`.
///
/// An empty ledger is a successful run. Failing to process any instrument at
/// all is not.
pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    config: &BacktestConfig,
    report: &dyn ReportPort,
    out: &mut dyn Write,
) -> ExitCode {
    for code in config.codes.iter().filter(|c| !is_in_universe(c)) {
        info!("{} is outside the ETF screening universe", code);
    }

    info!(
        "Running backtest: {} codes, {} to {}",
        config.codes.len(),
        config.start_date,
        config.end_date
    );
    let result = backtest_engine::run_backtest(data_port, config);

    if let Err(e) = report.write(&result, config, out) {
        return report_error(&e);
    }

    if result.runs.is_empty() {
        return report_error(&DipError::NoData {
            symbol: config.codes.join(", "),
        });
    }
    ExitCode::SUCCESS
}

pub fn run_dry_run(config_path: &Path, overrides: &Overrides) -> ExitCode {
    let (adapter, config) = match prepare_config(config_path, overrides, today()) {
        Ok(c) => c,
        Err(e) => return report_error(&e),
    };
    eprintln!("Config validated successfully");
    eprintln!("{}", describe_config(&config, resolve_data_dir(&adapter).ok().as_deref()));
    eprintln!("Dry run complete: configuration is valid");
    ExitCode::SUCCESS
}

pub fn describe_config(config: &BacktestConfig, data_dir: Option<&Path>) -> String {
    format!(
        "\nUniverse:\n  codes: {}\n  range: {} to {}\n  data:  {}\n\n\
         Strategy:\n  drop from high:  {:.1}% over {} days\n  RSI threshold:   < {} over {} days\n  \
         holding period:  {} months\n  capital:         {:.2} per trade\n  histogram bins:  {}\n",
        config.codes.join(", "),
        config.start_date,
        config.end_date,
        data_dir
            .map(|d| d.display().to_string())
            .unwrap_or_else(|| "(not configured)".to_string()),
        config.signal.drop_threshold * 100.0,
        config.indicators.high_window,
        config.signal.momentum_threshold,
        config.indicators.momentum_window,
        config.holding_months,
        config.initial_capital,
        config.histogram_bins,
    )
}

fn run_list_symbols(data_dir: &Path) -> ExitCode {
    let adapter = CsvAdapter::new(data_dir.to_path_buf());
    let symbols = match adapter.list_symbols() {
        Ok(s) => s,
        Err(e) => return report_error(&e),
    };

    if symbols.is_empty() {
        eprintln!("No symbols found in {}", data_dir.display());
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}

fn run_info(data_dir: &Path, code: Option<&str>) -> ExitCode {
    let adapter = CsvAdapter::new(data_dir.to_path_buf());
    let codes = match code {
        Some(c) => vec![c.to_uppercase()],
        None => match adapter.list_symbols() {
            Ok(s) => s,
            Err(e) => return report_error(&e),
        },
    };

    for c in &codes {
        match adapter.get_data_range(c) {
            Ok(Some((min_date, max_date, count))) => {
                println!("{}: {} rows, {} to {}", c, count, min_date, max_date);
            }
            Ok(None) => eprintln!("{}: no data found", c),
            Err(e) => eprintln!("error querying {}: {}", c, e),
        }
    }
    ExitCode::SUCCESS
}

fn run_universe() -> ExitCode {
    for code in ETF_UNIVERSE {
        println!("{}", code);
    }
    ExitCode::SUCCESS
}
