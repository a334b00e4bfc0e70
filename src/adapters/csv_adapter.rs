//! CSV file price loader.
//!
//! One file per symbol, `<base_path>/<SYMBOL>.csv`, with a header row that
//! names `date` and `close` columns (any order, any case). Extra columns are
//! ignored.

use crate::domain::error::DipError;
use crate::domain::price_series::RawQuote;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }

    fn read_quotes(&self, symbol: &str) -> Result<Vec<RawQuote>, DipError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| DipError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers = rdr.headers().map_err(|e| DipError::Data {
            reason: format!("CSV header error in {}: {}", path.display(), e),
        })?;
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| DipError::Data {
                    reason: format!("missing {} column in {}", name, path.display()),
                })
        };
        let date_col = column("date")?;
        let close_col = column("close")?;

        let mut quotes = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| DipError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let date_str = record.get(date_col).unwrap_or_default();
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                DipError::Data {
                    reason: format!("invalid date {:?}: {}", date_str, e),
                }
            })?;

            // Non-numeric closes are kept as gaps for the domain to exclude.
            let close = record.get(close_col).and_then(|v| v.parse::<f64>().ok());

            quotes.push(RawQuote { date, close });
        }

        quotes.sort_by_key(|q| q.date);
        Ok(quotes)
    }
}

impl DataPort for CsvAdapter {
    fn fetch_closes(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<RawQuote>, DipError> {
        let mut quotes = self.read_quotes(symbol)?;
        quotes.retain(|q| q.date >= start_date && q.date <= end_date);
        Ok(quotes)
    }

    fn list_symbols(&self) -> Result<Vec<String>, DipError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| DipError::Data {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| DipError::Data {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(".csv") {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(&self, symbol: &str) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DipError> {
        let quotes = self.read_quotes(symbol)?;
        Ok(match (quotes.first(), quotes.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date, quotes.len())),
            _ => None,
        })
    }
}
