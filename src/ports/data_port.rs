//! Price series loader port trait.

use crate::domain::error::DipError;
use crate::domain::price_series::RawQuote;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily closes for `symbol` within `[start_date, end_date]`, date-ordered.
    fn fetch_closes(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<RawQuote>, DipError>;

    fn list_symbols(&self) -> Result<Vec<String>, DipError>;

    /// `(first_date, last_date, rows)` over everything the source holds.
    fn get_data_range(&self, symbol: &str) -> Result<Option<(NaiveDate, NaiveDate, usize)>, DipError>;
}
