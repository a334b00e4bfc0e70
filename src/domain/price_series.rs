//! Daily closing-price series for one instrument.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// One row as delivered by a loader. `close` is `None` when the source field
/// was not numeric.
#[derive(Debug, Clone, PartialEq)]
pub struct RawQuote {
    pub date: NaiveDate,
    pub close: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Strictly date-ordered closes with unique dates. Immutable once built.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
    date_index: HashMap<NaiveDate, usize>,
}

/// Result of cleaning raw loader rows into a [`PriceSeries`].
#[derive(Debug, Clone)]
pub struct CleanedSeries {
    pub series: PriceSeries,
    /// Rows excluded for a missing, non-finite or non-positive close, or a
    /// repeated date.
    pub invalid_rows: usize,
}

impl PriceSeries {
    /// Builds a series from points already known to be valid. Points are
    /// sorted by date; on a repeated date the first occurrence wins.
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Self {
        let mut by_date = BTreeMap::new();
        for p in points {
            by_date.entry(p.date).or_insert(p);
        }
        let points: Vec<PricePoint> = by_date.into_values().collect();
        let date_index = points
            .iter()
            .enumerate()
            .map(|(i, p)| (p.date, i))
            .collect();
        Self {
            symbol: symbol.into(),
            points,
            date_index,
        }
    }

    /// Excludes unusable rows rather than rejecting the whole instrument.
    pub fn from_raw(symbol: impl Into<String>, raw: Vec<RawQuote>) -> CleanedSeries {
        let total = raw.len();
        let points: Vec<PricePoint> = raw
            .into_iter()
            .filter_map(|q| match q.close {
                Some(close) if close.is_finite() && close > 0.0 => Some(PricePoint {
                    date: q.date,
                    close,
                }),
                _ => None,
            })
            .collect();
        let series = Self::new(symbol, points);
        CleanedSeries {
            invalid_rows: total - series.len(),
            series,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Exact-date lookup; there is no nearest-date fallback.
    pub fn close_on(&self, date: NaiveDate) -> Option<f64> {
        self.date_index.get(&date).map(|&i| self.points[i].close)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }
}
