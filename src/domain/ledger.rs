//! Ordered trade ledger across all instruments.

use crate::domain::trade::Trade;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    trades: Vec<Trade>,
}

impl Ledger {
    pub fn extend(&mut self, trades: impl IntoIterator<Item = Trade>) {
        self.trades.extend(trades);
    }

    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    pub fn len(&self) -> usize {
        self.trades.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trades.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trade> {
        self.trades.iter()
    }

    /// Trades grouped by instrument, keyed in symbol order.
    pub fn by_instrument(&self) -> BTreeMap<&str, Vec<&Trade>> {
        let mut groups: BTreeMap<&str, Vec<&Trade>> = BTreeMap::new();
        for trade in &self.trades {
            groups.entry(trade.instrument.as_str()).or_default().push(trade);
        }
        groups
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Trade;
    type IntoIter = std::slice::Iter<'a, Trade>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Trade> for Ledger {
    fn from_iter<I: IntoIterator<Item = Trade>>(iter: I) -> Self {
        Self {
            trades: iter.into_iter().collect(),
        }
    }
}
