use serde::{Deserialize, Serialize};

use super::holding::Holding;

/// The main data container. Everything in here gets serialized and saved
/// to the portfolio file.
///
/// Only the holdings are persisted; `total_value` and
/// `daily_change_percent` are derived on demand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Portfolio {
    /// Holdings in display order
    #[serde(default)]
    pub holdings: Vec<Holding>,
}

impl Portfolio {
    pub fn new(holdings: Vec<Holding>) -> Self {
        Self { holdings }
    }

    /// Sum of every holding's value.
    #[must_use]
    pub fn total_value(&self) -> f64 {
        self.holdings.iter().map(Holding::total_value).sum()
    }

    /// Value-weighted 24h change of the whole portfolio, in percent.
    /// Returns 0 for an empty or worthless portfolio.
    #[must_use]
    pub fn daily_change_percent(&self) -> f64 {
        let total = self.total_value();
        if total == 0.0 || !total.is_finite() {
            return 0.0;
        }
        self.holdings
            .iter()
            .map(|h| h.daily_change_percent * h.total_value() / total)
            .sum()
    }

    /// Find a holding by case-insensitive name, falling back to ticker.
    #[must_use]
    pub fn find(&self, token: &str) -> Option<&Holding> {
        self.position(token).map(|idx| &self.holdings[idx])
    }

    /// Mutable variant of [`Portfolio::find`].
    pub fn find_mut(&mut self, token: &str) -> Option<&mut Holding> {
        self.position(token).map(move |idx| &mut self.holdings[idx])
    }

    /// Index of the holding matching `token`. Name wins over ticker, so a
    /// token named like another token's ticker still resolves to itself.
    #[must_use]
    pub fn position(&self, token: &str) -> Option<usize> {
        let token = token.trim();
        self.holdings
            .iter()
            .position(|h| h.name.eq_ignore_ascii_case(token))
            .or_else(|| self.holdings.iter().position(|h| h.matches(token)))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.holdings.len()
    }
}
