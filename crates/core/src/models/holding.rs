use serde::{Deserialize, Deserializer, Serialize};

use super::quote::TokenQuote;

/// One line-item of the portfolio: a token, how much of it is held and
/// the latest scraped price data.
///
/// Field names follow the on-disk JSON (`Name`, `Ticker`, ...). Files
/// written by older versions carry `ValuePerToken` instead of
/// `PricePerUnit`, no `CanonicalId` and sometimes `null` for an unset
/// `Ticker`; all of these are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Holding {
    /// Display name as shown on the listing site (e.g., "Bitcoin")
    pub name: String,

    /// Ticker symbol (e.g., "BTC")
    #[serde(default, deserialize_with = "null_as_empty")]
    pub ticker: String,

    /// Path segment addressing the token's detail page (e.g., "bitcoin").
    /// Empty until resolved against the market listing.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub canonical_id: String,

    pub quantity: f64,

    /// Last known price in USD.
    #[serde(default, alias = "ValuePerToken")]
    pub price_per_unit: f64,

    /// Last known 24h change, in percent.
    #[serde(default, rename = "DailyChange")]
    pub daily_change_percent: f64,
}

impl Holding {
    pub fn new(
        name: impl Into<String>,
        ticker: impl Into<String>,
        canonical_id: impl Into<String>,
        quantity: f64,
    ) -> Self {
        Self {
            name: name.into(),
            ticker: ticker.into(),
            canonical_id: canonical_id.into(),
            quantity,
            price_per_unit: 0.0,
            daily_change_percent: 0.0,
        }
    }

    /// Build a holding from a freshly scraped quote.
    pub fn from_quote(quote: TokenQuote, quantity: f64) -> Self {
        Self {
            name: quote.name,
            ticker: quote.ticker,
            canonical_id: quote.canonical_id,
            quantity,
            price_per_unit: quote.price,
            daily_change_percent: quote.daily_change_percent,
        }
    }

    /// `quantity * price_per_unit`. Never stored.
    #[must_use]
    pub fn total_value(&self) -> f64 {
        self.quantity * self.price_per_unit
    }

    /// Case-insensitive match on name or ticker.
    #[must_use]
    pub fn matches(&self, token: &str) -> bool {
        self.name.eq_ignore_ascii_case(token)
            || (!self.ticker.is_empty() && self.ticker.eq_ignore_ascii_case(token))
    }

    /// Overwrite the volatile fields with a fresh quote. Quantity is kept.
    pub fn apply_quote(&mut self, quote: &TokenQuote) {
        self.name = quote.name.clone();
        self.ticker = quote.ticker.clone();
        if !quote.canonical_id.is_empty() {
            self.canonical_id = quote.canonical_id.clone();
        }
        self.price_per_unit = quote.price;
        self.daily_change_percent = quote.daily_change_percent;
    }
}

/// Quantity as shown to the user: at most eight decimals, trailing zeros
/// dropped, so float noise like `0.19999999999999998` prints as `0.2`.
#[must_use]
pub fn format_quantity(quantity: f64) -> String {
    let text = format!("{quantity:.8}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl std::fmt::Display for Holding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} ({}) @ ${:.2} = ${:.2} ({:+.2}%)",
            format_quantity(self.quantity),
            self.name,
            self.ticker,
            self.price_per_unit,
            self.total_value(),
            self.daily_change_percent
        )
    }
}
