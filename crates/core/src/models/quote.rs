/// A single scraped market record. Ephemeral: used to refresh a
/// [`Holding`](super::holding::Holding) or to create a new one, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenQuote {
    pub name: String,
    pub ticker: String,
    pub canonical_id: String,
    /// Price in USD
    pub price: f64,
    /// Signed 24h change in percent
    pub daily_change_percent: f64,
}

impl TokenQuote {
    /// Case-insensitive equality on name or ticker.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim();
        self.name.eq_ignore_ascii_case(query) || self.ticker.eq_ignore_ascii_case(query)
    }
}

impl std::fmt::Display for TokenQuote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}) [{}] @ ${:.2} ({:+.2}%)",
            self.name, self.ticker, self.canonical_id, self.price, self.daily_change_percent
        )
    }
}
