use chrono::Utc;
use tracing::{debug, info, warn};

use crate::errors::CoreError;
use crate::models::holding::Holding;
use crate::models::portfolio::Portfolio;
use crate::models::quote::TokenQuote;
use crate::models::report::{AddOutcome, RefreshReport};
use crate::providers::traits::MarketSource;

/// Reconciles the stored portfolio with live market data.
///
/// Every network step goes through a [`MarketSource`], one request at a
/// time. Per-holding failures never abort a batch: the holding keeps its
/// stale values and the failure is logged and reported.
pub struct ReconciliationService;

impl ReconciliationService {
    pub fn new() -> Self {
        Self
    }

    /// Refresh name, ticker, price and daily change of every holding.
    ///
    /// Holdings saved without a canonical id are resolved against the
    /// market listing first; the listing is fetched at most once.
    pub async fn refresh(&self, portfolio: &mut Portfolio, source: &dyn MarketSource) -> RefreshReport {
        let mut updated = Vec::new();
        let mut failed = Vec::new();

        let listing = if portfolio.holdings.iter().any(|h| h.canonical_id.is_empty()) {
            match source.list_all().await {
                Ok(quotes) => Some(quotes),
                Err(e) => {
                    warn!(source = source.name(), error = %e, "listing unavailable, unresolved holdings will be skipped");
                    None
                }
            }
        } else {
            None
        };

        for holding in portfolio.holdings.iter_mut() {
            let label = holding.name.clone();

            if holding.canonical_id.is_empty() {
                match listing.as_deref().and_then(|quotes| best_match(quotes, &label, &holding.ticker)) {
                    Some(quote) => {
                        debug!(holding = %label, id = %quote.canonical_id, "resolved canonical id");
                        holding.canonical_id = quote.canonical_id.clone();
                    }
                    None => {
                        warn!(holding = %label, "no canonical id, skipping");
                        failed.push((label, "no canonical id could be resolved".to_string()));
                        continue;
                    }
                }
            }

            match source.lookup(&holding.canonical_id).await {
                Ok(quote) => {
                    holding.apply_quote(&quote);
                    updated.push(holding.name.clone());
                }
                Err(e) if e.is_soft() => {
                    info!(holding = %label, id = %holding.canonical_id, error = %e, "no quote on the page, keeping stale values");
                    failed.push((label, e.to_string()));
                }
                Err(e) => {
                    warn!(holding = %label, id = %holding.canonical_id, error = %e, "lookup failed, keeping stale values");
                    failed.push((label, e.to_string()));
                }
            }
        }

        let daily_change_percent = portfolio.daily_change_percent();
        info!(
            updated = updated.len(),
            failed = failed.len(),
            total_value = portfolio.total_value(),
            daily_change_percent,
            "portfolio refreshed"
        );

        RefreshReport {
            updated,
            failed,
            refreshed_at: Utc::now(),
            daily_change_percent,
        }
    }

    /// Resolve `query` (name or ticker, case-insensitive) to a fresh detail
    /// quote: listing first for the canonical id, then the detail page.
    pub async fn find_quote(&self, source: &dyn MarketSource, query: &str) -> Result<TokenQuote, CoreError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CoreError::Validation("Token query must not be empty".into()));
        }

        let listing = source.list_all().await?;
        let listed = best_match(&listing, query, query)
            .ok_or_else(|| CoreError::NoMatch(query.to_string()))?;

        source.lookup(&listed.canonical_id).await
    }

    /// Best-effort: find `query` on the market and add `quantity` of it.
    ///
    /// Merges into an existing holding with the same name (or canonical id)
    /// instead of creating a duplicate. Never returns an error; failures
    /// are logged and described by the outcome.
    pub async fn add_token(
        &self,
        portfolio: &mut Portfolio,
        source: &dyn MarketSource,
        query: &str,
        quantity: f64,
    ) -> AddOutcome {
        if !quantity.is_finite() || quantity < 0.0 {
            warn!(query, quantity, "refusing to add a negative or non-finite quantity");
            return AddOutcome::Failed(format!("Quantity must be zero or positive, got {quantity}"));
        }

        let quote = match self.find_quote(source, query).await {
            Ok(quote) => quote,
            Err(CoreError::NoMatch(q)) => {
                info!(query = %q, "no listing match");
                return AddOutcome::NoMatch(q);
            }
            Err(e) if e.is_soft() => {
                info!(query, error = %e, "token has no usable quote");
                return AddOutcome::Failed(e.to_string());
            }
            Err(e) => {
                warn!(query, error = %e, "add token failed");
                return AddOutcome::Failed(e.to_string());
            }
        };

        let existing = portfolio.holdings.iter_mut().find(|h| {
            h.name.eq_ignore_ascii_case(&quote.name)
                || (!h.canonical_id.is_empty() && h.canonical_id == quote.canonical_id)
        });

        match existing {
            Some(holding) => {
                holding.quantity += quantity;
                holding.apply_quote(&quote);
                info!(holding = %holding.name, quantity = holding.quantity, "merged into existing holding");
                AddOutcome::Merged(holding.name.clone())
            }
            None => {
                let name = quote.name.clone();
                portfolio.holdings.push(Holding::from_quote(quote, quantity));
                info!(holding = %name, quantity, "added holding");
                AddOutcome::Added(name)
            }
        }
    }
}

impl Default for ReconciliationService {
    fn default() -> Self {
        Self::new()
    }
}

/// Exact (case-insensitive) name match wins over a ticker match.
fn best_match<'a>(quotes: &'a [TokenQuote], name: &str, ticker: &str) -> Option<&'a TokenQuote> {
    let name = name.trim();
    let ticker = ticker.trim();
    quotes
        .iter()
        .find(|q| q.name.eq_ignore_ascii_case(name))
        .or_else(|| {
            if ticker.is_empty() {
                return None;
            }
            quotes.iter().find(|q| q.matches(ticker))
        })
}
