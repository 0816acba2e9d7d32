use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::quote::TokenQuote;

/// Trait abstraction over the scraped market listing.
///
/// The rest of the crate never sees raw markup: when the site changes its
/// structure only the implementation (and its marker tables) is touched.
#[async_trait]
pub trait MarketSource: Send + Sync {
    /// Human-readable name of this source (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch the "all assets" listing, one quote per well-formed row.
    /// Malformed rows are dropped, never reported as errors.
    async fn list_all(&self) -> Result<Vec<TokenQuote>, CoreError>;

    /// Fetch a single asset's detail page by canonical id.
    ///
    /// Fails with [`CoreError::QuoteNotFound`] when the page lacks a
    /// required marker and [`CoreError::Network`] when it could not be
    /// fetched at all.
    async fn lookup(&self, canonical_id: &str) -> Result<TokenQuote, CoreError>;
}
