use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use super::extract::{self, DetailMarkers, ListingMarkers};
use super::fetcher::HtmlFetcher;
use super::traits::MarketSource;
use crate::errors::CoreError;
use crate::models::quote::TokenQuote;
use crate::models::settings::TrackerConfig;

const LISTING_PATH: &str = "all/views/all/";
const DETAIL_PATH: &str = "currencies";

/// CoinMarketCap scraped through its public HTML pages.
///
/// - **Free**: no API key; a browser-like `User-Agent` is required.
/// - **Listing**: `/all/views/all/`, one table row per asset.
/// - **Detail**: `/currencies/{id}/`, where `id` is the canonical id
///   ("bitcoin", "ethereum", ...).
pub struct CoinMarketCapSource {
    fetcher: HtmlFetcher,
    base: Url,
    listing_markers: ListingMarkers,
    detail_markers: DetailMarkers,
}

impl CoinMarketCapSource {
    pub fn new(fetcher: HtmlFetcher, base_url: &str) -> Result<Self, CoreError> {
        // Url::join replaces the last segment unless the base ends with '/'.
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base = Url::parse(&normalized)
            .map_err(|e| CoreError::Validation(format!("Invalid base URL '{base_url}': {e}")))?;
        Ok(Self {
            fetcher,
            base,
            listing_markers: ListingMarkers::default(),
            detail_markers: DetailMarkers::default(),
        })
    }

    /// Build the fetcher and the source from runtime config.
    pub fn from_config(config: &TrackerConfig) -> Result<Self, CoreError> {
        Self::new(HtmlFetcher::new(config)?, &config.base_url)
    }

    /// Replace the marker tables (e.g. after the site changed its markup).
    pub fn with_markers(mut self, listing: ListingMarkers, detail: DetailMarkers) -> Self {
        self.listing_markers = listing;
        self.detail_markers = detail;
        self
    }

    pub fn listing_url(&self) -> Result<Url, CoreError> {
        self.base
            .join(LISTING_PATH)
            .map_err(|e| CoreError::Validation(format!("Invalid listing URL: {e}")))
    }

    pub fn detail_url(&self, canonical_id: &str) -> Result<Url, CoreError> {
        let id = canonical_id.trim();
        if id.is_empty() || id.contains('/') {
            return Err(CoreError::Validation(format!(
                "Invalid canonical id '{canonical_id}'"
            )));
        }
        self.base
            .join(&format!("{DETAIL_PATH}/{id}/"))
            .map_err(|e| CoreError::Validation(format!("Invalid detail URL for '{id}': {e}")))
    }
}

#[async_trait]
impl MarketSource for CoinMarketCapSource {
    fn name(&self) -> &str {
        "CoinMarketCap"
    }

    async fn list_all(&self) -> Result<Vec<TokenQuote>, CoreError> {
        let url = self.listing_url()?;
        let html = self.fetcher.fetch(url.as_str()).await?;
        let quotes = extract::parse_listing(&html, &self.listing_markers, &self.base)?;
        debug!(source = self.name(), count = quotes.len(), "listing scraped");
        Ok(quotes)
    }

    async fn lookup(&self, canonical_id: &str) -> Result<TokenQuote, CoreError> {
        let url = self.detail_url(canonical_id)?;
        let html = self.fetcher.fetch(url.as_str()).await?;
        let quote = extract::parse_detail(&html, canonical_id.trim(), &self.detail_markers)?;
        debug!(source = self.name(), id = %quote.canonical_id, price = quote.price, "detail scraped");
        Ok(quote)
    }
}
