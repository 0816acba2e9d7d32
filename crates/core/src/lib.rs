pub mod commands;
pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::{DateTime, Utc};
use models::{
    holding::Holding,
    portfolio::Portfolio,
    quote::TokenQuote,
    report::{AddOutcome, RefreshReport},
    settings::TrackerConfig,
};
use providers::{coinmarketcap::CoinMarketCapSource, traits::MarketSource};
use services::{holding_service::HoldingService, reconciliation_service::ReconciliationService};
use storage::manager::StorageManager;

use errors::CoreError;

/// Main entry point for the Crypto Tracker core library.
/// Holds the one in-memory portfolio of a session and the market source
/// used to refresh it.
#[must_use]
pub struct CryptoTracker {
    portfolio: Portfolio,
    source: Box<dyn MarketSource>,
    config: TrackerConfig,
    holding_service: HoldingService,
    reconciliation_service: ReconciliationService,
    last_refreshed: Option<DateTime<Utc>>,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for CryptoTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CryptoTracker")
            .field("holdings", &self.portfolio.len())
            .field("source", &self.source.name())
            .field("portfolio_path", &self.config.portfolio_path)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl CryptoTracker {
    /// Load the portfolio file named by `config` and scrape CoinMarketCap.
    /// A missing or unparsable file is [`CoreError::CorruptState`].
    pub fn load(config: TrackerConfig) -> Result<Self, CoreError> {
        let source = CoinMarketCapSource::from_config(&config)?;
        Self::load_with_source(config, Box::new(source))
    }

    /// Like [`CryptoTracker::load`] with a caller-provided market source.
    pub fn load_with_source(
        config: TrackerConfig,
        source: Box<dyn MarketSource>,
    ) -> Result<Self, CoreError> {
        let portfolio = StorageManager::load_from_file(&config.portfolio_path)?;
        Ok(Self::build(portfolio, source, config))
    }

    /// Wrap an in-memory portfolio.
    pub fn with_source(
        portfolio: Portfolio,
        source: Box<dyn MarketSource>,
        config: TrackerConfig,
    ) -> Self {
        Self::build(portfolio, source, config)
    }

    /// Write the portfolio to the configured path.
    /// Clears the unsaved-changes flag on success.
    pub fn save(&mut self) -> Result<(), CoreError> {
        StorageManager::save_to_file(&self.portfolio, &self.config.portfolio_path)?;
        self.dirty = false;
        Ok(())
    }

    // ── Holding Management ──────────────────────────────────────────

    /// Add quantity to an existing holding (name or ticker). Returns the new quantity.
    pub fn buy(&mut self, token: &str, quantity: f64) -> Result<f64, CoreError> {
        let new_quantity = self.holding_service.buy(&mut self.portfolio, token, quantity)?;
        self.dirty = true;
        Ok(new_quantity)
    }

    /// Subtract quantity from an existing holding. `force` (or the
    /// `allow_negative_holdings` setting) permits going below zero.
    pub fn sell(&mut self, token: &str, quantity: f64, force: bool) -> Result<f64, CoreError> {
        let allow_negative = force || self.config.allow_negative_holdings;
        let new_quantity =
            self.holding_service
                .sell(&mut self.portfolio, token, quantity, allow_negative)?;
        self.dirty = true;
        Ok(new_quantity)
    }

    /// Remove a holding by exact name. Returns the removed holding.
    pub fn remove_token(&mut self, name: &str) -> Result<Holding, CoreError> {
        let removed = self.holding_service.remove_token(&mut self.portfolio, name)?;
        self.dirty = true;
        Ok(removed)
    }

    // ── Market Data ─────────────────────────────────────────────────

    /// Refresh every holding from the market source. Never fails as a
    /// whole; see [`RefreshReport::failed`].
    ///
    /// Prices are volatile and re-scraped every session, so a refresh on
    /// its own does not count as an unsaved change.
    pub async fn refresh(&mut self) -> RefreshReport {
        let report = self
            .reconciliation_service
            .refresh(&mut self.portfolio, self.source.as_ref())
            .await;
        self.last_refreshed = Some(report.refreshed_at);
        report
    }

    /// Look `query` up on the market and add `quantity` of it (best effort).
    pub async fn add_token(&mut self, query: &str, quantity: f64) -> AddOutcome {
        let outcome = self
            .reconciliation_service
            .add_token(&mut self.portfolio, self.source.as_ref(), query, quantity)
            .await;
        if outcome.is_success() {
            self.dirty = true;
        }
        outcome
    }

    /// Current market quote for a name or ticker. Does not touch the portfolio.
    pub async fn get_quote(&self, query: &str) -> Result<TokenQuote, CoreError> {
        self.reconciliation_service
            .find_quote(self.source.as_ref(), query)
            .await
    }

    // ── Accessors ───────────────────────────────────────────────────

    #[must_use]
    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    #[must_use]
    pub fn holdings(&self) -> &[Holding] {
        &self.portfolio.holdings
    }

    #[must_use]
    pub fn total_value(&self) -> f64 {
        self.portfolio.total_value()
    }

    #[must_use]
    pub fn daily_change_percent(&self) -> f64 {
        self.portfolio.daily_change_percent()
    }

    #[must_use]
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    #[must_use]
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// When the last `refresh` finished, if any in this session.
    #[must_use]
    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.last_refreshed
    }

    /// Returns `true` if the portfolio has been modified since the last save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build(portfolio: Portfolio, source: Box<dyn MarketSource>, config: TrackerConfig) -> Self {
        Self {
            portfolio,
            source,
            config,
            holding_service: HoldingService::new(),
            reconciliation_service: ReconciliationService::new(),
            last_refreshed: None,
            dirty: false,
        }
    }
}
