/// Default portfolio file, relative to the working directory.
pub const DEFAULT_PORTFOLIO_FILE: &str = "portfolio.txt";

/// Root of the scraped listing site.
pub const DEFAULT_BASE_URL: &str = "https://coinmarketcap.com";

/// The listing site rejects default client identifiers.
pub const DEFAULT_USER_AGENT: &str = "PostmanRuntime/7.28.4";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime configuration of the tracker. Not persisted; the CLI builds it
/// from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Base URL of the listing site, without trailing slash
    pub base_url: String,

    /// `User-Agent` header sent with every fetch
    pub user_agent: String,

    /// Transport timeout for a single fetch
    pub timeout_secs: u64,

    /// Path of the portfolio file
    pub portfolio_path: String,

    /// Let `sell` drive a quantity below zero without `--force`
    pub allow_negative_holdings: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            portfolio_path: DEFAULT_PORTFOLIO_FILE.to_string(),
            allow_negative_holdings: false,
        }
    }
}
