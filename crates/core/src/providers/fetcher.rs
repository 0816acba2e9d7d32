use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::errors::CoreError;
use crate::models::settings::TrackerConfig;

const MAX_REDIRECTS: usize = 10;

/// Thin HTTP GET wrapper with browser-like headers.
///
/// Holds one `reqwest::Client` for the whole process. Cloning is cheap and
/// shares the connection pool.
#[derive(Debug, Clone)]
pub struct HtmlFetcher {
    client: Client,
}

impl HtmlFetcher {
    pub fn new(config: &TrackerConfig) -> Result<Self, CoreError> {
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|e| CoreError::Validation(format!("Invalid user agent: {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(USER_AGENT, user_agent);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(Policy::limited(MAX_REDIRECTS))
            .gzip(true)
            .deflate(true)
            .build()?;

        Ok(Self { client })
    }

    /// GET `url` and return the decoded body.
    ///
    /// Connection failures, timeouts and non-2xx statuses all map to
    /// [`CoreError::Network`]. No retries.
    pub async fn fetch(&self, url: &str) -> Result<String, CoreError> {
        debug!(%url, "fetching page");
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::Network(format!("{url} returned HTTP {status}")));
        }

        let body = resp.text().await?;
        debug!(%url, bytes = body.len(), "page fetched");
        Ok(body)
    }
}
