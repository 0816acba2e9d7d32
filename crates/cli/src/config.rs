use anyhow::{bail, Context};
use crypto_tracker_core::models::settings::TrackerConfig;

pub const ENV_PORTFOLIO: &str = "CRYPTO_TRACKER_PORTFOLIO";
pub const ENV_BASE_URL: &str = "CRYPTO_TRACKER_BASE_URL";
pub const ENV_USER_AGENT: &str = "CRYPTO_TRACKER_USER_AGENT";
pub const ENV_TIMEOUT_SECS: &str = "CRYPTO_TRACKER_TIMEOUT_SECS";
pub const ENV_ALLOW_NEGATIVE: &str = "CRYPTO_TRACKER_ALLOW_NEGATIVE";

/// Build the tracker config from the process environment.
pub fn from_env() -> anyhow::Result<TrackerConfig> {
    // dotenvy loads .env, but doesn't override already-set env vars
    dotenvy::dotenv().ok();
    from_lookup(|key| std::env::var(key).ok())
}

/// Build the tracker config from any key lookup; unset keys keep their defaults.
pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<TrackerConfig> {
    let mut config = TrackerConfig::default();

    if let Some(path) = non_empty(get(ENV_PORTFOLIO)) {
        config.portfolio_path = path;
    }
    if let Some(url) = non_empty(get(ENV_BASE_URL)) {
        config.base_url = url;
    }
    if let Some(agent) = non_empty(get(ENV_USER_AGENT)) {
        config.user_agent = agent;
    }
    if let Some(raw) = non_empty(get(ENV_TIMEOUT_SECS)) {
        let secs: u64 = raw
            .parse()
            .with_context(|| format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{raw}'"))?;
        if secs == 0 {
            bail!("{ENV_TIMEOUT_SECS} must be greater than zero");
        }
        config.timeout_secs = secs;
    }
    if let Some(raw) = non_empty(get(ENV_ALLOW_NEGATIVE)) {
        config.allow_negative_holdings = parse_bool(&raw)
            .with_context(|| format!("{ENV_ALLOW_NEGATIVE} must be true or false, got '{raw}'"))?;
    }

    Ok(config)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
