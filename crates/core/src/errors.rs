use thiserror::Error;

/// Unified error type for the entire crypto-tracker-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Network / Extraction ────────────────────────────────────────
    #[error("Network error: {0}")]
    Network(String),

    #[error("Quote not found for '{id}': missing {marker}")]
    QuoteNotFound { id: String, marker: String },

    #[error("No token matching '{0}' in the market listing")]
    NoMatch(String),

    #[error("Invalid marker: {0}")]
    InvalidMarker(String),

    // ── Storage / File ──────────────────────────────────────────────
    #[error("Corrupt portfolio state: {0}")]
    CorruptState(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── Business Logic ──────────────────────────────────────────────
    #[error("Holding not found: {0}")]
    HoldingNotFound(String),

    #[error("Cannot sell {requested} {token}: only {held} held (use --force to go negative)")]
    InsufficientQuantity {
        token: String,
        held: f64,
        requested: f64,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Usage: {0}")]
    Usage(String),
}

impl CoreError {
    /// Soft failures mean a token is absent from the page or listing, as
    /// opposed to the source being unreachable. Logged at `info` instead
    /// of `warn`.
    #[must_use]
    pub fn is_soft(&self) -> bool {
        matches!(self, CoreError::QuoteNotFound { .. } | CoreError::NoMatch(_))
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::CorruptState(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors embed the full URL; drop any query string.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
