use chrono::{DateTime, Utc};

/// Outcome of a full portfolio refresh.
///
/// A refresh never fails as a whole: each holding either updated or is
/// listed in `failed` with the reason, and kept its stale values.
#[derive(Debug, Clone)]
pub struct RefreshReport {
    /// Names of holdings that received a fresh quote
    pub updated: Vec<String>,
    /// `(holding name, error message)` for every lookup that failed
    pub failed: Vec<(String, String)>,
    pub refreshed_at: DateTime<Utc>,
    /// Value-weighted daily change after the refresh
    pub daily_change_percent: f64,
}

impl RefreshReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Result of a best-effort `add_token`.
#[derive(Debug, Clone, PartialEq)]
pub enum AddOutcome {
    /// A new holding was appended
    Added(String),
    /// The quantity was merged into an existing holding of the same name
    Merged(String),
    /// Nothing in the market listing matched the query
    NoMatch(String),
    /// A fetch or extraction step failed
    Failed(String),
}

impl AddOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, AddOutcome::Added(_) | AddOutcome::Merged(_))
    }
}

impl std::fmt::Display for AddOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddOutcome::Added(name) => write!(f, "Added {name}"),
            AddOutcome::Merged(name) => write!(f, "Merged into existing holding {name}"),
            AddOutcome::NoMatch(query) => write!(f, "No token matching '{query}' found"),
            AddOutcome::Failed(reason) => write!(f, "Could not add token: {reason}"),
        }
    }
}
