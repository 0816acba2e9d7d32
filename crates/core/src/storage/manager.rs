use tracing::info;

use crate::errors::CoreError;
use crate::models::portfolio::Portfolio;

use super::format;

/// High-level storage operations: save/load portfolio to/from text or files.
///
/// Saving overwrites the file in place. There is no atomic rename, no
/// backup and no cross-process lock: a crash mid-write, or a second
/// instance writing the same file, can lose data.
pub struct StorageManager;

impl StorageManager {
    /// Serialize a portfolio to its JSON text.
    pub fn save_to_string(portfolio: &Portfolio) -> Result<String, CoreError> {
        format::encode(portfolio)
    }

    /// Parse a portfolio from JSON text.
    pub fn load_from_str(text: &str) -> Result<Portfolio, CoreError> {
        format::decode(text)
    }

    /// Write the portfolio to `path`, replacing any previous content.
    pub fn save_to_file(portfolio: &Portfolio, path: &str) -> Result<(), CoreError> {
        let text = Self::save_to_string(portfolio)?;
        std::fs::write(path, text)?;
        info!(path, holdings = portfolio.len(), "portfolio saved");
        Ok(())
    }

    /// Read a portfolio from `path`. A missing or unreadable file is
    /// reported as corrupt state, same as unparsable content.
    pub fn load_from_file(path: &str) -> Result<Portfolio, CoreError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CoreError::CorruptState(format!("Cannot read {path}: {e}")))?;
        let portfolio = Self::load_from_str(&text)?;
        info!(path, holdings = portfolio.len(), "portfolio loaded");
        Ok(portfolio)
    }
}
