use crate::errors::CoreError;
use crate::models::portfolio::Portfolio;

/// Encode a portfolio as the on-disk JSON document.
///
/// Layout:
/// ```text
/// {
///   "Holdings": [
///     { "Name": "Bitcoin", "Ticker": "BTC", "CanonicalId": "bitcoin",
///       "Quantity": 0.5, "PricePerUnit": 43000.0, "DailyChange": -1.2 }
///   ]
/// }
/// ```
/// Derived totals are never written.
pub fn encode(portfolio: &Portfolio) -> Result<String, CoreError> {
    serde_json::to_string_pretty(portfolio)
        .map_err(|e| CoreError::Serialization(format!("Failed to serialize portfolio: {e}")))
}

/// Decode and validate a portfolio document.
///
/// Unknown fields (such as the `TotalValue` written by older versions) are
/// ignored. Anything that does not parse, or a holding without a name or
/// with a non-finite number, is reported as [`CoreError::CorruptState`].
pub fn decode(text: &str) -> Result<Portfolio, CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::CorruptState("Portfolio file is empty".into()));
    }

    let portfolio: Portfolio = serde_json::from_str(text)
        .map_err(|e| CoreError::CorruptState(format!("Failed to parse portfolio: {e}")))?;

    validate(&portfolio)?;
    Ok(portfolio)
}

fn validate(portfolio: &Portfolio) -> Result<(), CoreError> {
    for (idx, holding) in portfolio.holdings.iter().enumerate() {
        if holding.name.trim().is_empty() {
            return Err(CoreError::CorruptState(format!("Holding #{} has no name", idx + 1)));
        }
        let numbers = [
            holding.quantity,
            holding.price_per_unit,
            holding.daily_change_percent,
        ];
        if numbers.iter().any(|n| !n.is_finite()) {
            return Err(CoreError::CorruptState(format!(
                "Holding '{}' has a non-finite number",
                holding.name
            )));
        }
    }
    Ok(())
}
