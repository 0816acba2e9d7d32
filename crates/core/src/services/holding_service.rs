use crate::errors::CoreError;
use crate::models::holding::Holding;
use crate::models::portfolio::Portfolio;

/// Applies user-issued quantity adjustments to the portfolio. No I/O.
pub struct HoldingService;

impl HoldingService {
    pub fn new() -> Self {
        Self
    }

    /// Add `quantity` to the holding matching `token` (name, then ticker).
    /// Returns the new quantity.
    pub fn buy(&self, portfolio: &mut Portfolio, token: &str, quantity: f64) -> Result<f64, CoreError> {
        Self::validate_quantity(quantity)?;
        let holding = Self::locate(portfolio, token)?;
        holding.quantity += quantity;
        Ok(holding.quantity)
    }

    /// Subtract `quantity` from the holding matching `token`.
    ///
    /// Selling more than is held fails with
    /// [`CoreError::InsufficientQuantity`] unless `allow_negative` is set.
    /// Amounts within rounding noise of the held quantity count as the
    /// whole position and leave exactly zero. On any error the portfolio
    /// is left unchanged.
    pub fn sell(
        &self,
        portfolio: &mut Portfolio,
        token: &str,
        quantity: f64,
        allow_negative: bool,
    ) -> Result<f64, CoreError> {
        Self::validate_quantity(quantity)?;
        let holding = Self::locate(portfolio, token)?;

        let tolerance = f64::EPSILON * holding.quantity.abs().max(1.0);
        if !allow_negative && quantity - holding.quantity > tolerance {
            return Err(CoreError::InsufficientQuantity {
                token: holding.name.clone(),
                held: holding.quantity,
                requested: quantity,
            });
        }

        holding.quantity -= quantity;
        if holding.quantity.abs() <= tolerance {
            holding.quantity = 0.0;
        }
        Ok(holding.quantity)
    }

    /// Delete the first holding whose name equals `name` exactly.
    pub fn remove_token(&self, portfolio: &mut Portfolio, name: &str) -> Result<Holding, CoreError> {
        let name = name.trim();
        let idx = portfolio
            .holdings
            .iter()
            .position(|h| h.name == name)
            .ok_or_else(|| CoreError::HoldingNotFound(name.to_string()))?;
        Ok(portfolio.holdings.remove(idx))
    }

    fn locate<'a>(portfolio: &'a mut Portfolio, token: &str) -> Result<&'a mut Holding, CoreError> {
        portfolio
            .find_mut(token)
            .ok_or_else(|| CoreError::HoldingNotFound(token.trim().to_string()))
    }

    fn validate_quantity(quantity: f64) -> Result<(), CoreError> {
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(CoreError::Validation(format!(
                "Quantity must be a positive number, got {quantity}"
            )));
        }
        Ok(())
    }
}

impl Default for HoldingService {
    fn default() -> Self {
        Self::new()
    }
}
