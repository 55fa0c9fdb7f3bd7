//! Product features: expense loadings, risk loadings and structural defaults

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValuationError};
use crate::integration::DEFAULT_STEPS;

/// Reference default term in years
pub const DEFAULT_TERM_YEARS: u32 = 15;

/// Additive risk loadings applied to the net annual premium
///
/// The final multiplier is `1.0 + smoker + history`, where only one
/// medical-history tier applies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskLoadings {
    pub smoker: f64,
    pub minor_history: f64,
    pub major_history: f64,
}

impl Default for RiskLoadings {
    fn default() -> Self {
        Self {
            smoker: 1.5,
            minor_history: 0.5,
            major_history: 2.5,
        }
    }
}

/// Term life product features
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductFeatures {
    /// Expense loading per unit of the expense-rate annuity factor
    pub expense_loading_per_annuity_unit: f64,

    /// Flat (initial) expense
    pub flat_expense: f64,

    /// Default term in years when a policy record omits it
    pub term_years: u32,

    /// Simpson's rule subintervals per integral
    pub simpson_steps: usize,

    pub risk_loadings: RiskLoadings,
}

impl Default for ProductFeatures {
    fn default() -> Self {
        Self {
            expense_loading_per_annuity_unit: 8000.0,
            flat_expense: 2000.0,
            term_years: DEFAULT_TERM_YEARS,
            simpson_steps: DEFAULT_STEPS,
            risk_loadings: RiskLoadings::default(),
        }
    }
}

impl ProductFeatures {
    pub fn validate(&self) -> Result<()> {
        let amounts = [
            ("expense loading per annuity unit", self.expense_loading_per_annuity_unit),
            ("flat expense", self.flat_expense),
            ("smoker loading", self.risk_loadings.smoker),
            ("minor history loading", self.risk_loadings.minor_history),
            ("major history loading", self.risk_loadings.major_history),
        ];
        for (name, value) in amounts {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ValuationError::invalid(format!(
                    "{} must be finite and >= 0, got {}",
                    name, value
                )));
            }
        }
        if self.simpson_steps < 2 || self.simpson_steps % 2 != 0 {
            return Err(ValuationError::InvalidStepCount(self.simpson_steps));
        }
        Ok(())
    }

    /// Total expense numerator term: loading * annuity_in + flat expense
    pub fn expense_charge(&self, annuity_in_factor: f64) -> f64 {
        annuity_in_factor * self.expense_loading_per_annuity_unit + self.flat_expense
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_features() {
        let product = ProductFeatures::default();
        assert_eq!(product.term_years, 15);
        assert_eq!(product.term_years, DEFAULT_TERM_YEARS);
        assert_eq!(product.simpson_steps, DEFAULT_STEPS);
        assert_eq!(DEFAULT_STEPS, 100);
        assert!(product.validate().is_ok());
    }

    #[test]
    fn test_expense_charge() {
        let product = ProductFeatures::default();
        assert_eq!(product.expense_charge(10.0), 82_000.0);
        assert_eq!(product.expense_charge(0.0), 2_000.0);
    }

    #[test]
    fn test_odd_steps_rejected() {
        let product = ProductFeatures {
            simpson_steps: 101,
            ..Default::default()
        };
        assert!(matches!(product.validate(), Err(ValuationError::InvalidStepCount(101))));
    }

    #[test]
    fn test_negative_loading_rejected() {
        let mut product = ProductFeatures::default();
        product.risk_loadings.smoker = -1.0;
        assert!(product.validate().is_err());
    }
}
