//! Interest basis: valuation and expense rates as continuous forces of interest

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValuationError};

/// Which rate an annuity factor is discounted at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateBasis {
    /// Valuation rate, used for premium income and claims
    Valuation,
    /// Expense rate, used for the per-annuity-unit expense loading
    Expense,
}

/// Annual effective interest rates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterestBasis {
    /// Valuation rate i
    pub valuation_rate: f64,

    /// Expense (loading) rate i_expense
    pub expense_rate: f64,
}

impl InterestBasis {
    pub fn new(valuation_rate: f64, expense_rate: f64) -> Result<Self> {
        let basis = Self { valuation_rate, expense_rate };
        basis.validate()?;
        Ok(basis)
    }

    /// Reference basis: 5% valuation, 2.439% expense
    pub fn reference() -> Self {
        Self {
            valuation_rate: 0.05,
            expense_rate: 0.02439,
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, rate) in [("valuation", self.valuation_rate), ("expense", self.expense_rate)] {
            if !(rate.is_finite() && rate > -1.0) {
                return Err(ValuationError::invalid(format!(
                    "{} interest rate must be finite and > -1, got {}",
                    name, rate
                )));
            }
        }
        Ok(())
    }

    /// Force of interest delta = ln(1 + i) for the chosen rate
    pub fn force_of_interest(&self, basis: RateBasis) -> f64 {
        let rate = match basis {
            RateBasis::Valuation => self.valuation_rate,
            RateBasis::Expense => self.expense_rate,
        };
        rate.ln_1p()
    }

    /// Continuous discount factor exp(-delta * t)
    pub fn discount(&self, basis: RateBasis, t: f64) -> f64 {
        (-self.force_of_interest(basis) * t).exp()
    }
}

impl Default for InterestBasis {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_force_of_interest() {
        let basis = InterestBasis::reference();
        assert_relative_eq!(basis.force_of_interest(RateBasis::Valuation), 1.05_f64.ln(), epsilon = 1e-15);
        assert_relative_eq!(basis.force_of_interest(RateBasis::Expense), 1.02439_f64.ln(), epsilon = 1e-15);
    }

    #[test]
    fn test_continuous_discount_matches_annual() {
        let basis = InterestBasis::reference();
        // exp(-delta * t) = (1 + i)^-t
        assert_relative_eq!(basis.discount(RateBasis::Valuation, 10.0), 1.05_f64.powi(-10), max_relative = 1e-12);
    }

    #[test]
    fn test_lower_rate_discounts_less() {
        let basis = InterestBasis::reference();
        assert!(basis.discount(RateBasis::Expense, 5.0) > basis.discount(RateBasis::Valuation, 5.0));
    }

    #[test]
    fn test_invalid_rates() {
        assert!(InterestBasis::new(-1.0, 0.02).is_err());
        assert!(InterestBasis::new(0.05, f64::INFINITY).is_err());
        assert!(InterestBasis::new(0.0, 0.0).is_ok());
    }
}
