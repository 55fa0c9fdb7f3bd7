//! Assurance and annuity integrands and their present values

use super::ValuationEngine;
use crate::assumptions::{GompertzMakeham, RateBasis};
use crate::error::{Result, ValuationError};
use crate::integration::simpson;

/// Density of a continuous term assurance payout at time t:
/// exp(-delta t) * tpx * mu(x + t)
pub fn assurance_integrand(mortality: &GompertzMakeham, delta: f64, t: f64, x: f64) -> f64 {
    (-delta * t).exp() * mortality.survival_probability(x, t) * mortality.hazard(x + t)
}

/// Discounted survival density of a continuous annuity: exp(-delta t) * tpx
pub fn annuity_integrand(mortality: &GompertzMakeham, delta: f64, t: f64, x: f64) -> f64 {
    (-delta * t).exp() * mortality.survival_probability(x, t)
}

fn ensure_finite(value: f64, x: f64, what: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ValuationError::NumericInstability {
            age: x,
            detail: format!("{} evaluated to {}", what, value),
        })
    }
}

impl ValuationEngine {
    /// Continuous term assurance factor for a life aged x over n years,
    /// discounted at the valuation rate
    pub fn assurance_factor(&self, x: f64, n: f64) -> Result<f64> {
        let mortality = self.assumptions.mortality;
        mortality.check_age(x, n)?;
        let delta = self.assumptions.interest.force_of_interest(RateBasis::Valuation);

        let value = simpson(
            |t, x| assurance_integrand(&mortality, delta, t, x),
            x,
            n,
            self.simpson_steps(),
        )?;
        ensure_finite(value, x, "assurance factor")
    }

    /// Continuous temporary annuity factor for a life aged x over n years,
    /// discounted at the chosen rate
    pub fn annuity_factor(&self, basis: RateBasis, x: f64, n: f64) -> Result<f64> {
        let mortality = self.assumptions.mortality;
        mortality.check_age(x, n)?;
        let delta = self.assumptions.interest.force_of_interest(basis);

        let value = simpson(
            |t, x| annuity_integrand(&mortality, delta, t, x),
            x,
            n,
            self.simpson_steps(),
        )?;
        ensure_finite(value, x, "annuity factor")
    }
}
