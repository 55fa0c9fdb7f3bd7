//! Prospective expected-loss reserves and reserve projections
//!
//! The reserve at duration t is the present value of future claims less the
//! present value of future premiums at the pure net premium rate fixed at
//! issue:
//!
//! ```text
//! P' = S * A(x, n) / a(x, n)
//! V(t) = S * A(x + t, n - t) - P' * a(x + t, n - t)
//! ```
//!
//! No risk or expense loading enters P', so V(0) is zero up to quadrature
//! error. Negative reserves are kept as-is.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ValuationEngine;
use crate::assumptions::RateBasis;
use crate::error::{Result, ValuationError};
use crate::policy::PolicyTerm;

/// One row of a reserve projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationPoint {
    pub elapsed_years: u32,
    pub age: u32,
    pub term_remaining: u32,
    pub reserve_value: f64,
}

impl fmt::Display for ValuationPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>4} {:>4} {:>6} {:>14.2}",
            self.elapsed_years, self.age, self.term_remaining, self.reserve_value
        )
    }
}

impl ValuationEngine {
    /// Unloaded annual net premium rate P' fixed at issue
    pub fn net_premium_rate(&self, term: &PolicyTerm) -> Result<f64> {
        term.validate()?;
        let x = term.issue_age as f64;
        let n = term.term_years as f64;

        let assurance = self.assurance_factor(x, n)?;
        let annuity = self.annuity_factor(RateBasis::Valuation, x, n)?;
        if annuity == 0.0 {
            return Err(ValuationError::DegenerateIntegral {
                age: term.issue_age,
                term: term.term_years,
            });
        }
        Ok(term.sum_insured * assurance / annuity)
    }

    /// Expected-loss reserve after `elapsed_years`
    ///
    /// Negative durations are treated as zero. At or past maturity the
    /// reserve is zero.
    pub fn policy_reserve(&self, term: &PolicyTerm, elapsed_years: i64) -> Result<f64> {
        term.validate()?;
        let t = elapsed_years.max(0);
        if t >= term.term_years as i64 {
            return Ok(0.0);
        }
        let premium_rate = self.net_premium_rate(term)?;
        self.reserve_at(term, t as u32, premium_rate)
    }

    /// Reserve for every whole year from issue to maturity inclusive
    pub fn project_policy(&self, term: &PolicyTerm) -> Result<Vec<ValuationPoint>> {
        term.validate()?;
        if term.term_years == 0 {
            return Ok(vec![ValuationPoint {
                elapsed_years: 0,
                age: term.issue_age,
                term_remaining: 0,
                reserve_value: 0.0,
            }]);
        }

        let premium_rate = self.net_premium_rate(term)?;
        (0..=term.term_years)
            .map(|t| {
                Ok(ValuationPoint {
                    elapsed_years: t,
                    age: term.issue_age + t,
                    term_remaining: term.term_years - t,
                    reserve_value: self.reserve_at(term, t, premium_rate)?,
                })
            })
            .collect()
    }

    fn reserve_at(&self, term: &PolicyTerm, t: u32, premium_rate: f64) -> Result<f64> {
        if t >= term.term_years {
            return Ok(0.0);
        }
        let age = (term.issue_age + t) as f64;
        let remaining = (term.term_years - t) as f64;

        let assurance = self.assurance_factor(age, remaining)?;
        let annuity = self.annuity_factor(RateBasis::Valuation, age, remaining)?;
        Ok(term.sum_insured * assurance - premium_rate * annuity)
    }
}
