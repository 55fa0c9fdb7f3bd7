//! Pricing and valuation of term life policies
//!
//! Everything here is a pure function of the engine's [`Assumptions`] and
//! the call's arguments:
//! - **Factors**: continuous assurance and annuity present values by Simpson's rule
//! - **Premiums**: net premium with expense and risk loadings, risk category, approval
//! - **Reserves**: prospective expected-loss reserve at any elapsed duration
//! - **Portfolio**: reserve snapshot across active policies, valued in parallel
//!
//! # Example
//!
//! ```rust
//! use term_life_valuation::{ValuationEngine, PolicyTerm, RiskRating};
//!
//! let engine = ValuationEngine::default_pricing();
//! let term = PolicyTerm::new(30, 15, 100_000.0)?;
//! let quote = engine.net_premium(&term, &RiskRating::default())?;
//! assert!(quote.approved);
//! println!("Monthly premium: {:.2}", quote.monthly_premium);
//! # Ok::<(), term_life_valuation::ValuationError>(())
//! ```

mod integrands;
mod premium;
mod reserve;
mod portfolio;

pub use integrands::{annuity_integrand, assurance_integrand};
pub use premium::{MedicalHistory, PremiumQuote, RiskCategory, RiskRating};
pub use reserve::ValuationPoint;
pub use portfolio::{PortfolioEntry, PortfolioValuation};

use crate::assumptions::Assumptions;
use crate::error::Result;

/// Stateless valuation engine bound to one actuarial basis
///
/// Holds only plain numbers, so it is `Send + Sync` and may be shared
/// across threads without locking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValuationEngine {
    assumptions: Assumptions,
}

impl ValuationEngine {
    /// Create an engine, validating the basis
    pub fn new(assumptions: Assumptions) -> Result<Self> {
        assumptions.validate()?;
        Ok(Self { assumptions })
    }

    /// Engine on the reference pricing basis
    pub fn default_pricing() -> Self {
        Self {
            assumptions: Assumptions::default_pricing(),
        }
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    /// Simpson subintervals used for every integral
    pub fn simpson_steps(&self) -> usize {
        self.assumptions.product.simpson_steps
    }
}

impl Default for ValuationEngine {
    fn default() -> Self {
        Self::default_pricing()
    }
}
