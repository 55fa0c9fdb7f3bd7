//! Term Life Valuation - actuarial pricing and reserving engine for term life policies
//!
//! This library provides:
//! - Gompertz-Makeham mortality (survival, tpx, force of mortality)
//! - Composite Simpson's rule integration of continuous actuarial present values
//! - Net premium quotes with expense and risk loadings
//! - Expected-loss reserves, reserve projections and portfolio snapshots
//! - Policy register loading and premium billing statements
//! - Side-by-side repricing under stressed bases
//!
//! The engine holds no global state: every figure is recomputed from an
//! explicit [`Assumptions`] basis and the call's arguments.

pub mod error;
pub mod assumptions;
pub mod integration;
pub mod pricing;
pub mod policy;
pub mod billing;
pub mod scenario;

// Re-export commonly used types
pub use error::{Result, ValuationError};
pub use assumptions::{Assumptions, GompertzMakeham, InterestBasis, ProductFeatures, RateBasis};
pub use pricing::{
    MedicalHistory, PortfolioEntry, PortfolioValuation, PremiumQuote, RiskCategory, RiskRating,
    ValuationEngine, ValuationPoint,
};
pub use policy::{Policy, PolicyStatus, PolicyTerm};
pub use scenario::{Scenario, ScenarioRunner};
