//! Actuarial basis: mortality law, interest rates and product features

mod mortality;
mod interest;
mod product;
pub mod loader;

pub use mortality::GompertzMakeham;
pub use interest::{InterestBasis, RateBasis};
pub use product::{ProductFeatures, RiskLoadings, DEFAULT_TERM_YEARS};
pub use loader::LoadedBasis;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Container for all pricing and valuation assumptions
///
/// Immutable once handed to a [`crate::ValuationEngine`]; reprice under a
/// different basis by building a second engine.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Assumptions {
    pub mortality: GompertzMakeham,
    pub interest: InterestBasis,
    pub product: ProductFeatures,
}

impl Assumptions {
    /// Reference pricing basis
    pub fn default_pricing() -> Self {
        Self {
            mortality: GompertzMakeham::reference(),
            interest: InterestBasis::reference(),
            product: ProductFeatures::default(),
        }
    }

    /// Load assumptions from the default location (data/assumptions/)
    pub fn from_csv() -> Result<Self> {
        Self::from_csv_path(Path::new(loader::DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load assumptions from a specific directory
    pub fn from_csv_path(path: &Path) -> Result<Self> {
        let loaded = LoadedBasis::load_from(path)?;
        Self::from_loaded(&loaded)
    }

    /// Overlay loaded parameters on the reference basis and validate
    pub fn from_loaded(loaded: &LoadedBasis) -> Result<Self> {
        let base = Self::default_pricing();
        let loadings = base.product.risk_loadings;

        let assumptions = Self {
            mortality: GompertzMakeham {
                a: loaded.get("A").unwrap_or(base.mortality.a),
                b: loaded.get("B").unwrap_or(base.mortality.b),
                c: loaded.get("c").unwrap_or(base.mortality.c),
                omega: loaded.get("omega").unwrap_or(base.mortality.omega),
            },
            interest: InterestBasis {
                valuation_rate: loaded.get("i").unwrap_or(base.interest.valuation_rate),
                expense_rate: loaded.get("i_expense").unwrap_or(base.interest.expense_rate),
            },
            product: ProductFeatures {
                expense_loading_per_annuity_unit: loaded
                    .get("expense_loading_per_annuity_unit")
                    .unwrap_or(base.product.expense_loading_per_annuity_unit),
                flat_expense: loaded.get("flat_expense").unwrap_or(base.product.flat_expense),
                term_years: loaded
                    .get_count::<u32>("term_years")?
                    .unwrap_or(base.product.term_years),
                simpson_steps: loaded
                    .get_count::<usize>("simpson_steps")?
                    .unwrap_or(base.product.simpson_steps),
                risk_loadings: RiskLoadings {
                    smoker: loaded.get("smoker_loading").unwrap_or(loadings.smoker),
                    minor_history: loaded
                        .get("minor_history_loading")
                        .unwrap_or(loadings.minor_history),
                    major_history: loaded
                        .get("major_history_loading")
                        .unwrap_or(loadings.major_history),
                },
            },
        };

        assumptions.validate()?;
        Ok(assumptions)
    }

    /// Replace the Simpson step count
    pub fn with_simpson_steps(mut self, steps: usize) -> Self {
        self.product.simpson_steps = steps;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.mortality.validate()?;
        self.interest.validate()?;
        self.product.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_matches_default_pricing() {
        let loaded = Assumptions::from_csv().expect("Failed to load basis");
        assert_eq!(loaded, Assumptions::default_pricing());
    }

    #[test]
    fn test_partial_basis_overlays_reference() {
        let csv = "parameter,value\ni,0.04\nsimpson_steps,200\n";
        let loaded = LoadedBasis::from_reader(csv.as_bytes()).unwrap();
        let assumptions = Assumptions::from_loaded(&loaded).unwrap();

        assert_eq!(assumptions.interest.valuation_rate, 0.04);
        assert_eq!(assumptions.product.simpson_steps, 200);
        assert_eq!(assumptions.mortality, GompertzMakeham::reference());
    }

    #[test]
    fn test_invalid_loaded_basis_rejected() {
        let csv = "parameter,value\nc,0.9\n";
        let loaded = LoadedBasis::from_reader(csv.as_bytes()).unwrap();
        assert!(Assumptions::from_loaded(&loaded).is_err());
    }

    #[test]
    fn test_count_overflowing_u32_is_not_truncated() {
        // 2^32 + 15 would wrap to 15 if cast
        let csv = "parameter,value\nterm_years,4294967311\n";
        let loaded = LoadedBasis::from_reader(csv.as_bytes()).unwrap();
        assert!(matches!(
            Assumptions::from_loaded(&loaded),
            Err(crate::ValuationError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_configured_term_years_loaded() {
        let csv = "parameter,value\nterm_years,20\n";
        let loaded = LoadedBasis::from_reader(csv.as_bytes()).unwrap();
        let assumptions = Assumptions::from_loaded(&loaded).unwrap();
        assert_eq!(assumptions.product.term_years, 20);
    }

    #[test]
    fn test_json_round_trip_of_basis() {
        let assumptions = Assumptions::default_pricing();
        let json = serde_json::to_string(&assumptions).unwrap();
        let parsed: Assumptions = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, assumptions);
    }
}
