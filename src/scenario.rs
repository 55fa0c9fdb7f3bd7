//! Scenario runner for repricing under alternate actuarial bases
//!
//! Holds one base basis and builds a fresh engine per scenario, so stress
//! tests run side by side in the same process without touching the base.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::policy::{Policy, PolicyTerm};
use crate::pricing::{PortfolioValuation, PremiumQuote, RiskRating, ValuationEngine};
use crate::Assumptions;

/// Shifts applied to the base basis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,

    /// Multiplier on both Gompertz-Makeham hazard components
    pub mortality_multiplier: f64,

    /// Added to the valuation rate i
    pub valuation_rate_shift: f64,

    /// Added to the expense rate i_expense
    pub expense_rate_shift: f64,
}

impl Scenario {
    /// Unchanged basis
    pub fn base() -> Self {
        Self {
            name: "base".to_string(),
            mortality_multiplier: 1.0,
            valuation_rate_shift: 0.0,
            expense_rate_shift: 0.0,
        }
    }

    pub fn mortality_stress(multiplier: f64) -> Self {
        Self {
            name: format!("mortality x{}", multiplier),
            mortality_multiplier: multiplier,
            ..Self::base()
        }
    }

    pub fn interest_shift(shift: f64) -> Self {
        Self {
            name: format!("interest {:+}", shift),
            valuation_rate_shift: shift,
            expense_rate_shift: shift,
            ..Self::base()
        }
    }

    /// Apply the shifts to a basis
    pub fn apply(&self, base: &Assumptions) -> Assumptions {
        let mut assumptions = *base;
        assumptions.mortality = base.mortality.stressed(self.mortality_multiplier);
        assumptions.interest.valuation_rate += self.valuation_rate_shift;
        assumptions.interest.expense_rate += self.expense_rate_shift;
        assumptions
    }
}

/// Pre-loaded scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_csv()?;
/// let scenarios = [Scenario::base(), Scenario::mortality_stress(1.1)];
/// let quotes = runner.run_quotes(&term, &rating, &scenarios)?;
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base_assumptions: Assumptions,
}

impl ScenarioRunner {
    /// Create runner on the reference basis
    pub fn new() -> Self {
        Self {
            base_assumptions: Assumptions::default_pricing(),
        }
    }

    /// Create runner by loading the basis from the default CSV location
    pub fn from_csv() -> Result<Self> {
        Ok(Self {
            base_assumptions: Assumptions::from_csv()?,
        })
    }

    pub fn with_assumptions(assumptions: Assumptions) -> Self {
        Self {
            base_assumptions: assumptions,
        }
    }

    /// Engine for one scenario; fails if the shifted basis is invalid
    pub fn engine(&self, scenario: &Scenario) -> Result<ValuationEngine> {
        ValuationEngine::new(scenario.apply(&self.base_assumptions))
    }

    /// Quote one application under each scenario
    pub fn run_quotes(
        &self,
        term: &PolicyTerm,
        rating: &RiskRating,
        scenarios: &[Scenario],
    ) -> Result<Vec<(String, PremiumQuote)>> {
        scenarios
            .iter()
            .map(|scenario| {
                let quote = self.engine(scenario)?.net_premium(term, rating)?;
                Ok((scenario.name.clone(), quote))
            })
            .collect()
    }

    /// Value a portfolio under each scenario
    pub fn run_portfolio(
        &self,
        policies: &[Policy],
        valuation_year: i32,
        scenarios: &[Scenario],
    ) -> Result<Vec<(String, PortfolioValuation)>> {
        scenarios
            .iter()
            .map(|scenario| {
                let valuation = self.engine(scenario)?.value_portfolio(policies, valuation_year)?;
                Ok((scenario.name.clone(), valuation))
            })
            .collect()
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.base_assumptions
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}
