//! Net premium calculation with expense and risk loadings

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ValuationEngine;
use crate::assumptions::{RateBasis, RiskLoadings};
use crate::error::{Result, ValuationError};
use crate::policy::PolicyTerm;

/// Adverse medical history tier; tiers are mutually exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedicalHistory {
    #[default]
    Clean,
    Minor,
    Major,
}

impl FromStr for MedicalHistory {
    type Err = ValuationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clean" | "none" => Ok(MedicalHistory::Clean),
            "minor" => Ok(MedicalHistory::Minor),
            "major" => Ok(MedicalHistory::Major),
            other => Err(ValuationError::Parse(format!("Unknown MedicalHistory: {}", other))),
        }
    }
}

/// Underwriting risk category shown on the quote
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RiskCategory::Low => "Low",
            RiskCategory::Medium => "Medium",
            RiskCategory::High => "High",
        };
        f.write_str(label)
    }
}

/// Rated underwriting facts of an applicant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RiskRating {
    pub smoker: bool,
    pub medical_history: MedicalHistory,
}

impl RiskRating {
    pub fn new(smoker: bool, medical_history: MedicalHistory) -> Self {
        Self { smoker, medical_history }
    }

    /// Additive loading multiplier: 1 + smoker + history tier
    pub fn loading_multiplier(&self, loadings: &RiskLoadings) -> f64 {
        let mut multiplier = 1.0;
        if self.smoker {
            multiplier += loadings.smoker;
        }
        multiplier += match self.medical_history {
            MedicalHistory::Clean => 0.0,
            MedicalHistory::Minor => loadings.minor_history,
            MedicalHistory::Major => loadings.major_history,
        };
        multiplier
    }

    /// High for major history, Medium for smokers or minor history, else Low
    pub fn category(&self) -> RiskCategory {
        match (self.smoker, self.medical_history) {
            (_, MedicalHistory::Major) => RiskCategory::High,
            (true, _) | (_, MedicalHistory::Minor) => RiskCategory::Medium,
            _ => RiskCategory::Low,
        }
    }
}

/// Result of pricing a new application
///
/// All amounts are unrounded; only `Display` rounds to cents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PremiumQuote {
    /// Loaded monthly premium
    pub monthly_premium: f64,

    /// Loaded annual premium
    pub annual_premium: f64,

    /// Annual premium before the risk loading
    pub net_annual_premium: f64,

    pub loading_multiplier: f64,

    pub assurance_factor: f64,

    /// Annuity factor at the valuation rate
    pub annuity_factor: f64,

    /// Annuity factor at the expense rate
    pub annuity_in_factor: f64,

    pub risk_category: RiskCategory,

    /// False when the contract would run to or past the limiting age
    pub approved: bool,
}

impl fmt::Display for PremiumQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Risk Category:    {}", self.risk_category)?;
        writeln!(f, "Annual Premium:   {:.2}", self.annual_premium)?;
        writeln!(f, "Monthly Premium:  {:.2}", self.monthly_premium)?;
        writeln!(f, "Assurance Factor: {:.5}", self.assurance_factor)?;
        writeln!(f, "Annuity Factor:   {:.5}", self.annuity_factor)?;
        writeln!(f, "Annuity-In:       {:.5}", self.annuity_in_factor)?;
        write!(f, "Status:           {}", if self.approved { "Approved" } else { "Declined" })
    }
}

impl ValuationEngine {
    /// Price a new term life application
    ///
    /// annual = (S * A + a_in * loading + flat) / a, then scaled by the
    /// risk loading multiplier. A zero annuity factor (zero term) is a
    /// `DegenerateIntegral` error.
    pub fn net_premium(&self, term: &PolicyTerm, rating: &RiskRating) -> Result<PremiumQuote> {
        term.validate()?;
        let x = term.issue_age as f64;
        let n = term.term_years as f64;

        let assurance_factor = self.assurance_factor(x, n)?;
        let annuity_factor = self.annuity_factor(RateBasis::Valuation, x, n)?;
        let annuity_in_factor = self.annuity_factor(RateBasis::Expense, x, n)?;

        if annuity_factor == 0.0 {
            return Err(ValuationError::DegenerateIntegral {
                age: term.issue_age,
                term: term.term_years,
            });
        }

        let product = &self.assumptions.product;
        let numerator = term.sum_insured * assurance_factor + product.expense_charge(annuity_in_factor);
        let net_annual_premium = numerator / annuity_factor;

        let loading_multiplier = rating.loading_multiplier(&product.risk_loadings);
        let annual_premium = net_annual_premium * loading_multiplier;
        let approved = self.assumptions.mortality.is_insurable(term.issue_age, term.term_years);

        log::debug!(
            "Quote age {} term {}: A={:.8} a={:.8} a_in={:.8} loading={}",
            term.issue_age, term.term_years, assurance_factor, annuity_factor, annuity_in_factor, loading_multiplier
        );
        if !approved {
            log::warn!(
                "Declined: age {} + term {} reaches limiting age {}",
                term.issue_age, term.term_years, self.assumptions.mortality.omega
            );
        }

        Ok(PremiumQuote {
            monthly_premium: annual_premium / 12.0,
            annual_premium,
            net_annual_premium,
            loading_multiplier,
            assurance_factor,
            annuity_factor,
            annuity_in_factor,
            risk_category: rating.category(),
            approved,
        })
    }
}
