//! Policy data structures matching the back-office policy register

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::assumptions::DEFAULT_TERM_YEARS;
use crate::error::{Result, ValuationError};
use crate::pricing::{MedicalHistory, RiskRating};

fn default_term_years() -> u32 {
    DEFAULT_TERM_YEARS
}

/// Gender of the policyholder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

/// Administrative status of a policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyStatus {
    /// Underwritten, awaiting signed documents
    Pending,
    /// In force
    Active,
    /// Premiums stopped
    Lapsed,
    /// Death claim paid
    Settled,
    Archived,
}

impl PolicyStatus {
    /// Only in-force policies carry a reserve
    pub fn is_active(&self) -> bool {
        matches!(self, PolicyStatus::Active)
    }

    /// Closed policies: no claims or premiums accepted
    pub fn is_archived(&self) -> bool {
        matches!(self, PolicyStatus::Lapsed | PolicyStatus::Settled | PolicyStatus::Archived)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyStatus::Pending => "Pending",
            PolicyStatus::Active => "Active",
            PolicyStatus::Lapsed => "Lapsed",
            PolicyStatus::Settled => "Settled",
            PolicyStatus::Archived => "Archived",
        }
    }
}

/// Contract facts at issue: everything pricing needs besides the risk rating
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolicyTerm {
    pub issue_age: u32,
    pub term_years: u32,
    pub sum_insured: f64,
}

impl PolicyTerm {
    /// Create a validated term
    pub fn new(issue_age: u32, term_years: u32, sum_insured: f64) -> Result<Self> {
        let term = Self { issue_age, term_years, sum_insured };
        term.validate()?;
        Ok(term)
    }

    /// Sum insured must be finite and non-negative
    pub fn validate(&self) -> Result<()> {
        if !(self.sum_insured.is_finite() && self.sum_insured >= 0.0) {
            return Err(ValuationError::invalid(format!(
                "sum insured must be finite and >= 0, got {}",
                self.sum_insured
            )));
        }
        Ok(())
    }

    /// Age at expiry of the contract
    pub fn expiry_age(&self) -> u32 {
        self.issue_age + self.term_years
    }
}

/// A single policy record from the policy register
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    /// Policy number
    pub policy_id: String,

    pub holder_name: String,

    /// Age at inception
    pub issue_age: u32,

    pub gender: Gender,

    pub smoker: bool,

    pub medical_history: MedicalHistory,

    pub sum_insured: f64,

    #[serde(default = "default_term_years")]
    pub term_years: u32,

    pub inception_date: NaiveDate,

    pub status: PolicyStatus,

    /// Last date premiums are paid up to
    #[serde(default)]
    pub paid_until: Option<NaiveDate>,

    /// Loaded monthly premium charged to the customer
    #[serde(default)]
    pub monthly_premium: f64,
}

impl Policy {
    /// Create an active, clean, non-smoker policy on the reference term
    ///
    /// Use [`Policy::with_term_years`] to apply a configured basis term.
    pub fn new(
        policy_id: impl Into<String>,
        holder_name: impl Into<String>,
        issue_age: u32,
        gender: Gender,
        sum_insured: f64,
        inception_date: NaiveDate,
    ) -> Self {
        Self {
            policy_id: policy_id.into(),
            holder_name: holder_name.into(),
            issue_age,
            gender,
            smoker: false,
            medical_history: MedicalHistory::Clean,
            sum_insured,
            term_years: default_term_years(),
            inception_date,
            status: PolicyStatus::Active,
            paid_until: None,
            monthly_premium: 0.0,
        }
    }

    pub fn with_term_years(mut self, term_years: u32) -> Self {
        self.term_years = term_years;
        self
    }

    pub fn with_status(mut self, status: PolicyStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_rating(mut self, rating: RiskRating) -> Self {
        self.smoker = rating.smoker;
        self.medical_history = rating.medical_history;
        self
    }

    /// Contract facts used for pricing and reserving
    pub fn term(&self) -> PolicyTerm {
        PolicyTerm {
            issue_age: self.issue_age,
            term_years: self.term_years,
            sum_insured: self.sum_insured,
        }
    }

    /// Underwriting facts used for the risk loading
    pub fn rating(&self) -> RiskRating {
        RiskRating {
            smoker: self.smoker,
            medical_history: self.medical_history,
        }
    }

    /// Whole calendar years since inception, clamped at zero
    ///
    /// Calendar-year granularity: a policy incepted in December is one year
    /// old in the following January.
    pub fn elapsed_years(&self, valuation_year: i32) -> u32 {
        (valuation_year - self.inception_date.year()).max(0) as u32
    }

    /// Attained age after `elapsed_years`
    pub fn attained_age(&self, elapsed_years: u32) -> u32 {
        self.issue_age + elapsed_years
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_policy() -> Policy {
        Policy::new(
            "POL-1001",
            "Thandi Mokoena",
            30,
            Gender::Female,
            100_000.0,
            NaiveDate::from_ymd_opt(2020, 12, 15).unwrap(),
        )
    }

    #[test]
    fn test_elapsed_years_calendar_granularity() {
        let policy = sample_policy();
        assert_eq!(policy.elapsed_years(2020), 0);
        assert_eq!(policy.elapsed_years(2021), 1);
        assert_eq!(policy.elapsed_years(2026), 6);
        // Valuation before inception clamps to zero
        assert_eq!(policy.elapsed_years(2018), 0);
    }

    #[test]
    fn test_term_and_rating() {
        let policy = sample_policy().with_term_years(20).with_rating(RiskRating {
            smoker: true,
            medical_history: MedicalHistory::Minor,
        });

        let term = policy.term();
        assert_eq!(term.issue_age, 30);
        assert_eq!(term.term_years, 20);
        assert_eq!(term.expiry_age(), 50);
        assert!(policy.rating().smoker);
        assert_eq!(policy.attained_age(5), 35);
    }

    #[test]
    fn test_policy_term_validation() {
        assert!(PolicyTerm::new(30, 15, 100_000.0).is_ok());
        assert!(PolicyTerm::new(30, 15, -1.0).is_err());
        assert!(PolicyTerm::new(30, 15, f64::NAN).is_err());
    }

    #[test]
    fn test_status_classification() {
        assert!(PolicyStatus::Active.is_active());
        assert!(!PolicyStatus::Pending.is_active());
        assert!(PolicyStatus::Lapsed.is_archived());
        assert!(PolicyStatus::Settled.is_archived());
        assert!(!PolicyStatus::Active.is_archived());
    }
}
