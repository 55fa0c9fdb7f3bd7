//! Load policies from an inforce CSV extract

use chrono::NaiveDate;
use csv::Reader;
use std::path::Path;

use super::{Gender, Policy, PolicyStatus};
use crate::assumptions::DEFAULT_TERM_YEARS;
use crate::error::{Result, ValuationError};
use crate::pricing::MedicalHistory;

/// Default location of the inforce extract
pub const DEFAULT_INFORCE_PATH: &str = "data/inforce_sample.csv";

/// Raw CSV row matching the inforce extract columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "PolicyID")]
    policy_id: String,
    #[serde(rename = "HolderName")]
    holder_name: String,
    #[serde(rename = "IssueAge")]
    issue_age: u32,
    #[serde(rename = "Gender")]
    gender: String,
    #[serde(rename = "Smoker")]
    smoker: String,
    #[serde(rename = "MedicalHistory")]
    medical_history: String,
    #[serde(rename = "SumInsured")]
    sum_insured: f64,
    #[serde(rename = "TermYears")]
    term_years: Option<u32>,
    #[serde(rename = "InceptionDate")]
    inception_date: String,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "PaidUntil")]
    paid_until: Option<String>,
    #[serde(rename = "MonthlyPremium")]
    monthly_premium: Option<f64>,
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| ValuationError::Parse(format!("{} '{}': {}", field, raw, e)))
}

impl CsvRow {
    fn to_policy(self, default_term_years: u32) -> Result<Policy> {
        let gender = match self.gender.as_str() {
            "Male" => Gender::Male,
            "Female" => Gender::Female,
            other => return Err(ValuationError::Parse(format!("Unknown Gender: {}", other))),
        };

        let smoker = match self.smoker.to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" => true,
            "false" | "no" | "n" => false,
            other => return Err(ValuationError::Parse(format!("Unknown Smoker flag: {}", other))),
        };

        let medical_history: MedicalHistory = self.medical_history.parse()?;

        let status = match self.status.as_str() {
            "Pending" => PolicyStatus::Pending,
            "Active" => PolicyStatus::Active,
            "Lapsed" => PolicyStatus::Lapsed,
            "Settled" => PolicyStatus::Settled,
            "Archived" => PolicyStatus::Archived,
            other => return Err(ValuationError::Parse(format!("Unknown Status: {}", other))),
        };

        let inception_date = parse_date("InceptionDate", &self.inception_date)?;
        let paid_until = match self.paid_until.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(parse_date("PaidUntil", raw)?),
        };

        let policy = Policy {
            policy_id: self.policy_id,
            holder_name: self.holder_name,
            issue_age: self.issue_age,
            gender,
            smoker,
            medical_history,
            sum_insured: self.sum_insured,
            term_years: self.term_years.unwrap_or(default_term_years),
            inception_date,
            status,
            paid_until,
            monthly_premium: self.monthly_premium.unwrap_or(0.0),
        };
        policy.term().validate()?;
        Ok(policy)
    }
}

/// Load all policies from a CSV file, filling missing terms with the
/// reference default
pub fn load_policies<P: AsRef<Path>>(path: P) -> Result<Vec<Policy>> {
    load_policies_with_default_term(path, DEFAULT_TERM_YEARS)
}

/// Load all policies from a CSV file, filling missing terms with
/// `default_term_years` (normally the basis `term_years`)
pub fn load_policies_with_default_term<P: AsRef<Path>>(path: P, default_term_years: u32) -> Result<Vec<Policy>> {
    let reader = Reader::from_path(path)?;
    collect_policies(reader, default_term_years)
}

/// Load policies from any reader (e.g., string buffer, network stream)
pub fn load_policies_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Policy>> {
    load_policies_from_reader_with_default_term(reader, DEFAULT_TERM_YEARS)
}

pub fn load_policies_from_reader_with_default_term<R: std::io::Read>(
    reader: R,
    default_term_years: u32,
) -> Result<Vec<Policy>> {
    collect_policies(Reader::from_reader(reader), default_term_years)
}

/// Load policies from the default inforce extract location
pub fn load_default_inforce() -> Result<Vec<Policy>> {
    load_policies(DEFAULT_INFORCE_PATH)
}

fn collect_policies<R: std::io::Read>(mut reader: Reader<R>, default_term_years: u32) -> Result<Vec<Policy>> {
    let mut policies = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        policies.push(row.to_policy(default_term_years)?);
    }
    log::debug!("Loaded {} policies", policies.len());
    Ok(policies)
}
