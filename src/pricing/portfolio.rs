//! Portfolio valuation snapshot
//!
//! Values every active policy at its calendar-year duration and sums the
//! reserves into the portfolio's technical liability. Policies are valued
//! independently, so the work fans out across the rayon pool.

use chrono::{Datelike, Local};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::ValuationEngine;
use crate::error::Result;
use crate::policy::Policy;

/// Reserve for one policy in a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioEntry {
    pub policy_id: String,
    pub holder_name: String,
    pub elapsed_years: u32,
    pub attained_age: u32,
    pub reserve_value: f64,
}

/// Reserves for all active policies at a valuation year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioValuation {
    pub valuation_year: i32,
    pub entries: Vec<PortfolioEntry>,
    pub total_reserve: f64,
}

impl PortfolioValuation {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a policy's entry
    pub fn entry(&self, policy_id: &str) -> Option<&PortfolioEntry> {
        self.entries.iter().find(|e| e.policy_id == policy_id)
    }
}

impl ValuationEngine {
    /// Value all active policies as at `valuation_year`
    ///
    /// Entries keep the input order. Non-active policies are skipped.
    pub fn value_portfolio(&self, policies: &[Policy], valuation_year: i32) -> Result<PortfolioValuation> {
        let active: Vec<&Policy> = policies
            .iter()
            .filter(|p| {
                if !p.status.is_active() {
                    log::warn!("Skipping {} policy {}", p.status.as_str(), p.policy_id);
                }
                p.status.is_active()
            })
            .collect();

        let entries: Vec<PortfolioEntry> = active
            .par_iter()
            .map(|policy| {
                let elapsed_years = policy.elapsed_years(valuation_year);
                let reserve_value = self.policy_reserve(&policy.term(), elapsed_years as i64)?;
                Ok(PortfolioEntry {
                    policy_id: policy.policy_id.clone(),
                    holder_name: policy.holder_name.clone(),
                    elapsed_years,
                    attained_age: policy.attained_age(elapsed_years),
                    reserve_value,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let total_reserve: f64 = entries.iter().map(|e| e.reserve_value).sum();
        log::info!(
            "Valued {} of {} policies at {}: total reserve {:.2}",
            entries.len(),
            policies.len(),
            valuation_year,
            total_reserve
        );

        Ok(PortfolioValuation {
            valuation_year,
            entries,
            total_reserve,
        })
    }

    /// Value all active policies as at the current calendar year
    pub fn value_portfolio_now(&self, policies: &[Policy]) -> Result<PortfolioValuation> {
        self.value_portfolio(policies, Local::now().year())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{Gender, PolicyStatus};
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn policy(id: &str, age: u32, sum_insured: f64, inception_year: i32) -> Policy {
        Policy::new(
            id,
            "Test Holder",
            age,
            Gender::Male,
            sum_insured,
            NaiveDate::from_ymd_opt(inception_year, 6, 1).unwrap(),
        )
    }

    #[test]
    fn test_portfolio_total_matches_individual_reserves() {
        let engine = ValuationEngine::default_pricing();
        let p1 = policy("P1", 30, 100_000.0, 2021);
        let p2 = policy("P2", 45, 250_000.0, 2023);

        let valuation = engine.value_portfolio(&[p1.clone(), p2.clone()], 2026).unwrap();

        let r1 = engine.policy_reserve(&p1.term(), 5).unwrap();
        let r2 = engine.policy_reserve(&p2.term(), 3).unwrap();
        assert_eq!(valuation.len(), 2);
        assert_eq!(valuation.entries[0].reserve_value, r1);
        assert_eq!(valuation.entries[1].reserve_value, r2);
        assert_relative_eq!(valuation.total_reserve, r1 + r2, max_relative = 1e-12);
        assert_relative_eq!(r1, 56.57648619321759, max_relative = 1e-7);
        assert_relative_eq!(r2, 526.668437225288, max_relative = 1e-7);
    }

    #[test]
    fn test_inactive_policies_excluded() {
        let engine = ValuationEngine::default_pricing();
        let policies = vec![
            policy("P1", 30, 100_000.0, 2021),
            policy("P2", 40, 100_000.0, 2020).with_status(PolicyStatus::Lapsed),
            policy("P3", 50, 100_000.0, 2022).with_status(PolicyStatus::Pending),
        ];

        let valuation = engine.value_portfolio(&policies, 2026).unwrap();
        assert_eq!(valuation.len(), 1);
        assert!(valuation.entry("P1").is_some());
        assert!(valuation.entry("P2").is_none());
    }

    #[test]
    fn test_future_inception_and_matured_policies() {
        let engine = ValuationEngine::default_pricing();
        let policies = vec![
            policy("NEW", 30, 100_000.0, 2030),
            policy("OLD", 30, 100_000.0, 2000),
        ];

        let valuation = engine.value_portfolio(&policies, 2026).unwrap();
        let new = valuation.entry("NEW").unwrap();
        assert_eq!(new.elapsed_years, 0);
        assert_eq!(new.attained_age, 30);

        let old = valuation.entry("OLD").unwrap();
        assert_eq!(old.elapsed_years, 26);
        assert_eq!(old.reserve_value, 0.0);
    }

    #[test]
    fn test_order_preserved_for_large_batch() {
        let engine = ValuationEngine::default_pricing();
        let policies: Vec<Policy> = (0..64)
            .map(|i| policy(&format!("P{}", i), 20 + (i % 40), 50_000.0 + i as f64 * 1_000.0, 2015 + (i as i32 % 10)))
            .collect();

        let valuation = engine.value_portfolio(&policies, 2026).unwrap();
        let ids: Vec<&str> = valuation.entries.iter().map(|e| e.policy_id.as_str()).collect();
        let expected: Vec<String> = (0..64).map(|i| format!("P{}", i)).collect();
        assert_eq!(ids, expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_portfolio() {
        let engine = ValuationEngine::default_pricing();
        let valuation = engine.value_portfolio(&[], 2026).unwrap();
        assert!(valuation.is_empty());
        assert_eq!(valuation.total_reserve, 0.0);
    }
}
