//! Run reserve projections for every active policy in an inforce extract
//!
//! Writes one row per policy per projection year, plus a snapshot file
//! with each policy's reserve at the valuation year.
//!
//! Usage: run_portfolio [INFORCE_CSV] [VALUATION_YEAR]

use anyhow::Context;
use chrono::{Datelike, Local};
use rayon::prelude::*;
use serde::Serialize;
use std::env;
use std::time::Instant;

use term_life_valuation::policy::loader::DEFAULT_INFORCE_PATH;
use term_life_valuation::policy::load_policies_with_default_term;
use term_life_valuation::{Assumptions, Policy, ValuationEngine, ValuationPoint};

/// Projection output row
#[derive(Debug, Serialize)]
struct ProjectionRow<'a> {
    policy_id: &'a str,
    year: u32,
    age: u32,
    term_remaining: u32,
    reserve: f64,
}

/// Aggregate reserve across the book by projection year
#[derive(Debug, Clone, Default, Serialize)]
struct AggregatedRow {
    year: u32,
    policies_in_force: u32,
    total_reserve: f64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let start = Instant::now();

    let assumptions = Assumptions::from_csv().unwrap_or_else(|e| {
        log::warn!("Using reference basis ({})", e);
        Assumptions::default_pricing()
    });
    let engine = ValuationEngine::new(assumptions)?;
    let default_term = assumptions.product.term_years;

    let inforce_path = args.get(1).map(String::as_str).unwrap_or(DEFAULT_INFORCE_PATH);
    let policies = load_policies_with_default_term(inforce_path, default_term)
        .with_context(|| format!("loading {}", inforce_path))?;
    let valuation_year = match args.get(2) {
        Some(raw) => raw.parse().with_context(|| format!("invalid valuation year {}", raw))?,
        None => Local::now().year(),
    };
    println!("Loaded {} policies in {:?}", policies.len(), start.elapsed());

    let active: Vec<&Policy> = policies.iter().filter(|p| p.status.is_active()).collect();

    println!("Running projections...");
    let proj_start = Instant::now();
    let projections: Vec<(&Policy, Vec<ValuationPoint>)> = active
        .par_iter()
        .map(|policy| engine.project_policy(&policy.term()).map(|points| (*policy, points)))
        .collect::<Result<_, _>>()?;
    println!("Projections complete in {:?}", proj_start.elapsed());

    let max_term = projections.iter().map(|(p, _)| p.term_years).max().unwrap_or(0);
    let mut aggregated: Vec<AggregatedRow> = (0..=max_term)
        .map(|year| AggregatedRow { year, ..Default::default() })
        .collect();

    let output_path = "portfolio_projection_output.csv";
    let mut writer = csv::Writer::from_path(output_path)?;
    for (policy, points) in &projections {
        for point in points {
            writer.serialize(ProjectionRow {
                policy_id: &policy.policy_id,
                year: point.elapsed_years,
                age: point.age,
                term_remaining: point.term_remaining,
                reserve: point.reserve_value,
            })?;

            let agg = &mut aggregated[point.elapsed_years as usize];
            if point.term_remaining > 0 {
                agg.policies_in_force += 1;
            }
            agg.total_reserve += point.reserve_value;
        }
    }
    writer.flush()?;
    println!("Projection written to {}", output_path);

    let aggregate_path = "portfolio_aggregate_output.csv";
    let mut writer = csv::Writer::from_path(aggregate_path)?;
    for row in &aggregated {
        writer.serialize(row)?;
    }
    writer.flush()?;
    println!("Aggregate by projection year written to {}", aggregate_path);

    let snapshot = engine.value_portfolio(&policies, valuation_year)?;
    let snapshot_path = "portfolio_snapshot.json";
    std::fs::write(snapshot_path, serde_json::to_string_pretty(&snapshot)?)?;

    println!("\nPortfolio Summary ({}):", valuation_year);
    println!("  Active policies: {} of {}", snapshot.len(), policies.len());
    println!("  Total reserve:   {:.2}", snapshot.total_reserve);
    println!("  Snapshot written to {}", snapshot_path);
    println!("\nTotal time: {:?}", start.elapsed());

    Ok(())
}
