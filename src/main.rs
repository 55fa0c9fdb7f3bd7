//! Term Life Valuation CLI
//!
//! Quote a new application, project a policy's reserves, value the active
//! portfolio from an inforce extract, or report premium arrears.

use std::path::PathBuf;

use anyhow::{bail, Context};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};

use term_life_valuation::policy::{load_policies_with_default_term, parse_id_number};
use term_life_valuation::{Assumptions, MedicalHistory, PolicyTerm, RiskRating, ValuationEngine};

#[derive(Parser, Debug)]
#[command(
    name = "term_life_valuation",
    version,
    about = "Price term life policies and value reserves under a Gompertz-Makeham basis"
)]
struct Cli {
    /// Directory containing valuation_basis.csv (reference basis if omitted)
    #[arg(long, global = true)]
    basis: Option<PathBuf>,

    /// Override the Simpson step count (must be even)
    #[arg(long, global = true)]
    steps: Option<usize>,

    /// Emit JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Price a new application
    Quote {
        /// Age at issue; derived from --id-number when omitted
        #[arg(long)]
        age: Option<u32>,

        /// 13-digit national ID number
        #[arg(long)]
        id_number: Option<String>,

        #[arg(long, default_value_t = 100_000.0)]
        sum_insured: f64,

        /// Term in years (basis default if omitted)
        #[arg(long)]
        term: Option<u32>,

        #[arg(long)]
        smoker: bool,

        /// clean, minor or major
        #[arg(long, default_value = "clean")]
        history: String,
    },
    /// Project a policy's reserve for every year of its term
    Project {
        #[arg(long)]
        age: u32,

        #[arg(long, default_value_t = 100_000.0)]
        sum_insured: f64,

        #[arg(long)]
        term: Option<u32>,
    },
    /// Value the active policies of an inforce extract
    Value {
        /// Inforce CSV
        #[arg(long, default_value = "data/inforce_sample.csv")]
        inforce: PathBuf,

        /// Valuation year (current year if omitted)
        #[arg(long)]
        year: Option<i32>,
    },
    /// Next due dates and arrears for each policy of an inforce extract
    Billing {
        #[arg(long, default_value = "data/inforce_sample.csv")]
        inforce: PathBuf,

        /// As-of date, YYYY-MM-DD (today if omitted)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
}

fn load_engine(cli: &Cli) -> anyhow::Result<ValuationEngine> {
    let mut assumptions = match &cli.basis {
        Some(dir) => Assumptions::from_csv_path(dir)
            .with_context(|| format!("loading basis from {}", dir.display()))?,
        None => Assumptions::default_pricing(),
    };
    if let Some(steps) = cli.steps {
        assumptions = assumptions.with_simpson_steps(steps);
    }
    Ok(ValuationEngine::new(assumptions)?)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let engine = load_engine(&cli)?;
    let default_term = engine.assumptions().product.term_years;

    match &cli.command {
        Command::Quote { age, id_number, sum_insured, term, smoker, history } => {
            let issue_age = match (age, id_number) {
                (Some(age), _) => *age,
                (None, Some(id)) => parse_id_number(id, Local::now().date_naive())?.age,
                (None, None) => bail!("either --age or --id-number is required"),
            };
            let history: MedicalHistory = history.parse()?;
            let policy_term = PolicyTerm::new(issue_age, term.unwrap_or(default_term), *sum_insured)?;
            let quote = engine.net_premium(&policy_term, &RiskRating::new(*smoker, history))?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&quote)?);
            } else {
                println!("Quote: age {}, term {}, sum insured {:.2}", issue_age, policy_term.term_years, sum_insured);
                println!("{}", quote);
            }
        }
        Command::Project { age, sum_insured, term } => {
            let policy_term = PolicyTerm::new(*age, term.unwrap_or(default_term), *sum_insured)?;
            let projection = engine.project_policy(&policy_term)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&projection)?);
            } else {
                println!("{:>4} {:>4} {:>6} {:>14}", "Year", "Age", "Term", "Reserve E(L)");
                println!("{}", "-".repeat(31));
                for point in &projection {
                    println!("{}", point);
                }
            }
        }
        Command::Value { inforce, year } => {
            let policies = load_policies_with_default_term(inforce, default_term)
                .with_context(|| format!("loading policies from {}", inforce.display()))?;
            let year = year.unwrap_or_else(|| Local::now().year());
            let valuation = engine.value_portfolio(&policies, year)?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&valuation)?);
            } else {
                println!("Portfolio Valuation Snapshot ({})", valuation.valuation_year);
                println!("{:<12} {:<24} {:>5} {:>14}", "Policy ID", "Holder", "Dur", "Reserve E(L)");
                println!("{}", "-".repeat(58));
                for entry in &valuation.entries {
                    println!(
                        "{:<12} {:<24} {:>5} {:>14.2}",
                        entry.policy_id, entry.holder_name, entry.elapsed_years, entry.reserve_value
                    );
                }
                println!("\nTotal Reserve: {:.2}", valuation.total_reserve);
            }
        }
        Command::Billing { inforce, as_of } => {
            let policies = load_policies_with_default_term(inforce, default_term)
                .with_context(|| format!("loading policies from {}", inforce.display()))?;
            let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());
            let statuses = policies
                .iter()
                .map(|policy| policy.billing_status(as_of))
                .collect::<Result<Vec<_>, _>>()?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&statuses)?);
            } else {
                println!("Billing Position ({})", as_of);
                println!("{:<12} {:>10} {:>12} {:>12} {:>7} {:>12}", "Policy ID", "Premium", "Paid Until", "Next Due", "Months", "Arrears");
                println!("{}", "-".repeat(70));
                for status in &statuses {
                    let paid_until = status.paid_until.map(|d| d.to_string()).unwrap_or_else(|| "-".to_string());
                    println!(
                        "{:<12} {:>10.2} {:>12} {:>12} {:>7} {:>12.2}",
                        status.policy_id,
                        status.monthly_premium,
                        paid_until,
                        status.next_due_date.to_string(),
                        status.months_in_arrears,
                        status.arrears_amount
                    );
                }
                let total: f64 = statuses.iter().map(|s| s.arrears_amount).sum();
                println!("\nTotal Arrears: {:.2}", total);
            }
        }
    }

    Ok(())
}
