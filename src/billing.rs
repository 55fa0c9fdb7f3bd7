//! Premium billing: next due date, ledger-style account statements and
//! per-policy arrears from the recorded paid-until date
//!
//! Premiums fall due monthly on the inception day of month. Month arithmetic
//! clamps to the last day of shorter months (31 Jan + 1 month = 28/29 Feb).

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValuationError};
use crate::policy::Policy;

/// Upper bound on generated billing entries (50 years of months)
pub const MAX_BILLING_MONTHS: u32 = 600;

/// Kind of statement line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// Premium due (debit)
    Billing,
    /// Premium received (credit)
    Payment,
}

/// A premium received
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub date: NaiveDate,
    pub amount: f64,
}

/// One line of an account statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementEntry {
    pub date: NaiveDate,
    pub kind: EntryKind,
    pub description: String,
    pub amount: f64,
    /// Outstanding balance after this line, rounded to cents
    pub balance: f64,
}

fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| ValuationError::invalid(format!("date overflow adding {} months to {}", months, date)))
}

/// Next premium due date
///
/// Inception if nothing has been paid, otherwise one month after the
/// paid-until date.
pub fn next_due_date(inception: NaiveDate, paid_until: Option<NaiveDate>) -> Result<NaiveDate> {
    match paid_until {
        None => Ok(inception),
        Some(paid) => add_months(paid, 1),
    }
}

/// Build an account statement as at `as_of`
///
/// One billing debit per month from inception through `as_of`, merged with
/// the payments, balanced oldest first and returned newest first. Entries on
/// the same date list billings before payments.
pub fn account_statement(
    monthly_premium: f64,
    inception: NaiveDate,
    payments: &[Payment],
    as_of: NaiveDate,
) -> Result<Vec<StatementEntry>> {
    if !(monthly_premium.is_finite() && monthly_premium >= 0.0) {
        return Err(ValuationError::invalid(format!(
            "monthly premium must be finite and >= 0, got {}",
            monthly_premium
        )));
    }

    let mut entries = Vec::new();
    for month in 0..MAX_BILLING_MONTHS {
        let due = add_months(inception, month)?;
        if due > as_of {
            break;
        }
        entries.push(StatementEntry {
            date: due,
            kind: EntryKind::Billing,
            description: "Premium Due".to_string(),
            amount: monthly_premium,
            balance: 0.0,
        });
    }

    for payment in payments {
        if !payment.amount.is_finite() {
            return Err(ValuationError::invalid(format!("payment on {} is not finite", payment.date)));
        }
        entries.push(StatementEntry {
            date: payment.date,
            kind: EntryKind::Payment,
            description: "Payment Received".to_string(),
            amount: payment.amount,
            balance: 0.0,
        });
    }

    // Stable: billings precede payments on the same date
    entries.sort_by_key(|e| e.date);

    let mut balance = 0.0;
    for entry in &mut entries {
        match entry.kind {
            EntryKind::Billing => balance += entry.amount,
            EntryKind::Payment => balance -= entry.amount,
        }
        entry.balance = (balance * 100.0).round() / 100.0;
    }

    entries.reverse();
    Ok(entries)
}

/// Outstanding balance from a statement (newest entry first)
pub fn outstanding_balance(statement: &[StatementEntry]) -> f64 {
    statement.first().map(|e| e.balance).unwrap_or(0.0)
}

/// Premium collection position of one policy at a date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingStatus {
    pub policy_id: String,
    pub monthly_premium: f64,
    pub paid_until: Option<NaiveDate>,
    pub next_due_date: NaiveDate,
    /// Unpaid premiums due on or before the as-of date
    pub months_in_arrears: u32,
    pub arrears_amount: f64,
}

impl Policy {
    /// Next premium due date from the recorded paid-until date
    pub fn next_due_date(&self) -> Result<NaiveDate> {
        next_due_date(self.inception_date, self.paid_until)
    }

    /// Statement at the recorded monthly premium
    pub fn account_statement(&self, payments: &[Payment], as_of: NaiveDate) -> Result<Vec<StatementEntry>> {
        account_statement(self.monthly_premium, self.inception_date, payments, as_of)
    }

    /// Billing position as at `as_of`; only active policies fall into arrears
    pub fn billing_status(&self, as_of: NaiveDate) -> Result<BillingStatus> {
        let mut months_in_arrears = 0;
        if self.status.is_active() {
            for k in 0..MAX_BILLING_MONTHS {
                // Offsets from the anchor date keep the original day of month
                let due = match self.paid_until {
                    Some(paid) => add_months(paid, k + 1)?,
                    None => add_months(self.inception_date, k)?,
                };
                if due > as_of {
                    break;
                }
                months_in_arrears += 1;
            }
        }

        Ok(BillingStatus {
            policy_id: self.policy_id.clone(),
            monthly_premium: self.monthly_premium,
            paid_until: self.paid_until,
            next_due_date: self.next_due_date()?,
            months_in_arrears,
            arrears_amount: (self.monthly_premium * months_in_arrears as f64 * 100.0).round() / 100.0,
        })
    }
}
