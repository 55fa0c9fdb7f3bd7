//! Applicant age and gender from a 13-digit national ID number
//!
//! Layout: `YYMMDD SSSS C A Z` - date of birth, gender sequence
//! (0000-4999 female, 5000-9999 male), citizenship, race digit, checksum.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::Gender;
use crate::error::{Result, ValuationError};

/// Details derived from an ID number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityDetails {
    pub birth_date: NaiveDate,
    /// Completed years at the as-of date
    pub age: u32,
    pub gender: Gender,
}

/// Parse an ID number as of a given date
///
/// The century is the latest one that does not put the birth year after
/// `as_of`.
pub fn parse_id_number(id_number: &str, as_of: NaiveDate) -> Result<IdentityDetails> {
    let id = id_number.trim();
    if id.len() != 13 || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValuationError::invalid(format!(
            "ID number must be 13 digits, got '{}'",
            id_number
        )));
    }

    let yy: i32 = id[0..2].parse()?;
    let mm: u32 = id[2..4].parse()?;
    let dd: u32 = id[4..6].parse()?;
    let sequence: u32 = id[6..10].parse()?;

    let century = if 2000 + yy > as_of.year() { 1900 } else { 2000 };
    let birth_date = NaiveDate::from_ymd_opt(century + yy, mm, dd).ok_or_else(|| {
        ValuationError::invalid(format!("ID number '{}' has an invalid birth date", id))
    })?;
    if birth_date > as_of {
        return Err(ValuationError::invalid(format!(
            "ID number '{}' has a birth date after {}",
            id, as_of
        )));
    }

    let mut age = as_of.year() - birth_date.year();
    if (as_of.month(), as_of.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }

    let gender = if sequence < 5000 { Gender::Female } else { Gender::Male };

    Ok(IdentityDetails {
        birth_date,
        age: age as u32,
        gender,
    })
}
