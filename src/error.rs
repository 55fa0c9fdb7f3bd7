//! Error types for the valuation engine
//!
//! Unpriceable contracts are not errors: they surface as `approved == false`
//! on the quote.

use thiserror::Error;

/// Result type alias using ValuationError
pub type Result<T> = std::result::Result<T, ValuationError>;

/// Unified error type for valuation operations
#[derive(Debug, Error)]
pub enum ValuationError {
    /// Non-finite or out-of-domain input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Simpson's rule needs an even number of subintervals, at least 2
    #[error("Invalid Simpson step count {0}: must be even and at least 2")]
    InvalidStepCount(usize),

    /// Annuity factor is zero, so no premium rate can be formed
    #[error("Degenerate integral: annuity factor is zero for age {age}, term {term}")]
    DegenerateIntegral { age: u32, term: u32 },

    /// Overflow or non-finite intermediate value
    #[error("Numeric instability at age {age}: {detail}")]
    NumericInstability { age: f64, detail: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl ValuationError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ValuationError::InvalidInput(msg.into())
    }
}

impl From<std::num::ParseFloatError> for ValuationError {
    fn from(err: std::num::ParseFloatError) -> Self {
        ValuationError::Parse(err.to_string())
    }
}

impl From<std::num::ParseIntError> for ValuationError {
    fn from(err: std::num::ParseIntError) -> Self {
        ValuationError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValuationError::InvalidStepCount(7);
        assert_eq!(
            err.to_string(),
            "Invalid Simpson step count 7: must be even and at least 2"
        );

        let err = ValuationError::DegenerateIntegral { age: 30, term: 0 };
        assert!(err.to_string().contains("age 30, term 0"));
    }

    #[test]
    fn test_parse_error_conversion() {
        let err: ValuationError = "abc".parse::<f64>().unwrap_err().into();
        assert!(matches!(err, ValuationError::Parse(_)));
    }
}
