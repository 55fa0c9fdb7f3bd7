//! CSV-based actuarial basis loader
//!
//! Reads `valuation_basis.csv` (columns `parameter,value`) from an assumptions
//! directory. Parameters left out of the file keep their reference value.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Result, ValuationError};

/// Default path to assumptions directory
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions";

/// File name of the basis inside the assumptions directory
pub const BASIS_FILE: &str = "valuation_basis.csv";

/// Parameter names recognised in the basis file
pub const KNOWN_PARAMETERS: &[&str] = &[
    "A",
    "B",
    "c",
    "omega",
    "i",
    "i_expense",
    "expense_loading_per_annuity_unit",
    "flat_expense",
    "term_years",
    "simpson_steps",
    "smoker_loading",
    "minor_history_loading",
    "major_history_loading",
];

/// Raw parameter values read from the basis file
#[derive(Debug, Clone, Default)]
pub struct LoadedBasis {
    values: HashMap<String, f64>,
}

impl LoadedBasis {
    /// Load the basis file from an assumptions directory
    pub fn load_from(path: &Path) -> Result<Self> {
        let file = File::open(path.join(BASIS_FILE))?;
        Self::from_reader(file)
    }

    /// Load from any reader containing the `parameter,value` CSV
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut values = HashMap::new();

        for result in reader.records() {
            let record = result?;
            let name = record
                .get(0)
                .ok_or_else(|| ValuationError::Parse("missing parameter name".to_string()))?;
            let raw = record
                .get(1)
                .ok_or_else(|| ValuationError::Parse(format!("missing value for {}", name)))?;

            if !KNOWN_PARAMETERS.contains(&name) {
                return Err(ValuationError::invalid(format!("unknown basis parameter: {}", name)));
            }
            let value: f64 = raw.parse()?;
            values.insert(name.to_string(), value);
        }

        Ok(Self { values })
    }

    /// Value for a parameter, if present in the file
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Value for a parameter that must be a non-negative integer fitting `T`
    pub fn get_count<T: TryFrom<u64>>(&self, name: &str) -> Result<Option<T>> {
        let v = match self.get(name) {
            None => return Ok(None),
            Some(v) => v,
        };
        if !(v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v < u64::MAX as f64) {
            return Err(ValuationError::invalid(format!(
                "{} must be a non-negative integer, got {}",
                name, v
            )));
        }
        T::try_from(v as u64).map(Some).map_err(|_| {
            ValuationError::invalid(format!("{} is out of range, got {}", name, v))
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_reader() {
        let csv = "parameter,value\nA,0.0003\nomega,110\nsimpson_steps,200\n";
        let basis = LoadedBasis::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(basis.len(), 3);
        assert_eq!(basis.get("A"), Some(0.0003));
        assert_eq!(basis.get_count::<usize>("simpson_steps").unwrap(), Some(200));
        assert_eq!(basis.get("B"), None);
    }

    #[test]
    fn test_unknown_parameter_rejected() {
        let csv = "parameter,value\nlapse_rate,0.05\n";
        let err = LoadedBasis::from_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ValuationError::InvalidInput(_)));
    }

    #[test]
    fn test_non_numeric_value_rejected() {
        let csv = "parameter,value\nA,abc\n";
        assert!(matches!(
            LoadedBasis::from_reader(csv.as_bytes()),
            Err(ValuationError::Parse(_))
        ));
    }

    #[test]
    fn test_fractional_count_rejected() {
        let csv = "parameter,value\nterm_years,15.5\n";
        let basis = LoadedBasis::from_reader(csv.as_bytes()).unwrap();
        assert!(basis.get_count::<u32>("term_years").is_err());
    }

    #[test]
    fn test_oversized_count_rejected() {
        let csv = "parameter,value\nterm_years,4294967311\n";
        let basis = LoadedBasis::from_reader(csv.as_bytes()).unwrap();
        assert!(matches!(
            basis.get_count::<u32>("term_years"),
            Err(ValuationError::InvalidInput(_))
        ));
        assert_eq!(basis.get_count::<u64>("term_years").unwrap(), Some(4_294_967_311));
    }

    #[test]
    fn test_load_default_basis_file() {
        let basis = LoadedBasis::load_from(Path::new(DEFAULT_ASSUMPTIONS_PATH));
        assert!(basis.is_ok(), "Failed to load basis: {:?}", basis.err());
        let basis = basis.unwrap();
        assert_eq!(basis.get("c"), Some(1.124));
        assert_eq!(basis.get("i_expense"), Some(0.02439));
    }
}
