//! Gompertz-Makeham mortality law
//!
//! The closed form gives survival and hazard at any real age, so no table
//! lookup or fractional-age interpolation is needed:
//! - Survival function: S(x) = s^x * g^(c^x), with s = exp(-A), g = exp(-B / ln c)
//! - t-year survival: tpx = S(x + t) / S(x)
//! - Force of mortality: mu(x) = A + B * c^x

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValuationError};

/// Gompertz-Makeham mortality parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GompertzMakeham {
    /// Age-independent (accident) hazard
    pub a: f64,

    /// Senescent hazard scale
    pub b: f64,

    /// Senescent hazard growth per year of age
    pub c: f64,

    /// Limiting age; contracts reaching it are declined
    pub omega: f64,
}

impl GompertzMakeham {
    /// Create a validated parameter set
    pub fn new(a: f64, b: f64, c: f64, omega: f64) -> Result<Self> {
        let law = Self { a, b, c, omega };
        law.validate()?;
        Ok(law)
    }

    /// Reference basis used for pricing
    pub fn reference() -> Self {
        Self {
            a: 0.00022,
            b: 2.7e-6,
            c: 1.124,
            omega: 120.0,
        }
    }

    /// Check A >= 0, B >= 0, c > 1 and a positive limiting age
    pub fn validate(&self) -> Result<()> {
        if !(self.a.is_finite() && self.a >= 0.0) {
            return Err(ValuationError::invalid(format!("mortality A must be >= 0, got {}", self.a)));
        }
        if !(self.b.is_finite() && self.b >= 0.0) {
            return Err(ValuationError::invalid(format!("mortality B must be >= 0, got {}", self.b)));
        }
        if !(self.c.is_finite() && self.c > 1.0) {
            return Err(ValuationError::invalid(format!("mortality c must be > 1, got {}", self.c)));
        }
        if !(self.omega.is_finite() && self.omega > 0.0) {
            return Err(ValuationError::invalid(format!(
                "limiting age omega must be > 0, got {}",
                self.omega
            )));
        }
        Ok(())
    }

    /// Scale both hazard components, e.g. 1.1 for a 10% mortality stress
    pub fn stressed(&self, multiplier: f64) -> Self {
        Self {
            a: self.a * multiplier,
            b: self.b * multiplier,
            ..*self
        }
    }

    fn s_const(&self) -> f64 {
        (-self.a).exp()
    }

    fn g_const(&self) -> f64 {
        (-self.b / self.c.ln()).exp()
    }

    /// Survival function S(x) from birth to age x
    pub fn survival_factor(&self, x: f64) -> f64 {
        self.s_const().powf(x) * self.g_const().powf(self.c.powf(x))
    }

    /// Probability that a life aged x survives t more years (tpx)
    ///
    /// Returns 0 when S(x) has underflowed rather than propagating NaN.
    pub fn survival_probability(&self, x: f64, t: f64) -> f64 {
        let sx = self.survival_factor(x);
        if sx == 0.0 {
            return 0.0;
        }
        self.survival_factor(x + t) / sx
    }

    /// Unchecked force of mortality mu(x) = A + B * c^x
    ///
    /// Used inside integrands, where the age range has already been checked
    /// with [`GompertzMakeham::check_age`].
    pub fn hazard(&self, x: f64) -> f64 {
        self.a + self.b * self.c.powf(x)
    }

    /// Force of mortality mu(x), failing if c^x overflows
    pub fn force_of_mortality(&self, x: f64) -> Result<f64> {
        if !x.is_finite() {
            return Err(ValuationError::invalid(format!("age must be finite, got {}", x)));
        }
        let mu = self.hazard(x);
        if !mu.is_finite() {
            return Err(ValuationError::NumericInstability {
                age: x,
                detail: format!("force of mortality overflows (c^x with c = {})", self.c),
            });
        }
        Ok(mu)
    }

    /// Check that every age in [x, x + n] can be evaluated
    ///
    /// The hazard is increasing in age, so checking the upper end is enough.
    pub fn check_age(&self, x: f64, n: f64) -> Result<()> {
        if !(x.is_finite() && x >= 0.0) {
            return Err(ValuationError::invalid(format!("age must be finite and >= 0, got {}", x)));
        }
        self.force_of_mortality(x + n).map(|_| ())
    }

    /// Whether a contract from `issue_age` for `term_years` ends before omega
    pub fn is_insurable(&self, issue_age: u32, term_years: u32) -> bool {
        ((issue_age + term_years) as f64) < self.omega
    }
}

impl Default for GompertzMakeham {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_survival_factor_at_birth() {
        let law = GompertzMakeham::reference();
        // S(0) = g^(c^0) = g
        let expected = (-law.b / law.c.ln()).exp();
        assert_relative_eq!(law.survival_factor(0.0), expected, epsilon = 1e-15);
    }

    #[test]
    fn test_survival_probability_matches_hazard_integral() {
        // tpx = exp(-A t - B c^x (c^t - 1) / ln c)
        let law = GompertzMakeham::reference();
        let (x, t) = (40.0, 10.5);
        let expected =
            (-law.a * t - law.b * law.c.powf(x) * (law.c.powf(t) - 1.0) / law.c.ln()).exp();
        assert_relative_eq!(law.survival_probability(x, t), expected, max_relative = 1e-10);
    }

    #[test]
    fn test_zero_duration_survival_is_one() {
        let law = GompertzMakeham::reference();
        assert_relative_eq!(law.survival_probability(55.0, 0.0), 1.0, epsilon = 1e-15);
    }

    #[test]
    fn test_underflowed_survival_returns_zero() {
        let law = GompertzMakeham::reference();
        // c^x overflows long before this, driving S(x) to exactly 0
        assert_eq!(law.survival_factor(10_000.0), 0.0);
        assert_eq!(law.survival_probability(10_000.0, 1.0), 0.0);
    }

    #[test]
    fn test_force_of_mortality() {
        let law = GompertzMakeham::reference();
        let mu = law.force_of_mortality(30.0).unwrap();
        assert_relative_eq!(mu, 0.00022 + 2.7e-6 * 1.124_f64.powf(30.0), epsilon = 1e-15);
    }

    #[test]
    fn test_force_of_mortality_overflow() {
        let law = GompertzMakeham::reference();
        let err = law.force_of_mortality(10_000.0).unwrap_err();
        assert!(matches!(err, ValuationError::NumericInstability { .. }));
        assert!(law.check_age(9_990.0, 15.0).is_err());
        assert!(law.check_age(30.0, 15.0).is_ok());
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        assert!(GompertzMakeham::new(-0.1, 2.7e-6, 1.124, 120.0).is_err());
        assert!(GompertzMakeham::new(0.00022, 2.7e-6, 1.0, 120.0).is_err());
        assert!(GompertzMakeham::new(0.00022, f64::NAN, 1.124, 120.0).is_err());
        assert!(GompertzMakeham::new(0.00022, 2.7e-6, 1.124, 120.0).is_ok());
    }

    #[test]
    fn test_insurable_boundary() {
        let law = GompertzMakeham::reference();
        assert!(law.is_insurable(104, 15)); // 119 < 120
        assert!(!law.is_insurable(105, 15)); // 120
    }

    #[test]
    fn test_stress_increases_mortality() {
        let law = GompertzMakeham::reference();
        let stressed = law.stressed(1.2);
        assert!(stressed.survival_probability(50.0, 10.0) < law.survival_probability(50.0, 10.0));
        assert_relative_eq!(stressed.hazard(50.0), 1.2 * law.hazard(50.0), max_relative = 1e-12);
    }

    proptest! {
        #[test]
        fn prop_survival_monotone_in_duration(
            x in 0.0f64..110.0,
            t1 in 0.0f64..40.0,
            dt in 0.0f64..40.0,
        ) {
            let law = GompertzMakeham::reference();
            let p1 = law.survival_probability(x, t1);
            let p2 = law.survival_probability(x, t1 + dt);
            prop_assert!(p2 <= p1 + 1e-12);
        }

        #[test]
        fn prop_survival_factor_decreasing_in_age(
            a in 0.0f64..0.01,
            b in 0.0f64..1e-3,
            c in 1.01f64..1.2,
            x in 0.0f64..200.0,
            dx in 0.0f64..50.0,
        ) {
            let law = GompertzMakeham::new(a, b, c, 120.0).unwrap();
            let s1 = law.survival_factor(x);
            let s2 = law.survival_factor(x + dx);
            prop_assert!(s2 >= 0.0);
            prop_assert!(s2 <= s1 * (1.0 + 1e-12), "S({}) = {} > S({}) = {}", x + dx, s2, x, s1);
        }

        #[test]
        fn prop_survival_within_unit_interval(x in 0.0f64..150.0, t in 0.0f64..80.0) {
            let law = GompertzMakeham::reference();
            let p = law.survival_probability(x, t);
            prop_assert!(p >= 0.0);
            prop_assert!(p <= 1.0 + 1e-12);
        }
    }
}
