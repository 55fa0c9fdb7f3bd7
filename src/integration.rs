//! Composite Simpson's rule quadrature
//!
//! Approximates the integral of f(t, x) for t over [0, n], where x is an
//! anchor age held fixed across the integral. Error is O(h^4) for smooth
//! integrands.

use crate::error::{Result, ValuationError};

/// Default number of subintervals
pub const DEFAULT_STEPS: usize = 100;

/// Integrate `f(t, x)` over `t` in `[0, n]` with `steps` equal subintervals
///
/// Weights are 1 at the endpoints, 4 at odd interior nodes and 2 at even
/// interior nodes, scaled by h / 3. `steps` must be even and at least 2;
/// odd counts are rejected rather than rounded.
///
/// A zero-width interval returns 0 without evaluating `f`.
pub fn simpson<F>(f: F, x: f64, n: f64, steps: usize) -> Result<f64>
where
    F: Fn(f64, f64) -> f64,
{
    if steps < 2 || steps % 2 != 0 {
        return Err(ValuationError::InvalidStepCount(steps));
    }
    if !(n.is_finite() && n >= 0.0) {
        return Err(ValuationError::invalid(format!(
            "upper integration limit must be finite and >= 0, got {}",
            n
        )));
    }
    if n == 0.0 {
        return Ok(0.0);
    }

    let h = n / steps as f64;
    let mut sum = f(0.0, x) + f(n, x);
    for k in 1..steps {
        let weight = if k % 2 == 0 { 2.0 } else { 4.0 };
        sum += weight * f(k as f64 * h, x);
    }

    Ok(h / 3.0 * sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_exact_for_cubics() {
        // integral of t^3 - 2t + 1 over [0, 4] = 64 - 16 + 4 = 52
        let value = simpson(|t, _| t * t * t - 2.0 * t + 1.0, 0.0, 4.0, 2).unwrap();
        assert_relative_eq!(value, 52.0, epsilon = 1e-12);
    }

    #[test]
    fn test_exponential_integral() {
        let delta = 0.05_f64.ln_1p();
        let value = simpson(|t, _| (-delta * t).exp(), 0.0, 15.0, DEFAULT_STEPS).unwrap();
        let expected = (1.0 - (-delta * 15.0).exp()) / delta;
        assert_relative_eq!(value, expected, max_relative = 1e-10);
    }

    #[test]
    fn test_anchor_is_passed_through() {
        let value = simpson(|_, x| x, 7.0, 3.0, 10).unwrap();
        assert_relative_eq!(value, 21.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_width_skips_evaluation() {
        let value = simpson(|_, _| panic!("integrand must not be evaluated"), 30.0, 0.0, 100).unwrap();
        assert_eq!(value, 0.0);
    }

    #[test]
    fn test_invalid_step_counts() {
        assert!(matches!(simpson(|t, _| t, 0.0, 1.0, 0), Err(ValuationError::InvalidStepCount(0))));
        assert!(matches!(simpson(|t, _| t, 0.0, 1.0, 1), Err(ValuationError::InvalidStepCount(1))));
        assert!(matches!(simpson(|t, _| t, 0.0, 1.0, 99), Err(ValuationError::InvalidStepCount(99))));
    }

    #[test]
    fn test_negative_limit_rejected() {
        assert!(matches!(simpson(|t, _| t, 0.0, -1.0, 10), Err(ValuationError::InvalidInput(_))));
        assert!(simpson(|t, _| t, 0.0, f64::NAN, 10).is_err());
    }

    proptest! {
        #[test]
        fn prop_zero_width_interval_is_zero(x in 0.0f64..120.0, half_steps in 1usize..500) {
            let value = simpson(|t, x| (t + x).sin(), x, 0.0, 2 * half_steps).unwrap();
            prop_assert_eq!(value, 0.0);
        }

        #[test]
        fn prop_doubling_steps_converges(x in 20.0f64..70.0, n in 1.0f64..30.0) {
            let f = |t: f64, x: f64| (-0.05 * t).exp() * (1.0 + 0.01 * (x + t));
            let coarse = simpson(f, x, n, 100).unwrap();
            let fine = simpson(f, x, n, 200).unwrap();
            prop_assert!(((fine - coarse) / fine).abs() < 1e-4);
        }
    }
}
