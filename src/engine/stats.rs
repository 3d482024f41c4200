//! Shared statistics helpers.
//!
//! Every grouped pass uses the same population variance:
//! `(Σv²)/n − (Σv/n)²`. The form is numerically naive (large-magnitude
//! values lose precision to cancellation) but matches plain SQL aggregation;
//! outputs are defined up to floating-point tolerance, not bit-exactness.

use statrs::statistics::Statistics;

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().mean())
    }
}

/// Population variance (denominator `n`), naive sum-of-squares form.
/// `None` for an empty slice; exactly `0.0`-ish for a single sample.
pub fn population_variance(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let sum: f64 = values.iter().sum();
    let sum_sq: f64 = values.iter().map(|v| v * v).sum();
    Some(sum_sq / n - (sum / n) * (sum / n))
}

/// Sample standard deviation (denominator `n − 1`). `None` below two samples.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        None
    } else {
        Some(values.iter().std_dev())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_empty_is_undefined() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[4.0]), Some(4.0));
    }

    #[test]
    fn test_population_variance_known_values() {
        // Values 2,4,4,4,5,5,7,9 have population variance 4.
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let var = population_variance(&values).unwrap();
        assert!((var - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_population_variance_single_sample_is_zero() {
        let var = population_variance(&[123.456]).unwrap();
        assert!(var.abs() < 1e-9);
    }

    #[test]
    fn test_population_variance_non_negative() {
        let values = [1e6, 1e6 + 1.0, 1e6 + 2.0];
        let var = population_variance(&values).unwrap();
        assert!(var >= -1e-6);
    }

    #[test]
    fn test_sample_std_pair() {
        // For two values the sample std is |a - b| / sqrt(2).
        let std = sample_std(&[10.0, 14.0]).unwrap();
        assert!((std - 4.0 / 2.0_f64.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_sample_std_undefined_below_two() {
        assert_eq!(sample_std(&[5.0]), None);
        assert_eq!(sample_std(&[]), None);
    }
}
