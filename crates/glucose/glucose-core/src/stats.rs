//! Window statistics shared by the feature builders and the fallback path.

/// Arithmetic mean; 0.0 for an empty slice.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().sum::<f64>() / data.len() as f64
}

/// True when every value equals the first; vacuously true when empty.
pub fn is_constant(data: &[f64]) -> bool {
    data.iter().all(|&x| x == data[0])
}

/// Population standard deviation; exactly 0.0 for an empty or constant slice.
pub fn std_dev(data: &[f64]) -> f64 {
    if is_constant(data) {
        return 0.0;
    }
    let m = mean(data);
    (data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / data.len() as f64).sqrt()
}

/// Least-squares slope of value against index `0..n`.
///
/// Fewer than two points, a constant series, or a degenerate design gives
/// a slope of 0.
pub fn slope(data: &[f64]) -> f64 {
    if data.len() < 2 || is_constant(data) {
        return 0.0;
    }

    let n = data.len() as f64;
    let sum_t: f64 = (0..data.len()).map(|i| i as f64).sum();
    let sum_y: f64 = data.iter().sum();
    let sum_t2: f64 = (0..data.len()).map(|i| (i * i) as f64).sum();
    let sum_ty: f64 = data.iter().enumerate().map(|(i, &y)| i as f64 * y).sum();

    let denominator = n * sum_t2 - sum_t * sum_t;
    if denominator.abs() < 1e-10 {
        return 0.0;
    }
    (n * sum_ty - sum_t * sum_y) / denominator
}

/// Z-score each value against the slice's own mean and standard deviation.
///
/// `epsilon` is added to the deviation. A constant window maps to exact zeros.
pub fn z_normalize(data: &[f64], epsilon: f64) -> Vec<f64> {
    if is_constant(data) {
        return vec![0.0; data.len()];
    }
    let m = mean(data);
    let s = std_dev(data);
    data.iter().map(|&x| (x - m) / (s + epsilon)).collect()
}

/// Standard deviation over mean; 0.0 when the mean is not positive.
pub fn coefficient_of_variation(data: &[f64]) -> f64 {
    let m = mean(data);
    if m <= 0.0 {
        return 0.0;
    }
    std_dev(data) / m
}

/// First-order differences.
pub fn differences(data: &[f64]) -> Vec<f64> {
    data.windows(2).map(|w| w[1] - w[0]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_std() {
        let data = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&data), 5.0);
        assert_eq!(std_dev(&data), 2.0);
    }

    #[test]
    fn test_empty_inputs() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(std_dev(&[]), 0.0);
        assert_eq!(slope(&[]), 0.0);
        assert!(differences(&[]).is_empty());
    }

    #[test]
    fn test_slope_of_line() {
        let data = [10.0, 12.0, 14.0, 16.0, 18.0];
        assert!((slope(&data) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_slope_of_single_point_is_zero() {
        assert_eq!(slope(&[120.0]), 0.0);
    }

    #[test]
    fn test_constant_window_normalizes_to_zero() {
        let normalized = z_normalize(&[100.0; 12], 1e-6);
        assert!(normalized.iter().all(|&v| v == 0.0));
        assert_eq!(slope(&[100.0; 12]), 0.0);
    }

    #[test]
    fn test_inexact_mean_constant_window_is_exactly_zero() {
        let window = [115.3; 12];
        assert!(z_normalize(&window, 1e-6).iter().all(|&v| v == 0.0));
        assert_eq!(std_dev(&window), 0.0);
        assert_eq!(slope(&window), 0.0);
        assert_eq!(coefficient_of_variation(&window), 0.0);
    }

    #[test]
    fn test_coefficient_of_variation() {
        assert_eq!(coefficient_of_variation(&[100.0, 100.0]), 0.0);
        let cv = coefficient_of_variation(&[90.0, 110.0]);
        assert!((cv - 0.1).abs() < 1e-12);
        assert_eq!(coefficient_of_variation(&[]), 0.0);
    }
}
