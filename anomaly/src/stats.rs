/// Number of most recent samples a scorer looks at.
pub const WINDOW: usize = 10;

/// Added to denominators that may be zero.
pub const EPSILON: f64 = 1e-6;

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation around a precomputed mean.
pub fn std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|x| (x - mean).powi(2)).sum::<f64>()
        / values.len() as f64;
    variance.sqrt()
}

/// Standard deviation relative to the mean, capped at 1. A window whose mean is not positive
/// (e.g. no traffic at all) has no meaningful variation and scores 0.
pub fn coefficient_of_variation(values: &[f64]) -> f64 {
    let mean = mean(values);
    if mean <= 0.0 {
        return 0.0;
    }
    clamp_01(std_dev(values, mean) / (mean + EPSILON))
}

/// Clamps into 0..=1, mapping NaN to 0.
pub fn clamp_01(x: f64) -> f64 {
    if x.is_nan() { 0.0 } else { x.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn population_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let m = mean(&values);
        assert_eq!(m, 5.0);
        assert_eq!(std_dev(&values, m), 2.0);
    }

    #[test]
    fn coefficient_of_variation_edge_cases() {
        assert_eq!(coefficient_of_variation(&[0.0; 10]), 0.0);
        assert_eq!(coefficient_of_variation(&[5.0; 10]), 0.0);
        assert_eq!(coefficient_of_variation(&[0.0, 0.0, 0.0, 1e9]), 1.0);
    }

    #[test]
    fn clamp_handles_nan_and_infinity() {
        assert_eq!(clamp_01(f64::NAN), 0.0);
        assert_eq!(clamp_01(f64::INFINITY), 1.0);
        assert_eq!(clamp_01(-3.0), 0.0);
        assert_eq!(clamp_01(0.25), 0.25);
    }
}
