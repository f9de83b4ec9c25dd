//! Small numeric helpers used by the feature-engineering stage.

/// Mean of a slice; `None` when empty.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator); `None` with fewer than
/// two values.
#[must_use]
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}

/// Percentile with linear interpolation between closest ranks.
///
/// `p` must lie in (0, 1); `None` when the slice is empty.
#[must_use]
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let rank = p * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let weight = rank - lo as f64;
    Some(sorted[lo] * (1.0 - weight) + sorted[hi] * weight)
}

/// Round to 2 decimal places, the precision of all monetary outputs.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
    }

    #[test]
    fn sample_std_needs_two_values() {
        assert_eq!(sample_std(&[5.0]), None);
        // std of {2, 4} = sqrt(2)
        let std = sample_std(&[2.0, 4.0]).unwrap();
        assert!((std - std::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn percentile_interpolates_linearly() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&values, 0.5), Some(3.0));
        assert_eq!(percentile(&values, 0.8), Some(4.2));
        assert_eq!(percentile(&[7.0], 0.8), Some(7.0));
        assert_eq!(percentile(&[], 0.8), None);
    }

    #[test]
    fn round2_rounds_half_away() {
        assert_eq!(round2(1.005 + 1e-9), 1.01);
        assert_eq!(round2(13.4), 13.4);
    }
}
