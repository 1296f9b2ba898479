/// Distribution statistics for a continuous metric across N runs.
#[derive(Debug, Clone, PartialEq)]
pub struct DistStats {
    pub n: usize,
    pub min: f64,
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

/// Arithmetic mean. `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n − 1 denominator). Zero for fewer than two values.
pub fn std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let m = values.iter().sum::<f64>() / n as f64;
    (values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
}

/// `numerator / denominator`, or `None` when the denominator is exactly zero.
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 { None } else { Some(numerator / denominator) }
}

/// Sorts `values` in place and summarises them with linearly interpolated percentiles.
pub fn percentile_stats(values: &mut [f64]) -> Option<DistStats> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = values.len();

    let interp = |p: f64| -> f64 {
        let h = p * (n - 1) as f64;
        let lo = h.floor() as usize;
        let hi = (lo + 1).min(n - 1);
        let frac = h - lo as f64;
        values[lo] * (1.0 - frac) + values[hi] * frac
    };

    Some(DistStats {
        n,
        min: values[0],
        p5: interp(0.05),
        p25: interp(0.25),
        p50: interp(0.50),
        p75: interp(0.75),
        p95: interp(0.95),
        max: values[n - 1],
        mean: values.iter().sum::<f64>() / n as f64,
        std_dev: std_dev(values),
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn percentile_stats_known_values() {
        let mut values = vec![5.0, 1.0, 4.0, 2.0, 3.0];
        let ds = percentile_stats(&mut values).unwrap();
        assert_eq!(ds.n, 5);
        assert_relative_eq!(ds.min, 1.0);
        assert_relative_eq!(ds.max, 5.0);
        assert_relative_eq!(ds.p50, 3.0);
        assert_relative_eq!(ds.p25, 2.0);
        assert_relative_eq!(ds.mean, 3.0);
        assert_relative_eq!(ds.std_dev, 2.5_f64.sqrt());
    }

    #[test]
    fn percentile_interpolates_between_ranks() {
        // p50 of [0.5, 1.0]: h = 0.5, lo = 0, hi = 1 → 0.75
        let mut values = vec![1.0, 0.5];
        let ds = percentile_stats(&mut values).unwrap();
        assert_relative_eq!(ds.p50, 0.75);
    }

    #[test]
    fn percentile_stats_empty_returns_none() {
        let mut values: Vec<f64> = vec![];
        assert!(percentile_stats(&mut values).is_none());
    }

    #[test]
    fn mean_of_empty_is_none() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[2.0, 4.0]), Some(3.0));
    }

    #[test]
    fn std_dev_of_single_value_is_zero() {
        assert_eq!(std_dev(&[7.0]), 0.0);
    }

    #[test]
    fn ratio_guards_zero_denominator() {
        assert_eq!(ratio(1.0, 0.0), None);
        assert_eq!(ratio(0.0, 0.0), None);
        assert_eq!(ratio(3.0, 2.0), Some(1.5));
    }
}
