//! Small descriptive statistics over values where `NaN` marks a missing cell.

/// Mean of the non-missing values, `NaN` when there are none.
pub(crate) fn nan_mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, n) = values
        .into_iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}

/// Sample standard deviation (n - 1) of the non-missing values.
///
/// `NaN` with fewer than two values.
pub(crate) fn nan_std(values: impl IntoIterator<Item = f64>) -> f64 {
    let observed: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
    if observed.len() < 2 {
        return f64::NAN;
    }
    let n = observed.len() as f64;
    let mean = observed.iter().sum::<f64>() / n;
    let ss: f64 = observed.iter().map(|v| (v - mean).powi(2)).sum();
    (ss / (n - 1.0)).sqrt()
}

/// Mean and sample standard deviation of the non-missing values.
pub(crate) fn nan_mean_std(values: &[f64]) -> (f64, f64) {
    (
        nan_mean(values.iter().copied()),
        nan_std(values.iter().copied()),
    )
}

/// Median of the non-missing values.
pub(crate) fn nan_median(values: impl IntoIterator<Item = f64>) -> f64 {
    let mut sorted: Vec<f64> = values.into_iter().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return f64::NAN;
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Pearson correlation over the positions where both values are present.
///
/// `NaN` with fewer than two shared positions or zero variance.
pub(crate) fn pearson_pairwise(x: &[f64], y: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter(|(a, b)| !a.is_nan() && !b.is_nan())
        .map(|(&a, &b)| (a, b))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }
    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let mut sxy = 0.0;
    let mut sxx = 0.0;
    let mut syy = 0.0;
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    sxy / (sxx * syy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_nan_mean_skips_missing() {
        assert_relative_eq!(nan_mean([1.0, f64::NAN, 3.0]), 2.0);
        assert!(nan_mean([f64::NAN]).is_nan());
    }

    #[test]
    fn test_nan_std_sample() {
        // var = ((1-2.5)^2 + (2-2.5)^2 + (3-2.5)^2 + (4-2.5)^2) / 3 = 5/3
        assert_relative_eq!(nan_std([1.0, 2.0, 3.0, 4.0]), (5.0f64 / 3.0).sqrt());
        assert!(nan_std([1.0, f64::NAN]).is_nan());
    }

    #[test]
    fn test_nan_median() {
        assert_relative_eq!(nan_median([3.0, 1.0, f64::NAN, 2.0]), 2.0);
        assert_relative_eq!(nan_median([4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_pearson_pairwise() {
        let x = [1.0, 2.0, 3.0, f64::NAN];
        let y = [2.0, 4.0, 6.0, 1.0];
        assert_relative_eq!(pearson_pairwise(&x, &y), 1.0, epsilon = 1e-12);

        let z = [3.0, 2.0, 1.0, 0.0];
        assert_relative_eq!(pearson_pairwise(&x, &z), -1.0, epsilon = 1e-12);

        assert!(pearson_pairwise(&[1.0, f64::NAN], &[1.0, 2.0]).is_nan());
    }
}
