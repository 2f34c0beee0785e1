//! Benjamini-Hochberg false discovery rate correction.

/// Benjamini-Hochberg adjusted p-values.
///
/// For p-values sorted ascending, the adjusted value at rank i is
/// `min(p[i] * n / i, adjusted[i + 1])`, capped at 1. Non-finite p-values
/// are not counted as tests and keep a `NaN` adjusted value.
pub fn adjust_bh(p_values: &[f64]) -> Vec<f64> {
    let mut adjusted = vec![f64::NAN; p_values.len()];

    // Sorted index over testable p-values
    let mut indices: Vec<usize> = (0..p_values.len())
        .filter(|&i| p_values[i].is_finite())
        .collect();
    let n = indices.len();
    if n == 0 {
        return adjusted;
    }
    indices.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]));

    let n_f64 = n as f64;
    let mut running_min = 1.0f64;

    // Work backwards from the largest p-value
    for i in (0..n).rev() {
        let rank = (i + 1) as f64;
        let value = p_values[indices[i]] * n_f64 / rank;
        running_min = running_min.min(value);
        adjusted[indices[i]] = running_min;
    }

    adjusted
}
