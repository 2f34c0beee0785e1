//! Sample median normalization.

use crate::data::ProteinTable;
use crate::error::{LfqError, Result};
use crate::stats::nan_median;

/// Scale every sample so that all sample medians equal the largest one.
///
/// Each column is multiplied by `max_median / median`, computed over the
/// observed values. Missing cells stay missing.
pub fn normalize_median(table: &ProteinTable) -> Result<ProteinTable> {
    let medians = sample_medians(table);

    if let Some(col) = medians.iter().position(|m| !m.is_finite() || *m == 0.0) {
        return Err(LfqError::Numerical(format!(
            "Sample '{}' has no usable median",
            table.sample_names()[col]
        )));
    }

    let max_median = medians.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    log::debug!("Normalizing sample medians to {:.3}", max_median);

    let mut normalized = table.intensities().clone();
    for (col, median) in medians.iter().enumerate() {
        let factor = max_median / median;
        normalized.column_mut(col).iter_mut().for_each(|v| *v *= factor);
    }
    table.with_intensities(normalized)
}

/// Median of every sample column.
pub fn sample_medians(table: &ProteinTable) -> Vec<f64> {
    (0..table.n_samples())
        .map(|col| nan_median(table.column(col)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;

    #[test]
    fn test_normalize_median() {
        let table = ProteinTable::from_intensities(
            DMatrix::from_row_slice(3, 2, &[10.0, 20.0, 20.0, 40.0, f64::NAN, 30.0]),
            vec![0, 1, 2],
            vec!["a".into(), "b".into()],
        )
        .unwrap();

        // medians: a = 15, b = 30
        let normalized = normalize_median(&table).unwrap();
        let medians = sample_medians(&normalized);
        assert_relative_eq!(medians[0], 30.0);
        assert_relative_eq!(medians[1], 30.0);
        assert_relative_eq!(normalized.get(0, 0).unwrap(), 20.0);
        assert_eq!(normalized.get(2, 0), None);
    }

    #[test]
    fn test_empty_column() {
        let table = ProteinTable::from_intensities(
            DMatrix::from_row_slice(1, 2, &[10.0, f64::NAN]),
            vec![0],
            vec!["a".into(), "b".into()],
        )
        .unwrap();
        assert!(matches!(
            normalize_median(&table),
            Err(LfqError::Numerical(_))
        ));
    }
}
