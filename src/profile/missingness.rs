//! Missing value profiling for protein tables.

use crate::data::ProteinTable;
use serde::{Deserialize, Serialize};

/// Profile of missing values in a protein table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingnessProfile {
    /// Number of proteins (rows).
    pub n_proteins: usize,
    /// Sample names in column order.
    pub sample_names: Vec<String>,
    /// Observed values per sample.
    pub observed_per_sample: Vec<usize>,
    /// Fraction of missing values per sample.
    pub missing_fraction_per_sample: Vec<f64>,
    /// Fraction of missing cells over the whole table.
    pub missing_fraction: f64,
    /// Rows without any missing value.
    pub n_complete: usize,
    /// Rows without any observed value.
    pub n_all_missing: usize,
    /// `missing_histogram[k]` = number of rows with exactly k missing values.
    pub missing_histogram: Vec<usize>,
}

impl MissingnessProfile {
    /// Check if more than a fifth of all values are missing.
    pub fn is_highly_missing(&self) -> bool {
        self.missing_fraction > 0.2
    }

    /// Rows with at least one missing and at least one observed value.
    pub fn n_partial(&self) -> usize {
        self.n_proteins - self.n_complete - self.n_all_missing
    }

    /// Names of samples missing more than `threshold` of their values.
    pub fn samples_above(&self, threshold: f64) -> Vec<&str> {
        self.sample_names
            .iter()
            .zip(&self.missing_fraction_per_sample)
            .filter(|(_, &f)| f > threshold)
            .map(|(s, _)| s.as_str())
            .collect()
    }
}

impl std::fmt::Display for MissingnessProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Missingness Profile")?;
        writeln!(f, "  Proteins:           {}", self.n_proteins)?;
        writeln!(f, "  Samples:            {}", self.sample_names.len())?;
        writeln!(f, "  Missing overall:    {:.2}%", self.missing_fraction * 100.0)?;
        writeln!(f, "  Complete rows:      {}", self.n_complete)?;
        writeln!(f, "  Partial rows:       {}", self.n_partial())?;
        writeln!(f, "  All-missing rows:   {}", self.n_all_missing)?;
        writeln!(f, "  Per sample:")?;
        for ((name, observed), fraction) in self
            .sample_names
            .iter()
            .zip(&self.observed_per_sample)
            .zip(&self.missing_fraction_per_sample)
        {
            writeln!(
                f,
                "    {:<20} {:>6} observed  {:>6.2}% missing",
                name,
                observed,
                fraction * 100.0
            )?;
        }
        Ok(())
    }
}

/// Profile missing values of a protein table.
pub fn profile_missingness(table: &ProteinTable) -> MissingnessProfile {
    let n_proteins = table.n_proteins();
    let n_samples = table.n_samples();

    let observed_per_sample: Vec<usize> = (0..n_samples)
        .map(|col| table.column_observed(col).len())
        .collect();
    let missing_fraction_per_sample = observed_per_sample
        .iter()
        .map(|&obs| fraction(n_proteins - obs, n_proteins))
        .collect();

    let mut missing_histogram = vec![0usize; n_samples + 1];
    for row in 0..n_proteins {
        missing_histogram[n_samples - table.observed_in_row(row)] += 1;
    }

    MissingnessProfile {
        n_proteins,
        sample_names: table.sample_names().to_vec(),
        observed_per_sample,
        missing_fraction_per_sample,
        missing_fraction: fraction(table.n_missing(), n_proteins * n_samples),
        n_complete: missing_histogram[0],
        n_all_missing: if n_samples == 0 { 0 } else { missing_histogram[n_samples] },
        missing_histogram,
    }
}

fn fraction(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;

    fn create_test_table() -> ProteinTable {
        let nan = f64::NAN;
        // 4 proteins × 3 samples
        ProteinTable::from_intensities(
            DMatrix::from_row_slice(
                4,
                3,
                &[
                    20.0, 21.0, 22.0, //
                    nan, 21.5, 22.5, //
                    nan, nan, nan, //
                    19.0, nan, 20.0,
                ],
            ),
            (0..4).collect(),
            vec!["S1".into(), "S2".into(), "S3".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_profile_missingness() {
        let profile = profile_missingness(&create_test_table());

        assert_eq!(profile.n_proteins, 4);
        assert_eq!(profile.observed_per_sample, vec![2, 2, 3]);
        assert_relative_eq!(profile.missing_fraction, 5.0 / 12.0, epsilon = 1e-12);
        assert_relative_eq!(profile.missing_fraction_per_sample[0], 0.5, epsilon = 1e-12);
        assert_eq!(profile.n_complete, 1);
        assert_eq!(profile.n_all_missing, 1);
        assert_eq!(profile.n_partial(), 2);
        assert_eq!(profile.missing_histogram, vec![1, 2, 0, 1]);
        assert!(profile.is_highly_missing());
    }

    #[test]
    fn test_samples_above() {
        let profile = profile_missingness(&create_test_table());
        assert_eq!(profile.samples_above(0.4), vec!["S1", "S2"]);
        assert!(profile.samples_above(0.9).is_empty());
    }

    #[test]
    fn test_display() {
        let text = profile_missingness(&create_test_table()).to_string();
        assert!(text.contains("Missingness Profile"));
        assert!(text.contains("S3"));
    }
}
