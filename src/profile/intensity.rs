//! Intensity distribution profiling per sample.

use crate::data::ProteinTable;
use crate::stats::{nan_mean, nan_median, nan_std};
use serde::{Deserialize, Serialize};

/// Distribution summary of one sample's observed intensities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleIntensity {
    /// Sample name.
    pub sample: String,
    /// Number of observed values.
    pub n: usize,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

/// Per-sample intensity distributions of a protein table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntensityProfile {
    /// One entry per sample, in column order.
    pub samples: Vec<SampleIntensity>,
}

impl IntensityProfile {
    /// Largest difference between two sample medians.
    ///
    /// Close to zero after median normalization.
    pub fn median_spread(&self) -> f64 {
        let medians = self.samples.iter().map(|s| s.median).filter(|m| m.is_finite());
        let (lo, hi) = medians.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), m| {
            (lo.min(m), hi.max(m))
        });
        if lo > hi {
            f64::NAN
        } else {
            hi - lo
        }
    }

    /// Summary of a single sample by name.
    pub fn get(&self, sample: &str) -> Option<&SampleIntensity> {
        self.samples.iter().find(|s| s.sample == sample)
    }
}

impl std::fmt::Display for IntensityProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Intensity Profile")?;
        writeln!(
            f,
            "  {:<20} {:>6} {:>10} {:>10} {:>8} {:>10} {:>10}",
            "sample", "n", "mean", "median", "std", "min", "max"
        )?;
        for s in &self.samples {
            writeln!(
                f,
                "  {:<20} {:>6} {:>10.3} {:>10.3} {:>8.3} {:>10.3} {:>10.3}",
                s.sample, s.n, s.mean, s.median, s.std_dev, s.min, s.max
            )?;
        }
        writeln!(f, "  Median spread: {:.3}", self.median_spread())?;
        Ok(())
    }
}

/// Profile per-sample intensity distributions.
///
/// Samples without observed values report `NaN` statistics.
pub fn profile_intensity(table: &ProteinTable) -> IntensityProfile {
    let samples = table
        .sample_names()
        .iter()
        .enumerate()
        .map(|(col, name)| {
            let observed = table.column_observed(col);
            let (min, max) = if observed.is_empty() {
                (f64::NAN, f64::NAN)
            } else {
                observed
                    .iter()
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                        (lo.min(v), hi.max(v))
                    })
            };
            SampleIntensity {
                sample: name.clone(),
                n: observed.len(),
                mean: nan_mean(observed.iter().copied()),
                median: nan_median(observed.iter().copied()),
                std_dev: nan_std(observed.iter().copied()),
                min,
                max,
            }
        })
        .collect();

    IntensityProfile { samples }
}
