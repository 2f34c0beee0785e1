//! Relative (reference-replicate) imputation.
//!
//! A missing value of sample `c` is estimated from every sample `r` in which
//! the protein was measured, using how `c` typically deviates from `r`:
//!
//! ```text
//! delta(c, r) = (x_c - x_r) / mean(x_c, x_r)      over proteins measured in both
//! D           ~ Normal(mean(delta), std(delta) / (sqrt(2) * corr))
//! estimate    = x_r * |1 + D|
//! ```
//!
//! where `corr` is the mean Pearson correlation between `r` and the samples
//! missing in that row. The imputed value is the mean of the estimates over
//! all references. Only proteins measured in at least `min_replicates`
//! samples are imputed; everything else is left missing.
//!
//! A reference is unusable when it shares fewer than two measured proteins
//! with the missing sample or its mean correlation is not positive. Cells
//! without a usable reference stay missing.

use crate::data::{ImputedTable, ProteinTable};
use crate::error::{LfqError, Result};
use crate::impute::sample_normal;
use crate::stats::{nan_mean, nan_mean_std, pearson_pairwise};
use nalgebra::DMatrix;
use rand::Rng;
use std::collections::HashMap;
use std::f64::consts::SQRT_2;

/// Default number of measured replicates a protein needs to be imputed.
pub const DEFAULT_MIN_REPLICATES: usize = 2;

/// Distribution of relative deltas between two samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaStats {
    pub mean: f64,
    pub std: f64,
    /// Number of proteins measured in both samples.
    pub n: usize,
}

/// Relative imputation over one table.
///
/// Pairwise delta statistics and mean correlations are cached; the caches
/// live as long as the imputer, i.e. one imputation run.
pub struct RelativeImputer<'a> {
    table: &'a ProteinTable,
    min_replicates: usize,
    correlations: DMatrix<f64>,
    delta_cache: HashMap<(usize, usize), DeltaStats>,
    corr_cache: HashMap<(usize, Vec<usize>), f64>,
    unresolved: usize,
}

impl<'a> RelativeImputer<'a> {
    /// Prepare an imputer, computing the sample correlation matrix.
    pub fn new(table: &'a ProteinTable, min_replicates: usize) -> Result<Self> {
        if min_replicates == 0 {
            return Err(LfqError::InvalidParameter(
                "min_replicates must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            table,
            min_replicates,
            correlations: correlation_matrix(table),
            delta_cache: HashMap::new(),
            corr_cache: HashMap::new(),
            unresolved: 0,
        })
    }

    /// Pearson correlation between two samples (pairwise-complete).
    pub fn correlation(&self, a: usize, b: usize) -> f64 {
        self.correlations[(a, b)]
    }

    /// Delta statistics of sample `col` relative to `refcol`.
    pub fn delta_stats(&mut self, col: usize, refcol: usize) -> DeltaStats {
        if let Some(stats) = self.delta_cache.get(&(col, refcol)) {
            return *stats;
        }

        let deltas: Vec<f64> = (0..self.table.n_proteins())
            .filter_map(|row| {
                let x = self.table.get(row, col)?;
                let r = self.table.get(row, refcol)?;
                Some((x - r) / ((x + r) / 2.0))
            })
            .collect();
        let (mean, std) = nan_mean_std(&deltas);
        let stats = DeltaStats {
            mean,
            std,
            n: deltas.len(),
        };

        self.delta_cache.insert((col, refcol), stats);
        stats
    }

    /// Mean correlation between `refcol` and the samples in `missing`.
    ///
    /// `missing` must be sorted; it identifies the cache entry.
    pub fn mean_correlation(&mut self, refcol: usize, missing: &[usize]) -> f64 {
        let key = (refcol, missing.to_vec());
        if let Some(&corr) = self.corr_cache.get(&key) {
            return corr;
        }
        let corr = nan_mean(missing.iter().map(|&c| self.correlations[(refcol, c)]));
        self.corr_cache.insert(key, corr);
        corr
    }

    /// Number of cached sample-pair delta distributions.
    pub fn n_cached_deltas(&self) -> usize {
        self.delta_cache.len()
    }

    /// Number of cached mean correlations.
    pub fn n_cached_correlations(&self) -> usize {
        self.corr_cache.len()
    }

    /// Cells of eligible rows left missing because no reference was usable.
    pub fn n_unresolved(&self) -> usize {
        self.unresolved
    }

    /// Impute every eligible row.
    pub fn impute<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<ImputedTable> {
        let table = self.table;
        let mut values = table.intensities().clone();
        let mut mask = DMatrix::from_element(table.n_proteins(), table.n_samples(), false);
        let mut skipped_rows = 0usize;
        self.unresolved = 0;

        for row in 0..table.n_proteins() {
            let (observed, missing): (Vec<usize>, Vec<usize>) =
                (0..table.n_samples()).partition(|&c| !table.is_missing(row, c));
            if missing.is_empty() {
                continue;
            }
            if observed.len() < self.min_replicates {
                skipped_rows += 1;
                continue;
            }

            for &col in &missing {
                let mut estimates = Vec::with_capacity(observed.len());
                for &refcol in &observed {
                    let corr = self.mean_correlation(refcol, &missing);
                    if corr.is_nan() || corr <= 0.0 {
                        continue;
                    }
                    let delta = self.delta_stats(col, refcol);
                    if delta.n < 2 || !delta.mean.is_finite() {
                        continue;
                    }
                    let scale = delta.std / (SQRT_2 * corr);
                    if !scale.is_finite() || scale.is_sign_negative() {
                        continue;
                    }
                    let d = sample_normal(rng, delta.mean, scale)?;
                    let reference = values[(row, refcol)];
                    estimates.push(reference * (1.0 + d).abs());
                }

                if estimates.is_empty() {
                    self.unresolved += 1;
                } else {
                    values[(row, col)] = estimates.iter().sum::<f64>() / estimates.len() as f64;
                    mask[(row, col)] = true;
                }
            }
        }

        if skipped_rows > 0 {
            log::debug!(
                "Relative imputation skipped {} proteins measured in fewer than {} samples",
                skipped_rows,
                self.min_replicates
            );
        }
        if self.unresolved > 0 {
            log::info!(
                "Relative imputation left {} cells without a usable reference",
                self.unresolved
            );
        }

        ImputedTable::new(table.with_intensities(values)?, mask, "relative")
    }
}

/// Impute missing values relative to the replicates where the protein was measured.
///
/// Rows measured in fewer than `min_replicates` samples are left untouched.
pub fn impute_relative<R: Rng + ?Sized>(
    table: &ProteinTable,
    min_replicates: usize,
    rng: &mut R,
) -> Result<ImputedTable> {
    RelativeImputer::new(table, min_replicates)?.impute(rng)
}

fn correlation_matrix(table: &ProteinTable) -> DMatrix<f64> {
    let n = table.n_samples();
    let columns: Vec<Vec<f64>> = (0..n).map(|c| table.column(c)).collect();
    let mut corr = DMatrix::from_element(n, n, f64::NAN);
    for a in 0..n {
        for b in a..n {
            let r = pearson_pairwise(&columns[a], &columns[b]);
            corr[(a, b)] = r;
            corr[(b, a)] = r;
        }
    }
    corr
}
