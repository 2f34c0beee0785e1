//! Missing value imputation strategies.
//!
//! Every strategy reads a [`ProteinTable`] and returns an [`ImputedTable`]
//! in which only missing cells were touched. Randomness is drawn from a
//! caller-supplied RNG so results are reproducible for a given seed.

pub mod low_value;
pub mod relative;
pub mod two_step;

pub use low_value::{impute_gaussian, impute_low_value};
pub use relative::{impute_relative, DeltaStats, RelativeImputer, DEFAULT_MIN_REPLICATES};
pub use two_step::impute_two_step;

use crate::data::{ImputedTable, ProteinTable};
use crate::error::{LfqError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Fully imputing strategy used for rows the relative strategy cannot handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallbackMethod {
    LowValue,
    Gaussian,
}

impl FallbackMethod {
    fn impute<R: Rng + ?Sized>(&self, table: &ProteinTable, rng: &mut R) -> Result<ImputedTable> {
        match self {
            Self::LowValue => impute_low_value(table, rng),
            Self::Gaussian => impute_gaussian(table, rng),
        }
    }
}

/// Imputation strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImputeMethod {
    /// Uniform draws from `[mean - 3·std, mean - 2·std]` per sample.
    LowValue,
    /// Normal draws centred at `mean - 1.8·std` with width `0.3·std`.
    Gaussian,
    /// Relative to replicates where the protein was measured.
    Relative { min_replicates: usize },
    /// Relative imputation, then `fallback` for rows still incomplete.
    TwoStep {
        min_replicates: usize,
        fallback: FallbackMethod,
    },
}

impl Default for ImputeMethod {
    fn default() -> Self {
        Self::TwoStep {
            min_replicates: DEFAULT_MIN_REPLICATES,
            fallback: FallbackMethod::LowValue,
        }
    }
}

impl ImputeMethod {
    /// Short name used in logs and outputs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LowValue => "low-value",
            Self::Gaussian => "gaussian",
            Self::Relative { .. } => "relative",
            Self::TwoStep { .. } => "two-step",
        }
    }

    /// Run this strategy once.
    pub fn impute<R: Rng + ?Sized>(&self, table: &ProteinTable, rng: &mut R) -> Result<ImputedTable> {
        match self {
            Self::LowValue => impute_low_value(table, rng),
            Self::Gaussian => impute_gaussian(table, rng),
            Self::Relative { min_replicates } => impute_relative(table, *min_replicates, rng),
            Self::TwoStep {
                min_replicates,
                fallback,
            } => {
                let primary = impute_relative(table, *min_replicates, rng)?;
                let secondary = fallback.impute(table, rng)?;
                two_step::merge_incomplete_rows(&primary, &secondary, self.name())
            }
        }
    }
}

/// Run `n_runs` independent imputations.
///
/// Run `i` draws from an RNG seeded with `seed + i`, so the result does not
/// depend on how runs are scheduled.
pub fn impute_runs(
    table: &ProteinTable,
    method: ImputeMethod,
    n_runs: usize,
    seed: u64,
) -> Result<Vec<ImputedTable>> {
    if n_runs == 0 {
        return Err(LfqError::InvalidParameter(
            "At least one imputation run is required".to_string(),
        ));
    }

    log::info!("Running {} {} imputation(s)", n_runs, method.name());
    (0..n_runs)
        .into_par_iter()
        .map(|run| {
            let mut rng = StdRng::seed_from_u64(seed.wrapping_add(run as u64));
            method.impute(table, &mut rng)
        })
        .collect()
}

/// Draw from `Normal(loc, scale)`; a zero scale returns `loc`.
pub(crate) fn sample_normal<R: Rng + ?Sized>(rng: &mut R, loc: f64, scale: f64) -> Result<f64> {
    if scale == 0.0 {
        return Ok(loc);
    }
    let normal = Normal::new(loc, scale)
        .map_err(|e| LfqError::Numerical(format!("Normal({}, {}): {}", loc, scale, e)))?;
    Ok(normal.sample(rng))
}
