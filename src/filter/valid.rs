//! Filtering proteins by the number of measured (non-missing) samples.

use crate::data::ProteinTable;
use crate::error::{LfqError, Result};
use rayon::prelude::*;

/// Remove proteins with no measured value in any sample.
pub fn filter_all_missing(table: &ProteinTable) -> Result<ProteinTable> {
    filter_min_valid(table, 1)
}

/// Keep proteins measured in at least `min_valid` samples.
///
/// # Arguments
/// * `table` - The protein table to filter
/// * `min_valid` - Minimum number of non-missing samples (1 to n_samples)
pub fn filter_min_valid(table: &ProteinTable, min_valid: usize) -> Result<ProteinTable> {
    if min_valid == 0 || min_valid > table.n_samples() {
        return Err(LfqError::InvalidParameter(format!(
            "Minimum valid values must be between 1 and {}",
            table.n_samples()
        )));
    }

    let keep_indices: Vec<usize> = (0..table.n_proteins())
        .into_par_iter()
        .filter(|&row| table.observed_in_row(row) >= min_valid)
        .collect();

    if keep_indices.is_empty() {
        return Err(LfqError::EmptyData(format!(
            "No proteins measured in at least {} samples",
            min_valid
        )));
    }

    log::debug!(
        "Kept {} of {} proteins with >= {} valid values",
        keep_indices.len(),
        table.n_proteins(),
        min_valid
    );
    table.subset_proteins(&keep_indices)
}
