//! The standard MaxQuant import: cleaning, log2 and optional normalization.

use crate::data::ProteinTable;
use crate::error::Result;
use crate::filter::{filter_all_missing, filter_contaminants, filter_reverse};
use crate::normalize::{log2_transform, normalize_median};
use std::path::Path;

/// Read a `proteinGroups.txt` and prepare it for imputation.
///
/// Drops contaminants and reverse hits, log2-transforms, drops proteins
/// never observed and, if `normalize` is set, median-normalizes samples.
pub fn import_maxquant<P: AsRef<Path>>(path: P, normalize: bool) -> Result<ProteinTable> {
    let raw = ProteinTable::from_maxquant(path)?;
    prepare(&raw, normalize)
}

/// The cleaning part of [`import_maxquant`] on an already loaded table.
pub fn prepare(raw: &ProteinTable, normalize: bool) -> Result<ProteinTable> {
    let table = filter_contaminants(raw)?;
    let table = filter_reverse(&table)?;
    let table = log2_transform(&table)?;
    let table = filter_all_missing(&table)?;

    let table = if normalize {
        normalize_median(&table)?
    } else {
        table
    };

    log::info!(
        "Imported {} of {} proteins across {} samples",
        table.n_proteins(),
        raw.n_proteins(),
        table.n_samples()
    );
    Ok(table)
}
