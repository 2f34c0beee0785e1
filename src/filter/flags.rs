//! Removal of contaminant and reverse (decoy) protein groups.

use crate::data::{ProteinAnnotation, ProteinTable};
use crate::error::{LfqError, Result};

/// Remove proteins flagged as potential contaminants.
pub fn filter_contaminants(table: &ProteinTable) -> Result<ProteinTable> {
    filter_by_annotation(table, "contaminant", |a| !a.contaminant)
}

/// Remove proteins flagged as reverse hits.
pub fn filter_reverse(table: &ProteinTable) -> Result<ProteinTable> {
    filter_by_annotation(table, "reverse", |a| !a.reverse)
}

fn filter_by_annotation<F>(table: &ProteinTable, what: &str, keep: F) -> Result<ProteinTable>
where
    F: Fn(&ProteinAnnotation) -> bool,
{
    let keep_indices: Vec<usize> = table
        .annotations()
        .iter()
        .enumerate()
        .filter(|(_, a)| keep(a))
        .map(|(i, _)| i)
        .collect();

    if keep_indices.is_empty() {
        return Err(LfqError::EmptyData(format!(
            "All proteins are flagged {}",
            what
        )));
    }

    let removed = table.n_proteins() - keep_indices.len();
    if removed > 0 {
        log::info!("Removed {} {} protein groups", removed, what);
    }
    table.subset_proteins(&keep_indices)
}
