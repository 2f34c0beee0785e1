//! Data structures for LFQ proteomics analysis.

pub mod columns;
mod design;
mod imputed_table;
mod protein_table;
mod result;

pub use columns::{lfq_col, lfq_cols, sample_from_lfq_col, samples_from_value};
pub use design::{Comparison, ExperimentDesign};
pub use imputed_table::ImputedTable;
pub use protein_table::{ProteinAnnotation, ProteinTable};
pub use result::{
    ComparisonResult, ComparisonSummary, ProteinComparison, SignificanceCriteria, VolcanoPoint,
};
