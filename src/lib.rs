//! Label-Free Quantification (LFQ) Analysis Library
//!
//! This library provides modular primitives for imputing missing values in
//! LFQ proteomics data and comparing protein abundances between conditions.
//!
//! # Overview
//!
//! The library is organized into composable modules:
//!
//! - **data**: Core data structures (ProteinTable, ExperimentDesign, Results)
//! - **profile**: Data profiling (missingness, intensity distributions)
//! - **filter**: Protein filtering (contaminants, reverse hits, valid values)
//! - **normalize**: Transformations (log2, median normalization)
//! - **impute**: Missing value imputation (low-value, Gaussian, relative, two-step)
//! - **test**: Hypothesis testing (Welch t-test)
//! - **correct**: Multiple testing correction (Benjamini-Hochberg)
//! - **compare**: Condition comparisons averaged over imputation runs
//! - **pipeline**: Pipeline composition and execution
//!
//! # Example
//!
//! ```no_run
//! use lfq_analysis::prelude::*;
//!
//! // Load data
//! let table = ProteinTable::from_maxquant("proteinGroups.txt").unwrap();
//! let design = ExperimentDesign::from_yaml_file("design.yaml").unwrap();
//!
//! // Run analysis pipeline
//! let output = Pipeline::new()
//!     .filter_contaminants()
//!     .filter_reverse()
//!     .log2_transform()
//!     .filter_all_missing()
//!     .normalize_median()
//!     .impute(ImputeMethod::default(), 5, 42)
//!     .compare(SignificanceCriteria::default())
//!     .run(&table, &design)
//!     .unwrap();
//! ```

pub mod compare;
pub mod correct;
pub mod data;
pub mod error;
pub mod filter;
pub mod impute;
pub mod normalize;
pub mod pipeline;
pub mod profile;
mod stats;
pub mod test;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::compare::{compare, compare_conditions};
    pub use crate::correct::adjust_bh;
    pub use crate::data::{
        Comparison, ComparisonResult, ComparisonSummary, ExperimentDesign, ImputedTable,
        ProteinAnnotation, ProteinComparison, ProteinTable, SignificanceCriteria, VolcanoPoint,
    };
    pub use crate::error::{LfqError, Result};
    pub use crate::filter::{filter_all_missing, filter_contaminants, filter_min_valid, filter_reverse};
    pub use crate::impute::{
        impute_gaussian, impute_low_value, impute_relative, impute_runs, impute_two_step,
        FallbackMethod, ImputeMethod, RelativeImputer,
    };
    pub use crate::normalize::{log2_transform, normalize_median, sample_medians};
    pub use crate::pipeline::{
        import_maxquant, run_standard, AnalysisOutput, Pipeline, PipelineConfig, PipelineStep,
    };
    pub use crate::profile::{
        profile, profile_intensity, profile_missingness, DataProfile, IntensityProfile,
        MissingnessProfile,
    };
    pub use crate::test::{welch_t_test, WelchResult};
}
