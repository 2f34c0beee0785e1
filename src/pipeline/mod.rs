//! Pipeline composition and execution for LFQ analysis.

mod import;
mod runner;

pub use import::{import_maxquant, prepare};
pub use runner::{
    run_standard, standard_pipeline, AnalysisOutput, Pipeline, PipelineConfig, PipelineStep,
    DEFAULT_RUNS, DEFAULT_SEED,
};
