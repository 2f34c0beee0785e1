//! Pipeline runner for composing and executing analysis steps.

use crate::compare::compare;
use crate::data::{ComparisonResult, ExperimentDesign, ImputedTable, ProteinTable, SignificanceCriteria};
use crate::error::{LfqError, Result};
use crate::filter::{filter_all_missing, filter_contaminants, filter_min_valid, filter_reverse};
use crate::impute::{impute_runs, ImputeMethod};
use crate::normalize::{log2_transform, normalize_median};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Imputation runs used when none are configured.
pub const DEFAULT_RUNS: usize = 5;
/// Seed of the first imputation run when none is configured.
pub const DEFAULT_SEED: u64 = 0;

/// A step in the analysis pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PipelineStep {
    // === Protein Filtering ===
    /// Drop potential contaminants.
    FilterContaminants,
    /// Drop reverse (decoy) hits.
    FilterReverse,
    /// Drop proteins without any observed value.
    FilterAllMissing,
    /// Keep proteins observed in at least `min_valid` samples.
    FilterMinValid { min_valid: usize },

    // === Transformation ===
    /// Replace intensities by their log2.
    Log2Transform,
    /// Scale samples to a common median.
    NormalizeMedian,

    // === Imputation ===
    /// Independent seeded imputation runs.
    Impute {
        method: ImputeMethod,
        runs: usize,
        seed: u64,
    },

    // === Testing ===
    /// Run every comparison of the design.
    Compare { criteria: SignificanceCriteria },
}

/// Pipeline configuration for serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Name of the pipeline.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Steps to execute.
    pub steps: Vec<PipelineStep>,
}

impl PipelineConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(LfqError::from)
    }

    /// Load from a YAML file.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(LfqError::from)
    }
}

/// Everything a pipeline run produces.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    /// Processed table before imputation.
    pub table: ProteinTable,
    /// One table per imputation run.
    pub imputed: Vec<ImputedTable>,
    /// One result per comparison of the design.
    pub comparisons: Vec<ComparisonResult>,
}

impl AnalysisOutput {
    /// Write all tables as TSV files into `dir`, creating it if needed.
    ///
    /// Files: `processed.tsv`, `imputed_<run>.tsv` (1-based) and
    /// `<base>_vs_<target>.tsv` per comparison.
    pub fn write_tsv<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        self.table.to_tsv(dir.join("processed.tsv"))?;
        for (i, run) in self.imputed.iter().enumerate() {
            run.table().to_tsv(dir.join(format!("imputed_{}.tsv", i + 1)))?;
        }
        for result in &self.comparisons {
            result.to_tsv(dir.join(format!("{}.tsv", result.comparison.label())))?;
        }

        log::info!("Wrote results to {}", dir.display());
        Ok(())
    }
}

/// Builder for constructing and running analysis pipelines.
#[derive(Debug, Clone)]
pub struct Pipeline {
    steps: Vec<PipelineStep>,
    name: String,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// Create a new empty pipeline.
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            name: "unnamed".to_string(),
        }
    }

    /// Create from a config.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            steps: config.steps.clone(),
            name: config.name.clone(),
        }
    }

    /// Set the pipeline name.
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Steps in execution order.
    pub fn steps(&self) -> &[PipelineStep] {
        &self.steps
    }

    /// Drop potential contaminants.
    pub fn filter_contaminants(mut self) -> Self {
        self.steps.push(PipelineStep::FilterContaminants);
        self
    }

    /// Drop reverse hits.
    pub fn filter_reverse(mut self) -> Self {
        self.steps.push(PipelineStep::FilterReverse);
        self
    }

    /// Drop proteins never observed.
    pub fn filter_all_missing(mut self) -> Self {
        self.steps.push(PipelineStep::FilterAllMissing);
        self
    }

    /// Keep proteins observed in at least `min_valid` samples.
    pub fn filter_min_valid(mut self, min_valid: usize) -> Self {
        self.steps.push(PipelineStep::FilterMinValid { min_valid });
        self
    }

    /// Add log2 transformation.
    pub fn log2_transform(mut self) -> Self {
        self.steps.push(PipelineStep::Log2Transform);
        self
    }

    /// Add median normalization.
    pub fn normalize_median(mut self) -> Self {
        self.steps.push(PipelineStep::NormalizeMedian);
        self
    }

    /// Add `runs` seeded imputations with `method`.
    pub fn impute(mut self, method: ImputeMethod, runs: usize, seed: u64) -> Self {
        self.steps.push(PipelineStep::Impute { method, runs, seed });
        self
    }

    /// Add comparisons with the given significance thresholds.
    pub fn compare(mut self, criteria: SignificanceCriteria) -> Self {
        self.steps.push(PipelineStep::Compare { criteria });
        self
    }

    /// Convert to config for serialization.
    pub fn to_config(&self, description: Option<&str>) -> PipelineConfig {
        PipelineConfig {
            name: self.name.clone(),
            description: description.map(String::from),
            steps: self.steps.clone(),
        }
    }

    /// Run the pipeline on a raw table.
    pub fn run(&self, table: &ProteinTable, design: &ExperimentDesign) -> Result<AnalysisOutput> {
        log::info!(
            "Running pipeline '{}' ({} steps) on {} proteins × {} samples",
            self.name,
            self.steps.len(),
            table.n_proteins(),
            table.n_samples()
        );
        let mut state = PipelineState::new(table.clone());

        for (i, step) in self.steps.iter().enumerate() {
            log::debug!("Step {}: {:?}", i + 1, step);
            state = state.apply(step, design).map_err(|e| {
                LfqError::Pipeline(format!("Step {} ({:?}) failed: {}", i + 1, step, e))
            })?;
        }

        state.finalize()
    }
}

/// Internal state during pipeline execution.
struct PipelineState {
    table: ProteinTable,
    log_transformed: bool,
    imputed: Option<Vec<ImputedTable>>,
    comparisons: Option<Vec<ComparisonResult>>,
}

impl PipelineState {
    fn new(table: ProteinTable) -> Self {
        Self {
            table,
            log_transformed: false,
            imputed: None,
            comparisons: None,
        }
    }

    /// Steps that change the table cannot follow imputation.
    fn ensure_not_imputed(&self) -> Result<()> {
        if self.imputed.is_some() {
            return Err(LfqError::Pipeline(
                "Cannot modify the table after imputing".to_string(),
            ));
        }
        Ok(())
    }

    fn apply(mut self, step: &PipelineStep, design: &ExperimentDesign) -> Result<Self> {
        match step {
            // === Protein Filtering ===
            PipelineStep::FilterContaminants => {
                self.ensure_not_imputed()?;
                self.table = filter_contaminants(&self.table)?;
            }
            PipelineStep::FilterReverse => {
                self.ensure_not_imputed()?;
                self.table = filter_reverse(&self.table)?;
            }
            PipelineStep::FilterAllMissing => {
                self.ensure_not_imputed()?;
                self.table = filter_all_missing(&self.table)?;
            }
            PipelineStep::FilterMinValid { min_valid } => {
                self.ensure_not_imputed()?;
                self.table = filter_min_valid(&self.table, *min_valid)?;
            }

            // === Transformation ===
            PipelineStep::Log2Transform => {
                self.ensure_not_imputed()?;
                if self.log_transformed {
                    return Err(LfqError::Pipeline(
                        "Intensities are already log2-transformed".to_string(),
                    ));
                }
                self.table = log2_transform(&self.table)?;
                self.log_transformed = true;
            }
            PipelineStep::NormalizeMedian => {
                self.ensure_not_imputed()?;
                self.table = normalize_median(&self.table)?;
            }

            // === Imputation ===
            PipelineStep::Impute { method, runs, seed } => {
                if !self.log_transformed {
                    return Err(LfqError::Pipeline(
                        "Must log2-transform before imputing".to_string(),
                    ));
                }
                self.ensure_not_imputed()?;
                self.imputed = Some(impute_runs(&self.table, *method, *runs, *seed)?);
            }

            // === Testing ===
            PipelineStep::Compare { criteria } => {
                let imputed = self.imputed.as_ref().ok_or_else(|| {
                    LfqError::Pipeline("Must impute before comparing".to_string())
                })?;
                self.comparisons = Some(compare(design, &self.table, imputed, criteria)?);
            }
        }
        Ok(self)
    }

    fn finalize(self) -> Result<AnalysisOutput> {
        let comparisons = self.comparisons.ok_or_else(|| {
            LfqError::Pipeline("Pipeline must include a compare step".to_string())
        })?;
        let imputed = self.imputed.ok_or_else(|| {
            LfqError::Pipeline("Pipeline must include an impute step".to_string())
        })?;

        Ok(AnalysisOutput {
            table: self.table,
            imputed,
            comparisons,
        })
    }
}

/// The standard pipeline: importer cleaning, median normalization, two-step
/// imputation and default significance thresholds.
pub fn standard_pipeline(runs: usize, seed: u64) -> Pipeline {
    Pipeline::new()
        .name("standard")
        .filter_contaminants()
        .filter_reverse()
        .log2_transform()
        .filter_all_missing()
        .normalize_median()
        .impute(ImputeMethod::default(), runs, seed)
        .compare(SignificanceCriteria::default())
}

/// Convenience function to run the standard pipeline.
pub fn run_standard(
    table: &ProteinTable,
    design: &ExperimentDesign,
    runs: usize,
    seed: u64,
) -> Result<AnalysisOutput> {
    standard_pipeline(runs, seed).run(table, design)
}
