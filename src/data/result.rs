//! Result types for differential abundance comparisons.

use crate::data::Comparison;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Thresholds deciding whether a protein is called significant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SignificanceCriteria {
    /// Adjusted p-value must be strictly below this.
    pub alpha: f64,
    /// Absolute log2 fold-change must be strictly above this.
    pub min_abs_log_fc: f64,
    /// At least one condition needs this many detected replicates.
    pub min_replicates: usize,
}

impl Default for SignificanceCriteria {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            min_abs_log_fc: 1.0,
            min_replicates: 2,
        }
    }
}

impl SignificanceCriteria {
    /// Apply all three criteria; `NaN` statistics are never significant.
    pub fn is_significant(&self, p_adjusted: f64, log_fc: f64, n_base: usize, n_target: usize) -> bool {
        p_adjusted < self.alpha
            && log_fc.abs() > self.min_abs_log_fc
            && (n_base >= self.min_replicates || n_target >= self.min_replicates)
    }
}

/// Statistics of a single protein in one comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProteinComparison {
    /// Protein group id.
    pub protein_id: u64,
    /// Leading UniProt accession.
    pub uniprot_id: String,
    /// Leading gene name.
    pub gene: Option<String>,
    /// Mean log2 intensity of the base condition, averaged over runs.
    pub mean_base: f64,
    /// Mean log2 intensity of the target condition, averaged over runs.
    pub mean_target: f64,
    /// Natural-log p-value averaged over runs.
    pub log_p: f64,
    /// `exp(log_p)`.
    pub p_value: f64,
    /// `mean_target - mean_base`.
    pub log_fc: f64,
    /// Benjamini-Hochberg adjusted p-value.
    pub p_adjusted: f64,
    /// Replicates of the base condition with a measured value.
    pub n_base: usize,
    /// Replicates of the target condition with a measured value.
    pub n_target: usize,
    /// Significance call.
    pub significant: bool,
}

impl ProteinComparison {
    /// `-log10(p)`, the volcano y coordinate.
    pub fn neg_log10_p(&self) -> f64 {
        -self.p_value.log10()
    }

    /// Display label: gene name, falling back to the accession.
    pub fn label(&self) -> &str {
        self.gene.as_deref().unwrap_or(&self.uniprot_id)
    }
}

/// A point of a volcano plot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolcanoPoint {
    pub protein_id: u64,
    pub label: String,
    pub log_fc: f64,
    pub neg_log10_p: f64,
    pub significant: bool,
}

/// Results of one comparison, one row per tested protein.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    /// The comparison these rows belong to.
    pub comparison: Comparison,
    /// Number of imputation runs averaged.
    pub n_runs: usize,
    /// Per-protein statistics in table order.
    pub proteins: Vec<ProteinComparison>,
}

impl ComparisonResult {
    pub fn new(comparison: Comparison, n_runs: usize, proteins: Vec<ProteinComparison>) -> Self {
        Self {
            comparison,
            n_runs,
            proteins,
        }
    }

    /// Number of tested proteins.
    pub fn len(&self) -> usize {
        self.proteins.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.proteins.is_empty()
    }

    /// Result for a protein id.
    pub fn get(&self, protein_id: u64) -> Option<&ProteinComparison> {
        self.proteins.iter().find(|p| p.protein_id == protein_id)
    }

    /// Significant proteins.
    pub fn significant(&self) -> Vec<&ProteinComparison> {
        self.proteins.iter().filter(|p| p.significant).collect()
    }

    /// Proteins sorted by adjusted p-value (ascending, `NaN` last).
    pub fn sorted_by_p_adjusted(&self) -> Vec<&ProteinComparison> {
        let mut sorted: Vec<_> = self.proteins.iter().collect();
        sorted.sort_by(|a, b| a.p_adjusted.total_cmp(&b.p_adjusted));
        sorted
    }

    /// Points for a volcano plot.
    pub fn volcano_points(&self) -> Vec<VolcanoPoint> {
        self.proteins
            .iter()
            .map(|p| VolcanoPoint {
                protein_id: p.protein_id,
                label: p.label().to_string(),
                log_fc: p.log_fc,
                neg_log10_p: p.neg_log10_p(),
                significant: p.significant,
            })
            .collect()
    }

    /// Count tested and significant proteins.
    pub fn summary(&self) -> ComparisonSummary {
        let significant = self.significant();
        ComparisonSummary {
            comparison: self.comparison.to_string(),
            total: self.len(),
            significant: significant.len(),
            up: significant.iter().filter(|p| p.log_fc > 0.0).count(),
            down: significant.iter().filter(|p| p.log_fc < 0.0).count(),
        }
    }

    /// Write results to a TSV file.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        let base = &self.comparison.base;
        let target = &self.comparison.target;
        writeln!(
            writer,
            "id\tuniprotID\tgene\tmean {}\tmean {}\tlog p\tp\tlog FC\tp adjusted\tn {}\tn {}\tsignificant",
            base, target, base, target
        )?;

        for p in &self.proteins {
            writeln!(
                writer,
                "{}\t{}\t{}\t{:.4}\t{:.4}\t{:.4}\t{:.3e}\t{:.4}\t{:.3e}\t{}\t{}\t{}",
                p.protein_id,
                p.uniprot_id,
                p.gene.as_deref().unwrap_or(""),
                p.mean_base,
                p.mean_target,
                p.log_p,
                p.p_value,
                p.log_fc,
                p.p_adjusted,
                p.n_base,
                p.n_target,
                p.significant
            )?;
        }

        Ok(())
    }
}

/// Summary counts for one comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub comparison: String,
    pub total: usize,
    pub significant: usize,
    pub up: usize,
    pub down: usize,
}

impl std::fmt::Display for ComparisonSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.comparison)?;
        writeln!(f, "  Proteins tested: {}", self.total)?;
        writeln!(f, "  Significant:     {}", self.significant)?;
        writeln!(f, "    up:   {}", self.up)?;
        writeln!(f, "    down: {}", self.down)?;
        Ok(())
    }
}
