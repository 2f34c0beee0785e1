//! Per-comparison statistics averaged over imputation runs.

use crate::correct::adjust_bh;
use crate::data::{
    Comparison, ComparisonResult, ExperimentDesign, ImputedTable, ProteinComparison,
    ProteinTable, SignificanceCriteria,
};
use crate::error::{LfqError, Result};
use crate::stats::nan_mean;
use crate::test::welch_t_test;
use rayon::prelude::*;

/// Statistics of one protein in one run.
#[derive(Debug, Clone, Copy)]
struct RunStats {
    mean_base: f64,
    mean_target: f64,
    log_p: f64,
}

/// Run every comparison of a design.
///
/// `unimputed` is the table before imputation; it decides which proteins are
/// tested and how many replicates were detected. `runs` are independent
/// imputations of that table.
pub fn compare(
    design: &ExperimentDesign,
    unimputed: &ProteinTable,
    runs: &[ImputedTable],
    criteria: &SignificanceCriteria,
) -> Result<Vec<ComparisonResult>> {
    design.validate_against(unimputed)?;
    design
        .comparisons()
        .iter()
        .map(|comparison| compare_conditions(design, comparison, unimputed, runs, criteria))
        .collect()
}

/// Run a single comparison between two conditions of a design.
pub fn compare_conditions(
    design: &ExperimentDesign,
    comparison: &Comparison,
    unimputed: &ProteinTable,
    runs: &[ImputedTable],
    criteria: &SignificanceCriteria,
) -> Result<ComparisonResult> {
    if runs.is_empty() {
        return Err(LfqError::InvalidParameter(
            "At least one imputed table is required".to_string(),
        ));
    }
    for run in runs {
        unimputed.ensure_same_layout(run.table())?;
    }

    let base_cols = unimputed.sample_indices(design.samples(&comparison.base)?)?;
    let target_cols = unimputed.sample_indices(design.samples(&comparison.target)?)?;

    log::info!("Comparing {} over {} run(s)", comparison, runs.len());

    // Rows detected in at least one of the two conditions
    let tested: Vec<usize> = (0..unimputed.n_proteins())
        .filter(|&row| {
            unimputed.observed_in(row, &base_cols) > 0
                || unimputed.observed_in(row, &target_cols) > 0
        })
        .collect();
    let dropped = unimputed.n_proteins() - tested.len();
    if dropped > 0 {
        log::debug!("{}: {} proteins undetected in both conditions", comparison, dropped);
    }

    let per_run: Vec<Vec<RunStats>> = runs
        .par_iter()
        .map(|run| {
            tested
                .iter()
                .map(|&row| run_stats(run.table(), row, &base_cols, &target_cols))
                .collect()
        })
        .collect();

    let mut proteins: Vec<ProteinComparison> = tested
        .iter()
        .enumerate()
        .map(|(i, &row)| {
            let mean_base = finite_mean(per_run.iter().map(|r| r[i].mean_base));
            let mean_target = finite_mean(per_run.iter().map(|r| r[i].mean_target));
            // p = 0 in any run gives ln p = -inf and an averaged p of 0
            let log_p = nan_mean(per_run.iter().map(|r| r[i].log_p));
            let annotation = unimputed.annotation(row);

            ProteinComparison {
                protein_id: unimputed.protein_ids()[row],
                uniprot_id: annotation.uniprot_id.clone(),
                gene: annotation.gene.clone(),
                mean_base,
                mean_target,
                log_p,
                p_value: log_p.exp(),
                log_fc: mean_target - mean_base,
                p_adjusted: f64::NAN,
                n_base: unimputed.observed_in(row, &base_cols),
                n_target: unimputed.observed_in(row, &target_cols),
                significant: false,
            }
        })
        .collect();

    let p_values: Vec<f64> = proteins.iter().map(|p| p.p_value).collect();
    for (protein, q) in proteins.iter_mut().zip(adjust_bh(&p_values)) {
        protein.p_adjusted = q;
        protein.significant =
            criteria.is_significant(q, protein.log_fc, protein.n_base, protein.n_target);
    }

    let result = ComparisonResult::new(comparison.clone(), runs.len(), proteins);
    let summary = result.summary();
    log::info!(
        "{}: {} of {} proteins significant",
        comparison,
        summary.significant,
        summary.total
    );
    Ok(result)
}

fn run_stats(table: &ProteinTable, row: usize, base_cols: &[usize], target_cols: &[usize]) -> RunStats {
    let base: Vec<f64> = base_cols.iter().map(|&c| table.intensities()[(row, c)]).collect();
    let target: Vec<f64> = target_cols.iter().map(|&c| table.intensities()[(row, c)]).collect();

    RunStats {
        mean_base: nan_mean(base.iter().copied()),
        mean_target: nan_mean(target.iter().copied()),
        log_p: welch_t_test(&base, &target).p_value.ln(),
    }
}

/// Mean over runs, skipping non-finite values.
fn finite_mean(values: impl Iterator<Item = f64>) -> f64 {
    nan_mean(values.map(|v| if v.is_finite() { v } else { f64::NAN }))
}
