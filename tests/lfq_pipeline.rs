//! Integration tests for the standard LFQ pipeline.

use lfq_analysis::prelude::*;
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

const SAMPLES: [&str; 8] = [
    "ctrl_1", "ctrl_2", "ctrl_3", "ctrl_4", "treat_1", "treat_2", "treat_3", "treat_4",
];

/// Write a synthetic `proteinGroups.txt` with known condition effects.
///
/// 30 proteins × 8 samples (4 per condition):
/// - Proteins 0-4: 8x increase in treatment
/// - Proteins 5-9: 8x decrease in treatment
/// - Proteins 10-24: no effect, a few values missing at random
/// - Proteins 25-27: detected in treatment only
/// - Protein 28: contaminant
/// - Protein 29: reverse hit
fn create_protein_groups() -> NamedTempFile {
    let mut rng_seed = 42u64;
    let simple_rand = |seed: &mut u64| -> f64 {
        *seed = seed.wrapping_mul(1103515245).wrapping_add(12345);
        ((*seed >> 16) & 0x7FFF) as f64 / 32768.0
    };

    let mut file = NamedTempFile::new().unwrap();
    write!(file, "id\tProtein IDs\tGene names\tPotential contaminant\tReverse").unwrap();
    for sample in SAMPLES {
        write!(file, "\tLFQ intensity {}", sample).unwrap();
    }
    writeln!(file).unwrap();

    for protein in 0..30usize {
        let contaminant = if protein == 28 { "+" } else { "" };
        let reverse = if protein == 29 { "+" } else { "" };
        let accession = if protein == 29 {
            format!("REV__P{:05}", protein)
        } else {
            format!("P{:05};P{:05}-2", protein, protein)
        };
        write!(
            file,
            "{}\t{}\tGENE{}\t{}\t{}",
            protein, accession, protein, contaminant, reverse
        )
        .unwrap();

        for sample in 0..SAMPLES.len() {
            let is_treatment = sample >= 4;
            let base = 1.0e5 * 2f64.powf(protein as f64 / 3.0);
            let effect = match protein {
                0..=4 if is_treatment => 8.0,
                5..=9 if is_treatment => 0.125,
                _ => 1.0,
            };
            let missing = match protein {
                25..=27 => !is_treatment,
                12 => sample == 1,
                15 => sample == 6,
                20 => sample == 2 || sample == 5,
                _ => false,
            };

            let noise = 0.9 + 0.2 * simple_rand(&mut rng_seed);
            if missing {
                write!(file, "\t0").unwrap();
            } else {
                write!(file, "\t{:.0}", base * effect * noise).unwrap();
            }
        }
        writeln!(file).unwrap();
    }

    file.flush().unwrap();
    file
}

fn create_design() -> ExperimentDesign {
    ExperimentDesign::new()
        .with_condition("control", &SAMPLES[..4])
        .unwrap()
        .with_condition("treatment", &SAMPLES[4..])
        .unwrap()
        .with_comparison("control", "treatment")
        .unwrap()
}

#[test]
fn test_import_cleans_table() {
    let file = create_protein_groups();
    let table = import_maxquant(file.path(), true).unwrap();

    assert_eq!(table.n_proteins(), 28);
    assert_eq!(table.n_samples(), 8);
    assert!(table.row_of(28).is_none());
    assert!(table.row_of(29).is_none());
    assert_eq!(table.annotation(0).uniprot_id, "P00000");
    assert_eq!(table.n_missing(), 3 * 4 + 4);
}

#[test]
fn test_standard_pipeline_detects_effects() {
    let file = create_protein_groups();
    let raw = ProteinTable::from_maxquant(file.path()).unwrap();
    let output = run_standard(&raw, &create_design(), 5, 42).unwrap();

    assert_eq!(output.imputed.len(), 5);
    assert!(output.imputed.iter().all(|run| run.n_missing() == 0));

    let result = &output.comparisons[0];
    assert_eq!(result.n_runs, 5);
    assert_eq!(result.len(), 28);

    for id in 0..5 {
        let p = result.get(id).unwrap();
        assert!(p.significant, "protein {} should be up", id);
        assert!(p.log_fc > 2.5 && p.log_fc < 3.5);
    }
    for id in 5..10 {
        let p = result.get(id).unwrap();
        assert!(p.significant, "protein {} should be down", id);
        assert!(p.log_fc < -2.5 && p.log_fc > -3.5);
    }
    for id in 10..25 {
        let p = result.get(id).unwrap();
        assert!(!p.significant, "protein {} has no effect", id);
        assert!(p.log_fc.abs() < 1.0);
    }

    // Detection counts come from the table before imputation
    let only_treated = result.get(25).unwrap();
    assert_eq!(only_treated.n_base, 0);
    assert_eq!(only_treated.n_target, 4);
    assert_eq!(result.get(20).unwrap().n_base, 3);
    assert_eq!(result.get(20).unwrap().n_target, 3);

    let summary = result.summary();
    assert!(summary.up >= 5);
    assert!(summary.down >= 5);

    for p in &result.proteins {
        if p.p_value.is_finite() {
            assert!(p.p_adjusted >= p.p_value);
            assert!(p.p_adjusted <= 1.0);
        }
    }
}

#[test]
fn test_config_files_round_trip() {
    let dir = TempDir::new().unwrap();
    let data = create_protein_groups();

    let design_path = dir.path().join("design.yaml");
    std::fs::write(
        &design_path,
        "conditions:\n  control: [ctrl_1, ctrl_2, ctrl_3, ctrl_4]\n  treatment: [treat_1, treat_2, treat_3, treat_4]\ncomparisons:\n  - [control, treatment]\n",
    )
    .unwrap();
    let design = ExperimentDesign::from_yaml_file(&design_path).unwrap();
    assert_eq!(design, create_design());

    let config_path = dir.path().join("pipeline.yaml");
    let config = lfq_analysis::pipeline::standard_pipeline(3, 7).to_config(None);
    std::fs::write(&config_path, config.to_yaml().unwrap()).unwrap();
    let loaded = PipelineConfig::from_yaml_file(&config_path).unwrap();

    let raw = ProteinTable::from_maxquant(data.path()).unwrap();
    let from_config = Pipeline::from_config(&loaded).run(&raw, &design).unwrap();
    let direct = run_standard(&raw, &design, 3, 7).unwrap();

    for (a, b) in from_config.comparisons[0]
        .proteins
        .iter()
        .zip(&direct.comparisons[0].proteins)
    {
        assert_eq!(a.protein_id, b.protein_id);
        assert_eq!(a.p_value.to_bits(), b.p_value.to_bits());
        assert_eq!(a.significant, b.significant);
    }
}

#[test]
fn test_written_tables_reload() {
    let dir = TempDir::new().unwrap();
    let data = create_protein_groups();
    let raw = ProteinTable::from_maxquant(data.path()).unwrap();
    let output = run_standard(&raw, &create_design(), 2, 1).unwrap();
    output.write_tsv(dir.path()).unwrap();

    let processed = ProteinTable::from_maxquant(dir.path().join("processed.tsv")).unwrap();
    assert_eq!(processed.protein_ids(), output.table.protein_ids());
    assert_eq!(processed.sample_names(), output.table.sample_names());
    assert_eq!(processed.n_missing(), output.table.n_missing());

    let imputed = ProteinTable::from_maxquant(dir.path().join("imputed_2.tsv")).unwrap();
    assert_eq!(imputed.n_missing(), 0);
    assert!(dir.path().join("control_vs_treatment.tsv").exists());
}

#[test]
fn test_unknown_sample_in_design() {
    let data = create_protein_groups();
    let raw = ProteinTable::from_maxquant(data.path()).unwrap();
    let design = ExperimentDesign::new()
        .with_condition("control", &["ctrl_1", "ctrl_9"])
        .unwrap()
        .with_condition("treatment", &SAMPLES[4..])
        .unwrap()
        .with_comparison("control", "treatment")
        .unwrap();

    let err = run_standard(&raw, &design, 1, 0).unwrap_err();
    assert!(err.to_string().contains("ctrl_9"));
}
