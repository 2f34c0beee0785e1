//! Basic example demonstrating the standard LFQ pipeline.
//!
//! This example shows how to:
//! 1. Create synthetic data
//! 2. Profile the data
//! 3. Impute and compare two conditions
//! 4. Examine results

use lfq_analysis::prelude::*;
use nalgebra::DMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

fn main() -> Result<()> {
    println!("=== LFQ Analysis Example ===\n");

    // Create synthetic data
    let (table, design) = create_example_data()?;

    println!("Data dimensions:");
    println!("  Proteins: {}", table.n_proteins());
    println!("  Samples:  {}", table.n_samples());
    println!();

    // Profile the data
    println!("=== Data Profiling ===\n");

    let missingness = profile_missingness(&table);
    println!("Missing values: {:.1}%", missingness.missing_fraction * 100.0);
    println!(
        "  {} complete proteins, {} partially observed",
        missingness.n_complete,
        missingness.n_partial()
    );
    println!();

    // Run the pipeline
    println!("=== Standard Pipeline ===\n");

    let output = Pipeline::new()
        .name("example")
        .log2_transform()
        .filter_all_missing()
        .normalize_median()
        .impute(ImputeMethod::default(), 5, 42)
        .compare(SignificanceCriteria::default())
        .run(&table, &design)?;

    println!("Intensity distributions after normalization:");
    print!("{}", profile_intensity(&output.table));
    println!();

    for result in &output.comparisons {
        print!("{}", result.summary());

        println!("\nTop 10 proteins by adjusted p-value:");
        println!(
            "{:<10} {:>10} {:>12} {:>12} {:>6} {:>6}",
            "Protein", "log FC", "p-value", "adj. p", "n", "sig"
        );
        println!("{}", "-".repeat(62));

        for p in result.sorted_by_p_adjusted().into_iter().take(10) {
            println!(
                "{:<10} {:>10.3} {:>12.2e} {:>12.2e} {:>3}/{:<2} {:>6}",
                p.label(),
                p.log_fc,
                p.p_value,
                p.p_adjusted,
                p.n_base,
                p.n_target,
                if p.significant { "*" } else { "" }
            );
        }
    }

    println!("\n=== Pipeline Configuration ===\n");
    let config = lfq_analysis::pipeline::standard_pipeline(5, 42)
        .to_config(Some("Standard LFQ analysis"));
    println!("{}", config.to_yaml()?);

    Ok(())
}

/// Create example data: 200 proteins, 3 control and 3 treated replicates.
///
/// Proteins 0-19 are 4x more abundant after treatment, 20-29 4x less. Low
/// intensities are more likely to be missing, as in real LFQ data.
fn create_example_data() -> Result<(ProteinTable, ExperimentDesign)> {
    let n_proteins = 200;
    let samples = ["ctrl_1", "ctrl_2", "ctrl_3", "treat_1", "treat_2", "treat_3"];
    let mut rng = StdRng::seed_from_u64(1);
    let abundance = Normal::new(24.0, 2.5).map_err(|e| LfqError::Numerical(e.to_string()))?;
    let noise = Normal::new(0.0, 0.2).map_err(|e| LfqError::Numerical(e.to_string()))?;

    let mut values = DMatrix::from_element(n_proteins, samples.len(), f64::NAN);
    for protein in 0..n_proteins {
        let level = abundance.sample(&mut rng);
        for sample in 0..samples.len() {
            let treated = sample >= 3;
            let effect = match protein {
                0..=19 if treated => 2.0,
                20..=29 if treated => -2.0,
                _ => 0.0,
            };
            let log2: f64 = level + effect + noise.sample(&mut rng);

            // Missing not at random: low intensities drop out more often
            let p_missing = 1.0 / (1.0 + (2.0 * (log2 - 20.0)).exp());
            if !rng.gen_bool(p_missing) {
                values[(protein, sample)] = 2f64.powf(log2);
            }
        }
    }

    let annotations = (0..n_proteins)
        .map(|i| ProteinAnnotation {
            uniprot_id: format!("P{:05}", i),
            gene: Some(format!("PROT{}", i)),
            ..ProteinAnnotation::default()
        })
        .collect();
    let table = ProteinTable::new(
        values,
        (0..n_proteins as u64).collect(),
        annotations,
        samples.iter().map(|s| s.to_string()).collect(),
    )?;

    let design = ExperimentDesign::new()
        .with_condition("control", &samples[..3])?
        .with_condition("treated", &samples[3..])?
        .with_comparison("control", "treated")?;

    Ok((table, design))
}
