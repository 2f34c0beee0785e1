//! LFQ - Label-Free Quantification analysis CLI
//!
//! Command-line interface for imputing and comparing MaxQuant LFQ data.

use clap::{Parser, Subcommand, ValueEnum};
use lfq_analysis::compare::compare;
use lfq_analysis::data::{ExperimentDesign, ProteinTable, SignificanceCriteria};
use lfq_analysis::error::Result;
use lfq_analysis::impute::{impute_runs, FallbackMethod, ImputeMethod};
use lfq_analysis::pipeline::{
    import_maxquant, standard_pipeline, AnalysisOutput, Pipeline, PipelineConfig, DEFAULT_RUNS,
    DEFAULT_SEED,
};
use lfq_analysis::profile::profile;
use std::path::PathBuf;

/// CLI-friendly imputation method enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliImputeMethod {
    /// Uniform draws below each sample's distribution
    LowValue,
    /// Normal draws from a down-shifted, narrowed distribution
    Gaussian,
    /// Relative to replicates where the protein was measured
    Relative,
    /// Relative, then low values for rows still incomplete
    TwoStep,
    /// Relative, then Gaussian draws for rows still incomplete
    TwoStepGaussian,
}

impl CliImputeMethod {
    fn to_method(self, min_replicates: usize) -> ImputeMethod {
        match self {
            Self::LowValue => ImputeMethod::LowValue,
            Self::Gaussian => ImputeMethod::Gaussian,
            Self::Relative => ImputeMethod::Relative { min_replicates },
            Self::TwoStep => ImputeMethod::TwoStep {
                min_replicates,
                fallback: FallbackMethod::LowValue,
            },
            Self::TwoStepGaussian => ImputeMethod::TwoStep {
                min_replicates,
                fallback: FallbackMethod::Gaussian,
            },
        }
    }
}

/// Output format of profiles
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProfileFormat {
    Text,
    Json,
    Yaml,
}

/// Label-Free Quantification analysis
#[derive(Parser)]
#[command(name = "lfq")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a pipeline from a YAML configuration file on a raw MaxQuant table
    Run {
        /// Path to pipeline configuration YAML
        #[arg(short, long)]
        config: PathBuf,

        /// Path to MaxQuant proteinGroups.txt
        #[arg(short, long)]
        input: PathBuf,

        /// Path to experiment design YAML
        #[arg(short, long)]
        design: PathBuf,

        /// Output directory for result tables
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Import, impute and compare with the standard settings
    Analyze {
        /// Path to MaxQuant proteinGroups.txt
        #[arg(short, long)]
        input: PathBuf,

        /// Path to experiment design YAML
        #[arg(short, long)]
        design: PathBuf,

        /// Output directory for result tables
        #[arg(short, long)]
        output: PathBuf,

        /// Imputation method
        #[arg(short, long, value_enum, default_value = "two-step")]
        method: CliImputeMethod,

        /// Number of imputation runs
        #[arg(short, long, default_value_t = DEFAULT_RUNS)]
        runs: usize,

        /// Seed of the first imputation run
        #[arg(short, long, default_value_t = DEFAULT_SEED)]
        seed: u64,

        /// Observed replicates needed for relative imputation
        #[arg(long, default_value = "2")]
        min_replicates: usize,

        /// Adjusted p-value threshold
        #[arg(long, default_value = "0.05")]
        alpha: f64,

        /// Absolute log2 fold-change threshold
        #[arg(long, default_value = "1.0")]
        min_log_fc: f64,

        /// Skip median normalization
        #[arg(long)]
        no_normalize: bool,
    },

    /// Import and impute a table once, writing the imputed intensities
    Impute {
        /// Path to MaxQuant proteinGroups.txt
        #[arg(short, long)]
        input: PathBuf,

        /// Output path for the imputed TSV
        #[arg(short, long)]
        output: PathBuf,

        /// Imputation method
        #[arg(short, long, value_enum, default_value = "two-step")]
        method: CliImputeMethod,

        /// Random seed
        #[arg(short, long, default_value_t = DEFAULT_SEED)]
        seed: u64,

        /// Observed replicates needed for relative imputation
        #[arg(long, default_value = "2")]
        min_replicates: usize,

        /// Skip median normalization
        #[arg(long)]
        no_normalize: bool,
    },

    /// Profile missingness and intensity distributions of an imported table
    Profile {
        /// Path to MaxQuant proteinGroups.txt
        #[arg(short, long)]
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: ProfileFormat,

        /// Profile the raw table instead of the imported one
        #[arg(long)]
        raw: bool,
    },

    /// Generate an example pipeline configuration
    Example {
        /// Output path for pipeline YAML
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            config,
            input,
            design,
            output,
        } => cmd_run(&config, &input, &design, &output),

        Commands::Analyze {
            input,
            design,
            output,
            method,
            runs,
            seed,
            min_replicates,
            alpha,
            min_log_fc,
            no_normalize,
        } => {
            let criteria = SignificanceCriteria {
                alpha,
                min_abs_log_fc: min_log_fc,
                ..SignificanceCriteria::default()
            };
            cmd_analyze(
                &input,
                &design,
                &output,
                method.to_method(min_replicates),
                runs,
                seed,
                &criteria,
                !no_normalize,
            )
        }

        Commands::Impute {
            input,
            output,
            method,
            seed,
            min_replicates,
            no_normalize,
        } => cmd_impute(
            &input,
            &output,
            method.to_method(min_replicates),
            seed,
            !no_normalize,
        ),

        Commands::Profile { input, format, raw } => cmd_profile(&input, format, raw),

        Commands::Example { output } => cmd_example(&output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Run a pipeline from config
fn cmd_run(
    config_path: &PathBuf,
    input_path: &PathBuf,
    design_path: &PathBuf,
    output_dir: &PathBuf,
) -> Result<()> {
    eprintln!("Loading pipeline configuration from {:?}...", config_path);
    let config = PipelineConfig::from_yaml_file(config_path)?;

    eprintln!("Loading data...");
    let table = ProteinTable::from_maxquant(input_path)?;
    let design = ExperimentDesign::from_yaml_file(design_path)?;

    eprintln!(
        "Loaded {} proteins x {} samples",
        table.n_proteins(),
        table.n_samples()
    );

    eprintln!("Running pipeline '{}'...", config.name);
    let output = Pipeline::from_config(&config).run(&table, &design)?;

    write_output(&output, output_dir)
}

/// Standard analysis on an imported table
#[allow(clippy::too_many_arguments)]
fn cmd_analyze(
    input_path: &PathBuf,
    design_path: &PathBuf,
    output_dir: &PathBuf,
    method: ImputeMethod,
    runs: usize,
    seed: u64,
    criteria: &SignificanceCriteria,
    normalize: bool,
) -> Result<()> {
    eprintln!("Loading data...");
    let table = import_maxquant(input_path, normalize)?;
    let design = ExperimentDesign::from_yaml_file(design_path)?;
    design.validate_against(&table)?;

    eprintln!(
        "Imported {} proteins x {} samples",
        table.n_proteins(),
        table.n_samples()
    );

    eprintln!("Imputing ({}, {} runs, seed {})...", method.name(), runs, seed);
    let imputed = impute_runs(&table, method, runs, seed)?;

    eprintln!("Comparing {} condition pair(s)...", design.comparisons().len());
    let comparisons = compare(&design, &table, &imputed, criteria)?;

    let output = AnalysisOutput {
        table,
        imputed,
        comparisons,
    };
    write_output(&output, output_dir)
}

fn write_output(output: &AnalysisOutput, output_dir: &PathBuf) -> Result<()> {
    eprintln!("Writing results to {:?}...", output_dir);
    output.write_tsv(output_dir)?;

    eprintln!("Done!");
    for result in &output.comparisons {
        eprint!("{}", result.summary());

        let top: Vec<_> = result
            .sorted_by_p_adjusted()
            .into_iter()
            .filter(|p| p.significant)
            .take(5)
            .collect();
        if !top.is_empty() {
            eprintln!("  Top hits:");
            for p in top {
                eprintln!(
                    "    {:<16} log FC = {:>7.3}  q = {:.2e}",
                    p.label(),
                    p.log_fc,
                    p.p_adjusted
                );
            }
        }
    }
    Ok(())
}

/// Impute once and write the table
fn cmd_impute(
    input_path: &PathBuf,
    output_path: &PathBuf,
    method: ImputeMethod,
    seed: u64,
    normalize: bool,
) -> Result<()> {
    eprintln!("Loading data...");
    let table = import_maxquant(input_path, normalize)?;

    eprintln!("Imputing {} missing values ({})...", table.n_missing(), method.name());
    let imputed = impute_runs(&table, method, 1, seed)?;

    for run in &imputed {
        eprintln!(
            "  imputed {} values, {} still missing",
            run.n_imputed(),
            run.n_missing()
        );
        run.table().to_tsv(output_path)?;
    }
    eprintln!("Wrote imputed table to {:?}", output_path);

    Ok(())
}

/// Profile a protein table
fn cmd_profile(input_path: &PathBuf, format: ProfileFormat, raw: bool) -> Result<()> {
    eprintln!("Loading data...");
    let table = if raw {
        ProteinTable::from_maxquant(input_path)?
    } else {
        import_maxquant(input_path, false)?
    };

    let data_profile = profile(&table);
    match format {
        ProfileFormat::Json => println!("{}", data_profile.to_json()?),
        ProfileFormat::Yaml => println!("{}", data_profile.to_yaml()?),
        ProfileFormat::Text => print!("{}", data_profile),
    }

    Ok(())
}

/// Write the standard pipeline as an editable example
fn cmd_example(output_path: &PathBuf) -> Result<()> {
    let config = standard_pipeline(DEFAULT_RUNS, DEFAULT_SEED).to_config(Some(
        "Standard LFQ analysis: clean, log2, median-normalize, two-step imputation, compare",
    ));
    let yaml = config.to_yaml()?;

    std::fs::write(output_path, &yaml)?;
    eprintln!("Wrote example pipeline to {:?}", output_path);
    eprintln!();
    eprintln!("Contents:");
    println!("{}", yaml);

    Ok(())
}
