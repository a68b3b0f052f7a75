use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shared_utils::env::{dir_from_arg_or_env, get_env_var};
use tracing_subscriber::EnvFilter;
use vector_gen::config::load_settings;
use vector_gen::consistency::compare_dirs;
use vector_gen::pipeline::classify::{ClassifyOptions, RunMode, run_classify};
use vector_gen::pipeline::manifest::write_manifest;
use vector_gen::pipeline::sibling_dir;
use vector_gen::pipeline::split::run_split;

#[derive(Parser)]
#[command(version, about = "Trading vector generator")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Split alerts files into per-vector raw segment files.
    Split {
        /// Defaults to $ALERTS_DIR.
        #[arg(long, value_name = "DIR")]
        alerts_dir: Option<PathBuf>,
    },
    /// Compute, score and annotate feature records for raw segment files.
    Classify {
        /// Defaults to $RAW_VECTORS_DIR.
        #[arg(long, value_name = "DIR")]
        raw_dir: Option<PathBuf>,
        /// Defaults to a `classified` directory next to the raw one.
        #[arg(long, value_name = "DIR")]
        classified_dir: Option<PathBuf>,
        /// Only process one day (YYMMDD) and keep other output files.
        #[arg(long, value_name = "YYMMDD")]
        date: Option<String>,
        #[arg(long, value_enum, default_value_t = RunMode::Expanding)]
        mode: RunMode,
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
    /// Compare raw and classified directories by stem and line count.
    Check {
        /// Defaults to $DATA_BASE/raw_vectors.
        raw_dir: Option<PathBuf>,
        /// Defaults to $DATA_BASE/classified.
        classified_dir: Option<PathBuf>,
    },
    /// Write classified-manifest.json listing assets, dates and timeframes.
    Manifest {
        /// Defaults to $DATA_BASE/classified.
        classified_dir: Option<PathBuf>,
    },
}

fn data_base_dir(arg: Option<PathBuf>, sub: &str) -> Result<PathBuf> {
    match arg {
        Some(p) => Ok(p),
        None => Ok(PathBuf::from(get_env_var("DATA_BASE")?).join(sub)),
    }
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Cmd::Split { alerts_dir } => {
            let alerts_dir = dir_from_arg_or_env(alerts_dir, "ALERTS_DIR")?;
            let raw_dir = sibling_dir(&alerts_dir, "raw_vectors");
            let report = run_split(&alerts_dir, &raw_dir)
                .with_context(|| format!("splitting alerts in {}", alerts_dir.display()))?;
            println!(
                "split {} files into {} vectors in {} ({} sanity violations, {} skipped)",
                report.files,
                report.vectors,
                raw_dir.display(),
                report.sanity_violations,
                report.skipped.len()
            );
        }
        Cmd::Classify {
            raw_dir,
            classified_dir,
            date,
            mode,
            config,
        } => {
            let raw_dir = dir_from_arg_or_env(raw_dir, "RAW_VECTORS_DIR")?;
            let classified_dir = classified_dir.unwrap_or_else(|| sibling_dir(&raw_dir, "classified"));
            let settings = load_settings(config.as_deref()).context("loading settings")?;
            let opts = ClassifyOptions {
                mode,
                date,
                output: settings.output,
            };
            let report = run_classify(&raw_dir, &classified_dir, &opts)
                .with_context(|| format!("classifying {}", raw_dir.display()))?;
            println!(
                "classified {} of {} files ({} records, {} skipped) into {}",
                report.files_out,
                report.files_in,
                report.records,
                report.skipped.len(),
                classified_dir.display()
            );
        }
        Cmd::Check {
            raw_dir,
            classified_dir,
        } => {
            let raw_dir = data_base_dir(raw_dir, "raw_vectors")?;
            let classified_dir = data_base_dir(classified_dir, "classified")?;
            let report = compare_dirs(&raw_dir, &classified_dir).context("comparing directories")?;
            println!("{report}");
            if !report.is_consistent() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Cmd::Manifest { classified_dir } => {
            let classified_dir = data_base_dir(classified_dir, "classified")?;
            let (path, manifest) = write_manifest(&classified_dir)
                .with_context(|| format!("writing manifest for {}", classified_dir.display()))?;
            println!(
                "wrote {} ({} assets, {} dates, {} timeframes)",
                path.display(),
                manifest.assets.len(),
                manifest.dates.len(),
                manifest.tf.len()
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}
