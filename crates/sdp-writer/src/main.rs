use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use sdp_batch::{run_batch_file, BatchOptions};
use sdp_core::errors::{ErrorInfo, SdpError};
use sdp_core::rng::{derive_substream_seed, RngHandle};
use sdp_doe::{allocate, read_design_table, resolve, ParameterSchema};
use sdp_proto::{build_program, execute, format_runlog};
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(name = "sdp-writer", about = "DOE serial-dilution protocol writer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate one protocol artifact per design-table row.
    Generate(GenerateArgs),
    /// Print the standard parameter schema as JSON.
    Schema,
    /// Resolve one row and print its deterministic run log.
    Runlog(RunlogArgs),
}

#[derive(ClapArgs, Debug)]
struct GenerateArgs {
    /// CSV design table, one experiment per row.
    #[arg(long)]
    table: PathBuf,
    /// Output directory for artifacts.
    #[arg(long, required_unless_present = "config")]
    out: Option<PathBuf>,
    /// YAML file with batch options, overridden by explicit flags.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Abort on the first failing row.
    #[arg(long)]
    fail_fast: bool,
    /// Append written artifacts to this CSV registry.
    #[arg(long)]
    registry: Option<PathBuf>,
    /// Write data-only program JSON sidecars next to the artifacts.
    #[arg(long)]
    sidecars: bool,
}

#[derive(ClapArgs, Debug)]
struct RunlogArgs {
    /// CSV design table, one experiment per row.
    #[arg(long)]
    table: PathBuf,
    /// 1-based row to replay.
    #[arg(long)]
    row: usize,
    /// Master seed; the row index selects the substream.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

/// Batch options as they appear in a `--config` YAML file.
#[derive(Debug, Default, Deserialize)]
struct GenerateConfig {
    #[serde(default)]
    out_dir: Option<PathBuf>,
    #[serde(default)]
    fail_fast: bool,
    #[serde(default)]
    registry: Option<PathBuf>,
    #[serde(default)]
    program_sidecars: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Generate(args) => generate(args),
        Command::Schema => {
            println!(
                "{}",
                serde_json::to_string_pretty(&ParameterSchema::standard())?
            );
            Ok(())
        }
        Command::Runlog(args) => runlog(args),
    }
}

fn generate(args: GenerateArgs) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            serde_yaml::from_str::<GenerateConfig>(&text)?
        }
        None => GenerateConfig::default(),
    };
    let out_dir = args
        .out
        .or(config.out_dir)
        .ok_or("no output directory given via --out or config")?;
    let opts = BatchOptions {
        out_dir,
        fail_fast: args.fail_fast || config.fail_fast,
        registry: args.registry.or(config.registry),
        program_sidecars: args.sidecars || config.program_sidecars,
    };
    let schema = ParameterSchema::standard();
    let report = run_batch_file(&schema, &args.table, &opts)?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn runlog(args: RunlogArgs) -> Result<(), Box<dyn Error>> {
    let rows = read_design_table(&args.table)?;
    let row = rows.iter().find(|row| row.index == args.row).ok_or_else(|| {
        SdpError::Table(
            ErrorInfo::new("table.row", "row not present in design table")
                .with_context("experiment", args.row.to_string())
                .with_context("rows", rows.len().to_string()),
        )
    })?;
    let schema = ParameterSchema::standard();
    let params = resolve(&schema, row)?;
    let tips = allocate(row.index)?;
    let program = build_program(&row.experiment_id(), &params, &tips)?;
    let mut rng = RngHandle::from_seed(derive_substream_seed(args.seed, row.index as u64));
    let log = execute(&program, &mut rng)?;
    print!("{}", format_runlog(&log));
    Ok(())
}
