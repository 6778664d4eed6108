use std::fs;
use std::path::{Path, PathBuf};

use sdp_core::errors::{ErrorInfo, SdpError};
use sdp_doe::{
    allocate, read_design_table, resolve, stable_hash_string, DesignRow, ParameterSchema,
};
use sdp_proto::{artifact_file_name, build_program, render, to_json};
use serde::{Deserialize, Serialize};

use crate::registry::registry_append;

/// Options controlling a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOptions {
    /// Directory artifacts are written into.
    pub out_dir: PathBuf,
    /// Abort on the first row failure instead of collecting it.
    #[serde(default)]
    pub fail_fast: bool,
    /// Optional CSV registry appended with one row per written artifact.
    #[serde(default)]
    pub registry: Option<PathBuf>,
    /// Also write the data-only program JSON next to each artifact.
    #[serde(default)]
    pub program_sidecars: bool,
}

impl BatchOptions {
    /// Options writing artifacts into the given directory, nothing else.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            fail_fast: false,
            registry: None,
            program_sidecars: false,
        }
    }
}

/// Report entry for one written artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactRecord {
    /// Experiment identifier (row position as text).
    pub experiment_id: String,
    /// Canonical hash of the resolved parameter set.
    pub params_hash: String,
    /// First tip column allocated to the experiment.
    pub start_column: u8,
    /// Path the artifact was written to.
    pub path: String,
}

/// Report entry for one failed row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowFailure {
    /// Experiment identifier of the offending row.
    pub experiment_id: String,
    /// The error, with the offending column in its context.
    pub error: SdpError,
}

/// Aggregate outcome of a batch run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BatchReport {
    /// Written artifacts in row order.
    pub artifacts: Vec<ArtifactRecord>,
    /// Rows that failed, in row order.
    pub failures: Vec<RowFailure>,
}

/// Processes every design row into one persisted artifact.
///
/// Rows are handled independently and in file order. By default a failing
/// row is recorded and the batch continues; with `fail_fast` the first
/// failure aborts the whole run. Table-level failures (unreadable file) are
/// always fatal.
pub fn run_batch(
    schema: &ParameterSchema,
    rows: &[DesignRow],
    opts: &BatchOptions,
) -> Result<BatchReport, SdpError> {
    fs::create_dir_all(&opts.out_dir).map_err(|err| {
        SdpError::Io(
            ErrorInfo::new("batch.out-dir", "failed to create output directory")
                .with_context("path", opts.out_dir.display().to_string())
                .with_hint(err.to_string()),
        )
    })?;
    let mut report = BatchReport::default();
    for row in rows {
        match process_row(schema, row, opts) {
            Ok(record) => report.artifacts.push(record),
            Err(error) if opts.fail_fast => return Err(error),
            Err(error) => report.failures.push(RowFailure {
                experiment_id: row.experiment_id(),
                error,
            }),
        }
    }
    if let Some(registry) = &opts.registry {
        registry_append(registry, &report.artifacts)?;
    }
    Ok(report)
}

/// Reads the design table and processes it with [`run_batch`].
pub fn run_batch_file(
    schema: &ParameterSchema,
    table: &Path,
    opts: &BatchOptions,
) -> Result<BatchReport, SdpError> {
    let rows = read_design_table(table)?;
    run_batch(schema, &rows, opts)
}

fn process_row(
    schema: &ParameterSchema,
    row: &DesignRow,
    opts: &BatchOptions,
) -> Result<ArtifactRecord, SdpError> {
    let experiment_id = row.experiment_id();
    let params = resolve(schema, row)?;
    let tips = allocate(row.index)?;
    let program = build_program(&experiment_id, &params, &tips)?;
    let artifact = render(&program);
    let path = opts.out_dir.join(artifact_file_name(&experiment_id));
    write_file(&path, artifact.as_bytes(), &experiment_id)?;
    if opts.program_sidecars {
        let sidecar = path.with_extension("program.json");
        write_file(&sidecar, to_json(&program)?.as_bytes(), &experiment_id)?;
    }
    Ok(ArtifactRecord {
        experiment_id,
        params_hash: stable_hash_string(&params)?,
        start_column: tips.fluid_column,
        path: path.display().to_string(),
    })
}

fn write_file(path: &Path, bytes: &[u8], experiment_id: &str) -> Result<(), SdpError> {
    fs::write(path, bytes).map_err(|err| {
        SdpError::Io(
            ErrorInfo::new("batch.write", "failed to write artifact")
                .with_context("experiment", experiment_id)
                .with_context("path", path.display().to_string())
                .with_hint(err.to_string()),
        )
    })
}
