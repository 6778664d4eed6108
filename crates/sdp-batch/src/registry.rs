use std::fs::{self, OpenOptions};
use std::io::BufWriter;
use std::path::Path;

use csv::WriterBuilder;
use sdp_core::errors::{ErrorInfo, SdpError};

use crate::driver::ArtifactRecord;

/// Column order of the artifact registry.
pub const REGISTRY_COLUMNS: [&str; 4] =
    ["experiment_id", "params_hash", "start_column", "artifact_path"];

/// Appends artifact records to an append-only CSV registry.
///
/// The header is written once when the file is created; repeated batches
/// keep appending, so the registry accumulates the provenance of every
/// artifact ever written through it.
pub fn registry_append(path: &Path, records: &[ArtifactRecord]) -> Result<(), SdpError> {
    ensure_parent(path)?;
    let file_exists = path.exists();
    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)
        .map_err(|err| {
            SdpError::Io(
                ErrorInfo::new("registry.open", "failed to open artifact registry")
                    .with_context("path", path.display().to_string())
                    .with_hint(err.to_string()),
            )
        })?;
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(BufWriter::new(file));
    if !file_exists {
        writer
            .write_record(REGISTRY_COLUMNS)
            .map_err(|err| wrap_csv("registry.header", err))?;
    }
    for record in records {
        writer
            .write_record([
                record.experiment_id.as_str(),
                record.params_hash.as_str(),
                &record.start_column.to_string(),
                record.path.as_str(),
            ])
            .map_err(|err| wrap_csv("registry.row", err))?;
    }
    writer
        .flush()
        .map_err(|err| wrap_csv("registry.flush", err.into()))?;
    Ok(())
}

fn ensure_parent(path: &Path) -> Result<(), SdpError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                SdpError::Io(
                    ErrorInfo::new("registry.parent", "failed to create registry directory")
                        .with_context("path", parent.display().to_string())
                        .with_hint(err.to_string()),
                )
            })?;
        }
    }
    Ok(())
}

fn wrap_csv(code: &str, err: csv::Error) -> SdpError {
    SdpError::Io(ErrorInfo::new(code, "artifact registry failure").with_hint(err.to_string()))
}
