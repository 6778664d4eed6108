//! Batch driver for the serial-dilution generator: walks the design table in
//! file order, persists one rendered artifact per row, and keeps an optional
//! append-only registry of what was written.

mod driver;
mod registry;

pub use driver::{
    run_batch, run_batch_file, ArtifactRecord, BatchOptions, BatchReport, RowFailure,
};
pub use registry::{registry_append, REGISTRY_COLUMNS};
