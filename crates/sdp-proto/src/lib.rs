//! Declarative protocol programs for the serial-dilution generator: the
//! fixed step list built from a resolved parameter set, the artifact
//! renderer, program serialization, and the run-log interpreter.

mod emit;
mod program;
mod runlog;
mod serde;

pub use emit::{artifact_file_name, render};
pub use program::{
    build_program, AliquotStep, DilutionStep, DisposalStep, Height, MixCycle, Position, Program,
    ProgramMeta, Resource, Stage, Step, TouchSpec, DEST_WELLS, DILUENT_VOLUME, DILUTION_VOLUME,
    FLUID_VOLUME,
};
pub use runlog::{execute, format_runlog, Command};

pub use crate::serde::{from_bytes, from_json, to_bytes, to_json};
