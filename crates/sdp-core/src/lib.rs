#![deny(missing_docs)]
#![doc = "Core types shared by the serial-dilution protocol generator: structured errors, the parameter value model, tip allocations, and the deterministic RNG handle."]

pub mod errors;
pub mod params;
pub mod rng;

pub use errors::{ErrorInfo, SdpError};
pub use params::{ParamType, ParamValue, ResolvedParams, TipAllocation};
pub use rng::{derive_substream_seed, RngHandle};
