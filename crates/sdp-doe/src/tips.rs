use sdp_core::errors::{ErrorInfo, SdpError};
use sdp_core::params::TipAllocation;

/// Number of addressable columns on the tip rack.
pub const RACK_WIDTH: u8 = 12;
/// Columns consumed per experiment, one per pipetting stage.
pub const COLUMNS_PER_EXPERIMENT: u8 = 3;
/// Experiments per rack before the allocation cycle repeats.
pub const REUSE_CYCLE: u8 = 4;

/// Allocates the three tip columns for the experiment at the given 1-based
/// position.
///
/// Experiments are grouped in blocks of [`REUSE_CYCLE`]; block position
/// `(index - 1) % 4` maps to start columns 1, 4, 7, 10, so three consecutive
/// columns per experiment exactly fill the rack once per block and never
/// overlap within it.
///
/// Operational precondition, not software-enforced: the physical rack must be
/// replenished at the start of every block of four experiments. The allocator
/// has no way to verify this.
pub fn allocate(experiment_index: usize) -> Result<TipAllocation, SdpError> {
    if experiment_index == 0 {
        return Err(SdpError::Allocation(
            ErrorInfo::new("tips.index", "experiment index is 1-based")
                .with_context("experiment", experiment_index.to_string()),
        ));
    }
    let block = ((experiment_index - 1) % REUSE_CYCLE as usize) as u8;
    let start = 1 + COLUMNS_PER_EXPERIMENT * block;
    if start + 2 > RACK_WIDTH {
        return Err(SdpError::Allocation(
            ErrorInfo::new("tips.range", "tip column beyond rack width")
                .with_context("experiment", experiment_index.to_string())
                .with_context("start_column", start.to_string())
                .with_hint("reuse cycle and rack width constants are inconsistent"),
        ));
    }
    Ok(TipAllocation {
        fluid_column: start,
        diluent_column: start + 1,
        dilution_column: start + 2,
    })
}
