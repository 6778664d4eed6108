//! Execution-time interpreter turning a program into a concrete command log.
//!
//! Generation is deterministic; this is the one place randomness enters, and
//! it only enters through the injected [`RngHandle`], so a log replays
//! exactly for a given program and seed.

use sdp_core::errors::{ErrorInfo, SdpError};
use sdp_core::rng::RngHandle;
use serde::{Deserialize, Serialize};

use crate::program::{Height, Position, Program, Resource, Step};

/// One executed hardware command with every argument concrete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Mount a tip from the rack.
    PickUp { tip_well: String },
    /// Draw liquid, heights in millimetres above the well bottom.
    Aspirate {
        volume: f64,
        resource: Resource,
        well: String,
        height_mm: f64,
        rate: f64,
    },
    /// Expel liquid, heights in millimetres above the well bottom.
    Dispense {
        volume: f64,
        resource: Resource,
        well: String,
        height_mm: f64,
        rate: f64,
    },
    /// Clear residual liquid at the well's open end.
    ClearResidual { resource: Resource, well: String },
    /// Touch the tip off against the well side.
    TouchDecontaminate {
        well: String,
        radius: f64,
        v_offset: f64,
        speed: f64,
    },
    /// Return the tip.
    ReleaseTool,
}

/// Interprets a program into a concrete command log.
///
/// Sampled heights are drawn from the injected RNG; a degenerate range yields
/// its bound exactly, so an unspecified mix range replays as a fixed height.
pub fn execute(program: &Program, rng: &mut RngHandle) -> Result<Vec<Command>, SdpError> {
    let mut log = Vec::new();
    for stage in &program.stages {
        log.push(Command::PickUp {
            tip_well: stage.tip_well.clone(),
        });
        for step in &stage.steps {
            match step {
                Step::Aliquot(aliquot) => {
                    log.push(aspirate(&aliquot.source, aliquot.volume, aliquot.aspirate_rate, rng)?);
                    log.push(dispense(&aliquot.dest, aliquot.volume, aliquot.dispense_rate, rng)?);
                    log.push(Command::ClearResidual {
                        resource: aliquot.dest.resource,
                        well: aliquot.dest.well.clone(),
                    });
                }
                Step::Dilution(dilution) => {
                    log.push(aspirate(
                        &dilution.source,
                        dilution.volume,
                        dilution.aspirate_rate,
                        rng,
                    )?);
                    log.push(dispense(
                        &dilution.dest,
                        dilution.volume,
                        dilution.dispense_rate,
                        rng,
                    )?);
                }
                Step::Mix(mix) => {
                    for _ in 0..mix.repetitions.max(0) {
                        log.push(Command::Aspirate {
                            volume: mix.volume,
                            resource: Resource::Plate,
                            well: mix.well.clone(),
                            height_mm: sample_height(&mix.aspirate_height, rng)?,
                            rate: mix.aspirate_rate,
                        });
                        log.push(Command::Dispense {
                            volume: mix.volume,
                            resource: Resource::Plate,
                            well: mix.well.clone(),
                            height_mm: sample_height(&mix.dispense_height, rng)?,
                            rate: mix.dispense_rate,
                        });
                    }
                    log.push(Command::TouchDecontaminate {
                        well: mix.well.clone(),
                        radius: mix.touch.radius,
                        v_offset: mix.touch.v_offset,
                        speed: mix.touch.speed,
                    });
                }
                Step::Disposal(disposal) => {
                    log.push(aspirate(
                        &disposal.source,
                        disposal.aspirate_volume,
                        disposal.aspirate_rate,
                        rng,
                    )?);
                    log.push(dispense(
                        &disposal.dest,
                        disposal.dispense_volume,
                        disposal.dispense_rate,
                        rng,
                    )?);
                }
            }
        }
        log.push(Command::ReleaseTool);
    }
    Ok(log)
}

fn aspirate(
    position: &Position,
    volume: f64,
    rate: f64,
    rng: &mut RngHandle,
) -> Result<Command, SdpError> {
    Ok(Command::Aspirate {
        volume,
        resource: position.resource,
        well: position.well.clone(),
        height_mm: sample_height(&position.height, rng)?,
        rate,
    })
}

fn dispense(
    position: &Position,
    volume: f64,
    rate: f64,
    rng: &mut RngHandle,
) -> Result<Command, SdpError> {
    Ok(Command::Dispense {
        volume,
        resource: position.resource,
        well: position.well.clone(),
        height_mm: sample_height(&position.height, rng)?,
        rate,
    })
}

fn sample_height(height: &Height, rng: &mut RngHandle) -> Result<f64, SdpError> {
    match height {
        Height::Bottom { mm } => Ok(*mm),
        Height::Sampled { min, max } => Ok(rng.uniform_in_range(*min, *max)),
        Height::Top => Err(SdpError::Serde(ErrorInfo::new(
            "runlog.height",
            "transfer positions must address a concrete or sampled height",
        ))),
    }
}

/// Formats a command log for human inspection, one line per command.
pub fn format_runlog(commands: &[Command]) -> String {
    let mut out = String::new();
    for command in commands {
        let line = match command {
            Command::PickUp { tip_well } => format!("pick_up {tip_well}"),
            Command::Aspirate {
                volume,
                resource,
                well,
                height_mm,
                rate,
            } => format!(
                "aspirate {volume} uL from {}/{well} at {height_mm:.3} mm, rate {rate}",
                resource.handle()
            ),
            Command::Dispense {
                volume,
                resource,
                well,
                height_mm,
                rate,
            } => format!(
                "dispense {volume} uL into {}/{well} at {height_mm:.3} mm, rate {rate}",
                resource.handle()
            ),
            Command::ClearResidual { resource, well } => {
                format!("clear_residual {}/{well}", resource.handle())
            }
            Command::TouchDecontaminate {
                well,
                radius,
                v_offset,
                speed,
            } => format!(
                "touch_decontaminate plate/{well} radius {radius} offset {v_offset} speed {speed}"
            ),
            Command::ReleaseTool => "release_tool".to_string(),
        };
        out.push_str(&line);
        out.push('\n');
    }
    out
}
