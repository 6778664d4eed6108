use sdp_core::errors::{ErrorInfo, SdpError};
use sdp_core::params::{ResolvedParams, TipAllocation};
use serde::{Deserialize, Serialize};

/// Reference-fluid volume seeding destination well 1 (µL).
pub const FLUID_VOLUME: f64 = 200.0;
/// Diluent fill volume for destination wells 2–12 (µL).
pub const DILUENT_VOLUME: f64 = 100.0;
/// Transfer volume for each dilution step (µL).
pub const DILUTION_VOLUME: f64 = 100.0;
/// Number of linear destination wells on the plate.
pub const DEST_WELLS: usize = 12;

const FLUID_WELL: &str = "A1";
const DILUENT_WELL: &str = "A6";
const WASTE_WELL: &str = "A12";
const DISPOSAL_ASPIRATE_VOLUME: f64 = 100.0;
const DISPOSAL_DISPENSE_VOLUME: f64 = 150.0;
const DISPOSAL_DISPENSE_RATE: f64 = 2.0;
const DISPOSAL_ASPIRATE_HEIGHT: f64 = 1.0;
const WASTE_DISPENSE_HEIGHT: f64 = 0.0;

/// Addressable deck resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    /// Destination plate carrying the 12-well dilution series.
    Plate,
    /// Reservoir holding the reference fluid, diluent, and waste wells.
    Reservoir,
    /// Tip rack feeding the pipetting tool.
    TipRack,
}

impl Resource {
    /// Labware identifier passed to `load`.
    pub fn identifier(&self) -> &'static str {
        match self {
            Resource::Plate => "costar3370flatbottomtransparent_96_wellplate_200ul",
            Resource::Reservoir => "4ti0136_96_wellplate_2200ul",
            Resource::TipRack => "opentrons_96_tiprack_300ul",
        }
    }

    /// Handle variable name used in rendered artifacts.
    pub fn handle(&self) -> &'static str {
        match self {
            Resource::Plate => "plate",
            Resource::Reservoir => "reservoir",
            Resource::TipRack => "tip_rack",
        }
    }
}

/// Vertical addressing inside a well.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Height {
    /// Fixed height in millimetres above the well bottom.
    Bottom {
        /// Millimetres above the well bottom.
        mm: f64,
    },
    /// The open end of the well.
    Top,
    /// Height sampled uniformly from `[min, max]` at execution time.
    Sampled {
        /// Lower bound in millimetres.
        min: f64,
        /// Upper bound in millimetres.
        max: f64,
    },
}

/// A position inside a well of a deck resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Resource the well belongs to.
    pub resource: Resource,
    /// Well name, e.g. `A3`.
    pub well: String,
    /// Vertical position inside the well.
    pub height: Height,
}

impl Position {
    fn bottom(resource: Resource, well: impl Into<String>, mm: f64) -> Self {
        Self {
            resource,
            well: well.into(),
            height: Height::Bottom { mm },
        }
    }
}

/// Touch-off parameters for the decontamination pass after mixing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchSpec {
    /// Fraction of the well radius swept by the tip.
    pub radius: f64,
    /// Vertical offset from the well top, usually negative.
    pub v_offset: f64,
    /// Sweep speed.
    pub speed: f64,
}

/// Fixed-volume fill from a reservoir well into a plate well, followed by a
/// residual clear at the destination top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliquotStep {
    /// Source position in the reservoir.
    pub source: Position,
    /// Destination position on the plate.
    pub dest: Position,
    /// Transfer volume in µL.
    pub volume: f64,
    /// Aspirate rate multiplier.
    pub aspirate_rate: f64,
    /// Dispense rate multiplier.
    pub dispense_rate: f64,
}

/// Serial transfer from one plate well into the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DilutionStep {
    /// Source plate position.
    pub source: Position,
    /// Destination plate position.
    pub dest: Position,
    /// Transfer volume in µL.
    pub volume: f64,
    /// Aspirate rate multiplier.
    pub aspirate_rate: f64,
    /// Dispense rate multiplier.
    pub dispense_rate: f64,
}

/// In-well mix cycle with execution-sampled heights, then a touch-off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixCycle {
    /// Plate well being mixed.
    pub well: String,
    /// Number of aspirate/dispense repetitions.
    pub repetitions: i64,
    /// Mix volume in µL, precomputed from the resolved parameter set.
    pub volume: f64,
    /// Aspirate height, usually [`Height::Sampled`].
    pub aspirate_height: Height,
    /// Dispense height, usually [`Height::Sampled`].
    pub dispense_height: Height,
    /// Aspirate rate multiplier.
    pub aspirate_rate: f64,
    /// Dispense rate multiplier.
    pub dispense_rate: f64,
    /// Touch-off performed once after the repetitions.
    pub touch: TouchSpec,
}

/// Final clear-out from the last dilution source well into waste.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisposalStep {
    /// Source plate position.
    pub source: Position,
    /// Waste position in the reservoir.
    pub dest: Position,
    /// Aspirated volume in µL.
    pub aspirate_volume: f64,
    /// Dispensed volume in µL (over-dispense clears the tip).
    pub dispense_volume: f64,
    /// Aspirate rate multiplier.
    pub aspirate_rate: f64,
    /// Dispense rate multiplier.
    pub dispense_rate: f64,
}

/// One step of the fixed serial-dilution procedure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Step {
    /// Aliquot fill.
    Aliquot(AliquotStep),
    /// Dilution transfer.
    Dilution(DilutionStep),
    /// Mix cycle.
    Mix(MixCycle),
    /// Waste disposal.
    Disposal(DisposalStep),
}

/// One tool session: pick up from a specific rack well, run steps, release.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    /// Tip-rack well the tool picks up from.
    pub tip_well: String,
    /// Steps executed while this tip is mounted.
    pub steps: Vec<Step>,
}

/// Metadata identifying one generated protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramMeta {
    /// Experiment identifier (1-based row position as text).
    pub experiment_id: String,
    /// Human readable protocol name.
    pub name: String,
    /// Human readable protocol description.
    pub description: String,
}

/// Data-only protocol descriptor for one experiment.
///
/// Carries the full literal parameter set and the fixed step list; rendering
/// and execution never look anything up elsewhere, so the descriptor (and the
/// artifact rendered from it) is self-contained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Protocol metadata.
    pub meta: ProgramMeta,
    /// Fully resolved parameter set, embedded literally.
    pub params: ResolvedParams,
    /// Tip columns assigned to this experiment.
    pub tips: TipAllocation,
    /// Mix volume in µL, `(dilution + diluent) * mixing fraction`.
    pub mix_volume: f64,
    /// Tool sessions in execution order.
    pub stages: Vec<Stage>,
}

fn plate_well(column: usize) -> String {
    format!("A{column}")
}

fn rack_well(column: u8) -> String {
    format!("A{column}")
}

/// Builds the fixed serial-dilution program for one resolved experiment.
///
/// The procedure is one reference-fluid aliquot into well 1, eleven diluent
/// fills into wells 2–12, ten dilution transfers (well i into well i+1) each
/// followed by a mix cycle and touch-off, and a final disposal from well 11
/// into waste. All rates and heights come from the resolved set; sampled mix
/// heights stay symbolic until execution.
pub fn build_program(
    experiment_id: &str,
    params: &ResolvedParams,
    tips: &TipAllocation,
) -> Result<Program, SdpError> {
    let aliquot_asp_rate = params.real("Aliquot_Aspiration_Rate")?;
    let aliquot_asp_height = params.real("Aliquot_Aspiration_Height")?;
    let aliquot_disp_rate = params.real("Aliquot_Dispense_Rate")?;
    let aliquot_disp_height = params.real("Aliquot_Dispense_Height")?;
    let dilution_asp_rate = params.real("Dilution_Aspiration_Rate")?;
    let dilution_asp_height = params.real("Dilution_Aspiration_Height")?;
    let dilution_disp_rate = params.real("Dilution_Dispense_Rate")?;
    let dilution_disp_height = params.real("Dilution_Dispense_Height")?;
    let mix_asp_rate = params.real("Mix_Aspiration_Rate")?;
    let mix_asp_min = params.real("Mix_Aspiration_Height_Min")?;
    let mix_asp_max = params.real("Mix_Aspiration_Height_Max")?;
    let mix_disp_rate = params.real("Mix_Dispense_Rate")?;
    let mix_disp_min = params.real("Mix_Dispense_Height_Min")?;
    let mix_disp_max = params.real("Mix_Dispense_Height_Max")?;
    let repetitions = params.integer("Mixing_Repetitions")?;
    let mix_fraction = params.real("Mixing_Fraction")?;
    let touch = TouchSpec {
        radius: params.real("Touch_Tip_Radius")?,
        v_offset: params.real("Touch_Tip_V_Offset")?,
        speed: params.real("Touch_Tip_Speed")?,
    };
    if mix_asp_min > mix_asp_max || mix_disp_min > mix_disp_max {
        return Err(SdpError::Resolve(
            ErrorInfo::new("program.mix-range", "mix height minimum exceeds maximum")
                .with_context("experiment", experiment_id),
        ));
    }
    let mix_volume = (DILUTION_VOLUME + DILUENT_VOLUME) * mix_fraction;

    let fluid_stage = Stage {
        tip_well: rack_well(tips.fluid_column),
        steps: vec![Step::Aliquot(AliquotStep {
            source: Position::bottom(Resource::Reservoir, FLUID_WELL, aliquot_asp_height),
            dest: Position::bottom(Resource::Plate, plate_well(1), aliquot_disp_height),
            volume: FLUID_VOLUME,
            aspirate_rate: aliquot_asp_rate,
            dispense_rate: aliquot_disp_rate,
        })],
    };

    let diluent_stage = Stage {
        tip_well: rack_well(tips.diluent_column),
        steps: (2..=DEST_WELLS)
            .map(|column| {
                Step::Aliquot(AliquotStep {
                    source: Position::bottom(Resource::Reservoir, DILUENT_WELL, aliquot_asp_height),
                    dest: Position::bottom(Resource::Plate, plate_well(column), aliquot_disp_height),
                    volume: DILUENT_VOLUME,
                    aspirate_rate: aliquot_asp_rate,
                    dispense_rate: aliquot_disp_rate,
                })
            })
            .collect(),
    };

    let mut dilution_steps = Vec::with_capacity(21);
    for column in 1..=10 {
        dilution_steps.push(Step::Dilution(DilutionStep {
            source: Position::bottom(Resource::Plate, plate_well(column), dilution_asp_height),
            dest: Position::bottom(Resource::Plate, plate_well(column + 1), dilution_disp_height),
            volume: DILUTION_VOLUME,
            aspirate_rate: dilution_asp_rate,
            dispense_rate: dilution_disp_rate,
        }));
        dilution_steps.push(Step::Mix(MixCycle {
            well: plate_well(column + 1),
            repetitions,
            volume: mix_volume,
            aspirate_height: Height::Sampled {
                min: mix_asp_min,
                max: mix_asp_max,
            },
            dispense_height: Height::Sampled {
                min: mix_disp_min,
                max: mix_disp_max,
            },
            aspirate_rate: mix_asp_rate,
            dispense_rate: mix_disp_rate,
            touch,
        }));
    }
    dilution_steps.push(Step::Disposal(DisposalStep {
        source: Position::bottom(Resource::Plate, plate_well(11), DISPOSAL_ASPIRATE_HEIGHT),
        dest: Position::bottom(Resource::Reservoir, WASTE_WELL, WASTE_DISPENSE_HEIGHT),
        aspirate_volume: DISPOSAL_ASPIRATE_VOLUME,
        dispense_volume: DISPOSAL_DISPENSE_VOLUME,
        aspirate_rate: dilution_asp_rate,
        dispense_rate: DISPOSAL_DISPENSE_RATE,
    }));
    let dilution_stage = Stage {
        tip_well: rack_well(tips.dilution_column),
        steps: dilution_steps,
    };

    Ok(Program {
        meta: ProgramMeta {
            experiment_id: experiment_id.to_string(),
            name: format!("Serial Dilutions (experiment {experiment_id})"),
            description: format!("Serial dilution with parameters from experiment {experiment_id}"),
        },
        params: params.clone(),
        tips: *tips,
        mix_volume,
        stages: vec![fluid_stage, diluent_stage, dilution_stage],
    })
}
