use std::collections::BTreeMap;

use sdp_doe::{allocate, resolve, DesignRow, ParameterSchema};
use sdp_proto::{build_program, Height, Step};

fn resolved_row(index: usize, cells: &[(&str, &str)]) -> sdp_core::params::ResolvedParams {
    let row = DesignRow {
        index,
        cells: cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    };
    resolve(&ParameterSchema::standard(), &row).expect("resolve")
}

#[test]
fn mix_volume_is_fraction_of_combined_volume() {
    let params = resolved_row(1, &[("Mixing_Fraction", "0.7")]);
    let tips = allocate(1).expect("allocate");
    let program = build_program("1", &params, &tips).expect("build");
    assert_eq!(program.mix_volume, 140.0);
}

#[test]
fn stages_follow_the_tip_allocation() {
    let params = resolved_row(6, &[]);
    let tips = allocate(6).expect("allocate");
    let program = build_program("6", &params, &tips).expect("build");
    assert_eq!(program.stages.len(), 3);
    assert_eq!(program.stages[0].tip_well, "A4");
    assert_eq!(program.stages[1].tip_well, "A5");
    assert_eq!(program.stages[2].tip_well, "A6");
}

#[test]
fn procedure_has_the_fixed_step_counts() {
    let params = resolved_row(1, &[]);
    let tips = allocate(1).expect("allocate");
    let program = build_program("1", &params, &tips).expect("build");

    assert_eq!(program.stages[0].steps.len(), 1);
    assert_eq!(program.stages[1].steps.len(), 11);
    // Ten dilution transfers, ten mix cycles, one disposal.
    assert_eq!(program.stages[2].steps.len(), 21);

    let dilutions: Vec<_> = program.stages[2]
        .steps
        .iter()
        .filter_map(|step| match step {
            Step::Dilution(d) => Some((d.source.well.clone(), d.dest.well.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(dilutions.len(), 10);
    assert_eq!(dilutions[0], ("A1".to_string(), "A2".to_string()));
    assert_eq!(dilutions[9], ("A10".to_string(), "A11".to_string()));

    match program.stages[2].steps.last().unwrap() {
        Step::Disposal(disposal) => {
            assert_eq!(disposal.source.well, "A11");
            assert_eq!(disposal.aspirate_volume, 100.0);
            assert_eq!(disposal.dispense_volume, 150.0);
            assert_eq!(disposal.dispense_rate, 2.0);
        }
        other => panic!("expected disposal last, got {other:?}"),
    }
}

#[test]
fn mix_heights_stay_symbolic_until_execution() {
    let params = resolved_row(
        1,
        &[
            ("Mix_Aspiration_Height_Min", "0.8"),
            ("Mix_Aspiration_Height_Max", "2.5"),
        ],
    );
    let tips = allocate(1).expect("allocate");
    let program = build_program("1", &params, &tips).expect("build");
    let mix = program.stages[2]
        .steps
        .iter()
        .find_map(|step| match step {
            Step::Mix(mix) => Some(mix),
            _ => None,
        })
        .expect("mix cycle present");
    assert_eq!(mix.aspirate_height, Height::Sampled { min: 0.8, max: 2.5 });
    // No explicit dispense range was supplied, so the range degenerates.
    assert_eq!(mix.dispense_height, Height::Sampled { min: 1.0, max: 1.0 });
    assert_eq!(mix.repetitions, 3);
}

#[test]
fn inverted_mix_range_is_rejected() {
    let params = resolved_row(
        2,
        &[
            ("Mix_Dispense_Height_Min", "2.5"),
            ("Mix_Dispense_Height_Max", "0.8"),
        ],
    );
    let tips = allocate(2).expect("allocate");
    let err = build_program("2", &params, &tips).unwrap_err();
    assert_eq!(err.info().code, "program.mix-range");
}

#[test]
fn build_is_deterministic() {
    let mut cells = BTreeMap::new();
    cells.insert("Aspiration_Rate".to_string(), "2.0".to_string());
    let row = DesignRow { index: 3, cells };
    let schema = ParameterSchema::standard();
    let params = resolve(&schema, &row).expect("resolve");
    let tips = allocate(3).expect("allocate");
    let first = build_program("3", &params, &tips).expect("build");
    let second = build_program("3", &params, &tips).expect("build");
    assert_eq!(first, second);
}
