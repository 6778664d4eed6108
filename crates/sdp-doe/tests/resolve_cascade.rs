use std::collections::BTreeMap;

use sdp_doe::{resolve, stable_hash_string, DesignRow, ParameterSchema};

fn row(index: usize, cells: &[(&str, &str)]) -> DesignRow {
    DesignRow {
        index,
        cells: cells
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

#[test]
fn defaults_only_row_resolves_every_parameter() {
    let schema = ParameterSchema::standard();
    let resolved = resolve(&schema, &row(1, &[])).expect("resolve");
    assert_eq!(resolved.len(), schema.len());
    assert_eq!(resolved.real("Aspiration_Rate").unwrap(), 1.0);
    assert_eq!(resolved.real("Aliquot_Aspiration_Rate").unwrap(), 1.0);
    assert_eq!(resolved.integer("Mixing_Repetitions").unwrap(), 3);
    assert_eq!(resolved.real("Mixing_Fraction").unwrap(), 0.7);
    assert_eq!(resolved.real("Touch_Tip_V_Offset").unwrap(), -1.0);
}

#[test]
fn step_specific_rate_inherits_global() {
    let schema = ParameterSchema::standard();
    let resolved = resolve(&schema, &row(1, &[("Aspiration_Rate", "2.0")])).expect("resolve");
    assert_eq!(resolved.real("Aliquot_Aspiration_Rate").unwrap(), 2.0);
    assert_eq!(resolved.real("Dilution_Aspiration_Rate").unwrap(), 2.0);
    assert_eq!(resolved.real("Mix_Aspiration_Rate").unwrap(), 2.0);
}

#[test]
fn explicit_step_value_beats_inheritance() {
    let schema = ParameterSchema::standard();
    let resolved = resolve(
        &schema,
        &row(
            1,
            &[("Aspiration_Rate", "2.0"), ("Mix_Aspiration_Rate", "0.5")],
        ),
    )
    .expect("resolve");
    assert_eq!(resolved.real("Mix_Aspiration_Rate").unwrap(), 0.5);
    assert_eq!(resolved.real("Dilution_Aspiration_Rate").unwrap(), 2.0);
}

#[test]
fn mix_height_bounds_degenerate_to_single_height() {
    let schema = ParameterSchema::standard();
    let resolved = resolve(&schema, &row(1, &[("Mix_Aspiration_Height", "1.8")])).expect("resolve");
    assert_eq!(resolved.real("Mix_Aspiration_Height_Min").unwrap(), 1.8);
    assert_eq!(resolved.real("Mix_Aspiration_Height_Max").unwrap(), 1.8);
}

#[test]
fn explicit_mix_height_range_survives() {
    let schema = ParameterSchema::standard();
    let resolved = resolve(
        &schema,
        &row(
            1,
            &[
                ("Mix_Dispense_Height_Min", "0.8"),
                ("Mix_Dispense_Height_Max", "2.5"),
            ],
        ),
    )
    .expect("resolve");
    assert_eq!(resolved.real("Mix_Dispense_Height_Min").unwrap(), 0.8);
    assert_eq!(resolved.real("Mix_Dispense_Height_Max").unwrap(), 2.5);
    // The single mix height itself still follows the global dispense height.
    assert_eq!(resolved.real("Mix_Dispense_Height").unwrap(), 1.0);
}

#[test]
fn final_mix_rate_follows_standard_mix_rate() {
    let schema = ParameterSchema::standard();
    let resolved = resolve(&schema, &row(1, &[("Mix_Dispense_Rate", "1.4")])).expect("resolve");
    assert_eq!(resolved.real("Final_Mix_Dispense_Rate").unwrap(), 1.4);

    let resolved = resolve(&schema, &row(2, &[("Dispense_Rate", "0.9")])).expect("resolve");
    assert_eq!(resolved.real("Final_Mix_Dispense_Rate").unwrap(), 0.9);
}

#[test]
fn unrecognized_columns_are_ignored() {
    let schema = ParameterSchema::standard();
    let resolved = resolve(
        &schema,
        &row(1, &[("Pattern", "PB-12"), ("Aspiration_Rate", "1.5")]),
    )
    .expect("resolve");
    assert_eq!(resolved.len(), schema.len());
    assert!(resolved.get("Pattern").is_none());
}

#[test]
fn bad_real_cell_reports_experiment_and_column() {
    let schema = ParameterSchema::standard();
    let err = resolve(&schema, &row(9, &[("Dispense_Rate", "fast")])).unwrap_err();
    assert_eq!(err.info().code, "coerce.real");
    assert_eq!(
        err.info().context.get("experiment").map(String::as_str),
        Some("9")
    );
    assert_eq!(
        err.info().context.get("column").map(String::as_str),
        Some("Dispense_Rate")
    );
}

#[test]
fn fractional_repetitions_fail_integer_coercion() {
    let schema = ParameterSchema::standard();
    let err = resolve(&schema, &row(2, &[("Mixing_Repetitions", "3.5")])).unwrap_err();
    assert_eq!(err.info().code, "coerce.integer");
}

#[test]
fn resolution_is_pure_and_idempotent() {
    let schema = ParameterSchema::standard();
    let mut cells = BTreeMap::new();
    cells.insert("Aspiration_Rate".to_string(), "2.0".to_string());
    cells.insert("Mix_Dispense_Height_Min".to_string(), "0.8".to_string());
    cells.insert("Mix_Dispense_Height_Max".to_string(), "2.5".to_string());
    let design_row = DesignRow { index: 4, cells };

    let first = resolve(&schema, &design_row).expect("resolve");
    let second = resolve(&schema, &design_row).expect("resolve");
    assert_eq!(first, second);
    assert_eq!(
        stable_hash_string(&first).unwrap(),
        stable_hash_string(&second).unwrap()
    );
}
