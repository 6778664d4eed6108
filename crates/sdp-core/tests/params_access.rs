use sdp_core::params::{ParamType, ParamValue, ResolvedParams, TipAllocation};

fn sample_params() -> ResolvedParams {
    let mut params = ResolvedParams::new();
    params.insert("Aspiration_Rate", ParamValue::Real(2.0));
    params.insert("Mixing_Repetitions", ParamValue::Integer(3));
    params.insert("Label", ParamValue::Text("series-a".into()));
    params
}

#[test]
fn typed_accessors_return_declared_values() {
    let params = sample_params();
    assert_eq!(params.real("Aspiration_Rate").unwrap(), 2.0);
    assert_eq!(params.integer("Mixing_Repetitions").unwrap(), 3);
    assert_eq!(params.text("Label").unwrap(), "series-a");
}

#[test]
fn integers_widen_to_real() {
    let params = sample_params();
    assert_eq!(params.real("Mixing_Repetitions").unwrap(), 3.0);
    assert_eq!(
        params.get("Mixing_Repetitions").unwrap().param_type(),
        ParamType::Integer
    );
}

#[test]
fn missing_and_mistyped_lookups_fail_with_parameter_context() {
    let params = sample_params();
    let missing = params.real("Dispense_Rate").unwrap_err();
    assert_eq!(missing.info().code, "params.missing");
    assert_eq!(
        missing.info().context.get("parameter").map(String::as_str),
        Some("Dispense_Rate")
    );
    let mistyped = params.integer("Label").unwrap_err();
    assert_eq!(mistyped.info().code, "params.type");
}

#[test]
fn params_roundtrip_through_json() {
    let params = sample_params();
    let json = serde_json::to_string(&params).expect("serialize");
    let back: ResolvedParams = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, params);
}

#[test]
fn tip_allocation_lists_columns_in_stage_order() {
    let tips = TipAllocation {
        fluid_column: 4,
        diluent_column: 5,
        dilution_column: 6,
    };
    assert_eq!(tips.columns(), [4, 5, 6]);
}
