use sdp_core::errors::{ErrorInfo, SdpError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("experiment", "3")
        .with_context("column", "Aspiration_Rate")
}

#[test]
fn table_error_surface() {
    let err = SdpError::Table(sample_info("table.open", "failed to open design table"));
    assert_eq!(err.info().code, "table.open");
    assert!(err.info().context.contains_key("experiment"));
}

#[test]
fn coercion_error_surface() {
    let err = SdpError::Coercion(sample_info("coerce.real", "cell is not a real number"));
    assert_eq!(err.info().code, "coerce.real");
    assert!(err.info().context.contains_key("column"));
}

#[test]
fn resolve_error_surface() {
    let err = SdpError::Resolve(sample_info("resolve.unset", "parameter left unset"));
    assert_eq!(err.info().code, "resolve.unset");
}

#[test]
fn allocation_error_surface() {
    let err = SdpError::Allocation(sample_info("tips.range", "column beyond rack"));
    assert_eq!(err.info().code, "tips.range");
}

#[test]
fn display_includes_context_and_hint() {
    let err = SdpError::Io(
        ErrorInfo::new("io.write", "failed to write artifact")
            .with_context("experiment", "7")
            .with_hint("check output directory permissions"),
    );
    let rendered = err.to_string();
    assert!(rendered.contains("io.write"));
    assert!(rendered.contains("experiment=7"));
    assert!(rendered.contains("check output directory permissions"));
}

#[test]
fn errors_serialize_with_family_tag() {
    let err = SdpError::Serde(sample_info("json.encode", "encode failed"));
    let json = serde_json::to_string(&err).expect("serialize");
    assert!(json.contains("\"family\":\"Serde\""));
    let back: SdpError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, err);
}
