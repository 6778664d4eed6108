use sdp_core::errors::{ErrorInfo, SdpError};
use sdp_core::params::{ParamType, ParamValue, ResolvedParams};

use crate::schema::ParameterSchema;
use crate::table::DesignRow;

/// Resolves one design row against the schema into a concrete parameter set.
///
/// Overlay first: a non-empty cell whose column matches a schema parameter is
/// coerced to the declared type and wins over everything. Then the cascade:
/// specs are walked in declaration order, so an unset entry copies the
/// already-resolved value of its inheritance target. Columns the schema does
/// not declare are ignored.
///
/// Pure and deterministic: the same row and schema always produce an equal
/// parameter set.
pub fn resolve(schema: &ParameterSchema, row: &DesignRow) -> Result<ResolvedParams, SdpError> {
    let mut resolved = ResolvedParams::new();
    for spec in schema.specs() {
        let value = match row.cell(&spec.name) {
            Some(raw) => coerce(raw, spec.ty, &spec.name, row)?,
            None => match (&spec.default, &spec.inherits_from) {
                (Some(default), _) => default.clone(),
                (None, Some(parent)) => resolved
                    .get(parent)
                    .cloned()
                    .ok_or_else(|| unresolved(&spec.name, row))?,
                (None, None) => return Err(unresolved(&spec.name, row)),
            },
        };
        resolved.insert(spec.name.clone(), value);
    }
    Ok(resolved)
}

fn coerce(
    raw: &str,
    ty: ParamType,
    column: &str,
    row: &DesignRow,
) -> Result<ParamValue, SdpError> {
    let coercion_error = |code: &str, expected: &str| {
        SdpError::Coercion(
            ErrorInfo::new(code, format!("cell is not {expected}"))
                .with_context("experiment", row.experiment_id())
                .with_context("column", column)
                .with_context("value", raw),
        )
    };
    match ty {
        ParamType::Integer => raw
            .parse::<i64>()
            .map(ParamValue::Integer)
            .map_err(|_| coercion_error("coerce.integer", "an integer")),
        ParamType::Real => raw
            .parse::<f64>()
            .map(ParamValue::Real)
            .map_err(|_| coercion_error("coerce.real", "a real number")),
        ParamType::Text => Ok(ParamValue::Text(raw.to_string())),
    }
}

fn unresolved(parameter: &str, row: &DesignRow) -> SdpError {
    SdpError::Resolve(
        ErrorInfo::new("resolve.unset", "cascade left a parameter unset")
            .with_context("experiment", row.experiment_id())
            .with_context("parameter", parameter)
            .with_hint("the static schema is malformed; this is a programming error"),
    )
}
