use std::collections::BTreeSet;

use sdp_core::errors::{ErrorInfo, SdpError};
use sdp_core::params::{ParamType, ParamValue};
use serde::{Deserialize, Serialize};

/// Declaration of a single design parameter.
///
/// A spec either carries a concrete `default`, or names an earlier parameter
/// it inherits from when the design table leaves it blank. A spec with
/// neither is rejected at schema construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Parameter name, matching the design-table column header.
    pub name: String,
    /// Declared value type.
    pub ty: ParamType,
    /// Concrete default, or `None` for the unset sentinel.
    #[serde(default)]
    pub default: Option<ParamValue>,
    /// Earlier parameter whose resolved value fills an unset entry.
    #[serde(default)]
    pub inherits_from: Option<String>,
}

/// Immutable parameter schema for one protocol family.
///
/// Declaration order is the resolution order: every `inherits_from` target
/// precedes its dependents, so a single forward pass resolves the cascade and
/// dependency cycles cannot be expressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    specs: Vec<ParamSpec>,
}

fn schema_error(code: &str, message: &str, name: &str) -> SdpError {
    SdpError::Resolve(ErrorInfo::new(code, message).with_context("parameter", name))
}

impl ParameterSchema {
    /// Builds a schema, validating the inheritance graph.
    pub fn new(specs: Vec<ParamSpec>) -> Result<Self, SdpError> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for spec in &specs {
            if !seen.insert(spec.name.as_str()) {
                return Err(schema_error(
                    "schema.duplicate",
                    "parameter declared twice",
                    &spec.name,
                ));
            }
            if let Some(default) = &spec.default {
                if default.param_type() != spec.ty {
                    return Err(schema_error(
                        "schema.default-type",
                        "default value does not match declared type",
                        &spec.name,
                    ));
                }
            }
            match &spec.inherits_from {
                Some(parent) => {
                    let Some(parent_spec) = specs
                        .iter()
                        .take_while(|candidate| candidate.name != spec.name)
                        .find(|candidate| candidate.name == *parent)
                    else {
                        return Err(schema_error(
                            "schema.parent",
                            "inheritance target is unknown or declared later",
                            &spec.name,
                        ));
                    };
                    if parent_spec.ty != spec.ty {
                        return Err(schema_error(
                            "schema.parent-type",
                            "inheritance target has a different declared type",
                            &spec.name,
                        ));
                    }
                }
                None => {
                    if spec.default.is_none() {
                        return Err(schema_error(
                            "schema.rootless",
                            "parameter has neither a default nor an inheritance target",
                            &spec.name,
                        ));
                    }
                }
            }
        }
        Ok(Self { specs })
    }

    /// Specs in declaration (= resolution) order.
    pub fn specs(&self) -> &[ParamSpec] {
        &self.specs
    }

    /// Whether the schema declares the named parameter.
    pub fn contains(&self, name: &str) -> bool {
        self.specs.iter().any(|spec| spec.name == name)
    }

    /// Number of declared parameters.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Whether the schema is empty.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// The standard serial-dilution schema.
    ///
    /// Step-specific rates and heights fall back to the global value of their
    /// family; the mix-height min/max bounds fall back to the (possibly
    /// already inherited) single mix height, so an unspecified range
    /// degenerates to a fixed height. The final-mix dispense rate falls back
    /// to the standard mix dispense rate.
    pub fn standard() -> Self {
        fn root_real(name: &str, default: f64) -> ParamSpec {
            ParamSpec {
                name: name.to_string(),
                ty: ParamType::Real,
                default: Some(ParamValue::Real(default)),
                inherits_from: None,
            }
        }
        fn root_integer(name: &str, default: i64) -> ParamSpec {
            ParamSpec {
                name: name.to_string(),
                ty: ParamType::Integer,
                default: Some(ParamValue::Integer(default)),
                inherits_from: None,
            }
        }
        fn child_real(name: &str, parent: &str) -> ParamSpec {
            ParamSpec {
                name: name.to_string(),
                ty: ParamType::Real,
                default: None,
                inherits_from: Some(parent.to_string()),
            }
        }

        let specs = vec![
            root_real("Aspiration_Rate", 1.0),
            child_real("Aliquot_Aspiration_Rate", "Aspiration_Rate"),
            child_real("Dilution_Aspiration_Rate", "Aspiration_Rate"),
            child_real("Mix_Aspiration_Rate", "Aspiration_Rate"),
            root_real("Aspiration_Height", 1.0),
            child_real("Aliquot_Aspiration_Height", "Aspiration_Height"),
            child_real("Dilution_Aspiration_Height", "Aspiration_Height"),
            child_real("Mix_Aspiration_Height", "Aspiration_Height"),
            child_real("Mix_Aspiration_Height_Min", "Mix_Aspiration_Height"),
            child_real("Mix_Aspiration_Height_Max", "Mix_Aspiration_Height"),
            root_real("Dispense_Rate", 1.0),
            child_real("Aliquot_Dispense_Rate", "Dispense_Rate"),
            child_real("Dilution_Dispense_Rate", "Dispense_Rate"),
            child_real("Mix_Dispense_Rate", "Dispense_Rate"),
            child_real("Final_Mix_Dispense_Rate", "Mix_Dispense_Rate"),
            root_real("Dispense_Height", 1.0),
            child_real("Aliquot_Dispense_Height", "Dispense_Height"),
            child_real("Dilution_Dispense_Height", "Dispense_Height"),
            child_real("Mix_Dispense_Height", "Dispense_Height"),
            child_real("Mix_Dispense_Height_Min", "Mix_Dispense_Height"),
            child_real("Mix_Dispense_Height_Max", "Mix_Dispense_Height"),
            root_integer("Mixing_Repetitions", 3),
            root_real("Mixing_Fraction", 0.7),
            root_integer("Touch_Tip_Speed", 20),
            root_real("Touch_Tip_Radius", 0.8),
            root_real("Touch_Tip_V_Offset", -1.0),
        ];
        Self::new(specs).expect("standard schema is well formed")
    }
}
