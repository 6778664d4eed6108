//! Parameter value model shared across the pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{ErrorInfo, SdpError};

/// Declared type of a design parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// Whole-number parameter (repetition counts, speeds).
    Integer,
    /// Floating point parameter (rates, heights, fractions).
    Real,
    /// Free-text parameter.
    Text,
}

/// Concrete value carried by a resolved parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Whole-number value.
    Integer(i64),
    /// Floating point value.
    Real(f64),
    /// Free-text value.
    Text(String),
}

impl ParamValue {
    /// Returns the declared type this value satisfies.
    pub fn param_type(&self) -> ParamType {
        match self {
            ParamValue::Integer(_) => ParamType::Integer,
            ParamValue::Real(_) => ParamType::Real,
            ParamValue::Text(_) => ParamType::Text,
        }
    }

    /// Returns the value as a float, widening integers.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            ParamValue::Integer(v) => Some(*v as f64),
            ParamValue::Real(v) => Some(*v),
            ParamValue::Text(_) => None,
        }
    }

    /// Returns the value as an integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            ParamValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Returns the value as text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(v) => Some(v),
            _ => None,
        }
    }
}

fn access_error(code: &str, name: &str, message: &str) -> SdpError {
    SdpError::Resolve(ErrorInfo::new(code, message).with_context("parameter", name))
}

/// Fully concrete, inheritance-resolved parameter set for one experiment.
///
/// Every schema parameter is present with a value of its declared type; the
/// resolver never hands out a set with unset entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ResolvedParams {
    values: BTreeMap<String, ParamValue>,
}

impl ResolvedParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a parameter value.
    pub fn insert(&mut self, name: impl Into<String>, value: ParamValue) {
        self.values.insert(name.into(), value);
    }

    /// Looks up a parameter value by name.
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.values.get(name)
    }

    /// Returns the named parameter as a float, widening integers.
    pub fn real(&self, name: &str) -> Result<f64, SdpError> {
        self.get(name)
            .ok_or_else(|| access_error("params.missing", name, "parameter not present"))?
            .as_real()
            .ok_or_else(|| access_error("params.type", name, "parameter is not numeric"))
    }

    /// Returns the named parameter as an integer.
    pub fn integer(&self, name: &str) -> Result<i64, SdpError> {
        self.get(name)
            .ok_or_else(|| access_error("params.missing", name, "parameter not present"))?
            .as_integer()
            .ok_or_else(|| access_error("params.type", name, "parameter is not an integer"))
    }

    /// Returns the named parameter as text.
    pub fn text(&self, name: &str) -> Result<&str, SdpError> {
        self.get(name)
            .ok_or_else(|| access_error("params.missing", name, "parameter not present"))?
            .as_text()
            .ok_or_else(|| access_error("params.type", name, "parameter is not text"))
    }

    /// Iterates over all entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.values.iter()
    }

    /// Number of parameters in the set.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Tip-rack columns assigned to one experiment's three pipetting stages.
///
/// The three columns are consecutive and lie within the 12-column rack; see
/// the allocator for the reuse cycle and its operational precondition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipAllocation {
    /// Column feeding the reference-fluid aliquot stage.
    pub fluid_column: u8,
    /// Column feeding the diluent fill stage.
    pub diluent_column: u8,
    /// Column feeding the dilution and disposal stages.
    pub dilution_column: u8,
}

impl TipAllocation {
    /// Returns the three columns in stage order.
    pub fn columns(&self) -> [u8; 3] {
        [self.fluid_column, self.diluent_column, self.dilution_column]
    }
}
