use sdp_core::errors::{ErrorInfo, SdpError};

use crate::program::Program;

/// Serializes a program to a JSON string.
pub fn to_json(program: &Program) -> Result<String, SdpError> {
    serde_json::to_string_pretty(program)
        .map_err(|err| SdpError::Serde(ErrorInfo::new("json-serialize", err.to_string())))
}

/// Restores a program from a JSON string.
pub fn from_json(data: &str) -> Result<Program, SdpError> {
    serde_json::from_str(data)
        .map_err(|err| SdpError::Serde(ErrorInfo::new("json-deserialize", err.to_string())))
}

/// Serializes a program into a binary blob.
pub fn to_bytes(program: &Program) -> Result<Vec<u8>, SdpError> {
    let json = to_json(program)?;
    bincode::serialize(&json)
        .map_err(|err| SdpError::Serde(ErrorInfo::new("bincode-serialize", err.to_string())))
}

/// Rehydrates a program from a binary blob.
pub fn from_bytes(bytes: &[u8]) -> Result<Program, SdpError> {
    let json: String = bincode::deserialize(bytes)
        .map_err(|err| SdpError::Serde(ErrorInfo::new("bincode-deserialize", err.to_string())))?;
    from_json(&json)
}
