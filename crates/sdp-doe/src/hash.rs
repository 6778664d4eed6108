use sdp_core::errors::{ErrorInfo, SdpError};
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Encodes a serializable payload as canonical JSON bytes.
///
/// The payload is routed through `serde_json::Value`, whose object maps are
/// key-ordered, so equal values always produce identical bytes.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, SdpError> {
    let canonical = serde_json::to_value(value)
        .map_err(|err| SdpError::Serde(ErrorInfo::new("json-canonicalize", err.to_string())))?;
    serde_json::to_vec(&canonical)
        .map_err(|err| SdpError::Serde(ErrorInfo::new("json-encode", err.to_string())))
}

/// Computes a stable hexadecimal hash for the provided serializable payload.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, SdpError> {
    let bytes = to_canonical_json_bytes(value)?;
    let digest = Sha256::digest(bytes);
    Ok(format!("{:x}", digest))
}
