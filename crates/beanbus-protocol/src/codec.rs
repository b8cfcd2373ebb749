//! Newline-delimited frame codec.
//!
//! One frame per line, newline-terminated, no length prefix. The inbound
//! frame is a serde_json call descriptor; the outbound frame is a tagged
//! outcome envelope. Success and fault frames use the same encoding and are
//! distinguishable only by shape.

use crate::call::RemoteCall;
use crate::error::ProtocolError;
use crate::outcome::{Fault, RemoteOutcome};

/// Decode one inbound frame into a call descriptor.
///
/// The line is expected without its trailing newline; a stray one is
/// tolerated. Anything that is not a structurally valid call descriptor
/// (bad JSON, a plain string, wrong field types) fails.
pub fn decode(line: &str) -> Result<RemoteCall, ProtocolError> {
    serde_json::from_str(line.trim_end_matches(['\r', '\n'])).map_err(ProtocolError::InvalidFrame)
}

/// Encode a successful invocation result as one newline-terminated frame.
pub fn encode_value(payload: serde_json::Value) -> Result<String, ProtocolError> {
    encode_outcome(&RemoteOutcome::Value(payload))
}

/// Encode a captured fault as one newline-terminated frame.
pub fn encode_fault(fault: Fault) -> Result<String, ProtocolError> {
    encode_outcome(&RemoteOutcome::Fault(fault))
}

/// Encode any outcome as one newline-terminated frame.
pub fn encode_outcome(outcome: &RemoteOutcome) -> Result<String, ProtocolError> {
    let mut frame = serde_json::to_string(outcome).map_err(ProtocolError::Encode)?;
    frame.push('\n');
    Ok(frame)
}

/// Decode a response frame back into an outcome (used by the client side).
pub fn decode_outcome(line: &str) -> Result<RemoteOutcome, ProtocolError> {
    serde_json::from_str(line.trim_end_matches(['\r', '\n'])).map_err(ProtocolError::InvalidFrame)
}
