//! The outcome envelope written back to the caller.

use serde::{Deserialize, Serialize};

/// Distinguishable failure kinds for the application tier.
///
/// The wire format carries the kind only so callers can report it; the
/// container never branches on it when responding — every kind travels
/// inside the same envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FaultKind {
    /// No deployed application matched the target class name.
    Routing,
    /// The application's component container could not produce an instance.
    Lookup,
    /// The instance has no method with the requested name.
    UnknownMethod,
    /// The invoked method itself raised a business error.
    Invocation,
}

/// A captured error transported back inside a normal response frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fault {
    pub kind: FaultKind,
    pub message: String,
}

impl Fault {
    pub fn new(kind: FaultKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// One outcome per handled connection that reached the dispatch stage.
///
/// Success and fault share a single encoding — an externally tagged enum,
/// so the frame is either `{"value": ...}` or `{"fault": {...}}`. There is
/// no status byte or separate error channel; the caller decodes the frame
/// and inspects its shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RemoteOutcome {
    Value(serde_json::Value),
    Fault(Fault),
}

impl RemoteOutcome {
    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(_))
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Fault(_))
    }

    /// The success payload, if any.
    pub fn value(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Value(v) => Some(v),
            Self::Fault(_) => None,
        }
    }

    /// The captured fault, if any.
    pub fn fault(&self) -> Option<&Fault> {
        match self {
            Self::Value(_) => None,
            Self::Fault(f) => Some(f),
        }
    }
}
