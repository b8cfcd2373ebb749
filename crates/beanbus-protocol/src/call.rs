//! The decoded remote-call descriptor.

use serde::{Deserialize, Serialize};

/// One decoded remote invocation request.
///
/// Lives for the duration of a single connection: the handler decodes it
/// from the inbound frame, dispatches it, and drops it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RemoteCall {
    /// Fully-qualified class name of the target session bean.
    pub class_name: String,
    /// Opaque session token; absent for stateless calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Method to invoke, resolved by name at dispatch time.
    pub method_name: String,
    /// Ordered, runtime-typed parameter list.
    #[serde(default)]
    pub parameters: Vec<serde_json::Value>,
}

impl RemoteCall {
    pub fn new(class_name: impl Into<String>, method_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            session_id: None,
            method_name: method_name.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    pub fn with_parameters(mut self, parameters: Vec<serde_json::Value>) -> Self {
        self.parameters = parameters;
        self
    }

    /// The session token, or the empty string for stateless calls.
    pub fn session(&self) -> &str {
        self.session_id.as_deref().unwrap_or("")
    }
}
