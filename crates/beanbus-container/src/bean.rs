//! Session beans and the component-container boundary.
//!
//! A session bean handles methods resolved by string name at dispatch time;
//! the handler has no compile-time knowledge of the target type. Beans are
//! produced by a `ComponentContainer` — the external collaborator behind the
//! lookup facade.

use std::sync::Arc;

use serde_json::Value;

use crate::application::ApplicationHandle;

/// Raised when a component container cannot produce an instance.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("unknown class '{0}'")]
    UnknownClass(String),

    #[error("failed to construct '{class_name}': {reason}")]
    Construction { class_name: String, reason: String },

    #[error("component container not initialized")]
    NotInitialized,
}

/// Raised by a bean when invocation fails.
#[derive(Debug, thiserror::Error)]
pub enum InvocationError {
    /// The instance has no method with the requested name. Dynamic dispatch
    /// only discovers this at invocation time.
    #[error("unknown method '{0}'")]
    UnknownMethod(String),

    /// The method ran and raised a business error.
    #[error("{0}")]
    Failed(String),
}

impl InvocationError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

/// A session-scoped business object that dispatches methods by name.
pub trait SessionBean: Send + Sync {
    /// Invoke `method` with the given runtime-typed parameters.
    fn invoke(
        &self,
        method: &str,
        params: Vec<Value>,
    ) -> impl std::future::Future<Output = Result<Value, InvocationError>> + Send;
}

/// Object-safe wrapper for the `SessionBean` trait.
pub trait SessionBeanDyn: Send + Sync {
    fn invoke_dyn<'a>(
        &'a self,
        method: &'a str,
        params: Vec<Value>,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Value, InvocationError>> + Send + 'a>>;
}

impl std::fmt::Debug for dyn SessionBeanDyn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBeanDyn").finish_non_exhaustive()
    }
}

impl<T: SessionBean> SessionBeanDyn for T {
    fn invoke_dyn<'a>(
        &'a self,
        method: &'a str,
        params: Vec<Value>,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Value, InvocationError>> + Send + 'a>>
    {
        Box::pin(self.invoke(method, params))
    }
}

/// The external component container an application delegates lookups to.
///
/// Implementations own bean construction and lifecycle; the container core
/// only forwards `(class_name, session_id, handle)` through the facade.
pub trait ComponentContainer: Send + Sync {
    fn lookup(
        &self,
        class_name: &str,
        session_id: &str,
        app: &ApplicationHandle,
    ) -> Result<Arc<dyn SessionBeanDyn>, LookupError>;
}
