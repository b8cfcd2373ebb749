//! The dispatcher — route, lookup, and invoke as one protected region.

use std::sync::Arc;

use beanbus_protocol::{Fault, FaultKind, RemoteCall, RemoteOutcome};
use beanbus_transport::CallHandler;
use serde_json::Value;
use tracing::debug;

use crate::bean::{InvocationError, LookupError};
use crate::registry::ApplicationRegistry;
use crate::router::Router;

/// Application-tier failure, raised anywhere inside route→lookup→invoke.
///
/// Kinds stay distinguishable for callers and tests even though every one
/// of them travels back in the same fault envelope.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Can't find application for '{0}'")]
    Routing(String),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("unknown method '{method}' on '{class_name}'")]
    UnknownMethod { class_name: String, method: String },

    #[error("{0}")]
    Invocation(String),
}

impl From<&DispatchError> for Fault {
    fn from(err: &DispatchError) -> Self {
        let kind = match err {
            DispatchError::Routing(_) => FaultKind::Routing,
            DispatchError::Lookup(_) => FaultKind::Lookup,
            DispatchError::UnknownMethod { .. } => FaultKind::UnknownMethod,
            DispatchError::Invocation(_) => FaultKind::Invocation,
        };
        Fault::new(kind, err.to_string())
    }
}

/// Routes calls and invokes beans; shared read-only by all connection tasks.
///
/// Constructing a dispatcher freezes the registry: it is moved behind an
/// `Arc` and no mutable access remains.
pub struct Dispatcher {
    router: Router,
}

impl Dispatcher {
    pub fn new(registry: ApplicationRegistry) -> Self {
        Self {
            router: Router::new(Arc::new(registry)),
        }
    }

    pub fn registry(&self) -> &Arc<ApplicationRegistry> {
        self.router.registry()
    }

    /// The protected region: any error here, of any kind, is reported
    /// uniformly — no special-casing at this boundary.
    async fn dispatch(&self, call: &RemoteCall) -> Result<Value, DispatchError> {
        let app = self.router.route(&call.class_name)?;
        let instance = app.lookup(&call.class_name, call.session())?;

        debug!(
            app = app.name(),
            class_name = %call.class_name,
            method = %call.method_name,
            "Invoking remote method"
        );

        instance
            .invoke_dyn(&call.method_name, call.parameters.clone())
            .await
            .map_err(|err| match err {
                InvocationError::UnknownMethod(method) => DispatchError::UnknownMethod {
                    class_name: call.class_name.clone(),
                    method,
                },
                InvocationError::Failed(message) => DispatchError::Invocation(message),
            })
    }
}

impl CallHandler for Dispatcher {
    /// Handle one call end to end, capturing any application-tier failure
    /// as a fault outcome. Never fails the connection; the transport writes
    /// whatever outcome this returns.
    async fn handle_call(&self, call: RemoteCall) -> RemoteOutcome {
        match self.dispatch(&call).await {
            Ok(value) => RemoteOutcome::Value(value),
            Err(err) => {
                debug!(
                    class_name = %call.class_name,
                    method = %call.method_name,
                    "Dispatch failed: {err}"
                );
                RemoteOutcome::Fault(Fault::from(&err))
            }
        }
    }
}
