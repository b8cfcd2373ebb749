//! beanbus container — the dispatch core.
//!
//! Owns the application registry built at deploy time, routes incoming
//! calls to the responsible application by class-name containment, obtains
//! session-scoped bean instances through each application's component
//! container, and invokes methods dynamically by name. Every failure inside
//! the route→lookup→invoke region is captured as a fault; nothing in this
//! crate terminates the process.

pub mod application;
pub mod bean;
pub mod deployment;
pub mod dispatch;
pub mod registry;
pub mod router;
pub mod table;

pub use application::{ApplicationHandle, ConnectionParameters};
pub use bean::{ComponentContainer, InvocationError, LookupError, SessionBean, SessionBeanDyn};
pub use deployment::{deploy_from_dir, DeployError};
pub use dispatch::{DispatchError, Dispatcher};
pub use registry::ApplicationRegistry;
pub use router::Router;
pub use table::DispatchTable;

// The container implements the transport's handler seam; re-exported so
// embedders need only this crate to drive a dispatcher directly.
pub use beanbus_transport::CallHandler;
