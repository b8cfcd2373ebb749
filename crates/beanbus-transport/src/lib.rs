//! beanbus transport layer.
//!
//! Raw TCP with newline-delimited frames, one logical call per connection:
//! - the listener spawns one task per accepted connection
//! - each task reads exactly one frame, dispatches it, writes at most one
//!   response frame, and closes
//! - the transport is decoupled from the container via the `CallHandler`
//!   trait

pub mod client;
pub mod server;

pub use client::{call, ClientError};
pub use server::{CallHandler, TransportConfig, TransportServer};
