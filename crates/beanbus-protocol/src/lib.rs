//! beanbus protocol — wire types for the remote-call protocol.
//!
//! This crate is the single source of truth for the on-wire representation:
//! the call descriptor sent by clients, the outcome envelope written back by
//! the container, and the newline-delimited frame codec shared by both ends.

pub mod call;
pub mod codec;
pub mod error;
pub mod outcome;

pub use call::RemoteCall;
pub use codec::{decode, decode_outcome, encode_fault, encode_outcome, encode_value};
pub use error::ProtocolError;
pub use outcome::{Fault, FaultKind, RemoteOutcome};
