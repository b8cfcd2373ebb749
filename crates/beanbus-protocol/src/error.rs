//! Protocol-tier errors.

/// Raised when a frame cannot be decoded into a well-formed call descriptor
/// or an outcome cannot be encoded.
///
/// Protocol errors are terminal for the connection: the handler logs them
/// and drops the connection without writing any response frame.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("invalid call frame: {0}")]
    InvalidFrame(#[source] serde_json::Error),

    #[error("failed to encode outcome frame: {0}")]
    Encode(#[source] serde_json::Error),
}
