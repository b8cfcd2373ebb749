//! One-shot client for the remote-call protocol.
//!
//! Opens a connection, writes one call frame, reads one outcome frame, and
//! lets the connection close. Used by callers and by the integration tests.

use beanbus_protocol::{codec, ProtocolError, RemoteCall, RemoteOutcome};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::debug;

/// Client-side failures. `Protocol` covers both an unencodable call and an
/// undecodable response frame.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("connection failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The server closed without writing a response frame — the protocol
    /// tier dropped the call.
    #[error("server closed the connection without a response")]
    Dropped,
}

/// Perform one remote call against `addr`.
pub async fn call(addr: &str, call: &RemoteCall) -> Result<RemoteOutcome, ClientError> {
    let stream = TcpStream::connect(addr).await?;
    let (read_half, mut write_half) = stream.into_split();

    let mut frame = serde_json::to_string(call).map_err(ProtocolError::Encode)?;
    frame.push('\n');

    debug!(
        class_name = %call.class_name,
        method = %call.method_name,
        "Sending remote call to {addr}"
    );
    write_half.write_all(frame.as_bytes()).await?;
    write_half.flush().await?;

    let mut reader = BufReader::new(read_half);
    let mut line = String::new();
    if reader.read_line(&mut line).await? == 0 {
        return Err(ClientError::Dropped);
    }

    Ok(codec::decode_outcome(&line)?)
}
