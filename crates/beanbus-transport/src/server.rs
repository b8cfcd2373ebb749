//! TCP transport server and the per-connection handler.
//!
//! The handler walks a fixed one-shot lifecycle:
//! `AwaitingFrame → Decoding → Routing/Invoking → Responding → Closed`,
//! with an error edge from every stage straight to `Closed`. Protocol-tier
//! failures drop the connection without a response; application-tier
//! failures come back from the `CallHandler` as fault outcomes; transport-
//! tier write failures are logged and the connection is force-closed.

use std::net::SocketAddr;
use std::sync::Arc;

use beanbus_protocol::{codec, RemoteCall, RemoteOutcome};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Trait implemented by the container to handle decoded calls.
/// The transport calls this once per connection that decoded successfully.
pub trait CallHandler: Send + Sync + 'static {
    /// Handle one call and produce its outcome. Must not fail: application-
    /// tier errors are captured inside the returned outcome.
    fn handle_call(
        &self,
        call: RemoteCall,
    ) -> impl std::future::Future<Output = RemoteOutcome> + Send;
}

/// Transport server configuration.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Port to listen on (0 for OS-assigned)
    pub port: u16,
    /// Hostname to bind to
    pub hostname: String,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            port: 8585,
            hostname: "127.0.0.1".into(),
        }
    }
}

/// The transport server — accepts connections and spawns one handler task
/// per connection. No pooling, no queue, no admission control: every
/// accepted connection immediately gets its own task.
pub struct TransportServer {
    shutdown_tx: Option<mpsc::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
    port: u16,
}

impl TransportServer {
    /// Bind and start serving with the given call handler.
    pub async fn start<H: CallHandler>(
        config: TransportConfig,
        handler: Arc<H>,
    ) -> Result<Self, std::io::Error> {
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);

        let addr: SocketAddr = format!("{}:{}", config.hostname, config.port)
            .parse()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
        let listener = TcpListener::bind(addr).await?;
        let actual_port = listener.local_addr()?.port();

        info!("beanbus transport listening on {}:{}", config.hostname, actual_port);

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    accepted = listener.accept() => {
                        match accepted {
                            Ok((stream, peer)) => {
                                let handler = handler.clone();
                                tokio::spawn(async move {
                                    handle_connection(stream, peer, handler).await;
                                });
                            }
                            Err(e) => {
                                warn!("Accept failed: {e}");
                            }
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }
        });

        Ok(Self {
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
            port: actual_port,
        })
    }

    /// Get the actual bound port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Stop accepting connections. In-flight handlers run to completion on
    /// their own tasks.
    pub async fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(()).await;
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
        info!("beanbus transport server stopped");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Connection Handler
// ─────────────────────────────────────────────────────────────────────────────

/// Handle one full request/response exchange, then close. Single-use: one
/// connection in, at most one frame out, never reused for a second call.
async fn handle_connection<H: CallHandler>(stream: TcpStream, peer: SocketAddr, handler: Arc<H>) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    debug!("Connection accepted: {conn_id} ({peer})");

    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    // AwaitingFrame: read exactly one line.
    let mut line = String::new();
    match reader.read_line(&mut line).await {
        Ok(0) => {
            warn!("Connection {conn_id}: peer closed before sending a frame");
            shutdown_quietly(&mut write_half).await;
            return;
        }
        Ok(_) => {}
        Err(e) => {
            warn!("Connection {conn_id}: failed to read frame: {e}");
            shutdown_quietly(&mut write_half).await;
            return;
        }
    }

    // Decoding: a malformed frame drops the connection without any
    // response frame.
    let call = match codec::decode(&line) {
        Ok(call) => call,
        Err(e) => {
            warn!("Connection {conn_id}: invalid remote method call: {e}");
            shutdown_quietly(&mut write_half).await;
            return;
        }
    };

    // Routing/Invoking: the handler captures every application-tier error
    // as a fault outcome, so this cannot fail the connection.
    let outcome = handler.handle_call(call).await;

    // Responding: encode and write the single response frame.
    match codec::encode_outcome(&outcome) {
        Ok(frame) => {
            if let Err(e) = write_frame(&mut write_half, &frame).await {
                error!("Connection {conn_id}: failed to write response: {e}");
            }
        }
        Err(e) => {
            // Encoding a serde_json::Value cannot realistically fail, but
            // the tier policy is the same as a write failure: log and drop.
            error!("Connection {conn_id}: failed to encode response: {e}");
        }
    }

    // Closed: graceful shutdown, failures swallowed (peer may be gone).
    shutdown_quietly(&mut write_half).await;
    debug!("Connection closed: {conn_id}");
}

async fn write_frame(
    write_half: &mut tokio::net::tcp::OwnedWriteHalf,
    frame: &str,
) -> std::io::Result<()> {
    write_half.write_all(frame.as_bytes()).await?;
    write_half.flush().await
}

async fn shutdown_quietly(write_half: &mut tokio::net::tcp::OwnedWriteHalf) {
    let _ = write_half.shutdown().await;
}
