//! End-to-end integration tests — real TCP connections through a running
//! server, covering the one-shot protocol and the three failure tiers.

use std::sync::Arc;
use std::time::Duration;

use beanbus_container::{
    ApplicationHandle, ApplicationRegistry, DispatchTable, Dispatcher, InvocationError,
    SessionBean,
};
use beanbus_protocol::{FaultKind, RemoteCall};
use beanbus_transport::{call, ClientError, TransportConfig, TransportServer};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;

// ─────────────────────────────────────────────────────────────────────────
// Test fixture
// ─────────────────────────────────────────────────────────────────────────

struct ProductBean;

impl SessionBean for ProductBean {
    async fn invoke(&self, method: &str, params: Vec<Value>) -> Result<Value, InvocationError> {
        match method {
            "getPrice" => Ok(json!(19.99)),
            "reserve" => {
                let quantity = params.first().and_then(Value::as_i64).unwrap_or(0);
                if quantity > 10 {
                    return Err(InvocationError::failed("insufficient stock"));
                }
                Ok(json!({ "reserved": quantity }))
            }
            other => Err(InvocationError::UnknownMethod(other.to_string())),
        }
    }
}

/// Start a test server on an OS-assigned port with a `ShopApp` deployment.
async fn start_test_server() -> String {
    let table = DispatchTable::new();
    table.register("ShopApp.Entities.ProductBean", |_app| Ok(ProductBean));

    let mut registry = ApplicationRegistry::new();
    registry
        .register(ApplicationHandle::new("ShopApp", "/tmp/shop", Arc::new(table)))
        .unwrap();

    let dispatcher = Arc::new(Dispatcher::new(registry));
    let config = TransportConfig {
        port: 0,
        hostname: "127.0.0.1".into(),
    };

    let server = TransportServer::start(config, dispatcher).await.unwrap();
    let port = server.port();

    // Leak the server to keep it running for the test duration.
    Box::leak(Box::new(server));

    format!("127.0.0.1:{port}")
}

// ─────────────────────────────────────────────────────────────────────────
// Scenario A — successful invocation
// ─────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn successful_call_returns_value() {
    let addr = start_test_server().await;

    let request = RemoteCall::new("ShopApp.Entities.ProductBean", "getPrice")
        .with_session("s1")
        .with_parameters(vec![json!(42)]);

    let outcome = call(&addr, &request).await.unwrap();
    assert_eq!(outcome.value().unwrap(), &json!(19.99));
}

// ─────────────────────────────────────────────────────────────────────────
// Scenario B — routing failure travels back as a fault frame
// ─────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unroutable_class_returns_routing_fault() {
    let addr = start_test_server().await;

    let outcome = call(&addr, &RemoteCall::new("Unrelated.Bean", "anything"))
        .await
        .unwrap();

    let fault = outcome.fault().unwrap();
    assert_eq!(fault.kind, FaultKind::Routing);
    assert_eq!(fault.message, "Can't find application for 'Unrelated.Bean'");
}

// ─────────────────────────────────────────────────────────────────────────
// Scenario C — malformed frame is dropped without a response
// ─────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn malformed_frame_gets_no_response() {
    let addr = start_test_server().await;

    let mut stream = TcpStream::connect(&addr).await.unwrap();
    stream.write_all(b"\"just a string\"\n").await.unwrap();

    // The server must close the connection without writing a frame.
    let mut buf = Vec::new();
    let read = timeout(Duration::from_secs(5), stream.read_to_end(&mut buf))
        .await
        .expect("server did not close the connection")
        .unwrap();
    assert_eq!(read, 0);
    assert!(buf.is_empty());
}

#[tokio::test]
async fn invalid_json_gets_no_response() {
    let addr = start_test_server().await;

    let mut stream = TcpStream::connect(&addr).await.unwrap();
    stream.write_all(b"not json at all\n").await.unwrap();

    let mut buf = Vec::new();
    let read = timeout(Duration::from_secs(5), stream.read_to_end(&mut buf))
        .await
        .expect("server did not close the connection")
        .unwrap();
    assert_eq!(read, 0);
}

// ─────────────────────────────────────────────────────────────────────────
// Scenario D — business error returns a fault, connection closes cleanly
// ─────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn business_error_returns_invocation_fault() {
    let addr = start_test_server().await;

    let request = RemoteCall::new("ShopApp.Entities.ProductBean", "reserve")
        .with_parameters(vec![json!(500)]);

    let outcome = call(&addr, &request).await.unwrap();
    let fault = outcome.fault().unwrap();
    assert_eq!(fault.kind, FaultKind::Invocation);
    assert_eq!(fault.message, "insufficient stock");
}

#[tokio::test]
async fn unknown_method_returns_fault_not_drop() {
    let addr = start_test_server().await;

    let outcome = call(&addr, &RemoteCall::new("ShopApp.Entities.ProductBean", "frobnicate"))
        .await
        .unwrap();
    assert_eq!(outcome.fault().unwrap().kind, FaultKind::UnknownMethod);
}

// ─────────────────────────────────────────────────────────────────────────
// Scenario E — peer closes early; the server survives
// ─────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn early_peer_close_does_not_crash_server() {
    let addr = start_test_server().await;

    // Send a valid frame, then vanish before reading the response.
    for _ in 0..4 {
        let mut stream = TcpStream::connect(&addr).await.unwrap();
        let frame = serde_json::to_string(&RemoteCall::new(
            "ShopApp.Entities.ProductBean",
            "getPrice",
        ))
        .unwrap();
        stream.write_all(frame.as_bytes()).await.unwrap();
        stream.write_all(b"\n").await.unwrap();
        drop(stream);
    }

    // The server must still answer a well-behaved caller.
    let outcome = call(&addr, &RemoteCall::new("ShopApp.Entities.ProductBean", "getPrice"))
        .await
        .unwrap();
    assert_eq!(outcome.value().unwrap(), &json!(19.99));
}

// ─────────────────────────────────────────────────────────────────────────
// One-shot protocol
// ─────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn exactly_one_response_frame_then_close() {
    let addr = start_test_server().await;

    let mut stream = TcpStream::connect(&addr).await.unwrap();
    let frame = serde_json::to_string(&RemoteCall::new(
        "ShopApp.Entities.ProductBean",
        "getPrice",
    ))
    .unwrap();
    stream.write_all(frame.as_bytes()).await.unwrap();
    stream.write_all(b"\n").await.unwrap();

    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    reader.read_line(&mut line).await.unwrap();
    assert!(line.ends_with('\n'));

    // No second frame: the next read sees a closed connection.
    let mut rest = Vec::new();
    let read = timeout(Duration::from_secs(5), reader.read_to_end(&mut rest))
        .await
        .expect("server did not close after responding")
        .unwrap();
    assert_eq!(read, 0);
}

#[tokio::test]
async fn connection_is_not_reusable_for_a_second_call() {
    let addr = start_test_server().await;

    let mut stream = TcpStream::connect(&addr).await.unwrap();
    let frame = serde_json::to_string(&RemoteCall::new(
        "ShopApp.Entities.ProductBean",
        "getPrice",
    ))
    .unwrap();

    // Two frames on one connection: only the first is served.
    stream.write_all(frame.as_bytes()).await.unwrap();
    stream.write_all(b"\n").await.unwrap();
    stream.write_all(frame.as_bytes()).await.unwrap();
    stream.write_all(b"\n").await.unwrap();

    let mut reader = BufReader::new(stream);
    let mut first = String::new();
    reader.read_line(&mut first).await.unwrap();
    assert!(!first.is_empty());

    // The server closes after one exchange; depending on timing the unread
    // second frame can surface as a clean EOF or a reset, never as data.
    let mut rest = Vec::new();
    match timeout(Duration::from_secs(5), reader.read_to_end(&mut rest))
        .await
        .expect("server did not close after one exchange")
    {
        Ok(read) => assert_eq!(read, 0),
        Err(_) => assert!(rest.is_empty()),
    }
}

#[tokio::test]
async fn structurally_invalid_descriptor_is_dropped() {
    let addr = start_test_server().await;

    // Valid JSON, but not a call descriptor: protocol tier, no response.
    let mut stream = TcpStream::connect(&addr).await.unwrap();
    stream.write_all(b"{\"oops\": true}\n").await.unwrap();
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).await.unwrap();
    assert!(buf.is_empty());
}

#[tokio::test]
async fn client_reports_dropped_call() {
    // A server that closes without responding surfaces as `Dropped` (or an
    // I/O error if the reset races the write).
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let drop_addr = format!("127.0.0.1:{}", listener.local_addr().unwrap().port());
    tokio::spawn(async move {
        if let Ok((stream, _)) = listener.accept().await {
            drop(stream);
        }
    });

    let err = call(&drop_addr, &RemoteCall::new("A.B", "m")).await.unwrap_err();
    assert!(matches!(err, ClientError::Dropped | ClientError::Io(_)));
}

// ─────────────────────────────────────────────────────────────────────────
// Concurrency — one task per connection, shared frozen registry
// ─────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn concurrent_connections_are_served_independently() {
    let addr = start_test_server().await;

    let mut handles = Vec::new();
    for i in 0..16 {
        let addr = addr.clone();
        handles.push(tokio::spawn(async move {
            let request = if i % 2 == 0 {
                RemoteCall::new("ShopApp.Entities.ProductBean", "getPrice")
            } else {
                RemoteCall::new("Unrelated.Bean", "anything")
            };
            (i, call(&addr, &request).await.unwrap())
        }));
    }

    for handle in handles {
        let (i, outcome) = handle.await.unwrap();
        if i % 2 == 0 {
            assert_eq!(outcome.value().unwrap(), &json!(19.99));
        } else {
            assert_eq!(outcome.fault().unwrap().kind, FaultKind::Routing);
        }
    }
}
