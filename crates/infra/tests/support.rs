use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use adminhub_common::testing::{MockClock, RecordingSleeper};
use adminhub_common::RetryPolicy;
use adminhub_domain::ClientConfig;
use adminhub_infra::N8nClient;
use serde_json::{json, Value};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing_subscriber::fmt::MakeWriter;

pub const TEST_API_KEY: &str = "n8n_api_test_key_0123456789abcdef";

/// Client wired to a mock server with recorded (not real) sleeps.
pub struct TestClient {
    pub client: N8nClient,
    pub sleeper: Arc<RecordingSleeper>,
    pub clock: MockClock,
}

impl TestClient {
    pub fn new(base_url: &str, workflow_id: Option<&str>) -> Self {
        Self::with_policy(base_url, workflow_id, RetryPolicy::default())
    }

    pub fn with_policy(base_url: &str, workflow_id: Option<&str>, policy: RetryPolicy) -> Self {
        let config = ClientConfig::new(TEST_API_KEY, base_url, workflow_id)
            .expect("test config should be valid");
        let clock = MockClock::new();
        let sleeper = Arc::new(RecordingSleeper::with_clock(clock.clone()));

        let client = N8nClient::builder(config)
            .retry_policy(policy)
            .sleeper(sleeper.clone())
            .clock(Arc::new(clock.clone()))
            .build()
            .expect("client should build");

        Self { client, sleeper, clock }
    }
}

/// Base address on which nothing is listening.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}

/// Server that answers every request with `200` headers promising a
/// 1000-byte body, writes a few bytes of it and closes the connection.
///
/// Returns the base address and a count of accepted connections.
pub async fn truncated_body_server() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    let connections = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&connections);

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }

            let head = "HTTP/1.1 200 OK\r\n\
                        content-type: application/json\r\n\
                        content-length: 1000\r\n\r\n";
            let _ = socket.write_all(head.as_bytes()).await;
            let _ = socket.write_all(br#"{"id""#).await;
            let _ = socket.shutdown().await;
        }
    });

    (format!("http://{addr}"), connections)
}

/// A well-formed listing record.
pub fn workflow_record(id: &str, name: &str, active: bool) -> Value {
    json!({
        "id": id,
        "name": name,
        "active": active,
        "nodes": [{"name": "Start"}, {"name": "HTTP Request"}, {"name": "Set"}],
        "connections": {"Start": {}, "HTTP Request": {}},
        "createdAt": "2025-08-22T10:00:00.000Z",
        "updatedAt": "2025-08-23T08:30:00.000Z"
    })
}

/// A full workflow definition with credential references on two nodes.
pub fn workflow_definition(id: &str) -> Value {
    json!({
        "id": id,
        "name": "Nightly CRM sync",
        "active": true,
        "nodes": [
            {
                "name": "Fetch contacts",
                "type": "n8n-nodes-base.httpRequest",
                "credentials": {
                    "httpHeaderAuth": {"id": "cred-1001", "name": "CRM production token"}
                }
            },
            {"name": "Map fields", "type": "n8n-nodes-base.set"},
            {
                "name": "Write rows",
                "type": "n8n-nodes-base.postgres",
                "credentials": {
                    "postgres": {"id": "cred-2002", "name": "Warehouse writer"}
                }
            }
        ],
        "connections": {"Fetch contacts": {}, "Map fields": {}}
    })
}

pub const CREDENTIAL_IDS: [&str; 2] = ["cred-1001", "cred-2002"];

/// Shared in-memory sink for formatted log lines.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Capture all events emitted on this thread until the guard drops.
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}
