//! In-process mock of the Spark master REST endpoints.
//!
//! Every request is recorded and answered with the same canned status and
//! body. The handler tracks how many requests overlap so tests can observe
//! the client's connection limit.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::Router;

use sparkrest_client::ClientConfig;

pub const SPARK_VERSION: &str = "3.5.1";

pub const SUBMIT_BODY: &str = r#"{
    "action": "CreateSubmissionResponse",
    "message": "Driver successfully submitted as driver-20240101000000-0001",
    "serverSparkVersion": "3.5.1",
    "submissionId": "driver-20240101000000-0001",
    "success": true
}"#;

pub const STATUS_BODY: &str = r#"{
    "action": "SubmissionStatusResponse",
    "driverState": "RUNNING",
    "serverSparkVersion": "3.5.1",
    "submissionId": "driver-20240101000000-0001",
    "success": true,
    "workerHostPort": "10.0.0.12:38231",
    "workerId": "worker-20240101000000-10.0.0.12-38231"
}"#;

pub const KILL_BODY: &str = r#"{
    "action": "KillSubmissionResponse",
    "message": "Kill request for driver-20240101000000-0001 submitted",
    "serverSparkVersion": "3.5.1",
    "submissionId": "driver-20240101000000-0001",
    "success": true
}"#;

/// One request as seen by the mock master.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub content_type: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).expect("request body should be JSON")
    }
}

/// Canned reply returned for every request.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub delay: Duration,
}

impl MockReply {
    pub fn new(status: StatusCode, body: &str) -> Self {
        Self::raw(status, body.as_bytes().to_vec())
    }

    /// Reply with `body` sent as-is, whether or not it is valid UTF-8.
    pub fn raw(status: StatusCode, body: Vec<u8>) -> Self {
        Self {
            status,
            body,
            delay: Duration::ZERO,
        }
    }

    pub fn ok(body: &str) -> Self {
        Self::new(StatusCode::OK, body)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Clone)]
struct MockState {
    reply: MockReply,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    in_flight: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

/// Handle to a running mock master.
pub struct MockMaster {
    pub addr: SocketAddr,
    state: MockState,
}

impl MockMaster {
    /// Bind to an ephemeral port on localhost and start serving.
    pub async fn start(reply: MockReply) -> Self {
        Self::try_start_on("127.0.0.1:0", reply)
            .await
            .expect("bind mock master")
    }

    /// Bind to `bind` and start serving, returning the bind error if any.
    pub async fn try_start_on(bind: &str, reply: MockReply) -> std::io::Result<Self> {
        let state = MockState {
            reply,
            requests: Arc::new(Mutex::new(Vec::new())),
            in_flight: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        };

        let app = Router::new().fallback(record).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind(bind).await?;
        let addr = listener.local_addr()?;

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock master server");
        });

        Ok(Self { addr, state })
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Client config pointing at this mock over plain http.
    pub fn config(&self) -> ClientConfig {
        ClientConfig::new("127.0.0.1", SPARK_VERSION).with_port(self.port())
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Highest number of requests the handler was serving at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.state.peak.load(Ordering::SeqCst)
    }
}

async fn record(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, [(axum::http::HeaderName, &'static str); 1], Vec<u8>) {
    let current = state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    state.peak.fetch_max(current, Ordering::SeqCst);

    state.requests.lock().unwrap().push(RecordedRequest {
        method,
        path: uri.path().to_string(),
        content_type: headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });

    if !state.reply.delay.is_zero() {
        tokio::time::sleep(state.reply.delay).await;
    }

    state.in_flight.fetch_sub(1, Ordering::SeqCst);

    (
        state.reply.status,
        [(CONTENT_TYPE, "application/json")],
        state.reply.body.clone(),
    )
}

/// A localhost port with nothing listening on it.
pub async fn closed_port() -> u16 {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind throwaway listener");
    let port = listener.local_addr().expect("throwaway listener address").port();
    drop(listener);
    port
}
