//! Reusable test helpers for HTTP integration tests.
//!
//! Provides `TestApp` for sending requests through the full axum router, plus
//! local stand-ins for the chat webhook:
//!
//! - [`spawn_fake_discord()`] answers every POST with a fixed status and
//!   records the JSON it received.
//! - [`spawn_hangup_server()`] accepts connections and closes them without
//!   answering, counting each attempt.
//! - [`unreachable_url()`] points at a port nothing listens on.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{self, Method, Request, Response, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use http_body_util::BodyExt;
use tokio::task::JoinHandle;
use tower::ServiceExt;
use ticket_relay::api::{create_router, AppState};
use ticket_relay::config::Config;
use ticket_relay::relay::TicketRelay;

// ============================================================================
// Test App
// ============================================================================

/// A test application wrapping the full axum router.
pub struct TestApp {
    pub router: Router,
    pub config: Config,
}

impl TestApp {
    /// Create a test app with no destination webhook.
    pub fn new() -> Self {
        Self::with_config(Config::default_for_test())
    }

    /// Create a test app relaying to `url`.
    pub fn with_webhook(url: &str) -> Self {
        let mut config = Config::default_for_test();
        config.relay.webhook_url = Some(url.to_string());
        Self::with_config(config)
    }

    /// Create a test app with a custom config.
    pub fn with_config(config: Config) -> Self {
        let relay =
            TicketRelay::new(config.relay.clone()).expect("Failed to build relay HTTP client");
        let state = AppState::new(config.clone(), relay);
        let router = create_router(state);

        Self { router, config }
    }

    /// Build an HTTP request with the given method and URI.
    pub fn request(method: Method, uri: &str) -> http::request::Builder {
        Request::builder().method(method).uri(uri)
    }

    /// POST a JSON document to `/discord`.
    pub async fn post_ticket(&self, body: &serde_json::Value) -> Response<Body> {
        let req = Self::request(Method::POST, "/discord")
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.oneshot(req).await
    }

    /// Send a request through the router via `tower::ServiceExt::oneshot`.
    pub async fn oneshot(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot request failed")
    }
}

/// Collect a response body and parse it as JSON.
pub async fn body_to_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to collect response body")
        .to_bytes();
    serde_json::from_slice(&bytes).unwrap_or_else(|e| {
        let preview = String::from_utf8_lossy(&bytes);
        panic!("Failed to parse response as JSON: {e}\nBody: {preview}")
    })
}

// ============================================================================
// Test Servers
// ============================================================================

/// A running test HTTP server.
pub struct TestServer {
    /// Server address (127.0.0.1:PORT).
    pub addr: SocketAddr,
    /// Base URL for HTTP requests (e.g., `http://127.0.0.1:12345`).
    pub url: String,
    /// Handle to the server task for cleanup.
    _handle: JoinHandle<()>,
}

/// Spawn a real HTTP server on a random port.
pub async fn spawn_test_server(router: Router) -> TestServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to get local addr");
    let url = format!("http://{addr}");

    let handle = tokio::spawn(async move {
        axum::serve(listener, router)
            .await
            .expect("Test server failed");
    });

    TestServer {
        addr,
        url,
        _handle: handle,
    }
}

// ============================================================================
// Fake chat webhooks
// ============================================================================

#[derive(Clone)]
struct FakeDiscordState {
    status: StatusCode,
    reply: &'static str,
    received: Arc<Mutex<Vec<serde_json::Value>>>,
}

/// Local webhook endpoint that records every message.
pub struct FakeDiscord {
    /// Full webhook URL, including a token-like path.
    pub webhook_url: String,
    received: Arc<Mutex<Vec<serde_json::Value>>>,
    _server: TestServer,
}

impl FakeDiscord {
    /// Messages received so far, in arrival order.
    pub fn received(&self) -> Vec<serde_json::Value> {
        self.received.lock().unwrap().clone()
    }
}

async fn fake_execute_webhook(
    State(state): State<FakeDiscordState>,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, &'static str) {
    state.received.lock().unwrap().push(body);
    (state.status, state.reply)
}

fn fake_discord_router(
    status: StatusCode,
    reply: &'static str,
    received: Arc<Mutex<Vec<serde_json::Value>>>,
) -> Router {
    let state = FakeDiscordState {
        status,
        reply,
        received,
    };
    Router::new()
        .route("/api/webhooks/{id}/{token}", post(fake_execute_webhook))
        .with_state(state)
}

/// Spawn a webhook endpoint answering with `status` and `reply`.
pub async fn spawn_fake_discord(status: StatusCode, reply: &'static str) -> FakeDiscord {
    let received = Arc::new(Mutex::new(Vec::new()));
    let router = fake_discord_router(status, reply, received.clone());
    let server = spawn_test_server(router).await;

    FakeDiscord {
        webhook_url: format!("{}/api/webhooks/1234/secret-token", server.url),
        received,
        _server: server,
    }
}

/// Spawn a webhook endpoint that closes its first connection unanswered,
/// then accepts every message with 204.
pub async fn spawn_flaky_discord() -> FakeDiscord {
    let received = Arc::new(Mutex::new(Vec::new()));
    let router = fake_discord_router(StatusCode::NO_CONTENT, "", received.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind flaky server");
    let addr = listener.local_addr().expect("Failed to get local addr");
    let url = format!("http://{addr}");

    let handle = tokio::spawn(async move {
        if let Ok((stream, _)) = listener.accept().await {
            drop(stream);
        }
        axum::serve(listener, router)
            .await
            .expect("Test server failed");
    });

    FakeDiscord {
        webhook_url: format!("{url}/api/webhooks/1234/secret-token"),
        received,
        _server: TestServer {
            addr,
            url,
            _handle: handle,
        },
    }
}

/// Endpoint that drops every connection without answering.
pub struct HangupServer {
    pub webhook_url: String,
    connections: Arc<AtomicUsize>,
    _handle: JoinHandle<()>,
}

impl HangupServer {
    pub fn connections(&self) -> usize {
        self.connections.load(Ordering::SeqCst)
    }

    /// Wait until at least `expected` connections arrived, up to two seconds.
    pub async fn wait_for_connections(&self, expected: usize) -> usize {
        for _ in 0..40 {
            if self.connections() >= expected {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        self.connections()
    }
}

pub async fn spawn_hangup_server() -> HangupServer {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind hangup server");
    let addr = listener.local_addr().expect("Failed to get local addr");
    let connections = Arc::new(AtomicUsize::new(0));
    let counter = connections.clone();

    let handle = tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            drop(stream);
        }
    });

    HangupServer {
        webhook_url: format!("http://{addr}/api/webhooks/1234/secret-token"),
        connections,
        _handle: handle,
    }
}

/// A URL on a port that was just released, so connections are refused.
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port reservation listener");
    let addr = listener.local_addr().expect("Failed to get local addr");
    drop(listener);
    format!("http://{addr}/api/webhooks/1234/secret-token")
}

/// The example ticket used across tests.
pub fn example_ticket() -> serde_json::Value {
    serde_json::json!({
        "ticket": {
            "number": 123,
            "title": "Printer jam",
            "state": "open",
            "created_at": "2024-01-05T10:00:00Z",
            "priority": { "name": "High" }
        },
        "customer": {
            "firstname": "Ana",
            "lastname": "Silva",
            "email": "ana@x.com"
        }
    })
}
