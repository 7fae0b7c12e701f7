//! Shared utilities for integration tests.
//!
//! A recording mock upstream plus a helper that runs the real gateway on an
//! ephemeral port.

#![allow(dead_code)]

use agent_chat_gateway::{HttpServer, ProxyConfig, Shutdown};
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    response::Response,
    Router,
};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// One request as the upstream saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    /// Path and query, exactly as received.
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// What the mock answers with.
#[derive(Debug, Clone)]
pub enum Reply {
    /// Fixed status and JSON body.
    Fixed { status: u16, body: String },
    /// Echo the request body back with the given status.
    Echo { status: u16 },
}

impl Reply {
    pub fn ok(body: serde_json::Value) -> Self {
        Reply::Fixed {
            status: 200,
            body: body.to_string(),
        }
    }
}

#[derive(Clone)]
struct MockState {
    recorded: Arc<Mutex<Vec<Recorded>>>,
    reply: Arc<Mutex<Reply>>,
}

/// Mock upstream that records every request it receives.
pub struct MockUpstream {
    pub addr: SocketAddr,
    state: MockState,
}

impl MockUpstream {
    pub async fn start(reply: Reply) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let state = MockState {
            recorded: Arc::new(Mutex::new(Vec::new())),
            reply: Arc::new(Mutex::new(reply)),
        };

        let app = Router::new().fallback(record).with_state(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn set_reply(&self, reply: Reply) {
        *self.state.reply.lock().unwrap() = reply;
    }

    pub fn calls(&self) -> usize {
        self.state.recorded.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.recorded.lock().unwrap().clone()
    }

    pub fn last(&self) -> Recorded {
        self.state
            .recorded
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("upstream received no request")
    }
}

async fn record(State(state): State<MockState>, request: Request<Body>) -> Response {
    let (parts, body) = request.into_parts();
    let body = axum::body::to_bytes(body, usize::MAX).await.unwrap_or_default();

    state.recorded.lock().unwrap().push(Recorded {
        method: parts.method.to_string(),
        uri: parts.uri.to_string(),
        headers: parts.headers,
        body: body.clone(),
    });

    let reply = state.reply.lock().unwrap().clone();
    let (status, payload) = match reply {
        Reply::Fixed { status, body } => (status, Bytes::from(body)),
        Reply::Echo { status } => (status, body),
    };

    Response::builder()
        .status(StatusCode::from_u16(status).unwrap())
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload))
        .unwrap()
}

/// Upstream that answers with a chunked event stream: `first`, a pause of
/// `delay`, then `second`. Written on the raw socket so each chunk goes out
/// the moment it is written.
pub async fn start_streaming_upstream(
    first: &'static str,
    delay: Duration,
    second: &'static str,
) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }

                let head = "HTTP/1.1 200 OK\r\n\
                            Content-Type: text/event-stream\r\n\
                            Transfer-Encoding: chunked\r\n\
                            Connection: close\r\n\r\n";
                let _ = socket.write_all(head.as_bytes()).await;
                let _ = socket.write_all(chunk(first).as_bytes()).await;
                let _ = socket.flush().await;

                tokio::time::sleep(delay).await;

                let _ = socket.write_all(chunk(second).as_bytes()).await;
                let _ = socket.write_all(b"0\r\n\r\n").await;
                let _ = socket.shutdown().await;
            });
        }
    });

    addr
}

fn chunk(data: &str) -> String {
    format!("{:x}\r\n{}\r\n", data.len(), data)
}

/// The gateway running on an ephemeral port. Shuts down on drop.
pub struct Gateway {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

impl Gateway {
    pub async fn start(config: ProxyConfig) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Shutdown::new();
        let server_shutdown = shutdown.subscribe();
        let (_updates_tx, updates) = mpsc::unbounded_channel();

        let server = HttpServer::new(config).unwrap();
        tokio::spawn(async move {
            server.run(listener, updates, server_shutdown).await.unwrap();
        });

        Self { addr, shutdown }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for Gateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Config pointing the two mounts at the given mocks.
pub fn config_for(passthrough: Option<&MockUpstream>, auth: Option<&MockUpstream>) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.passthrough.base_url = passthrough.map(MockUpstream::url);
    config.auth.base_url = auth.map(MockUpstream::url);
    config
}

/// HTTP client that ignores any proxy settings in the environment.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}
