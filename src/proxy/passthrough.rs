//! Generic passthrough to the agent-execution service.
//!
//! # Responsibilities
//! - Answer CORS preflight locally
//! - Rewrite the inbound request onto the configured upstream base
//! - Forward credentials and body bytes unmodified
//! - Stream the upstream response back with CORS headers attached
//!
//! # Design Decisions
//! - Exactly one upstream attempt per inbound request
//! - Upstream non-2xx answers are relayed, not treated as local failures
//! - The request body is buffered (bounded); the response body is streamed

use axum::{
    body::Body,
    http::{Method, Request},
    response::{IntoResponse, Response},
};

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::http::response::{apply_cors, preflight};
use crate::proxy::outbound::passthrough_headers;
use crate::proxy::target::{filtered_query, join_target, passthrough_path};
use crate::security::headers::relayable_headers;
use crate::security::limits::read_body;
use crate::upstream::UpstreamClient;

/// Methods the passthrough relays.
const RELAYED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
];

/// Relay one request. Never fails: errors become JSON responses.
pub async fn relay(
    client: &UpstreamClient,
    config: &ProxyConfig,
    path: &str,
    request: Request<Body>,
) -> Response {
    if request.method() == Method::OPTIONS {
        return preflight();
    }

    let mut response = match forward(client, config, path, request).await {
        Ok(response) => response,
        Err(e) => {
            if e.is_local() {
                tracing::warn!(error = %e, "Passthrough rejected request");
            } else {
                tracing::error!(error = %e, "Passthrough upstream error");
            }
            e.into_response()
        }
    };

    apply_cors(response.headers_mut());
    response
}

async fn forward(
    client: &UpstreamClient,
    config: &ProxyConfig,
    path: &str,
    request: Request<Body>,
) -> Result<Response, ProxyError> {
    let method = request.method().clone();
    if !RELAYED_METHODS.contains(&method) {
        return Err(ProxyError::MethodNotAllowed(method));
    }

    let base = config
        .passthrough
        .base_url
        .as_deref()
        .ok_or(ProxyError::MissingUpstream("passthrough upstream base URL"))?;

    let path = passthrough_path(path)?;
    let query = filtered_query(
        request.uri().query(),
        &config.passthrough.stripped_query_params,
    );
    let target = join_target(base, path, query.as_deref())?;
    let headers = passthrough_headers(request.headers(), &config.passthrough)?;

    let (parts, body) = request.into_parts();
    let mut builder = client.request(method.clone(), target.clone()).headers(headers);
    if carries_body(&method) {
        let bytes = read_body(&parts.headers, body, config.limits.max_body_size).await?;
        builder = builder.body(bytes);
    }

    tracing::info!(method = %method, target = %target, "Proxying request");

    let upstream = client.send(builder.build()?).await?;

    tracing::debug!(status = %upstream.status(), target = %target, "Upstream responded");
    Ok(relay_response(upstream))
}

/// POST, PUT and PATCH carry a body; everything else is sent without one.
pub fn carries_body(method: &Method) -> bool {
    matches!(*method, Method::POST | Method::PUT | Method::PATCH)
}

/// Copy status and relayable headers; stream the body through untouched.
fn relay_response(upstream: reqwest::Response) -> Response {
    let status = upstream.status();
    let headers = relayable_headers(upstream.headers());

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, StatusCode};
    use crate::config::TimeoutConfig;

    fn client() -> UpstreamClient {
        UpstreamClient::new(&TimeoutConfig::default()).unwrap()
    }

    #[test]
    fn test_carries_body() {
        assert!(carries_body(&Method::POST));
        assert!(carries_body(&Method::PUT));
        assert!(carries_body(&Method::PATCH));
        assert!(!carries_body(&Method::GET));
        assert!(!carries_body(&Method::DELETE));
        assert!(!carries_body(&Method::OPTIONS));
    }

    #[tokio::test]
    async fn test_preflight_without_config() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/threads")
            .body(Body::empty())
            .unwrap();
        let response = relay(&client(), &ProxyConfig::default(), "threads", request).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_missing_base_url() {
        let request = Request::builder()
            .method(Method::GET)
            .uri("/api/threads")
            .body(Body::empty())
            .unwrap();
        let response = relay(&client(), &ProxyConfig::default(), "threads", request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_head_not_relayed() {
        let mut config = ProxyConfig::default();
        config.passthrough.base_url = Some("http://127.0.0.1:9".into());
        let request = Request::builder()
            .method(Method::HEAD)
            .uri("/api/threads")
            .body(Body::empty())
            .unwrap();
        let response = relay(&client(), &config, "threads", request).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
