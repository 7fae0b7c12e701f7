//! Auth proxy to the login service.
//!
//! Narrower than the passthrough: a fixed upstream namespace, no credential
//! forwarding, JSON in and out, and the `{code, msg, data, success}` envelope
//! for every failure. Successful calls may trigger a post-processing action
//! (see [`crate::proxy::actions`]).

use axum::{
    body::Body,
    http::{HeaderMap, Method, Request},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::config::ProxyConfig;
use crate::error::ProxyError;
use crate::proxy::actions::action_for;
use crate::proxy::envelope::AuthReply;
use crate::proxy::outbound::auth_headers;
use crate::proxy::target::{auth_endpoint, join_target};
use crate::security::limits::read_body;
use crate::session::SessionCookies;
use crate::upstream::UpstreamClient;

const AUTH_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

/// Relay one auth request. Never fails: errors become envelopes.
pub async fn relay(
    client: &UpstreamClient,
    config: &ProxyConfig,
    cookies: &SessionCookies,
    raw_endpoint: &str,
    request: Request<Body>,
) -> Response {
    let endpoint = match auth_endpoint(raw_endpoint) {
        Ok(endpoint) => endpoint,
        Err(e) => {
            tracing::warn!(endpoint = %raw_endpoint, error = %e, "Auth proxy rejected request");
            return AuthReply::from_error(&e).into_response();
        }
    };

    let reply = match forward(client, config, &endpoint, request).await {
        Ok(reply) => reply,
        Err(e) => {
            if e.is_local() {
                tracing::warn!(endpoint = %endpoint, error = %e, "Auth proxy rejected request");
            } else {
                tracing::error!(endpoint = %endpoint, error = %e, "Auth proxy error");
            }
            AuthReply::from_error(&e)
        }
    };

    let mut extra = HeaderMap::new();
    let applied = match (action_for(&endpoint), &reply) {
        (Some(action), AuthReply::Success { body, .. }) => action.apply(body, cookies, &mut extra),
        _ => Ok(()),
    };
    let reply = match applied {
        Ok(()) => reply,
        Err(e) => {
            tracing::error!(endpoint = %endpoint, error = %e, "Auth post-processing failed");
            AuthReply::from_error(&e)
        }
    };

    let mut response = reply.into_response();
    for (name, value) in extra.iter() {
        response.headers_mut().append(name, value.clone());
    }
    response
}

async fn forward(
    client: &UpstreamClient,
    config: &ProxyConfig,
    endpoint: &str,
    request: Request<Body>,
) -> Result<AuthReply, ProxyError> {
    let method = request.method().clone();
    if !AUTH_METHODS.contains(&method) {
        return Err(ProxyError::MethodNotAllowed(method));
    }

    let base = config
        .auth
        .base_url
        .as_deref()
        .ok_or(ProxyError::MissingUpstream("auth service base URL"))?;

    let path = match config.auth.namespace.trim_matches('/') {
        "" => endpoint.to_string(),
        namespace => format!("{}/{}", namespace, endpoint),
    };
    let target = join_target(base, &path, request.uri().query())?;

    let (parts, body) = request.into_parts();
    let mut builder = client.request(method.clone(), target.clone()).headers(auth_headers());
    if matches!(method, Method::POST | Method::PUT) {
        let bytes = read_body(&parts.headers, body, config.limits.max_body_size).await?;
        builder = builder.body(bytes);
    }

    tracing::info!(method = %method, target = %target, "Proxying auth request");

    let upstream = client.send(builder.build()?).await?;
    let status = upstream.status();
    let bytes = upstream.bytes().await?;
    let body: Value = serde_json::from_slice(&bytes)?;

    tracing::debug!(status = %status, target = %target, "Auth service responded");
    Ok(AuthReply::from_upstream(status, body))
}
