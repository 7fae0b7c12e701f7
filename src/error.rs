//! Request-scoped error taxonomy.
//!
//! Every failure a proxy handler can hit is a [`ProxyError`]. Handlers never
//! let one escape: each mount renders it into a well-formed JSON body (a flat
//! `{"error": ...}` object for the passthrough mount, the `{code, msg, data,
//! success}` envelope for the auth mount).

use axum::http::{Method, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Errors raised while relaying a single request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// A required upstream base URL is absent from the configuration.
    #[error("{0} is not configured")]
    MissingUpstream(&'static str),

    /// The configured base URL and inbound path did not form a valid URL.
    #[error("invalid upstream target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },

    /// The configured API key cannot be sent as a header value.
    #[error("passthrough API key is not a valid header value")]
    InvalidApiKey,

    /// An auth endpoint path tried to leave the service namespace.
    #[error("invalid endpoint '{0}'")]
    InvalidEndpoint(String),

    /// A passthrough path tried to climb above the upstream base.
    #[error("invalid path '{0}'")]
    InvalidPath(String),

    /// DNS, connect, TLS or protocol failure talking to the upstream.
    #[error("upstream transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream did not produce a response head in time.
    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),

    /// Declared request body exceeds the configured limit.
    #[error("request body exceeds {limit} bytes")]
    BodyTooLarge { limit: usize },

    /// The inbound body could not be read.
    #[error("failed to read request body: {0}")]
    Body(String),

    /// The auth service answered with something that is not JSON.
    #[error("upstream returned a non-JSON body: {0}")]
    InvalidUpstreamBody(#[from] serde_json::Error),

    /// The auth mount was hit without an endpoint path.
    #[error("missing endpoint parameter")]
    MissingEndpoint,

    /// The configured session lifetime cannot be turned into an expiry date.
    #[error("session cookie lifetime of {0} days is out of range")]
    SessionExpiry(i64),

    /// The mount does not accept this method.
    #[error("method {0} is not allowed")]
    MethodNotAllowed(Method),
}

impl ProxyError {
    /// Status code reported to the client.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::MissingEndpoint
            | ProxyError::InvalidEndpoint(_)
            | ProxyError::InvalidPath(_)
            | ProxyError::Body(_) => StatusCode::BAD_REQUEST,
            ProxyError::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ProxyError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ProxyError::MissingUpstream(_)
            | ProxyError::InvalidApiKey
            | ProxyError::InvalidTarget { .. }
            | ProxyError::Transport(_)
            | ProxyError::Timeout(_)
            | ProxyError::InvalidUpstreamBody(_)
            | ProxyError::SessionExpiry(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand back to the client.
    ///
    /// Transport details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            ProxyError::Transport(_) | ProxyError::Timeout(_) => {
                "upstream request failed".to_string()
            }
            ProxyError::InvalidUpstreamBody(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }

    /// True when the failure happened before any upstream call was made.
    pub fn is_local(&self) -> bool {
        !matches!(
            self,
            ProxyError::Transport(_) | ProxyError::Timeout(_) | ProxyError::InvalidUpstreamBody(_)
        )
    }
}
