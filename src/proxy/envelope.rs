//! The auth service's `{code, msg, data, success}` contract as a typed result.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::error::ProxyError;

/// Message used when the upstream rejects a call without saying why.
pub const DEFAULT_FAILURE_MSG: &str = "request failed";

/// Outcome of an auth-proxy call, as the client will see it.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthReply {
    /// Upstream accepted; its JSON body is relayed as-is.
    Success { status: StatusCode, body: Value },
    /// Upstream refused, or the gateway failed locally.
    Failure {
        status: StatusCode,
        msg: String,
        data: Value,
    },
}

/// Wire shape of a failure.
#[derive(Debug, Serialize)]
struct Envelope<'a> {
    code: u16,
    msg: &'a str,
    data: &'a Value,
    success: bool,
}

impl AuthReply {
    /// Classify a parsed upstream answer by its status.
    pub fn from_upstream(status: StatusCode, body: Value) -> Self {
        if status.is_success() {
            return AuthReply::Success { status, body };
        }

        let msg = body
            .get("msg")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_FAILURE_MSG)
            .to_string();
        let data = body
            .get("data")
            .filter(|d| is_present(d))
            .cloned()
            .unwrap_or(Value::Null);

        AuthReply::Failure { status, msg, data }
    }

    /// Local failure rendered in the envelope shape.
    pub fn from_error(err: &ProxyError) -> Self {
        let msg = match err {
            ProxyError::MissingEndpoint
            | ProxyError::InvalidEndpoint(_)
            | ProxyError::MethodNotAllowed(_)
            | ProxyError::BodyTooLarge { .. }
            | ProxyError::Body(_) => err.to_string(),
            ProxyError::MissingUpstream(_) => "auth service is misconfigured".to_string(),
            _ => "internal server error".to_string(),
        };

        AuthReply::Failure {
            status: err.status(),
            msg,
            data: Value::Null,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthReply::Success { status, .. } | AuthReply::Failure { status, .. } => *status,
        }
    }
}

impl IntoResponse for AuthReply {
    fn into_response(self) -> Response {
        match self {
            AuthReply::Success { status, body } => (status, Json(body)).into_response(),
            AuthReply::Failure { status, msg, data } => {
                let envelope = Envelope {
                    code: status.as_u16(),
                    msg: &msg,
                    data: &data,
                    success: false,
                };
                (status, Json(envelope)).into_response()
            }
        }
    }
}

/// Empty-ish values (`null`, `false`, `0`, `""`) count as absent.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
