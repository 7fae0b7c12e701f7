//! Login session handling.
//!
//! The auth proxy issues the session cookie on a successful login; the
//! logout endpoint answers locally and expires it. The gateway itself never
//! reads the cookie.

pub mod cookie;

use axum::{
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::error::ProxyError;
use crate::proxy::envelope::AuthReply;

pub use cookie::SessionCookies;

/// Expire the session cookie. POST only.
pub fn logout(method: &Method, cookies: &SessionCookies) -> Response {
    if method != Method::POST {
        return AuthReply::from_error(&ProxyError::MethodNotAllowed(method.clone())).into_response();
    }

    let reply = AuthReply::Success {
        status: StatusCode::OK,
        body: json!({ "code": 200, "msg": "logged out", "data": null, "success": true }),
    };
    let mut response = reply.into_response();
    if let Some(value) = SessionCookies::header_value(&cookies.clear()) {
        response.headers_mut().append(header::SET_COOKIE, value);
    }

    tracing::info!("Session cookie cleared");
    response
}
