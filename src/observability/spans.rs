//! Per-request tracing spans.

use axum::{body::Body, http::Request};
use tracing::Span;

use crate::http::request::RequestIdExt;

/// Span for one inbound request, tagged with its request ID.
///
/// The query string is left out: it may carry client identifiers.
pub fn request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        request_id = %request.request_id(),
    )
}
