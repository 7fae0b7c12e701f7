//! Upstream URL construction.
//!
//! The inbound path is appended to the configured base verbatim (it is
//! already percent-encoded on the wire). The query string is re-serialized
//! with the client routing parameters removed.

use url::{form_urlencoded, Url};

use crate::error::ProxyError;

/// Drop `stripped` keys from a raw query string.
///
/// Returns `None` when nothing is left, so callers never emit a bare `?`.
pub fn filtered_query(query: Option<&str>, stripped: &[String]) -> Option<String> {
    let query = query?;
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut kept = 0usize;

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        if stripped.iter().any(|s| s.as_str() == key.as_ref()) {
            continue;
        }
        serializer.append_pair(&key, &value);
        kept += 1;
    }

    (kept > 0).then(|| serializer.finish())
}

/// `<base>/<path><?query>`.
pub fn join_target(base: &str, path: &str, query: Option<&str>) -> Result<Url, ProxyError> {
    let mut target = format!("{}/{}", base.trim_end_matches('/'), path);
    if let Some(query) = query {
        target.push('?');
        target.push_str(query);
    }

    Url::parse(&target).map_err(|e| ProxyError::InvalidTarget {
        reason: e.to_string(),
        target,
    })
}

/// Normalize an auth endpoint: empty segments are dropped, dot segments
/// rejected so the request cannot climb out of the service namespace.
pub fn auth_endpoint(raw: &str) -> Result<String, ProxyError> {
    let mut segments = Vec::new();
    for segment in raw.split('/').filter(|s| !s.is_empty()) {
        if is_dot_segment(segment) {
            return Err(ProxyError::InvalidEndpoint(raw.to_string()));
        }
        segments.push(segment);
    }

    if segments.is_empty() {
        return Err(ProxyError::MissingEndpoint);
    }
    Ok(segments.join("/"))
}

/// Reject passthrough paths that would resolve above the upstream base.
///
/// URL parsing treats `%2e` as `.`, so encoded forms are caught too.
pub fn passthrough_path(raw: &str) -> Result<&str, ProxyError> {
    if raw.split(['/', '\\']).any(is_dot_segment) {
        return Err(ProxyError::InvalidPath(raw.to_string()));
    }
    Ok(raw)
}

fn is_dot_segment(segment: &str) -> bool {
    matches!(
        segment.to_ascii_lowercase().as_str(),
        "." | ".." | "%2e" | "%2e%2e" | ".%2e" | "%2e."
    )
}
