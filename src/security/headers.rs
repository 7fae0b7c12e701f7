//! Hop-by-hop header handling.
//!
//! Headers that describe a single connection (RFC 9110 §7.6.1) are removed
//! from relayed responses; the gateway's own connection to the client sets
//! its own.

use axum::http::{header, HeaderMap, HeaderName};

const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Whether `name` is connection-scoped.
pub fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(&name.as_str())
}

/// Copy `source` into a new map without hop-by-hop headers, including any
/// named in the `Connection` header itself.
pub fn relayable_headers(source: &HeaderMap) -> HeaderMap {
    let listed: Vec<String> = source
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|v| v.trim().to_ascii_lowercase())
        .filter(|v| !v.is_empty())
        .collect();

    let mut out = HeaderMap::with_capacity(source.len());
    for (name, value) in source {
        if is_hop_by_hop(name) || listed.iter().any(|l| l == name.as_str()) {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}
