//! Outbound request headers.
//!
//! Upstream requests carry a fixed, minimal header set. Nothing else from the
//! inbound request is copied across.

use axum::http::{header, HeaderMap, HeaderName, HeaderValue};

use crate::config::PassthroughConfig;
use crate::error::ProxyError;

/// Headers for a passthrough request.
///
/// The inbound `Authorization` value is forwarded byte for byte and replaces
/// any default; when the client sent none, none is sent.
pub fn passthrough_headers(
    inbound: &HeaderMap,
    config: &PassthroughConfig,
) -> Result<HeaderMap, ProxyError> {
    let mut headers = json_headers();

    if let Some(key) = &config.api_key {
        let name = HeaderName::from_bytes(config.api_key_header.as_bytes())
            .map_err(|_| ProxyError::InvalidApiKey)?;
        let mut value = HeaderValue::from_str(key).map_err(|_| ProxyError::InvalidApiKey)?;
        value.set_sensitive(true);
        headers.insert(name, value);
    }

    if let Some(authorization) = inbound.get(header::AUTHORIZATION) {
        tracing::debug!(
            authorization = %preview(authorization),
            "Forwarding Authorization header"
        );
        headers.insert(header::AUTHORIZATION, authorization.clone());
    }

    Ok(headers)
}

/// Headers for an auth-service request. Client credentials are never forwarded.
pub fn auth_headers() -> HeaderMap {
    json_headers()
}

fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers
}

/// First 20 characters of a credential, for logs.
pub fn preview(value: &HeaderValue) -> String {
    let text = value.to_str().unwrap_or("<binary>");
    let head: String = text.chars().take(20).collect();
    format!("{}...", head)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: Option<&str>) -> PassthroughConfig {
        PassthroughConfig {
            api_key: api_key.map(str::to_string),
            ..PassthroughConfig::default()
        }
    }

    #[test]
    fn test_authorization_forwarded_verbatim() {
        let mut inbound = HeaderMap::new();
        inbound.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer eyJhbGciOi.x.y"));
        inbound.insert(header::COOKIE, HeaderValue::from_static("token=abc"));
        inbound.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));

        let headers = passthrough_headers(&inbound, &config(None)).unwrap();
        assert_eq!(headers[header::AUTHORIZATION], "Bearer eyJhbGciOi.x.y");
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert!(headers.get(header::COOKIE).is_none());
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn test_no_authorization_is_synthesized() {
        let headers = passthrough_headers(&HeaderMap::new(), &config(Some("lsv2-key"))).unwrap();
        assert!(headers.get(header::AUTHORIZATION).is_none());
        assert_eq!(headers["x-api-key"], "lsv2-key");
        assert!(headers["x-api-key"].is_sensitive());
    }

    #[test]
    fn test_custom_api_key_header() {
        let mut cfg = config(Some("k"));
        cfg.api_key_header = "x-agent-key".into();
        let headers = passthrough_headers(&HeaderMap::new(), &cfg).unwrap();
        assert_eq!(headers["x-agent-key"], "k");
        assert!(headers.get("x-api-key").is_none());
    }

    #[test]
    fn test_bad_api_key_value() {
        let err = passthrough_headers(&HeaderMap::new(), &config(Some("bad\nkey"))).unwrap_err();
        assert!(matches!(err, ProxyError::InvalidApiKey));
    }

    #[test]
    fn test_preview_truncates() {
        let value = HeaderValue::from_static("Bearer 0123456789abcdefghijkl");
        assert_eq!(preview(&value), "Bearer 0123456789abc...");
    }

    #[test]
    fn test_auth_headers_minimal() {
        let headers = auth_headers();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    }
}
