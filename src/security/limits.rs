//! Request body limits.
//!
//! The declared `Content-Length` is checked before anything is read so an
//! oversized upload is rejected with 413 up front; the read itself is still
//! bounded for chunked bodies that declare no length.

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap},
};
use http_body_util::{BodyExt, LengthLimitError, Limited};

use crate::error::ProxyError;

/// Reject requests whose declared length exceeds `limit`.
pub fn check_declared_length(headers: &HeaderMap, limit: usize) -> Result<(), ProxyError> {
    let Some(value) = headers.get(header::CONTENT_LENGTH) else {
        return Ok(());
    };
    let length = value
        .to_str()
        .ok()
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .ok_or_else(|| ProxyError::Body("invalid content-length".to_string()))?;
    if length > limit {
        return Err(ProxyError::BodyTooLarge { limit });
    }
    Ok(())
}

/// Read the whole body, at most `limit` bytes.
pub async fn read_body(headers: &HeaderMap, body: Body, limit: usize) -> Result<Bytes, ProxyError> {
    check_declared_length(headers, limit)?;
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => Err(ProxyError::BodyTooLarge { limit }),
        Err(e) => Err(ProxyError::Body(e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_declared_length_over_limit() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("2048"));
        assert!(matches!(
            check_declared_length(&headers, 1024),
            Err(ProxyError::BodyTooLarge { limit: 1024 })
        ));
        assert!(check_declared_length(&headers, 4096).is_ok());
        assert!(check_declared_length(&HeaderMap::new(), 1).is_ok());
    }

    #[test]
    fn test_garbage_content_length() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("lots"));
        assert!(matches!(check_declared_length(&headers, 10), Err(ProxyError::Body(_))));
    }

    #[tokio::test]
    async fn test_read_body_is_verbatim() {
        let raw = "{\"input\": {\"messages\": [\"héllo\"]},  \"x\":1}";
        let bytes = read_body(&HeaderMap::new(), Body::from(raw), 1024).await.unwrap();
        assert_eq!(bytes, raw.as_bytes());
    }

    #[tokio::test]
    async fn test_undeclared_overflow_matches_declared() {
        let err = read_body(&HeaderMap::new(), Body::from(vec![b'a'; 64]), 16)
            .await
            .unwrap_err();
        assert!(matches!(err, ProxyError::BodyTooLarge { limit: 16 }));
        assert_eq!(err.status(), axum::http::StatusCode::PAYLOAD_TOO_LARGE);
    }
}
