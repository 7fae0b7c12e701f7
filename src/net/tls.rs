//! TLS certificate loading for the HTTPS listener.

use axum_server::tls_rustls::RustlsConfig;
use std::io;
use std::path::Path;

/// Load a PEM certificate chain and private key.
///
/// Missing files are reported by name before rustls sees them, so the
/// operator gets a path rather than a parse error.
pub async fn load_tls_config(cert_path: &Path, key_path: &Path) -> io::Result<RustlsConfig> {
    for (kind, path) in [("certificate", cert_path), ("private key", key_path)] {
        if !path.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("TLS {} not found at {}", kind, path.display()),
            ));
        }
    }

    RustlsConfig::from_pem_file(cert_path, key_path).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_certificate_named() {
        let dir = tempfile::tempdir().unwrap();
        let cert = dir.path().join("cert.pem");
        let key = dir.path().join("key.pem");

        let err = load_tls_config(&cert, &key).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(err.to_string().contains("certificate"));
    }
}
