//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. Every problem is
//! collected so an operator sees the full list in one pass.

use axum::http::HeaderName;
use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Upper bound for the session cookie lifetime, ten years.
pub const MAX_SESSION_DAYS: i64 = 3650;

/// Validate a parsed configuration.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if let Some(base_url) = &config.passthrough.base_url {
        check_base_url("passthrough.base_url", base_url, &mut errors);
    }
    if let Some(base_url) = &config.auth.base_url {
        check_base_url("auth.base_url", base_url, &mut errors);
    }

    if HeaderName::from_bytes(config.passthrough.api_key_header.as_bytes()).is_err() {
        errors.push(ValidationError::new(
            "passthrough.api_key_header",
            format!("'{}' is not a valid header name", config.passthrough.api_key_header),
        ));
    }

    check_mount("passthrough.mount", &config.passthrough.mount, &mut errors);
    check_mount("auth.mount", &config.auth.mount, &mut errors);
    check_mount("auth.namespace", &config.auth.namespace, &mut errors);
    check_mount("session.logout_path", &config.session.logout_path, &mut errors);

    if config.session.cookie_name.is_empty() {
        errors.push(ValidationError::new("session.cookie_name", "must not be empty"));
    }
    if config.session.max_age_days <= 0 {
        errors.push(ValidationError::new("session.max_age_days", "must be positive"));
    } else if config.session.max_age_days > MAX_SESSION_DAYS {
        errors.push(ValidationError::new(
            "session.max_age_days",
            format!("must be at most {}", MAX_SESSION_DAYS),
        ));
    }
    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::new("timeouts.connect_secs", "must be positive"));
    }
    if config.timeouts.response_secs == 0 {
        errors.push(ValidationError::new("timeouts.response_secs", "must be positive"));
    }
    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::new("limits.max_body_size", "must be positive"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_base_url(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    match Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {
            if url.query().is_some() || url.fragment().is_some() {
                errors.push(ValidationError::new(field, "must not carry a query or fragment"));
            }
        }
        Ok(url) => errors.push(ValidationError::new(
            field,
            format!("'{}' must be an absolute http(s) URL", url),
        )),
        Err(e) => errors.push(ValidationError::new(field, format!("'{}': {}", value, e))),
    }
}

fn check_mount(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if !value.starts_with('/') {
        errors.push(ValidationError::new(field, "must start with '/'"));
    }
}
