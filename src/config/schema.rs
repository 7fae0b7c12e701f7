//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address, TLS).
    pub listener: ListenerConfig,

    /// Generic passthrough to the agent-execution service.
    pub passthrough: PassthroughConfig,

    /// Auth proxy to the login service.
    pub auth: AuthConfig,

    /// Session cookie settings.
    pub session: SessionConfig,

    /// Deployment environment.
    pub environment: Environment,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,

    /// Optional TLS configuration.
    pub tls: Option<TlsConfig>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration for the listener.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct TlsConfig {
    /// Path to certificate file (PEM).
    pub cert_path: String,

    /// Path to private key file (PEM).
    pub key_path: String,
}

/// Passthrough proxy configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PassthroughConfig {
    /// Upstream base URL. Requests fail with 500 while unset.
    pub base_url: Option<String>,

    /// Static API key attached to every upstream request.
    pub api_key: Option<String>,

    /// Header carrying `api_key`.
    pub api_key_header: String,

    /// Path prefix the passthrough is mounted on.
    pub mount: String,

    /// Query parameters dropped before forwarding (client routing artifacts).
    pub stripped_query_params: Vec<String>,
}

impl Default for PassthroughConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            api_key: None,
            api_key_header: "x-api-key".to_string(),
            mount: "/api".to_string(),
            stripped_query_params: vec!["_path".to_string(), "nxtP_path".to_string()],
        }
    }
}

/// Auth proxy configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AuthConfig {
    /// Auth service base URL. Requests fail with 500 while unset.
    pub base_url: Option<String>,

    /// Path prefix the auth proxy is mounted on.
    pub mount: String,

    /// Upstream sub-path every endpoint lives under.
    pub namespace: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            mount: "/api/auth".to_string(),
            namespace: "/gw/chatweb/user".to_string(),
        }
    }
}

/// Session cookie configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Cookie name holding the login token.
    pub cookie_name: String,

    /// Cookie lifetime in days.
    pub max_age_days: i64,

    /// Local endpoint that clears the cookie.
    pub logout_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "token".to_string(),
            max_age_days: 30,
            logout_path: "/api/session/logout".to_string(),
        }
    }
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Production deployments only send cookies over HTTPS.
    pub fn is_production(self) -> bool {
        matches!(self, Environment::Production)
    }
}

/// Timeout configuration for upstream calls and shutdown.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Maximum wait for the upstream response head in seconds.
    /// Body streaming afterwards is not bounded.
    pub response_secs: u64,

    /// Time allowed for in-flight requests to drain on shutdown.
    pub shutdown_grace_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 10,
            response_secs: 120,
            shutdown_grace_secs: 10,
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 10 * 1024 * 1024, // 10MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [passthrough]
            base_url = "http://localhost:2024"
            "#,
        )
        .unwrap();

        assert_eq!(config.passthrough.base_url.as_deref(), Some("http://localhost:2024"));
        assert_eq!(config.passthrough.api_key_header, "x-api-key");
        assert_eq!(config.passthrough.stripped_query_params, vec!["_path", "nxtP_path"]);
        assert_eq!(config.auth.namespace, "/gw/chatweb/user");
        assert_eq!(config.session.cookie_name, "token");
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    fn test_environment_parses_lowercase() {
        let config: ProxyConfig = toml::from_str(r#"environment = "production""#).unwrap();
        assert!(config.environment.is_production());
    }
}
