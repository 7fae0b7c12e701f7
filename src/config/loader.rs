//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::{Environment, ProxyConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Upstream base URL for the passthrough proxy.
pub const ENV_UPSTREAM_URL: &str = "LANGGRAPH_API_URL";
/// Static API key for the passthrough proxy.
pub const ENV_UPSTREAM_API_KEY: &str = "LANGSMITH_API_KEY";
/// Base URL of the auth service.
pub const ENV_AUTH_URL: &str = "AUTH_BASE_URL";
/// `production` switches the deployment environment.
pub const ENV_NODE_ENV: &str = "NODE_ENV";
/// Listener address override.
pub const ENV_BIND_ADDRESS: &str = "BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load a TOML file, apply environment overrides and validate.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: ProxyConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build a configuration from defaults and the environment alone.
pub fn from_env() -> Result<ProxyConfig, ConfigError> {
    let mut config = ProxyConfig::default();

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto `config`.
///
/// `lookup` is injected so tests never touch the real process environment.
/// Empty values are treated as unset.
pub fn apply_env_overrides<F>(config: &mut ProxyConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(url) = get(ENV_UPSTREAM_URL) {
        config.passthrough.base_url = Some(url);
    }
    if let Some(key) = get(ENV_UPSTREAM_API_KEY) {
        config.passthrough.api_key = Some(key);
    }
    if let Some(url) = get(ENV_AUTH_URL) {
        config.auth.base_url = Some(url);
    }
    if let Some(env) = get(ENV_NODE_ENV) {
        config.environment = if env == "production" {
            Environment::Production
        } else {
            Environment::Development
        };
    }
    if let Some(addr) = get(ENV_BIND_ADDRESS) {
        config.listener.bind_address = addr;
    }
}
