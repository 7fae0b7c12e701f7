//! Startup reporting.
//!
//! Missing upstream URLs are legal (each request then fails with 500), so
//! they are surfaced loudly here instead of blocking startup.

use crate::config::ProxyConfig;

/// Log which upstreams are configured.
pub fn report_upstreams(config: &ProxyConfig) {
    match &config.passthrough.base_url {
        Some(url) => tracing::info!(
            upstream = %url,
            mount = %config.passthrough.mount,
            api_key = config.passthrough.api_key.is_some(),
            "Passthrough upstream configured"
        ),
        None => tracing::warn!(
            mount = %config.passthrough.mount,
            "Passthrough upstream base URL not set; requests will fail with 500"
        ),
    }

    match &config.auth.base_url {
        Some(url) => tracing::info!(
            upstream = %url,
            mount = %config.auth.mount,
            namespace = %config.auth.namespace,
            "Auth upstream configured"
        ),
        None => tracing::warn!(
            mount = %config.auth.mount,
            "Auth service base URL not set; requests will fail with 500"
        ),
    }
}
