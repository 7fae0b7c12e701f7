//! Mount classification.

use crate::config::ProxyConfig;

/// Which handler owns a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mount<'a> {
    /// Local session logout.
    Logout,
    /// Auth proxy. `endpoint` is everything after the mount, without the leading `/`.
    Auth { endpoint: &'a str },
    /// Passthrough proxy. `path` is everything after the mount, without the leading `/`.
    Passthrough { path: &'a str },
}

impl<'a> Mount<'a> {
    /// Classify `path` against the configured mounts.
    ///
    /// The auth mount sits under the passthrough mount by default, so it is
    /// checked first.
    pub fn classify(path: &'a str, config: &ProxyConfig) -> Option<Mount<'a>> {
        if path == config.session.logout_path {
            return Some(Mount::Logout);
        }
        if let Some(endpoint) = strip_mount(path, &config.auth.mount) {
            return Some(Mount::Auth { endpoint });
        }
        strip_mount(path, &config.passthrough.mount).map(|path| Mount::Passthrough { path })
    }

    /// Label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Mount::Logout => "logout",
            Mount::Auth { .. } => "auth",
            Mount::Passthrough { .. } => "passthrough",
        }
    }
}

/// Remove `mount` from the front of `path` on a segment boundary.
fn strip_mount<'a>(path: &'a str, mount: &str) -> Option<&'a str> {
    let mount = mount.trim_end_matches('/');
    let rest = path.strip_prefix(mount)?;
    if rest.is_empty() {
        Some(rest)
    } else {
        rest.strip_prefix('/')
    }
}
