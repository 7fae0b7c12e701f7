//! Hot reload of the configuration file.
//!
//! The parent directory is watched rather than the file itself: editors and
//! config-management tools usually save by writing a temp file and renaming
//! it over the original, which would orphan a watch on the old inode.

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::ProxyConfig;

/// Sends each valid, changed configuration to the server.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<ProxyConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiving end the server consumes.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<ProxyConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. Dropping the returned handle stops the watch.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let path = self.path;
        let tx = self.update_tx;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = path.file_name().map(ToOwned::to_owned);

        let mut last_sent: Option<ProxyConfig> = None;
        let handler_path = path.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::error!(error = %e, "Config watch error");
                        return;
                    }
                };
                if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                    return;
                }
                let touches_config = event
                    .paths
                    .iter()
                    .any(|p| p.file_name() == file_name.as_deref());
                if !touches_config {
                    return;
                }

                match load_config(&handler_path) {
                    Ok(next) if last_sent.as_ref() == Some(&next) => {
                        tracing::debug!("Config file touched without changes");
                    }
                    Ok(next) => {
                        tracing::info!(path = ?handler_path, "Config file changed, reloading");
                        last_sent = Some(next.clone());
                        deliver(&tx, next);
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Rejected config reload, keeping current configuration");
                    }
                }
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?path, "Config watcher started");
        Ok(watcher)
    }
}

/// Hand a reload to the server. False when nobody is listening any more.
fn deliver(tx: &mpsc::UnboundedSender<ProxyConfig>, next: ProxyConfig) -> bool {
    if tx.send(next).is_err() {
        tracing::warn!("Server no longer accepts config updates, reload dropped");
        return false;
    }
    true
}
