//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional) + environment
//!     → loader.rs (parse, env overrides)
//!     → validation.rs (semantic checks)
//!     → ProxyConfig (validated, immutable)
//!     → stored in an ArcSwap owned by the HTTP server
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → atomic swap; the next request sees the new upstreams
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Missing upstream URLs are a per-request error, not a startup error

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{from_env, load_config, ConfigError};
pub use schema::{
    AuthConfig, Environment, ListenerConfig, PassthroughConfig, ProxyConfig, SessionConfig,
    TimeoutConfig,
};
pub use validation::ValidationError;
