//! Agent chat gateway library.
//!
//! A same-origin gateway in front of two upstreams: a transparent proxy to
//! the agent backend and a narrower proxy to the login service that turns a
//! successful login into an HttpOnly session cookie.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod proxy;
pub mod resilience;
pub mod routing;
pub mod security;
pub mod session;
pub mod upstream;

pub use config::schema::ProxyConfig;
pub use error::ProxyError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
