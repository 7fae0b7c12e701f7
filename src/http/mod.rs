//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection
//!     → server.rs (Axum setup, middleware, mount dispatch)
//!     → request.rs (request ID assigned and propagated)
//!     → [proxy mounts relay to upstreams]
//!     → response.rs (CORS headers, JSON errors)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
pub use server::{AppState, HttpServer, ServerError};
