//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → limits.rs (declared size check, bounded body read)
//!     → Pass to proxy
//!
//! Upstream response:
//!     → headers.rs (strip hop-by-hop headers)
//!     → Pass to client
//! ```
//!
//! # Design Decisions
//! - Fail closed: oversized bodies never reach the upstream
//! - Connection-level headers are never relayed across the proxy

pub mod headers;
pub mod limits;
