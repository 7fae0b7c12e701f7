//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Report upstreams → Start listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain (bounded) → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```
//!
//! # Design Decisions
//! - Fail fast: invalid configuration never starts a listener
//! - Missing upstreams are warned about, not fatal
//! - Shutdown has a grace period: forced exit after deadline

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
