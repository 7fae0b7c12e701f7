//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → timeouts.rs (bounded wait for the response head)
//!     → On failure: surfaced to the caller as-is, never retried
//! ```
//!
//! # Design Decisions
//! - Every upstream call has a deadline for its response head
//! - Streaming bodies are not time-bounded (agent runs stream for minutes)
//! - One inbound request maps to exactly one upstream attempt

pub mod timeouts;
