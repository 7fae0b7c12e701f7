//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!     → spans.rs (per-request spans carrying the request ID)
//!
//! Consumers:
//!     → stdout
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields, not formatted strings
//! - Request ID flows through every span
//! - Credentials are never logged in full

pub mod logging;
pub mod metrics;
pub mod spans;
