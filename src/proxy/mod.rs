//! Proxy subsystem.
//!
//! # Data Flow
//! ```text
//! Passthrough mount:
//!     OPTIONS → local 204 (preflight)
//!     else    → target.rs (base + path + filtered query)
//!             → outbound.rs (Content-Type, API key, client Authorization)
//!             → upstream client (one attempt, bounded wait for head)
//!             → status + headers + streamed body, CORS attached
//!
//! Auth mount:
//!     endpoint → target.rs (namespace + endpoint)
//!             → upstream client
//!             → envelope.rs (Success relayed / Failure re-wrapped)
//!             → actions.rs (per-endpoint side effects, e.g. session cookie)
//! ```
//!
//! # Design Decisions
//! - Stateless: nothing is shared between requests except the client pool
//! - Bodies are byte-transparent in both directions on the passthrough
//! - No retries; the caller owns retry policy

pub mod actions;
pub mod auth;
pub mod envelope;
pub mod outbound;
pub mod passthrough;
pub mod target;
