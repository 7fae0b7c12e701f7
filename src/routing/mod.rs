//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request path
//!     → mount.rs (segment-aware prefix match against the live config)
//!     → Return: Mount::{Logout, Auth, Passthrough} or no match
//! ```
//!
//! # Design Decisions
//! - Mounts are read from the live config, so a reload can move them
//! - Prefixes match on whole segments (`/api` never matches `/apis`)
//! - Deterministic order: logout, auth, passthrough

pub mod mount;

pub use mount::Mount;
