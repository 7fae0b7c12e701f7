//! Network layer subsystem.
//!
//! Plain TCP listeners are bound directly in `main`; this module only
//! carries what TLS termination needs.

pub mod tls;
