//! Upstream HTTP client.
//!
//! A single pooled client is shared by both proxies. It supports https
//! upstreams and streams response bodies back without buffering.

pub mod client;

pub use client::UpstreamClient;
