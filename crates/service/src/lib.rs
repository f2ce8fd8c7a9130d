//! Medical risk prediction service
//!
//! HTTP surface and configuration for the dual-model inference API. The
//! binary in `main.rs` wires these together; integration tests drive the
//! router directly.

pub mod api;
pub mod config;
