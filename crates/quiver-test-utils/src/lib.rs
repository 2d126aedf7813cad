#![deny(unsafe_code)]

//! Shared test utilities for the quiver workspace.
//!
//! Provides fake strategies, engine and config builders, and tracing
//! helpers so that individual crate tests stay concise and consistent.
//!
//! Add this crate as a `[dev-dependency]` in any workspace member:
//!
//! ```toml
//! [dev-dependencies]
//! quiver-test-utils = { workspace = true }
//! ```

pub mod config;
pub mod engine;
pub mod fixtures;
pub mod tracing_setup;
