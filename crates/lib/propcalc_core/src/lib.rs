//! # propcalc_core
//!
//! Core domain types for the PropCalc admin console: resource records,
//! roles, the persisted session store, form validation and display
//! formatting.

pub mod config;
pub mod format;
pub mod models;
pub mod roles;
pub mod serde_util;
pub mod session;
pub mod validation;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
