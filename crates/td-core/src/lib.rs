//! # td-core
//!
//! Core types and error definitions for tradingdate-rs.
//!
//! This crate provides the foundational pieces shared by the other crates in
//! the workspace: the error hierarchy, the process-wide `Settings`, and the
//! helpers that turn raw `yyyymmdd` integers and strings into
//! `(year, month, day)` triples and back.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types and the `ensure!` / `mismatch!` macros.
pub mod errors;

/// Global library settings (default calendar, provider seeding window).
pub mod settings;

/// Date text parsing and formatting.
pub mod utilities;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{Error, Result};
pub use settings::Settings;
