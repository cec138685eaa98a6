//! Core error types, name comparison, and diagnostics policy for ddfkit.
//!
//! This crate provides:
//! - [`Error`] - Rich error types with load-position context
//! - [`DiagPolicy`] - Strict/lax severity escalation rules
//! - [`cmp_names`] / [`names_equal`] - Definition-name comparison

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod diag;
pub mod error;
pub mod name;

pub use diag::{DiagPolicy, MAX_VERSION, MIN_VERSION, OBSOLETE_VERSION};
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use name::{cmp_names, names_equal};
