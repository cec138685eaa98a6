//! End-to-end tests
//!
//! Multi-source loads through the full stack: parsing, record building,
//! cross-reference cleanup, and post-load queries.

mod directives;
mod severity;
mod world;
