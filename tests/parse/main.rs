//! Integration tests for Layer 2: Parsing
//!
//! Tests for the reading loop, value scanners, and macro expansion.

mod macros;
mod reading_loop;
mod robustness;
mod scanners;
