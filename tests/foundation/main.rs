//! Integration tests for Layer 0: Foundation
//!
//! Tests for errors, the severity policy, and definition-name comparison.

mod errors;
mod names;
mod policy;
