//! Integration tests for Layer 1: Definition tables
//!
//! Tests for registries holding real record types, the shared state table,
//! and the generalized type decoders.

mod generalized;
mod registries;
mod state_chains;
