//! Integration tests for Layer 3: Definition loading
//!
//! Drives the per-kind readers through the `Loader` facade and checks the
//! records they produce.

mod attacks_weapons;
mod numbered_types;
mod things;
