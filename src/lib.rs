//! ddfkit - Loader for DDF game-content definition files
//!
//! This crate re-exports all layers of the ddfkit system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: ddf_loader     — Per-kind entry readers, cleanup pass, top-level loader
//! Layer 2: ddf_parse      — Tokenizer, reading loop, field dispatch, state parsing
//! Layer 1: ddf_tables     — Record types, registries, state table, BOOM decoders
//! Layer 0: ddf_foundation — Errors, severity policy, DDF name comparison
//! ```

pub use ddf_foundation as foundation;
pub use ddf_loader as loader;
pub use ddf_parse as parse;
pub use ddf_tables as tables;
