//! Per-kind entry readers and the top-level loader for ddfkit.
//!
//! This crate provides:
//! - Entry readers for things, attacks, weapons, sounds, lines and sectors
//! - [`cleanup`] - The cross-reference resolution pass
//! - [`Loader`] - Owns every registry and drives whole-source loads

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod attacks;
pub mod cleanup;
pub mod fields;
pub mod lines;
pub mod load;
pub mod sectors;
pub mod sounds;
pub mod things;
pub mod weapons;

pub use attacks::AttackReader;
pub use cleanup::cleanup_all;
pub use lines::LineReader;
pub use load::Loader;
pub use sectors::SectorReader;
pub use sounds::SoundReader;
pub use things::ThingReader;
pub use weapons::WeaponReader;
