//! Definition tables for ddfkit: record types, ordered registries, the
//! shared state table, and the generalized (BOOM) type decoders.
//!
//! This crate provides:
//! - [`Registry`] - Ordered, override-aware definition stores
//! - [`StateTable`] - The shared action-state table and label resolution
//! - Record types for things, attacks, weapons, sounds, lines and sectors
//! - [`boom`] - Decoders that expand packed generalized type numbers

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod attack;
pub mod base;
pub mod boom;
pub mod common;
pub mod line;
pub mod registry;
pub mod sector;
pub mod sound;
pub mod states;
pub mod thing;
pub mod weapon;

pub use attack::{AttackFlags, AttackRecord, AttackStyle};
pub use base::{Checksum, RecordBase, RefSlot};
pub use boom::{GenCache, is_gen_line, is_gen_sector, make_gen_line, make_gen_sector};
pub use common::{
    Damage, DynamicLight, DynamicLightType, LabelOffset, LightEffect, LightType, SoundRef,
    UNSET_FLOAT, WhenAppear, float_is_unset,
};
pub use line::{
    ActivatorFlags, Donut, HeightBase, HeightRef, KeyFlags, LineRecord, MoveType, PlaneMover,
    Teleport, TriggerKind,
};
pub use registry::{Record, Registry};
pub use sector::{ExitKind, SectorFlags, SectorRecord};
pub use sound::SoundRecord;
pub use states::{
    ActionArg, NULL_STATE, RangeBuilder, SpriteNames, State, StateAction, StateGroup, StateLink,
    StateRange, StateTable, group_has_state,
};
pub use thing::{GlowType, SpriteYAlign, ThingFlags, ThingRecord, ThingStates};
pub use weapon::{Ammo, AttackSlot, WeaponFlags, WeaponRecord};
