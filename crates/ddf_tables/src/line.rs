//! Linedef type definitions: triggered floor/ceiling movers, doors,
//! lifts, teleporters and friends.

use bitflags::bitflags;

use crate::base::{Checksum, RecordBase, RefSlot};
use crate::common::{LightEffect, SoundRef, UNSET_FLOAT, WhenAppear};

/// How a line type is activated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TriggerKind {
    /// Not activatable.
    #[default]
    None,
    /// Crossed by a mover.
    Walkable,
    /// Used (switch-style).
    Pushable,
    /// Shot by a hitscan attack.
    Shootable,
    /// Pushed against directly (manual doors).
    Manual,
}

bitflags! {
    /// Who may activate a line.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct ActivatorFlags: u32 {
        /// Players.
        const PLAYER  = 1 << 0;
        /// Monsters.
        const MONSTER = 1 << 1;
        /// Projectiles and other objects.
        const OTHER   = 1 << 2;
        /// Disallow bots even when players are allowed.
        const NO_BOT  = 1 << 3;
    }
}

bitflags! {
    /// Keys required to activate a locked line.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct KeyFlags: u32 {
        /// Red keycard.
        const RED_CARD     = 1 << 0;
        /// Blue keycard.
        const BLUE_CARD    = 1 << 1;
        /// Yellow keycard.
        const YELLOW_CARD  = 1 << 2;
        /// Green keycard.
        const GREEN_CARD   = 1 << 3;
        /// Red skull key.
        const RED_SKULL    = 1 << 4;
        /// Blue skull key.
        const BLUE_SKULL   = 1 << 5;
        /// Yellow skull key.
        const YELLOW_SKULL = 1 << 6;
        /// Green skull key.
        const GREEN_SKULL  = 1 << 7;
        /// Require every listed key, not just one.
        const STRICTLY_ALL = 1 << 8;
        /// Cards and skulls of a colour are interchangeable.
        const CARD_SKULL_EQUIV = 1 << 9;
    }
}

impl KeyFlags {
    /// Any card or skull.
    #[must_use]
    pub fn any() -> Self {
        Self::RED_CARD
            | Self::BLUE_CARD
            | Self::YELLOW_CARD
            | Self::RED_SKULL
            | Self::BLUE_SKULL
            | Self::YELLOW_SKULL
    }
}

/// What a moving plane's destination height is measured against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeightBase {
    /// Absolute map height.
    #[default]
    Absolute,
    /// The triggering sector's own height.
    Current,
    /// Heights of surrounding sectors.
    Surrounding,
    /// Height of the lowest lower texture on the line.
    LowestLowTexture,
}

/// Destination-height reference for a moving plane.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeightRef {
    /// What the height is measured against.
    pub base: HeightBase,
    /// Measure against ceilings instead of floors.
    pub ceiling: bool,
    /// Take the highest rather than lowest matching height.
    pub highest: bool,
    /// Take the next height past the current one.
    pub next: bool,
    /// Include the triggering sector itself in the search.
    pub include: bool,
}

impl HeightRef {
    /// Shorthand constructor.
    #[must_use]
    pub fn of(base: HeightBase) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }

    /// Builder: measure against ceilings.
    #[must_use]
    pub fn ceiling(mut self) -> Self {
        self.ceiling = true;
        self
    }

    /// Builder: take the highest matching height.
    #[must_use]
    pub fn highest(mut self) -> Self {
        self.highest = true;
        self
    }

    /// Builder: take the next height past the current one.
    #[must_use]
    pub fn next(mut self) -> Self {
        self.next = true;
        self
    }

    /// Builder: include the triggering sector.
    #[must_use]
    pub fn include(mut self) -> Self {
        self.include = true;
        self
    }
}

/// Movement pattern of a plane mover.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MoveType {
    /// No movement configured.
    #[default]
    Undefined,
    /// Move once to the destination and stay.
    Once,
    /// Move, wait, return (doors, lifts).
    MoveWaitReturn,
    /// Move back and forth forever.
    Continuous,
    /// Plat-style movement.
    Plat,
    /// Build stairs in steps.
    Stairs,
    /// Toggle between two heights.
    Toggle,
}

/// A moving floor or ceiling attached to a line or sector type.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneMover {
    /// Movement pattern.
    pub kind: MoveType,
    /// True for the ceiling plane.
    pub is_ceiling: bool,
    /// Upward speed in units per tic (negative = instant).
    pub speed_up: f32,
    /// Downward speed in units per tic (negative = instant).
    pub speed_down: f32,
    /// Destination height reference.
    pub destref: HeightRef,
    /// Offset from the destination reference.
    pub dest: f32,
    /// Secondary height reference (continuous movers).
    pub otherref: HeightRef,
    /// Offset from the secondary reference.
    pub other: f32,
    /// Damage per crush, 0 for no crushing.
    pub crush_damage: i32,
    /// Flat to change to, `+`/`-` for model-based changes.
    pub tex: String,
    /// Tics to wait before returning.
    pub wait: i32,
    /// Tics to wait before starting.
    pub prewait: i32,
    /// Sound on starting.
    pub sfx_start: SoundRef,
    /// Sound while moving up.
    pub sfx_up: SoundRef,
    /// Sound while moving down.
    pub sfx_down: SoundRef,
    /// Sound on stopping.
    pub sfx_stop: SoundRef,
    /// Scroll angle applied to the moved flat.
    pub scroll_angle: f32,
    /// Scroll speed applied to the moved flat.
    pub scroll_speed: f32,
    /// Do not change textures even when a model sector exists.
    pub ignore_texture: bool,
}

impl PlaneMover {
    /// Default state for a floor mover on a line type.
    #[must_use]
    pub fn floor_default() -> Self {
        Self {
            kind: MoveType::Undefined,
            is_ceiling: false,
            speed_up: -1.0,
            speed_down: -1.0,
            destref: HeightRef::of(HeightBase::Absolute),
            dest: 0.0,
            otherref: HeightRef::of(HeightBase::Surrounding).highest().include(),
            other: 0.0,
            crush_damage: 0,
            tex: String::new(),
            wait: 0,
            prewait: 0,
            sfx_start: RefSlot::Empty,
            sfx_up: RefSlot::Empty,
            sfx_down: RefSlot::Empty,
            sfx_stop: RefSlot::Empty,
            scroll_angle: 0.0,
            scroll_speed: 0.0,
            ignore_texture: false,
        }
    }

    /// Default state for a ceiling mover on a line type.
    #[must_use]
    pub fn ceiling_default() -> Self {
        Self {
            is_ceiling: true,
            otherref: HeightRef::of(HeightBase::Current).ceiling(),
            ..Self::floor_default()
        }
    }
}

/// Donut effect (lower inner pool, raise outer ring).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Donut {
    /// Effect enabled.
    pub enabled: bool,
    /// Sound for the rising part.
    pub in_sfx: SoundRef,
    /// Stop sound for the rising part.
    pub in_sfx_stop: SoundRef,
    /// Sound for the lowering part.
    pub out_sfx: SoundRef,
    /// Stop sound for the lowering part.
    pub out_sfx_stop: SoundRef,
}

/// Teleporter configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Teleport {
    /// Effect enabled.
    pub enabled: bool,
    /// Tics of post-teleport freeze.
    pub delay: i32,
    /// Effect object spawned at the departure point.
    pub in_effect: RefSlot,
    /// Effect object spawned at the arrival point.
    pub out_effect: RefSlot,
    /// Arrival preserves the traveller's orientation.
    pub same_dir: bool,
    /// Teleport relative to the line rather than to a spot.
    pub line_based: bool,
}

impl Default for Teleport {
    fn default() -> Self {
        Self {
            enabled: false,
            delay: 0,
            in_effect: RefSlot::Empty,
            out_effect: RefSlot::Empty,
            same_dir: false,
            line_based: false,
        }
    }
}

/// A linedef type definition.
#[derive(Debug, Clone, PartialEq)]
pub struct LineRecord {
    /// Shared identity; line types are keyed by number.
    pub base: RecordBase,
    /// Replacement trigger number applied after activation.
    pub newtrignum: i32,
    /// Activation mechanism.
    pub trigger: TriggerKind,
    /// Who may activate the line.
    pub obj: ActivatorFlags,
    /// Keys required.
    pub keys: KeyFlags,
    /// Uses remaining; -1 for unlimited.
    pub count: i32,
    /// Message shown when activation fails for lack of keys.
    pub failedmessage: String,
    /// Sound played when activation fails.
    pub failed_sfx: SoundRef,
    /// Floor mover.
    pub floor: PlaneMover,
    /// Ceiling mover.
    pub ceil: PlaneMover,
    /// Donut effect.
    pub donut: Donut,
    /// Teleporter.
    pub teleport: Teleport,
    /// Light effect applied to tagged sectors.
    pub light: LightEffect,
    /// Gravity override for tagged sectors ([`UNSET_FLOAT`] when unset).
    pub gravity: f32,
    /// Friction override for tagged sectors ([`UNSET_FLOAT`] when unset).
    pub friction: f32,
    /// When-appear restrictions.
    pub appear: WhenAppear,
}

impl Default for LineRecord {
    fn default() -> Self {
        Self {
            base: RecordBase::default(),
            newtrignum: 0,
            trigger: TriggerKind::None,
            obj: ActivatorFlags::empty(),
            keys: KeyFlags::empty(),
            count: -1,
            failedmessage: String::new(),
            failed_sfx: RefSlot::Empty,
            floor: PlaneMover::floor_default(),
            ceil: PlaneMover::ceiling_default(),
            donut: Donut::default(),
            teleport: Teleport::default(),
            light: LightEffect::default(),
            gravity: UNSET_FLOAT,
            friction: UNSET_FLOAT,
            appear: WhenAppear::default(),
        }
    }
}

impl LineRecord {
    /// Computes the checksum of a finished record.
    #[must_use]
    pub fn compute_crc(&self) -> u32 {
        let mut ck = Checksum::new();
        self.base.add_to(&mut ck);
        ck.add_i32(self.trigger as i32);
        ck.add_i32(self.obj.bits() as i32);
        ck.add_i32(self.keys.bits() as i32);
        ck.add_i32(self.count);
        ck.add_i32(self.floor.kind as i32);
        ck.add_f32(self.floor.dest);
        ck.add_i32(self.ceil.kind as i32);
        ck.add_f32(self.ceil.dest);
        ck.value()
    }
}

impl crate::registry::Record for LineRecord {
    const KIND: &'static str = "line type";

    fn base(&self) -> &RecordBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RecordBase {
        &mut self.base
    }
}
