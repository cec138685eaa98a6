//! Sub-structures shared by several definition kinds.

use crate::base::{Checksum, RefSlot};

/// Sentinel for float fields with no assigned value.
///
/// Deliberately finite so records stay comparable with `==`; no real
/// gravity or friction value lands on it.
pub const UNSET_FLOAT: f32 = 3.180_819_8;

/// Whether a float field still holds [`UNSET_FLOAT`].
#[must_use]
pub fn float_is_unset(value: f32) -> bool {
    value == UNSET_FLOAT
}

/// A state label plus offset, e.g. `DOWN:3`.
///
/// Used wherever a definition points into another definition's frames;
/// the referred-to chain is found by the cleanup pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelOffset {
    /// Label name, empty when unset.
    pub label: String,
    /// 0-based offset from the labelled state.
    pub offset: usize,
}

impl LabelOffset {
    /// Whether a label was given.
    #[must_use]
    pub fn is_set(&self) -> bool {
        !self.label.is_empty()
    }
}

/// Damage characteristics of an attack, sector floor, or explosion.
#[derive(Debug, Clone, PartialEq)]
pub struct Damage {
    /// Nominal damage amount.
    pub nominal: f32,
    /// Upper bound for linearly distributed damage (negative = unset).
    pub linear_max: f32,
    /// Error margin for idealised damage (negative = unset).
    pub error: f32,
    /// Tics between damage applications.
    pub delay: i32,
    /// Override for the victim's pain chain.
    pub pain: LabelOffset,
    /// Override for the victim's death chain.
    pub death: LabelOffset,
    /// Override for the victim's overkill chain.
    pub overkill: LabelOffset,
    /// Obituary message reference.
    pub obituary: String,
    /// Bypasses armour entirely.
    pub no_armour: bool,
}

impl Default for Damage {
    fn default() -> Self {
        Self {
            nominal: 0.0,
            linear_max: -1.0,
            error: -1.0,
            delay: 0,
            pain: LabelOffset::default(),
            death: LabelOffset::default(),
            overkill: LabelOffset::default(),
            obituary: String::new(),
            no_armour: false,
        }
    }
}

impl Damage {
    /// Feeds the damage values into a checksum.
    pub fn add_to(&self, ck: &mut Checksum) {
        ck.add_f32(self.nominal);
        ck.add_f32(self.linear_max);
        ck.add_f32(self.error);
        ck.add_i32(self.delay);
    }
}

/// Kinds of dynamic sector/line lighting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LightType {
    /// No light effect.
    #[default]
    None,
    /// Set light to the given level.
    Set,
    /// Fade toward the given level.
    Fade,
    /// Strobe between dark and bright.
    Strobe,
    /// Random flashing.
    Flash,
    /// Smooth oscillation.
    Glow,
    /// Fire flicker.
    FireFlicker,
}

/// A dynamic lighting effect.
#[derive(Debug, Clone, PartialEq)]
pub struct LightEffect {
    /// Kind of effect.
    pub kind: LightType,
    /// Target light level.
    pub level: i32,
    /// Probability used by flashing effects.
    pub chance: f32,
    /// Tics spent dark.
    pub darktime: i32,
    /// Tics spent bright.
    pub brighttime: i32,
    /// Synchronisation period, 0 for unsynchronised.
    pub sync: i32,
    /// Level change per step for fades.
    pub step: i32,
}

impl Default for LightEffect {
    fn default() -> Self {
        Self {
            kind: LightType::None,
            level: 64,
            chance: 0.5,
            darktime: 0,
            brighttime: 0,
            sync: 0,
            step: 8,
        }
    }
}

/// A dynamic light attached to a thing.
#[derive(Debug, Clone, PartialEq)]
pub struct DynamicLight {
    /// Blending mode.
    pub kind: DynamicLightType,
    /// Light colour as packed RGB, `None` for colourless.
    pub colour: Option<u32>,
    /// Radius in map units.
    pub radius: f32,
    /// Light leaks through extrafloors.
    pub leaky: bool,
}

/// Blending mode of a dynamic light.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DynamicLightType {
    /// Disabled.
    #[default]
    None,
    /// Modulate surface colours.
    Modulate,
    /// Additive blending.
    Add,
}

impl Default for DynamicLight {
    fn default() -> Self {
        Self {
            kind: DynamicLightType::None,
            colour: None,
            radius: 32.0,
            leaky: false,
        }
    }
}

/// When-appear restrictions (skill levels and network modes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhenAppear(pub u32);

impl WhenAppear {
    /// Skill level bits 1-5.
    pub const SKILL_BITS: u32 = 0x001F;
    /// Single-player games.
    pub const SP: u32 = 0x0100;
    /// Cooperative games.
    pub const COOP: u32 = 0x0200;
    /// Deathmatch games.
    pub const DM: u32 = 0x0400;

    /// Appears everywhere (the default).
    #[must_use]
    pub fn all() -> Self {
        Self(Self::SKILL_BITS | Self::SP | Self::COOP | Self::DM)
    }

    /// Tests a skill level (1-5).
    #[must_use]
    pub fn on_skill(self, skill: u32) -> bool {
        skill >= 1 && skill <= 5 && self.0 & (1 << (skill - 1)) != 0
    }
}

impl Default for WhenAppear {
    fn default() -> Self {
        Self::all()
    }
}

/// A sound reference; resolution happens in the cleanup pass.
pub type SoundRef = RefSlot;
