//! Sector type definitions: lighting, damage, pushers and movers that act
//! on any sector carrying the type number.

use bitflags::bitflags;

use crate::base::{Checksum, RecordBase, RefSlot};
use crate::common::{Damage, LightEffect, SoundRef, UNSET_FLOAT, WhenAppear};
use crate::line::PlaneMover;

/// Exit triggered on entering the sector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExitKind {
    /// No exit.
    #[default]
    None,
    /// Normal level exit.
    Normal,
    /// Secret level exit.
    Secret,
}

bitflags! {
    /// Sector special flags.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct SectorFlags: u32 {
        /// Pushes even airborne things.
        const WHOLE_REGION  = 1 << 0;
        /// Push force is proportional to proximity.
        const PROPORTIONAL  = 1 << 1;
        /// Push applies to players only.
        const PUSH_ALL      = 1 << 2;
        /// Damage ignores armour.
        const NO_ARMOUR     = 1 << 3;
        /// Sector effects apply below a liquid surface only.
        const UNDERWATER    = 1 << 4;
        /// Sustained damage (no delay reset on leaving).
        const PERSISTENT    = 1 << 5;
    }
}

/// A sector type definition.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorRecord {
    /// Shared identity; sector types are keyed by number.
    pub base: RecordBase,
    /// Entering counts as finding a secret.
    pub secret: bool,
    /// Sector is a hub exit.
    pub hub: bool,
    /// Special flags.
    pub special_flags: SectorFlags,
    /// Light effect.
    pub light: LightEffect,
    /// Exit behavior.
    pub exit: ExitKind,
    /// Gravity within the sector ([`UNSET_FLOAT`] when unset).
    pub gravity: f32,
    /// Friction within the sector ([`UNSET_FLOAT`] when unset).
    pub friction: f32,
    /// Viscosity within the sector ([`UNSET_FLOAT`] when unset).
    pub viscosity: f32,
    /// Drag within the sector ([`UNSET_FLOAT`] when unset).
    pub drag: f32,
    /// Ambient sound.
    pub ambient_sfx: SoundRef,
    /// Splash sound.
    pub splash_sfx: SoundRef,
    /// When-appear restrictions.
    pub appear: WhenAppear,
    /// Constant push direction in degrees.
    pub push_angle: f32,
    /// Constant push speed.
    pub push_speed: f32,
    /// Constant vertical push speed.
    pub push_zspeed: f32,
    /// Periodic damage dealt to occupants.
    pub damage: Damage,
    /// Automatic floor mover.
    pub floor: PlaneMover,
    /// Automatic ceiling mover.
    pub ceil: PlaneMover,
}

impl Default for SectorRecord {
    fn default() -> Self {
        Self {
            base: RecordBase::default(),
            secret: false,
            hub: false,
            special_flags: SectorFlags::empty(),
            light: LightEffect::default(),
            exit: ExitKind::None,
            gravity: UNSET_FLOAT,
            friction: UNSET_FLOAT,
            viscosity: UNSET_FLOAT,
            drag: UNSET_FLOAT,
            ambient_sfx: RefSlot::Empty,
            splash_sfx: RefSlot::Empty,
            appear: WhenAppear::default(),
            push_angle: 0.0,
            push_speed: 0.0,
            push_zspeed: 0.0,
            damage: Damage::default(),
            floor: PlaneMover::floor_default(),
            ceil: PlaneMover::ceiling_default(),
        }
    }
}

impl SectorRecord {
    /// Computes the checksum of a finished record.
    #[must_use]
    pub fn compute_crc(&self) -> u32 {
        let mut ck = Checksum::new();
        self.base.add_to(&mut ck);
        ck.add_i32(i32::from(self.secret));
        ck.add_i32(self.light.kind as i32);
        ck.add_i32(self.light.darktime);
        ck.add_i32(self.light.brighttime);
        self.damage.add_to(&mut ck);
        ck.value()
    }
}

impl crate::registry::Record for SectorRecord {
    const KIND: &'static str = "sector type";

    fn base(&self) -> &RecordBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RecordBase {
        &mut self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::LightType;

    #[test]
    fn default_is_inert() {
        let sec = SectorRecord::default();
        assert!(!sec.secret);
        assert_eq!(sec.light.kind, LightType::None);
        assert_eq!(sec.damage.nominal, 0.0);
        assert!(crate::common::float_is_unset(sec.gravity));
        assert_eq!(sec, SectorRecord::default());
    }
}
