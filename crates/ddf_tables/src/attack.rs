//! Attack definitions: how monsters and weapons deal damage.

use bitflags::bitflags;

use crate::base::{Checksum, RecordBase, RefSlot};
use crate::common::{Damage, LabelOffset, SoundRef};

/// Top-level style of an attack.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttackStyle {
    /// Unset; fatal if still unset when the entry finishes (lax: NONE).
    #[default]
    None,
    /// Launch a projectile thing.
    Projectile,
    /// Spawn a helper object.
    Spawner,
    /// Spawn three helper objects.
    TripleSpawner,
    /// Fixed-pattern projectile spread.
    FixedSpreader,
    /// Randomised projectile spread.
    RandomSpreader,
    /// Hitscan shot.
    Shot,
    /// Homing projectile.
    Tracker,
    /// Melee strike.
    CloseCombat,
    /// Fire at a map spot object.
    ShootToSpot,
    /// Charge at the target.
    SkullFly,
    /// Projectile that avoids friendly fire.
    SmartProjectile,
    /// Damage everything in an arc.
    Spray,
}

impl AttackStyle {
    /// Every style, in source order, paired with its content name.
    pub const NAMES: &'static [(&'static str, AttackStyle)] = &[
        ("NONE", Self::None),
        ("PROJECTILE", Self::Projectile),
        ("SPAWNER", Self::Spawner),
        ("TRIPLE_SPAWNER", Self::TripleSpawner),
        ("FIXED_SPREADER", Self::FixedSpreader),
        ("RANDOM_SPREADER", Self::RandomSpreader),
        ("SHOT", Self::Shot),
        ("TRACKER", Self::Tracker),
        ("CLOSECOMBAT", Self::CloseCombat),
        ("SHOOTTOSPOT", Self::ShootToSpot),
        ("SKULLFLY", Self::SkullFly),
        ("SMARTPROJECTILE", Self::SmartProjectile),
        ("SPRAY", Self::Spray),
    ];
}

bitflags! {
    /// Attack special flags.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct AttackFlags: u32 {
        /// Leave a smoke trail behind tracers.
        const TRACE_SMOKE       = 1 << 0;
        /// Kill (not remove) spawned objects that do not fit.
        const KILL_FAILED_SPAWN = 1 << 1;
        /// Spawn objects ahead of the attacker.
        const PRESTEP_SPAWN     = 1 << 2;
        /// Spawned objects telefrag whatever occupies their spot.
        const SPAWN_TELEFRAGS   = 1 << 3;
        /// Attack requires line of sight.
        const NEED_SIGHT        = 1 << 4;
        /// Turn to face the target before attacking.
        const FACE_TARGET       = 1 << 5;
        /// Treat the attacker as a player attack.
        const PLAYER            = 1 << 6;
        /// Always aim directly at the target.
        const FORCE_AIM         = 1 << 7;
        /// Spawn objects inherit the attack angle.
        const ANGLED_SPAWN      = 1 << 8;
        /// Projectiles do not activate shoot-trigger lines.
        const NO_TRIGGER_LINES  = 1 << 9;
        /// Monsters cannot hear this attack.
        const SILENT_TO_MONSTERS = 1 << 10;
        /// Victims do not acquire the attacker as a target.
        const NO_TARGET         = 1 << 11;
        /// Damage dealt heals the attacker.
        const VAMPIRE           = 1 << 12;
    }
}

/// An attack definition.
#[derive(Debug, Clone, PartialEq)]
pub struct AttackRecord {
    /// Shared identity.
    pub base: RecordBase,
    /// Top-level style.
    pub style: AttackStyle,
    /// Special flags.
    pub flags: AttackFlags,
    /// Sound on attempting the attack.
    pub init_sound: SoundRef,
    /// Sound while the attack runs.
    pub sound: SoundRef,
    /// Vertical aim error.
    pub accuracy_slope: f32,
    /// Horizontal aim error in degrees.
    pub accuracy_angle: f32,
    /// Horizontal launch offset.
    pub xoffset: f32,
    /// Vertical launch offset.
    pub yoffset: f32,
    /// Fixed angle offset in degrees.
    pub angle_offset: f32,
    /// Fixed slope offset.
    pub slope_offset: f32,
    /// Maximum turn per tic for trackers, in degrees.
    pub trace_angle: f32,
    /// Forward speed imparted by charge attacks.
    pub assault_speed: f32,
    /// Launch height above the attacker's feet.
    pub height: f32,
    /// Maximum range.
    pub range: f32,
    /// Number of shots per use.
    pub count: i32,
    /// Range below which the attack is withheld.
    pub tooclose: i32,
    /// Damage multiplier while the player is berserk.
    pub berserk_mul: f32,
    /// Chance the tracer stops homing.
    pub notracechance: f32,
    /// Chance of continuing to fire each tic.
    pub keepfirechance: f32,
    /// Damage dealt.
    pub damage: Damage,
    /// Attack class bitset, used by immunity/resistance matching.
    pub attack_class: u32,
    /// Companion thing launched or spawned by the attack.
    pub mobj: RefSlot,
    /// Object created by spawner attacks.
    pub spawnedobj: RefSlot,
    /// Raw `label:offset` text for the spawned object's initial state.
    pub objinitstate_ref: String,
    /// Resolved initial state of the spawned object.
    pub objinitstate: usize,
    /// Maximum live spawned objects, 0 for unlimited.
    pub spawn_limit: i32,
    /// Impact puff object.
    pub puff: RefSlot,
}

impl Default for AttackRecord {
    fn default() -> Self {
        Self {
            base: RecordBase::default(),
            style: AttackStyle::None,
            flags: AttackFlags::empty(),
            init_sound: RefSlot::Empty,
            sound: RefSlot::Empty,
            accuracy_slope: 0.0,
            accuracy_angle: 0.0,
            xoffset: 0.0,
            yoffset: 0.0,
            angle_offset: 0.0,
            slope_offset: 0.0,
            trace_angle: 270.0 / 16.0,
            assault_speed: 0.0,
            height: 0.0,
            range: 0.0,
            count: 0,
            tooclose: 0,
            berserk_mul: 1.0,
            notracechance: 0.0,
            keepfirechance: 0.0,
            damage: Damage::default(),
            attack_class: 0,
            mobj: RefSlot::Empty,
            spawnedobj: RefSlot::Empty,
            objinitstate_ref: String::new(),
            objinitstate: 0,
            spawn_limit: 0,
            puff: RefSlot::Empty,
        }
    }
}

impl AttackRecord {
    /// Computes the checksum of a finished record.
    #[must_use]
    pub fn compute_crc(&self) -> u32 {
        let mut ck = Checksum::new();
        self.base.add_to(&mut ck);
        ck.add_i32(self.style as i32);
        ck.add_i32(self.flags.bits() as i32);
        ck.add_f32(self.range);
        ck.add_f32(self.height);
        ck.add_i32(self.count);
        self.damage.add_to(&mut ck);
        ck.value()
    }

    /// The state-director form of `SPAWN_OBJECT_STATE`, parsed lazily.
    #[must_use]
    pub fn objinitstate_director(&self) -> Option<LabelOffset> {
        if self.objinitstate_ref.is_empty() {
            return None;
        }
        let (label, offset) = match self.objinitstate_ref.split_once(':') {
            Some((l, o)) => (l, o.trim().parse::<usize>().unwrap_or(1).saturating_sub(1)),
            None => (self.objinitstate_ref.as_str(), 0),
        };
        Some(LabelOffset {
            label: label.trim().to_string(),
            offset,
        })
    }
}

impl crate::registry::Record for AttackRecord {
    const KIND: &'static str = "attack";

    fn base(&self) -> &RecordBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RecordBase {
        &mut self.base
    }
}
