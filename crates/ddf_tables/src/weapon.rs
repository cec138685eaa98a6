//! Weapon definitions.

use bitflags::bitflags;

use crate::base::{Checksum, RecordBase, RefSlot};
use crate::common::SoundRef;
use crate::states::StateGroup;

/// Ammunition types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Ammo {
    /// Uses no ammunition.
    #[default]
    NoAmmo,
    /// Bullets.
    Bullet,
    /// Shotgun shells.
    Shell,
    /// Rockets.
    Rocket,
    /// Energy cells.
    Cell,
    /// Pellets.
    Pellet,
    /// Nails.
    Nail,
    /// Grenades.
    Grenade,
    /// Gas canisters.
    Gas,
}

impl Ammo {
    /// Content names for each ammo type.
    pub const NAMES: &'static [(&'static str, Ammo)] = &[
        ("NOAMMO", Self::NoAmmo),
        ("BULLETS", Self::Bullet),
        ("SHELLS", Self::Shell),
        ("ROCKETS", Self::Rocket),
        ("CELLS", Self::Cell),
        ("PELLETS", Self::Pellet),
        ("NAILS", Self::Nail),
        ("GRENADES", Self::Grenade),
        ("GAS", Self::Gas),
    ];
}

bitflags! {
    /// Weapon special flags (per attack slot).
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct WeaponFlags: u32 {
        /// Monsters cannot hear the weapon fire.
        const SILENT_TO_MONSTERS = 1 << 0;
        /// Idle animation keeps running.
        const ANIMATED    = 1 << 1;
        /// Switch away when out of ammo.
        const SWITCH_AWAY = 1 << 2;
        /// Fire key acts as a trigger for scripts.
        const TRIGGER     = 1 << 3;
        /// Reload automatically when the clip empties.
        const FRESH       = 1 << 4;
        /// Player must reload manually.
        const MANUAL      = 1 << 5;
        /// Can fire a partially filled clip.
        const PARTIAL     = 1 << 6;
    }
}

impl WeaponFlags {
    /// Default specials for the primary attack slot.
    #[must_use]
    pub fn primary_default() -> Self {
        Self::SWITCH_AWAY | Self::PARTIAL
    }

    /// Default specials for the secondary attack slot.
    #[must_use]
    pub fn secondary_default() -> Self {
        Self::PARTIAL
    }
}

/// Per-attack-slot configuration; weapons have a primary and a secondary.
#[derive(Debug, Clone, PartialEq)]
pub struct AttackSlot {
    /// The attack fired by this slot.
    pub attack: RefSlot,
    /// Ammunition consumed.
    pub ammo: Ammo,
    /// Ammo consumed per shot; 0 means free firing.
    pub ammopershot: i32,
    /// Clip capacity, 0 for no clip.
    pub clip_size: i32,
    /// Fires continuously while the key is held.
    pub autofire: bool,
    /// Special flags.
    pub specials: WeaponFlags,
    /// First state of the attack chain.
    pub attack_state: usize,
    /// First state of the reload chain.
    pub reload_state: usize,
    /// First state of the discard chain.
    pub discard_state: usize,
    /// First state of the warmup chain.
    pub warmup_state: usize,
    /// First state of the muzzle-flash chain.
    pub flash_state: usize,
}

impl AttackSlot {
    fn new(specials: WeaponFlags) -> Self {
        Self {
            attack: RefSlot::Empty,
            ammo: Ammo::NoAmmo,
            ammopershot: 0,
            clip_size: 0,
            autofire: false,
            specials,
            attack_state: 0,
            reload_state: 0,
            discard_state: 0,
            warmup_state: 0,
            flash_state: 0,
        }
    }
}

/// A weapon definition.
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponRecord {
    /// Shared identity.
    pub base: RecordBase,
    /// Primary attack slot.
    pub primary: AttackSlot,
    /// Secondary attack slot.
    pub secondary: AttackSlot,
    /// Attack fired for ejecting casings.
    pub eject_attack: RefSlot,
    /// Given to the player automatically.
    pub autogive: bool,
    /// Keyboard slot binding.
    pub bind_key: i32,
    /// Selection priority; higher is preferred.
    pub priority: i32,
    /// Never auto-selected (e.g. explosives).
    pub dangerous: bool,
    /// Weapon this one replaces when acquired.
    pub upgrades: RefSlot,
    /// Recoil impulse.
    pub kick: f32,
    /// Field of view while zoomed, in degrees (0 = no zoom).
    pub zoom_fov: f32,
    /// Refiring reduces accuracy.
    pub refire_inaccurate: bool,
    /// Show clip contents on the HUD.
    pub show_clip: bool,
    /// Both attacks draw from the primary clip.
    pub shared_clip: bool,
    /// No thrust imparted to targets.
    pub nothrust: bool,
    /// Give feedback thrust to the wielder.
    pub feedback: bool,
    /// View bobbing amount.
    pub bobbing: f32,
    /// Weapon sway amount.
    pub swaying: f32,
    /// Tics between idle animations.
    pub idle_wait: i32,
    /// Chance of playing the idle animation.
    pub idle_chance: f32,

    /// Sound while idle.
    pub idle_sound: SoundRef,
    /// Sound while engaged.
    pub engaged_sound: SoundRef,
    /// Sound on hitting a target.
    pub hit_sound: SoundRef,
    /// Sound on raising the weapon.
    pub start_sound: SoundRef,

    /// First state of the raise chain.
    pub up_state: usize,
    /// First state of the lower chain.
    pub down_state: usize,
    /// First state of the ready chain.
    pub ready_state: usize,
    /// First state of the out-of-ammo chain.
    pub empty_state: usize,
    /// First state of the idle chain.
    pub idle_state: usize,
    /// Crosshair chain.
    pub crosshair_state: usize,
    /// Zoom overlay chain.
    pub zoom_state: usize,
    /// State ranges owned by this definition.
    pub state_group: StateGroup,
}

impl Default for WeaponRecord {
    fn default() -> Self {
        Self {
            base: RecordBase::default(),
            primary: AttackSlot::new(WeaponFlags::primary_default()),
            secondary: AttackSlot::new(WeaponFlags::secondary_default()),
            eject_attack: RefSlot::Empty,
            autogive: false,
            bind_key: -1,
            priority: 0,
            dangerous: false,
            upgrades: RefSlot::Empty,
            kick: 0.0,
            zoom_fov: 0.0,
            refire_inaccurate: false,
            show_clip: false,
            shared_clip: false,
            nothrust: false,
            feedback: false,
            bobbing: 1.0,
            swaying: 1.0,
            idle_wait: 15 * 35,
            idle_chance: 0.12,
            idle_sound: RefSlot::Empty,
            engaged_sound: RefSlot::Empty,
            hit_sound: RefSlot::Empty,
            start_sound: RefSlot::Empty,
            up_state: 0,
            down_state: 0,
            ready_state: 0,
            empty_state: 0,
            idle_state: 0,
            crosshair_state: 0,
            zoom_state: 0,
            state_group: StateGroup::new(),
        }
    }
}

impl WeaponRecord {
    /// Mutable access to an attack slot by index (0 primary, 1 secondary).
    pub fn slot_mut(&mut self, idx: usize) -> &mut AttackSlot {
        if idx == 0 {
            &mut self.primary
        } else {
            &mut self.secondary
        }
    }

    /// Computes the checksum of a finished record.
    #[must_use]
    pub fn compute_crc(&self) -> u32 {
        let mut ck = Checksum::new();
        self.base.add_to(&mut ck);
        for slot in [&self.primary, &self.secondary] {
            ck.add_i32(slot.ammo as i32);
            ck.add_i32(slot.ammopershot);
            ck.add_i32(slot.clip_size);
            ck.add_i32(slot.specials.bits() as i32);
            ck.add_i32(slot.attack_state as i32);
        }
        ck.add_i32(self.priority);
        ck.add_f32(self.kick);
        ck.add_i32(self.ready_state as i32);
        ck.value()
    }
}

impl crate::registry::Record for WeaponRecord {
    const KIND: &'static str = "weapon";

    fn base(&self) -> &RecordBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RecordBase {
        &mut self.base
    }
}
