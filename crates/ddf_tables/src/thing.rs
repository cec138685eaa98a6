//! Map-object ("thing") definitions: monsters, items, scenery, players.

use bitflags::bitflags;

use crate::base::{Checksum, RecordBase, RefSlot};
use crate::common::{Damage, DynamicLight, SoundRef, WhenAppear};
use crate::states::StateGroup;

bitflags! {
    /// Core behavior flags.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct ThingFlags: u32 {
        /// Item: can be picked up.
        const SPECIAL      = 1 << 0;
        /// Blocks movement.
        const SOLID        = 1 << 1;
        /// Can be damaged.
        const SHOOTABLE    = 1 << 2;
        /// Invisible to line-of-sight checks.
        const AMBUSH       = 1 << 3;
        /// Projectile behavior.
        const MISSILE      = 1 << 4;
        /// Ignores gravity.
        const NO_GRAVITY   = 1 << 5;
        /// Can drop off high ledges.
        const DROPOFF      = 1 << 6;
        /// Floats vertically toward its target.
        const FLOAT        = 1 << 7;
        /// Is an inert corpse.
        const CORPSE       = 1 << 8;
        /// Counts toward the kill percentage.
        const COUNT_AS_KILL = 1 << 9;
        /// Counts toward the item percentage.
        const COUNT_AS_ITEM = 1 << 10;
        /// Partially invisible.
        const STEALTH      = 1 << 11;
        /// Explodes when touched.
        const TOUCHY       = 1 << 12;
        /// Bounces off walls and floors.
        const BOUNCE       = 1 << 13;
        /// No blood when hit.
        const NO_BLOOD     = 1 << 14;
        /// Monster AI (set implicitly by COUNT_AS_KILL).
        const MONSTER      = 1 << 15;
        /// Never respawns.
        const NO_RESPAWN   = 1 << 16;
        /// Teleports rather than walks (no movement interpolation).
        const TELEPORT     = 1 << 17;
        /// Hovers with a slow bobbing motion.
        const HOVER        = 1 << 18;
        /// Usable by players (switches, etc).
        const USABLE       = 1 << 19;
    }
}

/// Vertical sprite alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SpriteYAlign {
    /// Bottom of sprite on the floor.
    #[default]
    Bottom,
    /// Sprite centred on the thing's midpoint.
    Middle,
    /// Top of sprite at the thing's height.
    Top,
}

/// Glow effect emitted by the thing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GlowType {
    /// No glow.
    #[default]
    None,
    /// Glow rises from the floor.
    Floor,
    /// Glow descends from the ceiling.
    Ceiling,
    /// Glow emanates from walls.
    Wall,
}

/// First states of each standard chain, 0 when the chain is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThingStates {
    /// Initial chain (label SPAWN, legacy IDLE).
    pub spawn: usize,
    /// Idle chain, aliased to spawn when absent.
    pub idle: usize,
    /// Pursuit chain.
    pub chase: usize,
    /// Pain reaction chain.
    pub pain: usize,
    /// Ranged attack chain.
    pub missile: usize,
    /// Melee attack chain.
    pub melee: usize,
    /// Death chain.
    pub death: usize,
    /// Violent death chain.
    pub overkill: usize,
    /// Respawn-in-place chain.
    pub raise: usize,
    /// Resurrect-by-other chain.
    pub resurrect: usize,
    /// Aimless wandering chain.
    pub meander: usize,
    /// Bounce reaction chain.
    pub bounce: usize,
    /// Touch reaction chain.
    pub touch: usize,
    /// Reload chain.
    pub reload: usize,
    /// Gibbed death chain.
    pub gib: usize,
}

/// A thing definition.
#[derive(Debug, Clone, PartialEq)]
pub struct ThingRecord {
    /// Shared identity.
    pub base: RecordBase,
    /// Behavior flags.
    pub flags: ThingFlags,
    /// Hit points at spawn.
    pub spawnhealth: f32,
    /// Collision radius in map units.
    pub radius: f32,
    /// Collision height in map units.
    pub height: f32,
    /// Mass, affects thrust from damage.
    pub mass: f32,
    /// Movement speed.
    pub speed: f32,
    /// Speed multiplier on fast-monsters skill.
    pub fast: f32,
    /// Speed while floating.
    pub float_speed: f32,
    /// Maximum step height climbed.
    pub step_size: f32,
    /// Tics before respawning, 0 to disable.
    pub respawntime: i32,
    /// Tics until self-destruct, 0 to disable.
    pub fuse: i32,
    /// Sprite translucency, 0.0 to 1.0.
    pub translucency: f32,
    /// Chance of entering the pain chain when damaged.
    pub painchance: f32,
    /// Minimum chance of attacking per decision.
    pub minatkchance: f32,
    /// Tics between noticing a target and reacting.
    pub reactiontime: i32,
    /// Position in the end-of-game cast parade, 0 for none.
    pub castorder: i32,
    /// Title shown in the cast parade.
    pub cast_title: String,
    /// Player number, 0 for non-players.
    pub playernum: i32,
    /// Side bitset for multiplayer factions.
    pub side: u32,
    /// Bobbing amount while hovering.
    pub bobbing: f32,
    /// Jump impulse height.
    pub jumpheight: f32,
    /// Tics between jumps.
    pub jump_delay: i32,
    /// Height while crouching.
    pub crouchheight: f32,
    /// Camera height as a fraction of height.
    pub viewheight: f32,
    /// Gun height as a fraction of height.
    pub shotheight: f32,
    /// Maximum safe fall distance.
    pub maxfall: f32,
    /// Blast radius of the explode action, 0 = use damage nominal.
    pub explode_radius: f32,
    /// Shots between forced reloads, 0 to disable.
    pub reload_shots: i32,
    /// Sprite scale factor.
    pub scale: f32,
    /// Sprite aspect ratio.
    pub aspect: f32,
    /// Vertical sprite alignment.
    pub yalign: SpriteYAlign,
    /// Glow effect.
    pub glow_type: GlowType,
    /// Immunity class bitset.
    pub immunity: u32,
    /// Resistance class bitset.
    pub resistance: u32,
    /// Damage multiplier applied by resistance.
    pub resist_multiply: f32,
    /// Armour damage absorption, 0.0 to 1.0.
    pub armour_protect: f32,
    /// Armour points lost per absorbed point.
    pub armour_deplete: f32,
    /// Armour class bitset.
    pub armour_class: u32,
    /// When-appear restrictions.
    pub appear: WhenAppear,

    /// Melee attack reference.
    pub close_attack: RefSlot,
    /// Ranged attack reference.
    pub range_attack: RefSlot,
    /// Extra attack reference.
    pub spare_attack: RefSlot,
    /// Item dropped on death.
    pub dropitem: RefSlot,
    /// Blood splat object (default BLOOD).
    pub blood: RefSlot,
    /// Effect shown when the thing respawns.
    pub respawneffect: RefSlot,
    /// Spawn point for spit-style attacks.
    pub spitspot: RefSlot,

    /// Sound made when active.
    pub active_sound: SoundRef,
    /// Sound made on sighting a target.
    pub see_sound: SoundRef,
    /// Sound made on death.
    pub death_sound: SoundRef,
    /// Sound made on overkill death.
    pub overkill_sound: SoundRef,
    /// Sound made when hurt.
    pub pain_sound: SoundRef,
    /// Sound made when starting combat.
    pub attack_sound: SoundRef,
    /// Footstep sound.
    pub walk_sound: SoundRef,
    /// Jump grunt.
    pub jump_sound: SoundRef,
    /// Blocked-movement grunt.
    pub noway_sound: SoundRef,
    /// Hard-landing grunt.
    pub oof_sound: SoundRef,
    /// Gasp on surfacing for air.
    pub gasp_sound: SoundRef,

    /// Explosion damage dealt by the explode action.
    pub explode_damage: Damage,
    /// Drowning damage.
    pub choke_damage: Damage,
    /// Primary dynamic light.
    pub dlight0: DynamicLight,
    /// Secondary dynamic light.
    pub dlight1: DynamicLight,
    /// Tics of air while submerged.
    pub lung_capacity: i32,
    /// Tics underwater before gasping starts.
    pub gasp_start: i32,

    /// First states of the standard chains.
    pub states: ThingStates,
    /// State ranges owned by this definition.
    pub state_group: StateGroup,
}

impl Default for ThingRecord {
    fn default() -> Self {
        Self {
            base: RecordBase::default(),
            flags: ThingFlags::empty(),
            spawnhealth: 1000.0,
            radius: 20.0,
            height: 16.0,
            mass: 100.0,
            speed: 0.0,
            fast: 1.0,
            float_speed: 2.0,
            step_size: 24.0,
            respawntime: 12 * 35,
            fuse: 0,
            translucency: 1.0,
            painchance: 0.0,
            minatkchance: 0.0,
            reactiontime: 0,
            castorder: 0,
            cast_title: String::new(),
            playernum: 0,
            side: 0,
            bobbing: 1.0,
            jumpheight: 0.0,
            jump_delay: 35,
            crouchheight: 28.0,
            viewheight: 0.75,
            shotheight: 0.64,
            maxfall: 0.0,
            explode_radius: 0.0,
            reload_shots: 5,
            scale: 1.0,
            aspect: 1.0,
            yalign: SpriteYAlign::Bottom,
            glow_type: GlowType::None,
            immunity: 0,
            resistance: 0,
            resist_multiply: 0.4,
            armour_protect: -1.0,
            armour_deplete: 1.0,
            armour_class: u32::MAX,
            appear: WhenAppear::default(),
            close_attack: RefSlot::Empty,
            range_attack: RefSlot::Empty,
            spare_attack: RefSlot::Empty,
            dropitem: RefSlot::Empty,
            blood: RefSlot::Empty,
            respawneffect: RefSlot::Empty,
            spitspot: RefSlot::Empty,
            active_sound: RefSlot::Empty,
            see_sound: RefSlot::Empty,
            death_sound: RefSlot::Empty,
            overkill_sound: RefSlot::Empty,
            pain_sound: RefSlot::Empty,
            attack_sound: RefSlot::Empty,
            walk_sound: RefSlot::Empty,
            jump_sound: RefSlot::Empty,
            noway_sound: RefSlot::Empty,
            oof_sound: RefSlot::Empty,
            gasp_sound: RefSlot::Empty,
            explode_damage: Damage::default(),
            choke_damage: Damage {
                nominal: 6.0,
                delay: 2 * 35,
                ..Damage::default()
            },
            dlight0: DynamicLight::default(),
            dlight1: DynamicLight::default(),
            lung_capacity: 20 * 35,
            gasp_start: 2 * 35,
            states: ThingStates::default(),
            state_group: StateGroup::new(),
        }
    }
}

impl ThingRecord {
    /// Whether this definition is a pickup item.
    #[must_use]
    pub fn is_pickup(&self) -> bool {
        self.flags.contains(ThingFlags::SPECIAL)
    }

    /// Computes the checksum of a finished record.
    #[must_use]
    pub fn compute_crc(&self) -> u32 {
        let mut ck = Checksum::new();
        self.base.add_to(&mut ck);
        ck.add_i32(self.flags.bits() as i32);
        ck.add_f32(self.spawnhealth);
        ck.add_f32(self.radius);
        ck.add_f32(self.height);
        ck.add_f32(self.mass);
        ck.add_f32(self.speed);
        ck.add_f32(self.painchance);
        ck.add_i32(self.castorder);
        ck.add_i32(self.playernum);
        self.explode_damage.add_to(&mut ck);
        self.choke_damage.add_to(&mut ck);
        ck.add_i32(self.states.spawn as i32);
        ck.add_i32(self.states.death as i32);
        ck.value()
    }
}

impl crate::registry::Record for ThingRecord {
    const KIND: &'static str = "thing";

    fn base(&self) -> &RecordBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RecordBase {
        &mut self.base
    }
}
