//! The cross-reference cleanup pass.
//!
//! Entries may reference definitions that appear later in the same file or
//! in another file entirely, so references are collected as names during
//! parsing and resolved here, once every source has been read. After this
//! pass every live [`RefSlot`] is either `Empty` or `Resolved`.

use ddf_foundation::{DiagPolicy, Error, Result};
use ddf_tables::{
    ActionArg, AttackRecord, LineRecord, PlaneMover, Record, RefSlot, Registry, SectorRecord,
    SoundRecord, StateTable, ThingRecord, WeaponRecord,
};

fn resolve<T: Record>(
    policy: DiagPolicy,
    registry: &Registry<T>,
    slot: &mut RefSlot,
    owner: &str,
) -> Result<()> {
    let RefSlot::Name(name) = slot else {
        return Ok(());
    };
    match registry.lookup_index(name) {
        Some(idx) => {
            *slot = RefSlot::Resolved(idx);
            Ok(())
        }
        None if policy.lax => {
            // broken references fall back to the oldest live record
            log::warn!("unknown {} reference: {name} (in {owner})", T::KIND);
            *slot = match registry.first_enabled() {
                Some(idx) => RefSlot::Resolved(idx),
                None => RefSlot::Empty,
            };
            Ok(())
        }
        None => Err(Error::unknown_reference(T::KIND, name.clone())),
    }
}

fn resolve_mover(
    policy: DiagPolicy,
    sounds: &Registry<SoundRecord>,
    mover: &mut PlaneMover,
    owner: &str,
) -> Result<()> {
    resolve(policy, sounds, &mut mover.sfx_start, owner)?;
    resolve(policy, sounds, &mut mover.sfx_up, owner)?;
    resolve(policy, sounds, &mut mover.sfx_down, owner)?;
    resolve(policy, sounds, &mut mover.sfx_stop, owner)
}

fn cleanup_things(
    policy: DiagPolicy,
    things: &mut Registry<ThingRecord>,
    attacks: &Registry<AttackRecord>,
    sounds: &Registry<SoundRecord>,
) -> Result<()> {
    for i in 0..things.len() {
        let Some(mut rec) = things.get(i).cloned() else {
            continue;
        };

        // engine-level fallbacks every kind of thing relies on
        if rec.blood.is_empty() {
            rec.blood = RefSlot::Name("BLOOD".to_string());
        }
        if rec.respawneffect.is_empty() {
            let effect = if rec.is_pickup() {
                "ITEM_RESPAWN"
            } else {
                "RESPAWN_FLASH"
            };
            rec.respawneffect = RefSlot::Name(effect.to_string());
        }

        let owner = rec.base.name.clone();
        resolve(policy, attacks, &mut rec.close_attack, &owner)?;
        resolve(policy, attacks, &mut rec.range_attack, &owner)?;
        resolve(policy, attacks, &mut rec.spare_attack, &owner)?;
        resolve(policy, things, &mut rec.dropitem, &owner)?;
        resolve(policy, things, &mut rec.blood, &owner)?;
        resolve(policy, things, &mut rec.respawneffect, &owner)?;
        resolve(policy, things, &mut rec.spitspot, &owner)?;

        for sfx in [
            &mut rec.active_sound,
            &mut rec.see_sound,
            &mut rec.death_sound,
            &mut rec.overkill_sound,
            &mut rec.pain_sound,
            &mut rec.attack_sound,
            &mut rec.walk_sound,
            &mut rec.jump_sound,
            &mut rec.noway_sound,
            &mut rec.oof_sound,
            &mut rec.gasp_sound,
        ] {
            resolve(policy, sounds, sfx, &owner)?;
        }

        if let Some(slot) = things.get_mut(i) {
            *slot = rec;
        }
    }
    Ok(())
}

fn cleanup_attacks(
    policy: DiagPolicy,
    attacks: &mut Registry<AttackRecord>,
    things: &Registry<ThingRecord>,
    sounds: &Registry<SoundRecord>,
    table: &StateTable,
) -> Result<()> {
    for i in 0..attacks.len() {
        let Some(mut rec) = attacks.get(i).cloned() else {
            continue;
        };

        if rec.puff.is_empty() {
            rec.puff = RefSlot::Name("PUFF".to_string());
        }

        let owner = rec.base.name.clone();
        resolve(policy, things, &mut rec.mobj, &owner)?;
        resolve(policy, things, &mut rec.spawnedobj, &owner)?;
        resolve(policy, things, &mut rec.puff, &owner)?;
        resolve(policy, sounds, &mut rec.init_sound, &owner)?;
        resolve(policy, sounds, &mut rec.sound, &owner)?;

        // SPAWN_OBJECT_STATE names a label inside the spawned object
        if let Some(director) = rec.objinitstate_director() {
            let target = match rec.spawnedobj {
                RefSlot::Resolved(idx) => things.get(idx),
                _ => None,
            };
            match target.and_then(|t| table.find_label(&t.state_group, &director.label)) {
                Some(base) => rec.objinitstate = base + director.offset,
                None if policy.lax => {
                    log::warn!(
                        "unknown SPAWN_OBJECT_STATE label {} (in {owner})",
                        director.label
                    );
                }
                None => return Err(Error::unknown_label(director.label)),
            }
        }

        if let Some(slot) = attacks.get_mut(i) {
            *slot = rec;
        }
    }
    Ok(())
}

fn cleanup_weapons(
    policy: DiagPolicy,
    weapons: &mut Registry<WeaponRecord>,
    attacks: &Registry<AttackRecord>,
    sounds: &Registry<SoundRecord>,
) -> Result<()> {
    for i in 0..weapons.len() {
        let Some(mut rec) = weapons.get(i).cloned() else {
            continue;
        };

        let owner = rec.base.name.clone();
        resolve(policy, attacks, &mut rec.primary.attack, &owner)?;
        resolve(policy, attacks, &mut rec.secondary.attack, &owner)?;
        resolve(policy, attacks, &mut rec.eject_attack, &owner)?;
        resolve(policy, weapons, &mut rec.upgrades, &owner)?;
        resolve(policy, sounds, &mut rec.idle_sound, &owner)?;
        resolve(policy, sounds, &mut rec.engaged_sound, &owner)?;
        resolve(policy, sounds, &mut rec.hit_sound, &owner)?;
        resolve(policy, sounds, &mut rec.start_sound, &owner)?;

        if let Some(slot) = weapons.get_mut(i) {
            *slot = rec;
        }
    }
    Ok(())
}

fn cleanup_lines(
    policy: DiagPolicy,
    lines: &mut Registry<LineRecord>,
    things: &Registry<ThingRecord>,
    sounds: &Registry<SoundRecord>,
) -> Result<()> {
    for i in 0..lines.len() {
        let Some(rec) = lines.get_mut(i) else {
            continue;
        };
        let owner = rec.base.name.clone();
        resolve(policy, sounds, &mut rec.failed_sfx, &owner)?;
        resolve_mover(policy, sounds, &mut rec.floor, &owner)?;
        resolve_mover(policy, sounds, &mut rec.ceil, &owner)?;
        resolve(policy, sounds, &mut rec.donut.in_sfx, &owner)?;
        resolve(policy, sounds, &mut rec.donut.in_sfx_stop, &owner)?;
        resolve(policy, sounds, &mut rec.donut.out_sfx, &owner)?;
        resolve(policy, sounds, &mut rec.donut.out_sfx_stop, &owner)?;
        resolve(policy, things, &mut rec.teleport.in_effect, &owner)?;
        resolve(policy, things, &mut rec.teleport.out_effect, &owner)?;
    }
    Ok(())
}

fn cleanup_sectors(
    policy: DiagPolicy,
    sectors: &mut Registry<SectorRecord>,
    sounds: &Registry<SoundRecord>,
) -> Result<()> {
    for i in 0..sectors.len() {
        let Some(rec) = sectors.get_mut(i) else {
            continue;
        };
        let owner = rec.base.name.clone();
        resolve(policy, sounds, &mut rec.ambient_sfx, &owner)?;
        resolve(policy, sounds, &mut rec.splash_sfx, &owner)?;
        resolve_mover(policy, sounds, &mut rec.floor, &owner)?;
        resolve_mover(policy, sounds, &mut rec.ceil, &owner)?;
    }
    Ok(())
}

fn cleanup_states(
    policy: DiagPolicy,
    table: &mut StateTable,
    things: &Registry<ThingRecord>,
    attacks: &Registry<AttackRecord>,
    sounds: &Registry<SoundRecord>,
) -> Result<()> {
    for i in 0..table.len() {
        let Some(state) = table.get_mut(i) else {
            continue;
        };
        let Some(action) = &mut state.action else {
            continue;
        };
        let owner = action.name;
        match &mut action.arg {
            ActionArg::Attack(slot) => resolve(policy, attacks, slot, owner)?,
            ActionArg::Thing(slot) => resolve(policy, things, slot, owner)?,
            ActionArg::Sound(slot) => resolve(policy, sounds, slot, owner)?,
            ActionArg::Become { kind, .. } => resolve(policy, things, kind, owner)?,
            _ => {}
        }
    }
    Ok(())
}

/// Resolves every pending cross-reference, in dependency-friendly order.
#[allow(clippy::too_many_arguments)]
pub fn cleanup_all(
    policy: DiagPolicy,
    things: &mut Registry<ThingRecord>,
    attacks: &mut Registry<AttackRecord>,
    weapons: &mut Registry<WeaponRecord>,
    sounds: &Registry<SoundRecord>,
    lines: &mut Registry<LineRecord>,
    sectors: &mut Registry<SectorRecord>,
    table: &mut StateTable,
) -> Result<()> {
    cleanup_things(policy, things, attacks, sounds)?;
    cleanup_attacks(policy, attacks, things, sounds, table)?;
    cleanup_weapons(policy, weapons, attacks, sounds)?;
    cleanup_lines(policy, lines, things, sounds)?;
    cleanup_sectors(policy, sectors, sounds)?;
    cleanup_states(policy, table, things, attacks, sounds)
}
