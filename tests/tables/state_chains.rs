//! Integration tests for the shared state table

use ddfkit::tables::{
    NULL_STATE, RangeBuilder, State, StateGroup, StateLink, StateTable, group_has_state,
};

fn push_frame(
    table: &mut StateTable,
    builder: &mut RangeBuilder,
    sprite: &str,
    label: Option<&str>,
) -> usize {
    let sprite = table.sprites.intern(sprite);
    let idx = table.push(State {
        sprite,
        tics: 4,
        label: label.map(str::to_string),
        ..State::default()
    });
    builder.note_state(idx);
    idx
}

#[test]
fn chains_fall_through_and_terminate() {
    let mut table = StateTable::new();
    let mut group = StateGroup::new();
    let mut builder = RangeBuilder::new();

    let a = push_frame(&mut table, &mut builder, "TROO", Some("SPAWN"));
    let b = push_frame(&mut table, &mut builder, "TROO", None);
    let c = push_frame(&mut table, &mut builder, "TROO", None);
    builder.finish(&mut table, &mut group).unwrap();

    assert_eq!(table.get(a).unwrap().next, StateLink::Absolute(b));
    assert_eq!(table.get(b).unwrap().next, StateLink::Absolute(c));
    assert_eq!(table.get(c).unwrap().next, StateLink::Absolute(NULL_STATE));
}

#[test]
fn redirectors_resolve_with_offsets() {
    let mut table = StateTable::new();
    let mut group = StateGroup::new();
    let mut builder = RangeBuilder::new();

    let spawn = push_frame(&mut table, &mut builder, "POSS", Some("SPAWN"));
    push_frame(&mut table, &mut builder, "POSS", None);
    let tail = push_frame(&mut table, &mut builder, "POSS", None);

    let redir = builder.redirector("SPAWN");
    table.get_mut(tail).unwrap().next = StateLink::Redirect { redir, offset: 1 };
    builder.finish(&mut table, &mut group).unwrap();

    assert_eq!(table.get(tail).unwrap().next, StateLink::Absolute(spawn + 1));
}

#[test]
fn remove_links_to_the_null_state() {
    let mut table = StateTable::new();
    let mut group = StateGroup::new();
    let mut builder = RangeBuilder::new();

    let a = push_frame(&mut table, &mut builder, "BOSS", Some("DEATH"));
    table.get_mut(a).unwrap().next = StateLink::Remove;
    builder.finish(&mut table, &mut group).unwrap();

    assert_eq!(table.get(a).unwrap().next, StateLink::Absolute(NULL_STATE));
}

#[test]
fn unknown_redirect_label_fails_the_link() {
    let mut table = StateTable::new();
    let mut group = StateGroup::new();
    let mut builder = RangeBuilder::new();

    let a = push_frame(&mut table, &mut builder, "BOSS", None);
    let redir = builder.redirector("MISSING");
    table.get_mut(a).unwrap().next = StateLink::Redirect { redir, offset: 0 };

    assert!(builder.finish(&mut table, &mut group).is_err());
}

#[test]
fn later_ranges_shadow_labels() {
    let mut table = StateTable::new();
    let mut group = StateGroup::new();

    let mut builder = RangeBuilder::new();
    let old = push_frame(&mut table, &mut builder, "SARG", Some("ATTACK"));
    builder.finish(&mut table, &mut group).unwrap();

    let mut builder = RangeBuilder::new();
    let new = push_frame(&mut table, &mut builder, "SARG", Some("ATTACK"));
    builder.finish(&mut table, &mut group).unwrap();

    assert_ne!(old, new);
    assert_eq!(table.find_label(&group, "ATTACK"), Some(new));
}

#[test]
fn idle_is_an_alias_for_spawn() {
    let mut table = StateTable::new();
    let mut group = StateGroup::new();
    let mut builder = RangeBuilder::new();

    let spawn = push_frame(&mut table, &mut builder, "PLAY", Some("SPAWN"));
    builder.finish(&mut table, &mut group).unwrap();

    assert_eq!(table.find_label(&group, "IDLE"), Some(spawn));
}

#[test]
fn group_membership_tracks_ranges_only() {
    let mut table = StateTable::new();
    let mut group = StateGroup::new();
    let mut builder = RangeBuilder::new();

    let a = push_frame(&mut table, &mut builder, "TROO", None);
    builder.finish(&mut table, &mut group).unwrap();

    // a foreign state appended after the range closed
    let outside = table.push(State::default());

    assert!(group_has_state(&group, a));
    assert!(!group_has_state(&group, outside));
    assert!(!group_has_state(&group, NULL_STATE));
}

#[test]
fn sprite_names_are_interned_once() {
    let mut table = StateTable::new();
    let a = table.sprites.intern("TROO");
    let b = table.sprites.intern("troo");
    let c = table.sprites.intern("POSS");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(table.sprites.get(a), Some("TROO"));
}
