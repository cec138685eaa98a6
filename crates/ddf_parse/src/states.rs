//! Text-level parsing of `STATES(label)` commands.
//!
//! A state command's value is a sequence of frame descriptions separated by
//! commas, each splitting on `:` into sprite, frame letter, tics,
//! brightness and an optional action. A value starting with `#` is a
//! redirector instead: it rewrites the previous state's next-link to a
//! label (or removes the chain) and allocates nothing.

use ddf_foundation::{Error, Result, names_equal};
use ddf_tables::{ActionArg, RangeBuilder, RefSlot, State, StateAction, StateLink, StateTable};

use crate::scan;
use crate::session::ParserSession;

/// Max number of `:`-separated sections in one frame description.
const NUM_SPLIT: usize = 10;

/// A frame description, split into its component parts.
#[derive(Debug, PartialEq)]
pub enum StateParts {
    /// `#LABEL` or `#LABEL:offset` or `#REMOVE`.
    Redirector {
        /// Target label (without the `#`).
        label: String,
        /// Offset text after the `:`, if any.
        offset: Option<String>,
    },
    /// Ordinary frame description sections.
    Frame(Vec<String>),
}

/// Splits a frame description on `:`, respecting `()` nesting. The bracket
/// characters themselves stay part of the section text.
pub fn split_state_parts(session: &ParserSession, info: &str) -> Result<StateParts> {
    if let Some(rest) = info.strip_prefix('#') {
        let mut sections = rest.splitn(2, ':');
        let label = sections.next().unwrap_or("").to_string();
        let offset = sections
            .next()
            .map(|o| o.split(':').next().unwrap_or("").to_string())
            .filter(|o| !o.is_empty());
        return Ok(StateParts::Redirector { label, offset });
    }

    let mut parts: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut brackets = 0u32;

    for c in info.chars() {
        match c {
            '(' => {
                brackets += 1;
                current.push(c);
            }
            ')' => {
                if brackets == 0 {
                    return Err(session.fatal(Error::syntax(format!(
                        "mismatched ) bracket in states: {info}"
                    ))));
                }
                brackets -= 1;
                current.push(c);
            }
            ':' if brackets == 0 && parts.len() + 1 < NUM_SPLIT => {
                parts.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }

    if brackets > 0 {
        return Err(session.fatal(Error::syntax(format!("unclosed ( bracket in states: {info}"))));
    }

    parts.push(current);
    Ok(StateParts::Frame(parts))
}

/// Splits `FOO(BAR)` into `("FOO", "BAR")`; a plain `FOO` yields an empty
/// argument.
#[must_use]
pub fn split_action_arg(info: &str) -> (&str, &str) {
    if let Some(open) = info.find('(') {
        if info.len() >= 4 && info.ends_with(')') {
            return (&info[..open], &info[open + 1..info.len() - 1]);
        }
    }
    (info, "")
}

/// How an action's argument text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    /// No argument expected; any text is ignored.
    None,
    /// Integer.
    Int,
    /// Two integers separated by a comma.
    IntPair,
    /// Float (also used for angles and slopes).
    Float,
    /// Percentage, stored 0.0..1.0.
    Percent,
    /// Attack reference, resolved by the cleanup pass.
    Attack,
    /// Thing reference, resolved by the cleanup pass.
    Thing,
    /// Sound reference, resolved by the cleanup pass.
    Sound,
    /// `JUMP(label)` / `JUMP(label,chance)`: sets the state's jump link.
    Jump,
    /// `ACTION(label)`: sets the jump link, no payload.
    Frame,
    /// `BECOME(typename)` / `BECOME(typename,label)`.
    Become,
}

/// One entry in a kind's action table. A `!` prefix on the name is
/// tolerated in source text and ignored for matching.
#[derive(Debug, Clone, Copy)]
pub struct ActionDef {
    /// Action name as written in source.
    pub name: &'static str,
    /// Argument interpretation.
    pub arg: ArgKind,
}

impl ActionDef {
    /// Shorthand constructor.
    #[must_use]
    pub const fn new(name: &'static str, arg: ArgKind) -> Self {
        Self { name, arg }
    }
}

fn label_and_offset(arg: &str) -> (String, usize, Option<usize>) {
    // LABEL or LABEL:n, n is 1-based in source
    let mut label = String::new();
    let mut rest = arg;
    for (i, c) in arg.char_indices() {
        if c == ':' || c == ',' {
            rest = &arg[i..];
            break;
        }
        label.push(c);
        rest = &arg[i + c.len_utf8()..];
    }

    let offset = if let Some(text) = rest.strip_prefix(':') {
        let text = text.split(',').next().unwrap_or("");
        scan::int_prefix(text).max(1) as usize - 1
    } else {
        0
    };

    let comma = arg.find(',');
    (label, offset, comma)
}

fn parse_action(
    session: &ParserSession,
    builder: &mut RangeBuilder,
    state: &mut State,
    actions: &[ActionDef],
    text: &str,
) -> Result<()> {
    let (name, arg) = split_action_arg(text);

    let Some(def) = actions.iter().find(|d| {
        let bare = d.name.strip_prefix('!').unwrap_or(d.name);
        names_equal(bare, name)
    }) else {
        session.warn_error(Error::syntax(format!("unknown code pointer: {text}")))?;
        return Ok(());
    };

    let payload = if arg.is_empty() {
        ActionArg::None
    } else {
        match def.arg {
            ArgKind::None => ActionArg::None,
            ArgKind::Int => ActionArg::Int(parse_int_arg(session, arg)?),
            ArgKind::IntPair => {
                let Some((a, b)) = arg.split_once(',') else {
                    return Err(session.fatal(Error::syntax(format!("bad values: {arg}"))));
                };
                ActionArg::IntPair(parse_int_arg(session, a)?, parse_int_arg(session, b)?)
            }
            ArgKind::Float => {
                let mut f = 0.0;
                scan::get_float(session, arg.trim(), &mut f)?;
                ActionArg::Float(f)
            }
            ArgKind::Percent => {
                let mut p = 0.0;
                scan::get_percent(session, arg.trim(), &mut p)?;
                ActionArg::Float(p)
            }
            ArgKind::Attack => ActionArg::Attack(RefSlot::Name(arg.to_string())),
            ArgKind::Thing => ActionArg::Thing(RefSlot::Name(arg.to_string())),
            ArgKind::Sound => ActionArg::Sound(RefSlot::Name(arg.to_string())),
            ArgKind::Jump => {
                let (label, offset, comma) = label_and_offset(arg);
                if label.is_empty() {
                    return Err(session.fatal(Error::syntax("jump action: missing label")));
                }
                let mut chance = 1.0;
                if let Some(comma) = comma {
                    scan::get_percent(session, arg[comma + 1..].trim(), &mut chance)?;
                }
                state.jump = StateLink::Redirect {
                    redir: builder.redirector(&label),
                    offset,
                };
                ActionArg::JumpChance(chance)
            }
            ArgKind::Frame => {
                let (label, offset, _) = label_and_offset(arg);
                if label.is_empty() {
                    return Err(session.fatal(Error::syntax("frame action: missing label")));
                }
                state.jump = StateLink::Redirect {
                    redir: builder.redirector(&label),
                    offset,
                };
                ActionArg::None
            }
            ArgKind::Become => {
                let (kind, _, comma) = label_and_offset(arg);
                if kind.is_empty() {
                    return Err(session.fatal(Error::syntax("become action: missing type name")));
                }
                let (label, offset) = if let Some(comma) = comma {
                    let (l, o, _) = label_and_offset(&arg[comma + 1..]);
                    if l.is_empty() {
                        return Err(session.fatal(Error::syntax("become action: missing label")));
                    }
                    (l, o)
                } else {
                    ("IDLE".to_string(), 0)
                };
                ActionArg::Become {
                    kind: RefSlot::Name(kind),
                    label,
                    offset,
                }
            }
        }
    };

    let bare = def.name.strip_prefix('!').unwrap_or(def.name);
    state.action = Some(StateAction {
        name: bare,
        arg: payload,
    });
    Ok(())
}

fn parse_int_arg(session: &ParserSession, arg: &str) -> Result<i32> {
    let mut v = 0;
    scan::get_numeric(session, arg.trim(), &mut v)?;
    Ok(v)
}

fn parse_bright(session: &ParserSession, text: &str) -> Result<i32> {
    if text == "NORMAL" {
        Ok(0)
    } else if text == "BRIGHT" {
        Ok(255)
    } else if let Some(digits) = text.strip_prefix("LIT") {
        let lit = scan::int_prefix(digits);
        Ok((lit * 255 / 99).clamp(0, 255))
    } else {
        session.warn_error(Error::syntax("lighting is not BRIGHT or NORMAL"))?;
        Ok(0)
    }
}

/// Parses one frame description and appends the resulting state.
///
/// `label` names the block this frame belongs to; the first frame of a
/// block (`index == 0`) carries the label and its table index is returned
/// so the caller can store it in the starter field. `redir` is the default
/// next-link label applied to the frame when it is the last of its command
/// (`#REMOVE` removes instead). Redirector descriptions rewrite the
/// previous frame's next-link and allocate nothing.
#[allow(clippy::too_many_arguments)]
pub fn read_state(
    session: &ParserSession,
    table: &mut StateTable,
    builder: &mut RangeBuilder,
    info: &str,
    label: &str,
    index: usize,
    redir: Option<&str>,
    actions: &[ActionDef],
    is_weapon: bool,
) -> Result<Option<usize>> {
    let parts = match split_state_parts(session, info)? {
        StateParts::Redirector { label, offset } => {
            let Some(last) = builder.last_state() else {
                return Err(
                    session.fatal(Error::syntax(format!("redirector used without any states ({info})")))
                );
            };

            let link = if names_equal(&label, "REMOVE") {
                StateLink::Remove
            } else {
                let offset = offset
                    .map(|o| scan::int_prefix(&o).max(1) as usize - 1)
                    .unwrap_or(0);
                StateLink::Redirect {
                    redir: builder.redirector(&label),
                    offset,
                }
            };

            if let Some(state) = table.get_mut(last) {
                state.next = link;
            }
            return Ok(None);
        }
        StateParts::Frame(parts) => parts,
    };

    if parts.len() < 5 {
        if info.contains('[') {
            // probably an unterminated state command
            return Err(session.fatal(Error::syntax(format!(
                "bad state '{info}', possibly missing ';'"
            ))));
        }
        return Err(session.fatal(Error::syntax(format!("bad state '{info}'"))));
    }

    if parts[0].is_empty() {
        return Err(session.fatal(Error::syntax(format!(
            "missing sprite in state frames: '{info}'"
        ))));
    }
    if parts[1].is_empty() || parts[2].is_empty() || parts[3].is_empty() {
        return Err(session.fatal(Error::syntax(format!(
            "bad state frame, missing fields: {info}"
        ))));
    }
    if parts[0].len() != 4 {
        return Err(session.fatal(Error::syntax(format!(
            "sprite names must be 4 characters long '{}'",
            parts[0]
        ))));
    }

    let frame_ch = parts[1].chars().next().unwrap_or(' ');
    if !('A'..=']').contains(&frame_ch) {
        return Err(session.fatal(Error::syntax(format!(
            "illegal sprite frame: {}",
            parts[1]
        ))));
    }

    let mut state = State {
        sprite: table.sprites.intern(&parts[0]),
        frame: frame_ch as i32 - 'A' as i32,
        tics: scan::int_prefix(&parts[2]),
        bright: parse_bright(session, &parts[3])?,
        weapon: is_weapon,
        ..State::default()
    };

    if index == 0 {
        state.label = Some(label.to_string());
    }

    if let Some(redir) = redir {
        state.next = if names_equal(redir, "REMOVE") {
            StateLink::Remove
        } else {
            StateLink::Redirect {
                redir: builder.redirector(redir),
                offset: 0,
            }
        };
    }

    if !parts[4].is_empty() {
        parse_action(session, builder, &mut state, actions, &parts[4])?;
    }

    let idx = table.push(state);
    builder.note_state(idx);

    Ok((index == 0).then_some(idx))
}

/// Tests whether a field is a `STATES(label)` command and, if so, parses
/// its value into the given builder. The label is returned to the caller
/// on the first frame so starter fields can be assigned.
///
/// `redir_default` is the next-link label used when the command's last
/// frame carries no explicit redirector (things chain back to `IDLE`,
/// weapons to `READY`).
#[allow(clippy::too_many_arguments)]
pub fn parse_state_command(
    session: &ParserSession,
    table: &mut StateTable,
    builder: &mut RangeBuilder,
    field: &str,
    contents: &str,
    index: usize,
    is_last: bool,
    actions: &[ActionDef],
    is_weapon: bool,
    starter_redir: Option<&'static str>,
) -> Result<Option<(String, Option<usize>)>> {
    let Some(rest) = field.strip_prefix("STATES(") else {
        return Ok(None);
    };
    let Some(close) = rest.find(')') else {
        return Ok(None);
    };
    if close == 0 || close > 64 {
        return Ok(None);
    }
    let label = &rest[..close];

    let redir = if is_last {
        Some(starter_redir.unwrap_or(if is_weapon { "READY" } else { "IDLE" }))
    } else {
        None
    };

    let first = read_state(
        session, table, builder, contents, label, index, redir, actions, is_weapon,
    )?;

    Ok(Some((label.to_string(), first)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ddf_tables::StateGroup;

    const ACTIONS: &[ActionDef] = &[
        ActionDef::new("CHASE", ArgKind::None),
        ActionDef::new("JUMP", ArgKind::Jump),
        ActionDef::new("RANGE_ATTACK", ArgKind::Attack),
        ActionDef::new("PLAYSOUND", ArgKind::Sound),
        ActionDef::new("BECOME", ArgKind::Become),
        ActionDef::new("!OLD_TURN", ArgKind::Int),
    ];

    fn session() -> ParserSession {
        ParserSession::default()
    }

    #[test]
    fn split_respects_brackets() {
        let s = session();
        let parts = split_state_parts(&s, "TROO:A:10:NORMAL:JUMP(ATTACK:2,50%)").unwrap();
        let StateParts::Frame(parts) = parts else {
            panic!("expected frame");
        };
        assert_eq!(parts[0], "TROO");
        assert_eq!(parts[4], "JUMP(ATTACK:2,50%)");
        assert_eq!(parts.len(), 5);
    }

    #[test]
    fn split_detects_redirector() {
        let s = session();
        assert_eq!(
            split_state_parts(&s, "#SEE").unwrap(),
            StateParts::Redirector {
                label: "SEE".to_string(),
                offset: None,
            }
        );
        assert_eq!(
            split_state_parts(&s, "#MEANDER:3").unwrap(),
            StateParts::Redirector {
                label: "MEANDER".to_string(),
                offset: Some("3".to_string()),
            }
        );
    }

    #[test]
    fn read_simple_frame() {
        let s = session();
        let mut table = StateTable::new();
        let mut builder = RangeBuilder::new();

        let first = read_state(
            &s, &mut table, &mut builder,
            "TROO:B:6:BRIGHT:CHASE",
            "CHASE", 0, None, ACTIONS, false,
        )
        .unwrap();

        let idx = first.unwrap();
        let st = table.get(idx).unwrap();
        assert_eq!(st.frame, 1);
        assert_eq!(st.tics, 6);
        assert_eq!(st.bright, 255);
        assert_eq!(st.label.as_deref(), Some("CHASE"));
        assert_eq!(st.action.as_ref().unwrap().name, "CHASE");
    }

    #[test]
    fn lit_brightness_scales() {
        let s = session();
        assert_eq!(parse_bright(&s, "LIT99").unwrap(), 255);
        assert_eq!(parse_bright(&s, "LIT50").unwrap(), 128);
        assert_eq!(parse_bright(&s, "NORMAL").unwrap(), 0);
    }

    #[test]
    fn bad_sprite_length_is_fatal() {
        let s = session();
        let mut table = StateTable::new();
        let mut builder = RangeBuilder::new();
        assert!(
            read_state(
                &s, &mut table, &mut builder,
                "TROOPER:A:10:NORMAL:CHASE",
                "SPAWN", 0, None, ACTIONS, false,
            )
            .is_err()
        );
    }

    #[test]
    fn redirector_rewrites_previous_state() {
        let s = session();
        let mut table = StateTable::new();
        let mut builder = RangeBuilder::new();

        read_state(
            &s, &mut table, &mut builder,
            "TROO:A:10:NORMAL:NOTHING",
            "SPAWN", 0, None,
            &[ActionDef::new("NOTHING", ArgKind::None)],
            false,
        )
        .unwrap();

        read_state(
            &s, &mut table, &mut builder,
            "#SEE:2",
            "SPAWN", 1, None, ACTIONS, false,
        )
        .unwrap();

        let last = builder.last_state().unwrap();
        assert!(matches!(
            table.get(last).unwrap().next,
            StateLink::Redirect { offset: 1, .. }
        ));
    }

    #[test]
    fn redirector_without_states_is_fatal() {
        let s = session();
        let mut table = StateTable::new();
        let mut builder = RangeBuilder::new();
        assert!(
            read_state(
                &s, &mut table, &mut builder,
                "#SEE", "SPAWN", 0, None, ACTIONS, false,
            )
            .is_err()
        );
    }

    #[test]
    fn jump_action_sets_jump_link_and_chance() {
        let s = session();
        let mut table = StateTable::new();
        let mut builder = RangeBuilder::new();

        let idx = read_state(
            &s, &mut table, &mut builder,
            "TROO:C:4:NORMAL:JUMP(PAIN,25%)",
            "CHASE", 0, None, ACTIONS, false,
        )
        .unwrap()
        .unwrap();

        let st = table.get(idx).unwrap();
        assert!(matches!(st.jump, StateLink::Redirect { offset: 0, .. }));
        let Some(StateAction {
            arg: ActionArg::JumpChance(chance),
            ..
        }) = &st.action
        else {
            panic!("expected jump chance");
        };
        assert!((chance - 0.25).abs() < 1e-6);
    }

    #[test]
    fn unknown_action_is_warn_error() {
        let mut s = session();
        let mut table = StateTable::new();
        let mut builder = RangeBuilder::new();

        // lenient: parses, no action attached
        let idx = read_state(
            &s, &mut table, &mut builder,
            "TROO:A:1:NORMAL:NO_SUCH_ACTION",
            "SPAWN", 0, None, ACTIONS, false,
        )
        .unwrap()
        .unwrap();
        assert!(table.get(idx).unwrap().action.is_none());

        s.policy.strict = true;
        assert!(
            read_state(
                &s, &mut table, &mut builder,
                "TROO:A:1:NORMAL:NO_SUCH_ACTION",
                "SPAWN", 1, None, ACTIONS, false,
            )
            .is_err()
        );
    }

    #[test]
    fn state_command_shape() {
        let s = session();
        let mut table = StateTable::new();
        let mut builder = RangeBuilder::new();
        let mut group = StateGroup::new();

        assert!(
            parse_state_command(
                &s, &mut table, &mut builder,
                "RADIUS", "20", 0, true, ACTIONS, false, None,
            )
            .unwrap()
            .is_none()
        );

        let hit = parse_state_command(
            &s, &mut table, &mut builder,
            "STATES(SPAWN)", "TROO:A:10:NORMAL:CHASE", 0, true, ACTIONS, false, None,
        )
        .unwrap();
        let (label, first) = hit.unwrap();
        assert_eq!(label, "SPAWN");
        let first = first.unwrap();
        assert_eq!(first, 1);

        // last frame of the command picked up the default IDLE redirector
        assert!(matches!(
            table.get(first).unwrap().next,
            StateLink::Redirect { .. }
        ));

        builder.finish(&mut table, &mut group).unwrap();
        // IDLE falls back to the SPAWN label, so the chain loops
        assert_eq!(table.get(first).unwrap().next, StateLink::Absolute(1));
    }

    #[test]
    fn become_action_defaults_to_idle() {
        let s = session();
        let mut table = StateTable::new();
        let mut builder = RangeBuilder::new();

        let idx = read_state(
            &s, &mut table, &mut builder,
            "TROO:A:1:NORMAL:BECOME(GOO)",
            "DEATH", 0, None, ACTIONS, false,
        )
        .unwrap()
        .unwrap();

        let Some(StateAction {
            arg: ActionArg::Become { kind, label, offset },
            ..
        }) = &table.get(idx).unwrap().action
        else {
            panic!("expected become");
        };
        assert_eq!(kind, &RefSlot::Name("GOO".to_string()));
        assert_eq!(label, "IDLE");
        assert_eq!(*offset, 0);
    }
}
