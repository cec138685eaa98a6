//! The global state table and the deferred link resolver.
//!
//! Animation frames ("states") from every definition live in one growable
//! table; each definition records which ranges of the table belong to it.
//! While an entry is being read, next-state references are symbolic: a
//! state either falls through to its neighbour, terminates, or names a
//! label ("redirector") that cannot be resolved until the whole entry has
//! been seen. [`RangeBuilder::finish`] rewrites every link to an absolute
//! table index.

use ddf_foundation::{Error, Result, names_equal};

use crate::base::RefSlot;

/// Index of the reserved null state (object removal / no frames).
pub const NULL_STATE: usize = 0;

/// Interned sprite names with a most-recently-used cache.
///
/// Consecutive states nearly always share a sprite, so the last interned
/// name is checked before the linear scan.
#[derive(Debug, Default)]
pub struct SpriteNames {
    names: Vec<String>,
    last: Option<usize>,
}

impl SpriteNames {
    /// Interns a sprite name, returning its index.
    pub fn intern(&mut self, name: &str) -> usize {
        if let Some(last) = self.last {
            if names_equal(&self.names[last], name) {
                return last;
            }
        }
        let idx = match self.names.iter().position(|n| names_equal(n, name)) {
            Some(idx) => idx,
            None => {
                self.names.push(name.to_string());
                self.names.len() - 1
            }
        };
        self.last = Some(idx);
        idx
    }

    /// Returns the name at the given index.
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.names.get(idx).map(String::as_str)
    }

    /// Number of distinct sprite names seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no sprite names have been interned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A next-state reference.
///
/// Symbolic variants exist only between `begin_range` and `finish`; a
/// finished table contains only `Absolute` links.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StateLink {
    /// Advance to the following state, or terminate at the range end.
    #[default]
    FallThrough,
    /// Explicit termination (`#REMOVE`).
    Remove,
    /// Jump to `offset` states past a named label, resolved at link time.
    Redirect {
        /// Index into the range's redirector name table.
        redir: usize,
        /// 0-based offset from the labelled state.
        offset: usize,
    },
    /// Resolved table index.
    Absolute(usize),
}

/// Parsed payload of a state's action.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionArg {
    /// No argument.
    None,
    /// Plain integer argument.
    Int(i32),
    /// Two integers (`X,Y` style arguments).
    IntPair(i32, i32),
    /// Floating-point argument.
    Float(f32),
    /// An attack reference, resolved by the cleanup pass.
    Attack(RefSlot),
    /// A thing reference, resolved by the cleanup pass.
    Thing(RefSlot),
    /// A sound reference, resolved by the cleanup pass.
    Sound(RefSlot),
    /// Jump probability; the target sits in the state's `jump` link.
    JumpChance(f32),
    /// Morph into another thing kind, starting at the given label.
    Become {
        /// The target thing kind, resolved by the cleanup pass.
        kind: RefSlot,
        /// Start label within the target (defaults to IDLE).
        label: String,
        /// 0-based offset from the labelled state.
        offset: usize,
    },
    /// Uninterpreted text argument.
    Text(String),
}

/// An action attached to a state: a code-pointer name plus parsed payload.
#[derive(Debug, Clone, PartialEq)]
pub struct StateAction {
    /// Canonical action name from the kind's action table.
    pub name: &'static str,
    /// Parsed argument payload.
    pub arg: ActionArg,
}

/// One animation frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    /// Index into the sprite name table.
    pub sprite: usize,
    /// 0-based frame within the sprite (`A` is 0).
    pub frame: i32,
    /// Duration in tics; negative means forever.
    pub tics: i32,
    /// Brightness level 0-255 (0 = ambient lighting).
    pub bright: i32,
    /// Set for weapon (screen-space) frames.
    pub weapon: bool,
    /// Label carried by the first state of each labelled block.
    pub label: Option<String>,
    /// Action fired when the state is entered.
    pub action: Option<StateAction>,
    /// Next state in the chain.
    pub next: StateLink,
    /// Branch target used by jump-style actions.
    pub jump: StateLink,
}

/// A contiguous run of states belonging to one definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateRange {
    /// First table index of the run.
    pub first: usize,
    /// Last table index of the run (inclusive).
    pub last: usize,
}

/// All state ranges owned by one definition.
pub type StateGroup = Vec<StateRange>;

/// The global table of states.
#[derive(Debug)]
pub struct StateTable {
    states: Vec<State>,
    /// Sprite names referenced by the states.
    pub sprites: SpriteNames,
}

impl StateTable {
    /// Creates a table holding only the reserved null state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            states: vec![State::default()],
            sprites: SpriteNames::default(),
        }
    }

    /// Number of states, null state included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always false: the null state is permanent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the state at the given index.
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&State> {
        self.states.get(idx)
    }

    /// Mutable access to the state at the given index.
    pub fn get_mut(&mut self, idx: usize) -> Option<&mut State> {
        self.states.get_mut(idx)
    }

    /// Appends a state, returning its index.
    pub fn push(&mut self, state: State) -> usize {
        self.states.push(state);
        self.states.len() - 1
    }

    /// Iterates over all states.
    pub fn iter(&self) -> impl Iterator<Item = &State> {
        self.states.iter()
    }

    /// Finds the state carrying the given label within a group.
    ///
    /// Ranges are searched newest-first so later additions shadow earlier
    /// ones. An unmatched `IDLE` retries as `SPAWN`, the label older
    /// content uses for the same chain.
    #[must_use]
    pub fn find_label(&self, group: &StateGroup, label: &str) -> Option<usize> {
        for range in group.iter().rev() {
            for i in (range.first..=range.last).rev() {
                if let Some(l) = &self.states[i].label {
                    if names_equal(l, label) {
                        return Some(i);
                    }
                }
            }
        }

        if names_equal(label, "IDLE") {
            return self.find_label(group, "SPAWN");
        }

        None
    }
}

impl Default for StateTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether any range in a group covers the given state index.
#[must_use]
pub fn group_has_state(group: &StateGroup, idx: usize) -> bool {
    group.iter().any(|r| r.first <= idx && idx <= r.last)
}

/// Link-resolution scratch for one entry's worth of states.
///
/// Created when an entry opens, fed every state the entry defines, and
/// consumed by [`finish`](Self::finish) which appends the completed range
/// to the entry's group and rewrites symbolic links.
#[derive(Debug, Default)]
pub struct RangeBuilder {
    first: Option<usize>,
    last: usize,
    redirs: Vec<String>,
}

impl RangeBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any states have been recorded.
    #[must_use]
    pub fn has_states(&self) -> bool {
        self.first.is_some()
    }

    /// Table index of the most recently recorded state.
    #[must_use]
    pub fn last_state(&self) -> Option<usize> {
        self.first.map(|_| self.last)
    }

    /// Finds or adds a redirector name, returning its index.
    pub fn redirector(&mut self, name: &str) -> usize {
        if let Some(idx) = self.redirs.iter().position(|r| names_equal(r, name)) {
            return idx;
        }
        self.redirs.push(name.to_string());
        self.redirs.len() - 1
    }

    /// Records a state just pushed onto the table.
    pub fn note_state(&mut self, idx: usize) {
        if self.first.is_none() {
            self.first = Some(idx);
        }
        self.last = idx;
    }

    /// Closes the range: appends it to the group and resolves every
    /// symbolic link in it to an absolute index.
    ///
    /// A builder that saw no states leaves the group untouched.
    pub fn finish(self, table: &mut StateTable, group: &mut StateGroup) -> Result<()> {
        let Some(first) = self.first else {
            return Ok(());
        };
        let range = StateRange {
            first,
            last: self.last,
        };
        group.push(range);

        for i in range.first..=range.last {
            let link = table.states[i].next.clone();
            table.states[i].next = self.resolve(table, group, &link, i, range)?;
            let link = table.states[i].jump.clone();
            table.states[i].jump = self.resolve(table, group, &link, i, range)?;
        }
        Ok(())
    }

    fn resolve(
        &self,
        table: &StateTable,
        group: &StateGroup,
        link: &StateLink,
        idx: usize,
        range: StateRange,
    ) -> Result<StateLink> {
        let target = match link {
            StateLink::Remove => NULL_STATE,
            StateLink::FallThrough => {
                if idx == range.last {
                    NULL_STATE
                } else {
                    idx + 1
                }
            }
            StateLink::Redirect { redir, offset } => {
                let name = &self.redirs[*redir];
                let base = table
                    .find_label(group, name)
                    .ok_or_else(|| Error::unknown_label(name.clone()))?;
                base + offset
            }
            StateLink::Absolute(n) => *n,
        };
        Ok(StateLink::Absolute(target))
    }
}
