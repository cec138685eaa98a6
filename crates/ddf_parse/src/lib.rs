//! The DDF text parser: tokenizer, reading loop, and value scanners.
//!
//! This crate turns raw DDF source text into entry-lifecycle callbacks.
//! It knows the surface syntax (`<TAG>` headers, `[NAME]` entries,
//! `COMMAND=a,b,c;` bodies, `{}` remarks, `#`-directives, quoted strings)
//! but nothing about any particular definition kind; the kinds plug in
//! through the [`EntryReader`] trait and static [`Field`] tables.
//!
//! - [`driver`] - The outer reading loop and [`EntryReader`] trait
//! - [`tokenizer`] - The character-level state machine
//! - [`session`] - Per-load scratch state and diagnostics
//! - [`field`] - Command descriptor tables and dispatch
//! - [`scan`] - Value scanners (numbers, percentages, times, flags)
//! - [`states`] - State-frame command parsing
//! - [`macros`] - `#DEFINE` substitution

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod driver;
pub mod field;
pub mod macros;
pub mod scan;
pub mod session;
pub mod states;
pub mod tokenizer;


pub use driver::{EntryReader, read_source};
pub use field::{Field, FieldKind, SetFn, SubFn, parse_field};
pub use macros::MacroTable;
pub use scan::{
    CheckFlag, SpecialFlag, TICRATE, check_special_flag, decode_brackets, decode_list,
    get_angle, get_bitset, get_boolean, get_float, get_lump_name, get_numeric, get_percent,
    get_percent_any, get_rgb, get_slope, get_string, get_time,
};
pub use session::ParserSession;
pub use states::{ActionDef, ArgKind, parse_state_command, read_state};
pub use tokenizer::{CharEvent, Status, Tokenizer};
