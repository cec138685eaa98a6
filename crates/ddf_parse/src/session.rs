//! The per-load parser session.
//!
//! All scratch state for one source parse lives here: the macro table, the
//! severity policy, and the diagnostic context (file, line, entry, raw line
//! text). Threading a session value through every parse function keeps the
//! parser reentrant and testable; exactly one session is live per load.

use ddf_foundation::{DiagPolicy, Error, ErrorContext, Result};

use crate::macros::MacroTable;

/// Scratch state for one source parse.
#[derive(Debug, Default)]
pub struct ParserSession {
    /// Severity policy and active content-format version.
    pub policy: DiagPolicy,
    /// `#DEFINE` macros, reset per source.
    pub macros: MacroTable,
    /// Name of the file or lump being parsed.
    pub source: String,
    /// Current line number (1-indexed).
    pub line: usize,
    /// Name of the entry currently being defined, in `[NAME]` form.
    pub entry: String,
    /// Raw text of the line currently being processed.
    pub line_data: String,
}

impl ParserSession {
    /// Creates a session with the given policy.
    #[must_use]
    pub fn new(policy: DiagPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Resets per-source state at the start of a new source.
    pub fn begin_source(&mut self, source: &str) {
        self.source = source.to_string();
        self.line = 1;
        self.entry.clear();
        self.line_data.clear();
        self.macros.clear();
    }

    /// Diagnostic context for the current parse position.
    #[must_use]
    pub fn context(&self) -> ErrorContext {
        let mut ctx = ErrorContext::new().with_source(&self.source).with_line(self.line);
        if !self.entry.is_empty() {
            ctx = ctx.with_entry(&self.entry);
        }
        if !self.line_data.is_empty() {
            ctx = ctx.with_line_data(&self.line_data);
        }
        ctx
    }

    /// Attaches the current context to a fatal error.
    #[must_use]
    pub fn fatal(&self, err: Error) -> Error {
        err.with_context(self.context())
    }

    /// Reports a plain warning (never fatal).
    pub fn warn(&self, message: &str) {
        if self.policy.warnings_enabled() {
            log::warn!("{message} ({})", self.context());
        }
    }

    /// Reports a warn-error: fatal under `strict`, a warning otherwise.
    pub fn warn_error(&self, err: Error) -> Result<()> {
        if self.policy.escalates() {
            Err(self.fatal(err))
        } else {
            self.warn(&err.to_string());
            Ok(())
        }
    }

    /// Reports a version-gated warn-error: fatal under `strict`, or once the
    /// content version reaches `threshold` and `lax` is off.
    pub fn warn_error_versioned(&self, threshold: i32, err: Error) -> Result<()> {
        if self.policy.escalates_at(threshold) {
            Err(self.fatal(err))
        } else {
            self.warn(&err.to_string());
            Ok(())
        }
    }

    /// Reports use of an obsolete field or value.
    pub fn obsolete(&self, what: &str) -> Result<()> {
        if !self.policy.obsoletes_enabled() {
            return Ok(());
        }
        self.warn_error_versioned(
            ddf_foundation::OBSOLETE_VERSION,
            Error::syntax(format!("{what} is obsolete")),
        )
    }
}
