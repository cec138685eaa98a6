//! Error types for content-definition loading.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// Convenient result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for content-definition operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where in the source the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a syntax error.
    #[must_use]
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Syntax(message.into()))
    }

    /// Creates a bad-value error for a field.
    #[must_use]
    pub fn bad_value(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadValue {
            field: field.into(),
            value: value.into(),
        })
    }

    /// Creates an unknown-command error.
    #[must_use]
    pub fn unknown_command(command: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownCommand(command.into()))
    }

    /// Creates an unknown-reference error.
    #[must_use]
    pub fn unknown_reference(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownReference {
            kind: kind.into(),
            name: name.into(),
        })
    }

    /// Creates an unknown state-label error.
    #[must_use]
    pub fn unknown_label(label: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownLabel(label.into()))
    }

    /// Creates a directive error (`#DEFINE`, `#VERSION`, `#CLEARALL`).
    #[must_use]
    pub fn directive(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Directive(message.into()))
    }

    /// Creates a version error.
    #[must_use]
    pub fn bad_version(found: i32, max_supported: i32) -> Self {
        Self::new(ErrorKind::BadVersion {
            found,
            max_supported,
        })
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::new(ErrorKind::Io(source))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Malformed source text (tokenizer or driver level).
    #[error("syntax error: {0}")]
    Syntax(String),

    /// A field value could not be interpreted.
    #[error("bad value for {field}: {value}")]
    BadValue {
        /// The field being parsed.
        field: String,
        /// The offending value text.
        value: String,
    },

    /// Command not present in any field table for the entry kind.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A named cross-reference did not resolve.
    #[error("no such {kind}: {name}")]
    UnknownReference {
        /// The kind of definition referenced (thing, attack, sound, ...).
        kind: String,
        /// The name that failed to resolve.
        name: String,
    },

    /// A state label did not resolve within its definition.
    #[error("no such state label: {0}")]
    UnknownLabel(String),

    /// A `#`-directive was malformed or misplaced.
    #[error("directive error: {0}")]
    Directive(String),

    /// Declared content-format version is unusable.
    #[error("unsupported version {found} (max supported {max_supported})")]
    BadVersion {
        /// The version declared by the source.
        found: i32,
        /// The newest version this loader understands.
        max_supported: i32,
    },

    /// Underlying I/O failure while reading a source file.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where in the source an error occurred.
///
/// Mirrors what a load-time diagnostic prints: file, line number, the entry
/// being defined, and the raw line text.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Source file or lump name.
    pub source: Option<String>,
    /// Line number in source (1-indexed).
    pub line: Option<usize>,
    /// Name of the entry being defined when the error occurred.
    pub entry: Option<String>,
    /// The raw source line being processed.
    pub line_data: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source name.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the line number.
    #[must_use]
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// Sets the current entry name.
    #[must_use]
    pub fn with_entry(mut self, entry: impl Into<String>) -> Self {
        self.entry = Some(entry.into());
        self
    }

    /// Sets the raw line text.
    #[must_use]
    pub fn with_line_data(mut self, line_data: impl Into<String>) -> Self {
        self.line_data = Some(line_data.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "in {source}")?;
            if let Some(line) = self.line {
                write!(f, ":{line}")?;
            }
        }
        if let Some(entry) = &self.entry {
            write!(f, " [{entry}]")?;
        }
        if let Some(data) = &self.line_data {
            write!(f, " near '{data}'")?;
        }
        Ok(())
    }
}
