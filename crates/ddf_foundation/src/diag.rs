//! Diagnostics policy: how recoverable problems escalate to fatal errors.
//!
//! Three severities exist at the point a problem is detected:
//! outright errors (always fatal), warn-errors (fatal only under certain
//! policies), and warnings (never fatal). Warn-errors come in two shapes:
//! unconditional ones, which escalate only under `strict`, and versioned
//! ones, which also escalate when the declared content-format version
//! meets a threshold and the user has not asked for lax treatment.

/// Content-format version at which obsolete fields become warn-errors.
///
/// Versions are whole numbers: `1.28` in source text is stored as `128`.
pub const OBSOLETE_VERSION: i32 = 128;

/// Oldest content-format version the loader accepts.
pub const MIN_VERSION: i32 = 123;

/// Newest content-format version the loader understands.
pub const MAX_VERSION: i32 = 131;

/// Version assumed for sources that carry no `#VERSION` directive.
pub const DEFAULT_VERSION: i32 = 128;

/// User-selectable severity policy, fixed for the duration of a load.
#[derive(Debug, Clone, Copy)]
pub struct DiagPolicy {
    /// Treat every warn-error as fatal.
    pub strict: bool,
    /// Never escalate version-gated warn-errors; substitute defaults for
    /// unresolvable references instead of aborting.
    pub lax: bool,
    /// Suppress plain warnings entirely.
    pub no_warnings: bool,
    /// Suppress obsolete-field diagnostics entirely.
    pub no_obsoletes: bool,
    /// Declared content-format version of the current source.
    pub version: i32,
}

impl Default for DiagPolicy {
    fn default() -> Self {
        Self {
            strict: false,
            lax: false,
            no_warnings: false,
            no_obsoletes: false,
            version: DEFAULT_VERSION,
        }
    }
}

impl DiagPolicy {
    /// Whether an unconditional warn-error is fatal under this policy.
    #[must_use]
    pub fn escalates(&self) -> bool {
        self.strict
    }

    /// Whether a version-gated warn-error is fatal under this policy.
    #[must_use]
    pub fn escalates_at(&self, threshold: i32) -> bool {
        self.strict || (self.version >= threshold && !self.lax)
    }

    /// Whether plain warnings should be reported at all.
    #[must_use]
    pub fn warnings_enabled(&self) -> bool {
        !self.no_warnings
    }

    /// Whether obsolete-field diagnostics should be reported at all.
    #[must_use]
    pub fn obsoletes_enabled(&self) -> bool {
        !self.no_obsoletes
    }
}
