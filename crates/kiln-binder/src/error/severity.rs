//! How serious a diagnostic is.

use std::fmt;

/// Severity of a [`Diagnostic`](crate::error::Diagnostic).
///
/// Ordered so that `Warning < Error`; the most severe of a set of
/// diagnostics is their maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Reported, but the build element is still usable. Undeclared
    /// attributes and elements under the `warn` policy end up here.
    Warning,

    /// The build cannot go on.
    Error,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        *self == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        *self == Severity::Warning
    }

    /// Lowercase name used as the diagnostic prefix.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
