//! Source locations attached to build elements and errors.

use std::{fmt, sync::Arc};

/// A `file:line:col` reference into a build file.
///
/// Lines and columns are 1-based. A location that could not be resolved is
/// represented by [`Location::unknown`], which renders as `unknown`; an
/// unresolvable location never aborts binding.
///
/// # Examples
///
/// ```
/// use kiln_core::Location;
///
/// let location = Location::new("default.build", 12, 5);
/// assert_eq!(location.to_string(), "default.build:12:5");
/// assert_eq!(Location::unknown().to_string(), "unknown");
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    position: Option<Position>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct Position {
    file: Arc<str>,
    line: u32,
    column: u32,
}

impl Location {
    /// Create a resolved location.
    pub fn new(file: impl Into<Arc<str>>, line: u32, column: u32) -> Self {
        Self {
            position: Some(Position {
                file: file.into(),
                line,
                column,
            }),
        }
    }

    /// The sentinel used when a source location cannot be determined.
    pub fn unknown() -> Self {
        Self { position: None }
    }

    /// Returns `true` if this is the unknown sentinel.
    pub fn is_unknown(&self) -> bool {
        self.position.is_none()
    }

    /// The build file name, if known.
    pub fn file(&self) -> Option<&str> {
        self.position.as_ref().map(|p| p.file.as_ref())
    }

    /// The 1-based line, if known.
    pub fn line(&self) -> Option<u32> {
        self.position.as_ref().map(|p| p.line)
    }

    /// The 1-based column, if known.
    pub fn column(&self) -> Option<u32> {
        self.position.as_ref().map(|p| p.column)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.position {
            Some(p) => write!(f, "{}:{}:{}", p.file, p.line, p.column),
            None => write!(f, "unknown"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolved_location() {
        let location = Location::new("build.xml", 3, 14);

        assert!(!location.is_unknown());
        assert_eq!(location.file(), Some("build.xml"));
        assert_eq!(location.line(), Some(3));
        assert_eq!(location.column(), Some(14));
        assert_eq!(location.to_string(), "build.xml:3:14");
    }

    #[test]
    fn test_unknown_location() {
        let location = Location::unknown();

        assert!(location.is_unknown());
        assert_eq!(location.file(), None);
        assert_eq!(location.line(), None);
        assert_eq!(location.to_string(), "unknown");
    }

    #[test]
    fn test_default_is_unknown() {
        assert_eq!(Location::default(), Location::unknown());
    }
}
