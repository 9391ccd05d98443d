//! The build context consulted while binding elements.
//!
//! The binding engine never interprets `${...}` references or maps byte
//! offsets to lines itself; it asks the owning [`Project`] to do both. The
//! project handle is shared across a whole element graph and owned by none
//! of its elements.

use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::{Location, Span};

/// Shared handle to the owning project of a build element.
pub type ProjectRef = Arc<dyn Project>;

/// The build context an element belongs to.
///
/// Implementations must be usable through a shared reference: binders only
/// ever see `&self`. Any mutable state (such as a property table) needs its
/// own synchronisation.
pub trait Project: fmt::Debug + Send + Sync {
    /// The project's name, if it declared one.
    fn name(&self) -> Option<&str> {
        None
    }

    /// Substitute property references inside raw attribute text.
    ///
    /// # Errors
    ///
    /// Returns an [`ExpansionError`] when the text references a property
    /// that cannot be resolved.
    fn expand_properties(&self, raw: &str, location: &Location) -> Result<String, ExpansionError>;

    /// The XML namespace build elements live in, or `None` for the empty
    /// namespace.
    fn namespace_uri(&self) -> Option<&str>;

    /// Map a byte span of the build file to a source location.
    ///
    /// Returns `None` when the span cannot be mapped.
    fn location_of(&self, span: Span) -> Option<Location>;
}

/// Failure of the property-expansion service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ExpansionError {
    message: String,
    property: Option<String>,
}

impl ExpansionError {
    /// A reference to a property that is not defined.
    pub fn undefined_property(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            message: format!("property `{name}` has not been set"),
            property: Some(name),
        }
    }

    /// Any other expansion failure, such as malformed reference syntax.
    pub fn other(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            property: None,
        }
    }

    /// The property that could not be resolved, if that was the cause.
    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }
}
