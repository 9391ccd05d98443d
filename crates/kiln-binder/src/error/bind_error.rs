//! The error type produced when a build-file node cannot be bound.

use kiln_core::{ExpansionError, Location, Span};
use thiserror::Error;

use crate::{
    descriptor::DescriptorError,
    error::{Diagnostic, ErrorCode},
    validate::ValidationError,
};

/// A type alias for `Result<T, BindError>`.
pub type Result<T> = std::result::Result<T, BindError>;

/// Failure to bind an XML node to a build element.
///
/// Every variant carries the [`Location`] of the offending node and the byte
/// [`Span`] of the most specific piece of source at fault (the attribute
/// value when there is one, the element otherwise).
///
/// [`NullElementProperty`](BindError::NullElementProperty) and
/// [`MalformedType`](BindError::MalformedType) are configuration defects in an
/// element type definition; all other variants are mistakes in the build
/// file. Both kinds terminate the build.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("`{attribute}` is a required attribute of <{element}>")]
    MissingRequiredAttribute {
        attribute: String,
        element: String,
        location: Location,
        span: Span,
    },

    #[error("`{element}` is a required element of <{parent}>")]
    MissingRequiredElement {
        element: String,
        parent: String,
        location: Location,
        span: Span,
    },

    #[error("invalid value for `{attribute}` on <{element}>: {cause}")]
    ValidationFailed {
        element: String,
        attribute: String,
        cause: ValidationError,
        location: Location,
        span: Span,
    },

    #[error("cannot convert `{raw}` to {target} for attribute `{attribute}`")]
    AttributeCoercionFailed {
        attribute: String,
        raw: String,
        target: &'static str,
        location: Location,
        span: Span,
    },

    #[error("`{raw}` is not a valid value for `{attribute}`; valid values are: {}", .valid.join(", "))]
    InvalidEnumValue {
        attribute: String,
        raw: String,
        valid: Vec<&'static str>,
        location: Location,
        span: Span,
    },

    #[error("cannot expand `{attribute}` on <{element}>: {source}")]
    PropertyExpansion {
        element: String,
        attribute: String,
        #[source]
        source: ExpansionError,
        location: Location,
        span: Span,
    },

    #[error("unexpected attribute `{attribute}` on <{element}>")]
    UnexpectedAttribute {
        attribute: String,
        element: String,
        location: Location,
        span: Span,
    },

    #[error("unexpected element <{element}> in <{parent}>")]
    UnexpectedElement {
        element: String,
        parent: String,
        location: Location,
        span: Span,
    },

    #[error("<{element}> is invalid: {message}")]
    InitializationFailed {
        element: String,
        message: String,
        location: Location,
        span: Span,
    },

    #[error("nested element field `{field}` of <{element}> holds no instance to bind into")]
    NullElementProperty {
        element: String,
        field: &'static str,
        location: Location,
        span: Span,
    },

    #[error("element type <{element}> is malformed: {source}")]
    MalformedType {
        element: String,
        #[source]
        source: DescriptorError,
        location: Location,
        span: Span,
    },
}

impl BindError {
    /// The error code identifying this kind of failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            BindError::MissingRequiredAttribute { .. } => ErrorCode::E100,
            BindError::ValidationFailed { .. } => ErrorCode::E101,
            BindError::AttributeCoercionFailed { .. } => ErrorCode::E102,
            BindError::InvalidEnumValue { .. } => ErrorCode::E103,
            BindError::PropertyExpansion { .. } => ErrorCode::E104,
            BindError::UnexpectedAttribute { .. } => ErrorCode::E105,
            BindError::MissingRequiredElement { .. } => ErrorCode::E200,
            BindError::UnexpectedElement { .. } => ErrorCode::E201,
            BindError::InitializationFailed { .. } => ErrorCode::E202,
            BindError::NullElementProperty { .. } => ErrorCode::E900,
            BindError::MalformedType { .. } => ErrorCode::E901,
        }
    }

    /// Where in the build file the failure occurred.
    pub fn location(&self) -> &Location {
        match self {
            BindError::MissingRequiredAttribute { location, .. }
            | BindError::MissingRequiredElement { location, .. }
            | BindError::ValidationFailed { location, .. }
            | BindError::AttributeCoercionFailed { location, .. }
            | BindError::InvalidEnumValue { location, .. }
            | BindError::PropertyExpansion { location, .. }
            | BindError::UnexpectedAttribute { location, .. }
            | BindError::UnexpectedElement { location, .. }
            | BindError::InitializationFailed { location, .. }
            | BindError::NullElementProperty { location, .. }
            | BindError::MalformedType { location, .. } => location,
        }
    }

    /// Byte span of the source at fault.
    pub fn span(&self) -> Span {
        match self {
            BindError::MissingRequiredAttribute { span, .. }
            | BindError::MissingRequiredElement { span, .. }
            | BindError::ValidationFailed { span, .. }
            | BindError::AttributeCoercionFailed { span, .. }
            | BindError::InvalidEnumValue { span, .. }
            | BindError::PropertyExpansion { span, .. }
            | BindError::UnexpectedAttribute { span, .. }
            | BindError::UnexpectedElement { span, .. }
            | BindError::InitializationFailed { span, .. }
            | BindError::NullElementProperty { span, .. }
            | BindError::MalformedType { span, .. } => *span,
        }
    }

    /// Returns `true` if the failure is a defect in an element type
    /// definition rather than in the build file.
    pub fn is_configuration_defect(&self) -> bool {
        self.code().is_configuration_defect()
    }

    /// A suggestion for fixing the failure, if there is a useful one.
    pub fn help(&self) -> Option<String> {
        match self {
            BindError::MissingRequiredAttribute { attribute, .. } => {
                Some(format!("add a `{attribute}` attribute"))
            }
            BindError::MissingRequiredElement { element, .. } => {
                Some(format!("add at least one <{element}> element"))
            }
            BindError::InvalidEnumValue { valid, .. } => Some(format!(
                "valid values are: {} (names are case-sensitive)",
                valid.join(", ")
            )),
            BindError::AttributeCoercionFailed { target, .. } => Some(format!(
                "the value must be a valid {target}; numbers use `.` as decimal point and no digit grouping"
            )),
            BindError::PropertyExpansion { source, .. } => source
                .property()
                .map(|name| format!("define the `{name}` property before it is used")),
            BindError::UnexpectedAttribute { .. } | BindError::UnexpectedElement { .. } => {
                Some("check the name for typos".to_string())
            }
            BindError::NullElementProperty { .. } | BindError::MalformedType { .. } => {
                Some("this is a bug in the element type definition, not in the build file".to_string())
            }
            BindError::ValidationFailed { .. } | BindError::InitializationFailed { .. } => None,
        }
    }

    /// A short description attached to the primary label.
    fn label(&self) -> String {
        match self {
            BindError::MissingRequiredAttribute { attribute, .. } => format!("missing `{attribute}`"),
            BindError::MissingRequiredElement { element, .. } => format!("missing <{element}>"),
            BindError::ValidationFailed { .. } => "rejected value".to_string(),
            BindError::AttributeCoercionFailed { target, .. } => format!("not a valid {target}"),
            BindError::InvalidEnumValue { .. } => "invalid value".to_string(),
            BindError::PropertyExpansion { .. } => "unresolved property".to_string(),
            BindError::UnexpectedAttribute { .. } => "unknown attribute".to_string(),
            BindError::UnexpectedElement { .. } => "unknown element".to_string(),
            BindError::InitializationFailed { .. } => "invalid element".to_string(),
            BindError::NullElementProperty { .. } | BindError::MalformedType { .. } => {
                "while binding this element".to_string()
            }
        }
    }

    /// Convert into the rendering form.
    pub fn to_diagnostic(&self) -> Diagnostic {
        self.fill_diagnostic(Diagnostic::error(self.to_string()))
    }

    /// Convert into a warning, for failures a policy downgraded to advisory.
    pub fn to_warning(&self) -> Diagnostic {
        self.fill_diagnostic(Diagnostic::warning(self.to_string()))
    }

    fn fill_diagnostic(&self, diagnostic: Diagnostic) -> Diagnostic {
        let diagnostic = diagnostic
            .with_code(self.code())
            .with_location(self.location().clone())
            .with_label(self.span(), self.label());

        match self.help() {
            Some(help) => diagnostic.with_help(help),
            None => diagnostic,
        }
    }
}

impl From<&BindError> for Diagnostic {
    fn from(err: &BindError) -> Self {
        err.to_diagnostic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location() -> Location {
        Location::new("default.build", 4, 9)
    }

    #[test]
    fn test_missing_required_attribute_message() {
        let err = BindError::MissingRequiredAttribute {
            attribute: "name".to_string(),
            element: "task".to_string(),
            location: location(),
            span: Span::new(40..48),
        };

        assert_eq!(err.to_string(), "`name` is a required attribute of <task>");
        assert_eq!(err.code(), ErrorCode::E100);
        assert_eq!(err.location().to_string(), "default.build:4:9");
        assert_eq!(err.span(), Span::new(40..48));
        assert!(!err.is_configuration_defect());
    }

    #[test]
    fn test_invalid_enum_value_lists_every_value() {
        let err = BindError::InvalidEnumValue {
            attribute: "configuration".to_string(),
            raw: "DEBUG".to_string(),
            valid: vec!["Debug", "Release"],
            location: location(),
            span: Span::default(),
        };

        assert_eq!(
            err.to_string(),
            "`DEBUG` is not a valid value for `configuration`; valid values are: Debug, Release"
        );
    }

    #[test]
    fn test_configuration_defects() {
        let err = BindError::NullElementProperty {
            element: "copy".to_string(),
            field: "fileset",
            location: Location::unknown(),
            span: Span::default(),
        };

        assert!(err.is_configuration_defect());
        assert_eq!(err.code(), ErrorCode::E900);
        assert!(err.help().is_some_and(|help| help.contains("bug")));
    }

    #[test]
    fn test_to_diagnostic() {
        let err = BindError::AttributeCoercionFailed {
            attribute: "retries".to_string(),
            raw: "1,5".to_string(),
            target: "integer",
            location: location(),
            span: Span::new(12..15),
        };

        let diag = err.to_diagnostic();

        assert!(diag.severity().is_error());
        assert_eq!(diag.code(), Some(ErrorCode::E102));
        assert_eq!(diag.location(), &location());
        assert_eq!(diag.labels().len(), 1);
        assert_eq!(diag.labels()[0].span(), Span::new(12..15));
        assert!(diag.help().is_some());
        assert_eq!(
            diag.message(),
            "cannot convert `1,5` to integer for attribute `retries`"
        );
    }

    #[test]
    fn test_to_warning() {
        let err = BindError::UnexpectedAttribute {
            attribute: "verbos".to_string(),
            element: "copy".to_string(),
            location: location(),
            span: Span::new(3..9),
        };

        let diag = err.to_warning();

        assert!(diag.severity().is_warning());
        assert_eq!(diag.code(), Some(ErrorCode::E105));
        assert_eq!(diag.to_string(), "warning[E105]: unexpected attribute `verbos` on <copy>");
    }

    #[test]
    fn test_property_expansion_help_names_property() {
        let err = BindError::PropertyExpansion {
            element: "echo".to_string(),
            attribute: "message".to_string(),
            source: ExpansionError::undefined_property("version"),
            location: location(),
            span: Span::default(),
        };

        assert_eq!(
            err.help().as_deref(),
            Some("define the `version` property before it is used")
        );
    }
}
