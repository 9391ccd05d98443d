//! Error codes for the Kiln diagnostic system.
//!
//! Error codes are organized by the part of the build file at fault:
//! - `E1xx` - Attribute errors
//! - `E2xx` - Element errors
//! - `E3xx` - Build-file structure errors reported while loading a project
//! - `E9xx` - Configuration defects in an element type definition
//!
//! `E9xx` codes never point at a mistake in the user's build file; they mean
//! a build element type was declared incorrectly.

use std::fmt;

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Attribute Errors (E1xx)
    // =========================================================================
    /// Missing required attribute.
    ///
    /// An attribute declared as required was not present on the element.
    E100,

    /// Attribute validation failed.
    ///
    /// A validator registered for the attribute rejected its value.
    E101,

    /// Attribute conversion failed.
    ///
    /// The attribute value could not be converted to the field's type,
    /// for example `count="ten"` on an integer attribute.
    E102,

    /// Invalid enumeration value.
    ///
    /// The attribute value is not one of the allowed names. Names are matched
    /// case-sensitively.
    E103,

    /// Property expansion failed.
    ///
    /// The attribute value references a property that could not be resolved.
    E104,

    /// Unexpected attribute.
    ///
    /// The element does not declare an attribute with this name.
    E105,

    // =========================================================================
    // Element Errors (E2xx)
    // =========================================================================
    /// Missing required element.
    ///
    /// A nested element declared as required was not present, or a required
    /// element array had no entries.
    E200,

    /// Unexpected element.
    ///
    /// The element does not declare a nested element with this name, or the
    /// name does not refer to a known task.
    E201,

    /// Element initialization failed.
    ///
    /// All attributes and nested elements were bound, but the element rejected
    /// the resulting combination of values.
    E202,

    // =========================================================================
    // Build-File Structure Errors (E3xx)
    // =========================================================================
    /// Malformed XML.
    ///
    /// The build file is not well-formed XML.
    E300,

    /// Missing project root.
    ///
    /// The root element of the build file is not `<project>` in the expected
    /// namespace.
    E301,

    /// Duplicate target.
    ///
    /// Two targets in one build file have the same name.
    E302,

    /// Unknown default target.
    ///
    /// The project's `default` attribute names a target that is not declared.
    E303,

    /// Read-only property.
    ///
    /// A `<property>` tried to overwrite a property declared read-only.
    E304,

    // =========================================================================
    // Configuration Defects (E9xx)
    // =========================================================================
    /// Nested element field not allocated.
    ///
    /// A field bound to a nested element held no instance to populate.
    E900,

    /// Malformed element type.
    ///
    /// The descriptor table of an element type is inconsistent, for example
    /// two fields bound to the same attribute name.
    E901,
}

impl ErrorCode {
    /// Returns `true` for codes that indicate a defect in an element type
    /// definition rather than in a build file.
    pub fn is_configuration_defect(&self) -> bool {
        matches!(self, ErrorCode::E900 | ErrorCode::E901)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E100.to_string(), "E100");
        assert_eq!(ErrorCode::E201.to_string(), "E201");
        assert_eq!(ErrorCode::E304.to_string(), "E304");
        assert_eq!(ErrorCode::E901.to_string(), "E901");
    }

    #[test]
    fn test_configuration_defect_codes() {
        assert!(ErrorCode::E900.is_configuration_defect());
        assert!(ErrorCode::E901.is_configuration_defect());
        assert!(!ErrorCode::E100.is_configuration_defect());
        assert!(!ErrorCode::E200.is_configuration_defect());
    }
}
