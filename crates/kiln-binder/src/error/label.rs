//! Spans of the build file a diagnostic points at.

use kiln_core::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Emphasis {
    Primary,
    Secondary,
}

/// A message attached to a span of the build file.
///
/// The primary label marks the offending text itself, e.g. an attribute
/// value. Secondary labels point at surrounding context such as the element
/// that owns the attribute, or the first definition of a duplicated target.
///
/// ```text
/// error[E103]: `DEBUG` is not a valid value for `configuration`
///   --> default.build:4:20
///    |
///  4 |   <solution configuration="DEBUG">
///    |                           ^^^^^^^ invalid value
///    = help: valid values are: Debug, Release
/// ```
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
    emphasis: Emphasis,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self::with_emphasis(span, message.into(), Emphasis::Primary)
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self::with_emphasis(span, message.into(), Emphasis::Secondary)
    }

    fn with_emphasis(span: Span, message: String, emphasis: Emphasis) -> Self {
        Self {
            span,
            message,
            emphasis,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.emphasis == Emphasis::Primary
    }

    pub fn is_secondary(&self) -> bool {
        self.emphasis == Emphasis::Secondary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_emphasis() {
        let value = Label::primary(Span::new(10..20), "invalid value");
        let owner = Label::secondary(Span::new(5..25), "in this element");

        assert_eq!(value.span(), Span::new(10..20));
        assert_eq!(value.message(), "invalid value");
        assert!(value.is_primary() && !value.is_secondary());
        assert!(owner.is_secondary() && !owner.is_primary());
    }
}
