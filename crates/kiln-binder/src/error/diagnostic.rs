//! The rendering form of Kiln errors and warnings.
//!
//! A [`Diagnostic`] represents a single error or warning with an optional
//! error code, a source location, labeled source spans and help text. Every
//! [`BindError`](crate::error::BindError) converts into one; warnings are
//! created directly.

use std::fmt;

use kiln_core::{Location, Span};

use crate::error::{ErrorCode, Label, Severity};

/// A rich diagnostic message with source location information.
///
/// # Example
///
/// ```text
/// error[E100]: `todir` is a required attribute of <copy>
///   --> default.build:7:9
///    |
///  7 |         <copy file="a.txt"/>
///    |         ^^^^^^^^^^^^^^^^^^^^ missing `todir`
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    location: Location,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use kiln_binder::error::{Diagnostic, ErrorCode};
    /// # use kiln_core::Span;
    ///
    /// let diag = Diagnostic::error("`name` is a required attribute of <target>")
    ///     .with_code(ErrorCode::E100)
    ///     .with_label(Span::new(0..10), "missing `name`");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use kiln_binder::error::{Diagnostic, ErrorCode};
    /// # use kiln_core::Span;
    ///
    /// let diag = Diagnostic::warning("unexpected attribute `verbos` on <copy>")
    ///     .with_code(ErrorCode::E105)
    ///     .with_label(Span::new(6..12), "not declared by <copy>")
    ///     .with_help("check the attribute name for typos");
    /// ```
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Where the diagnostic points; [`Location::unknown`] unless set.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Labels in the order they were added. The first one is normally the
    /// primary label.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn with_code(self, code: ErrorCode) -> Self {
        Self {
            code: Some(code),
            ..self
        }
    }

    pub fn with_location(self, location: Location) -> Self {
        Self { location, ..self }
    }

    /// Marks `span` as the offending text.
    pub fn with_label(self, span: Span, message: impl Into<String>) -> Self {
        self.labeled(Label::primary(span, message))
    }

    /// Points at context around the offending text.
    pub fn with_secondary_label(self, span: Span, message: impl Into<String>) -> Self {
        self.labeled(Label::secondary(span, message))
    }

    pub fn with_help(self, help: impl Into<String>) -> Self {
        Self {
            help: Some(help.into()),
            ..self
        }
    }

    fn labeled(mut self, label: Label) -> Self {
        self.labels.push(label);
        self
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            location: Location::unknown(),
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "{}[{code}]: {}", self.severity, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

impl std::error::Error for Diagnostic {}
