//! Error adapter for converting Kiln errors and warnings to miette
//! diagnostics.
//!
//! This module provides the bridge between the library's error and
//! diagnostic types and miette's rich formatting used in the CLI. Errors
//! located in the build file are rendered with a snippet of it; I/O errors
//! are rendered as plain messages.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, Severity as MietteSeverity, SourceSpan};

use kiln::{Diagnostic, KilnError};
use kiln_binder::error::Severity;
use kiln_core::Span;

/// Adapter for a single Kiln diagnostic.
///
/// This adapter wraps a [`Diagnostic`] together with the build file it
/// points into and implements [`MietteDiagnostic`].
pub struct DiagnosticAdapter<'a> {
    diag: Diagnostic,
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(diag: Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }

    pub fn diagnostic(&self) -> &Diagnostic {
        &self.diag
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<MietteSeverity> {
        Some(match self.diag.severity() {
            Severity::Error => MietteSeverity::Error,
            Severity::Warning => MietteSeverity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for [`KilnError`] variants without a location in the build file.
pub struct ErrorAdapter<'a>(pub &'a KilnError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match &self.0 {
            KilnError::Io(_) => Some(Box::new("kiln::io")),
            _ => None,
        }
    }
}

/// A reportable error that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A rich diagnostic with source location information.
    Diagnostic(DiagnosticAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl<'a> Reportable<'a> {
    fn inner(&self) -> &(dyn MietteDiagnostic + 'a) {
        match self {
            Reportable::Diagnostic(d) => d,
            Reportable::Error(e) => e,
        }
    }
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.inner(), f)
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner().source()
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        self.inner().code()
    }

    fn severity(&self) -> Option<MietteSeverity> {
        self.inner().severity()
    }

    fn help<'b>(&'b self) -> Option<Box<dyn fmt::Display + 'b>> {
        self.inner().help()
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.inner().source_code()
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        self.inner().labels()
    }
}

fn span_to_miette(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Convert a [`KilnError`] into a reportable error.
///
/// Errors located in the build file become a [`Reportable::Diagnostic`]
/// rendered against the build file's text.
pub fn to_reportables(err: &KilnError) -> Vec<Reportable<'_>> {
    match (err.diagnostic(), err.source_text()) {
        (Some(diag), Some(src)) => vec![Reportable::Diagnostic(DiagnosticAdapter::new(diag, src))],
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

/// Convert binder warnings into reportables against the build file's text.
pub fn warnings_to_reportables<'a>(warnings: &[Diagnostic], src: &'a str) -> Vec<Reportable<'a>> {
    warnings
        .iter()
        .map(|w| Reportable::Diagnostic(DiagnosticAdapter::new(w.clone(), src)))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io;

    use kiln::{BindError, ErrorCode};
    use kiln_core::Location;

    use super::*;

    fn missing_attribute() -> KilnError {
        let err = BindError::MissingRequiredAttribute {
            attribute: "dir".to_string(),
            element: "mkdir".to_string(),
            location: Location::new("default.build", 1, 10),
            span: Span::new(9..17),
        };
        KilnError::new_bind_error(err, "<project><mkdir/></project>")
    }

    #[test]
    fn test_located_error_becomes_diagnostic() {
        let err = missing_attribute();

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Diagnostic(d) => {
                assert_eq!(d.to_string(), "`dir` is a required attribute of <mkdir>");
                assert_eq!(d.diagnostic().code(), Some(ErrorCode::E100));
                assert_eq!(d.severity(), Some(MietteSeverity::Error));
                assert_eq!(d.diagnostic().location().to_string(), "default.build:1:10");
            }
            Reportable::Error(_) => panic!("Expected Diagnostic"),
        }
    }

    #[test]
    fn test_io_error() {
        let err = KilnError::from(io::Error::new(io::ErrorKind::NotFound, "default.build"));

        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(e.to_string(), "I/O error: default.build");
                assert_eq!(e.code().unwrap().to_string(), "kiln::io");
            }
            Reportable::Diagnostic(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_warnings_keep_their_severity() {
        let warning = Diagnostic::warning("unexpected attribute `verbos` on <copy>")
            .with_code(ErrorCode::E105)
            .with_label(Span::new(6..12), "undeclared");

        let reportables = warnings_to_reportables(std::slice::from_ref(&warning), "<copy verbos=\"1\"/>");
        assert_eq!(reportables.len(), 1);
        assert_eq!(reportables[0].severity(), Some(MietteSeverity::Warning));
        assert_eq!(reportables[0].code().unwrap().to_string(), "E105");
    }

    #[test]
    fn test_primary_flag_on_labels() {
        let diag = Diagnostic::error("error with labels")
            .with_label(Span::new(0..5), "primary")
            .with_secondary_label(Span::new(10..15), "secondary");

        let adapter = DiagnosticAdapter::new(diag, "some source code");

        let labels: Vec<_> = adapter.labels().unwrap().collect();
        assert_eq!(labels.len(), 2);
        assert!(labels[0].primary());
        assert!(!labels[1].primary());
        assert_eq!(labels[1].label(), Some("secondary"));
    }
}
