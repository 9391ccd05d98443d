//! Error types for Kiln operations.
//!
//! This module provides the main error type [`KilnError`] which wraps the
//! error conditions that can occur while loading a build file.

use std::io;

use thiserror::Error;

use kiln_binder::{BindError, Diagnostic, ErrorCode};
use kiln_core::{Location, Span};

use crate::project::PropertyError;

/// The main error type for Kiln operations.
///
/// # Diagnostic Variants
///
/// Every variant except `Io` points into the build file and carries its
/// source text, so it can be rendered with a source snippet through
/// [`KilnError::diagnostic`].
#[derive(Debug, Error)]
pub enum KilnError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed XML: {err}")]
    Xml {
        err: roxmltree::Error,
        location: Location,
        span: Span,
        src: String,
    },

    #[error("expected a <project> root element, found <{found}>")]
    NotAProject {
        found: String,
        location: Location,
        span: Span,
        src: String,
    },

    #[error("target `{name}` is declared more than once")]
    DuplicateTarget {
        name: String,
        location: Location,
        span: Span,
        first: Span,
        src: String,
    },

    #[error("default target `{name}` is not declared")]
    UnknownDefaultTarget {
        name: String,
        location: Location,
        span: Span,
        src: String,
    },

    #[error("{err}")]
    Property {
        err: PropertyError,
        location: Location,
        span: Span,
        src: String,
    },

    #[error("{err}")]
    Bind { err: BindError, src: String },
}

impl KilnError {
    /// Create a new `Bind` error with the associated source code.
    pub fn new_bind_error(err: BindError, src: impl Into<String>) -> Self {
        Self::Bind {
            err,
            src: src.into(),
        }
    }

    /// The error code, for errors located in the build file.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            KilnError::Io(_) => None,
            KilnError::Xml { .. } => Some(ErrorCode::E300),
            KilnError::NotAProject { .. } => Some(ErrorCode::E301),
            KilnError::DuplicateTarget { .. } => Some(ErrorCode::E302),
            KilnError::UnknownDefaultTarget { .. } => Some(ErrorCode::E303),
            KilnError::Property { .. } => Some(ErrorCode::E304),
            KilnError::Bind { err, .. } => Some(err.code()),
        }
    }

    /// Text of the build file the error points into.
    pub fn source_text(&self) -> Option<&str> {
        match self {
            KilnError::Io(_) => None,
            KilnError::Xml { src, .. }
            | KilnError::NotAProject { src, .. }
            | KilnError::DuplicateTarget { src, .. }
            | KilnError::UnknownDefaultTarget { src, .. }
            | KilnError::Property { src, .. }
            | KilnError::Bind { src, .. } => Some(src),
        }
    }

    /// The rendering form of errors located in the build file.
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        let located = |location: &Location| {
            let mut diagnostic = Diagnostic::error(self.to_string()).with_location(location.clone());
            if let Some(code) = self.code() {
                diagnostic = diagnostic.with_code(code);
            }
            diagnostic
        };

        let diagnostic = match self {
            KilnError::Io(_) => return None,
            KilnError::Bind { err, .. } => err.to_diagnostic(),
            KilnError::Xml { location, span, .. } => {
                located(location).with_label(*span, "not well-formed")
            }
            KilnError::NotAProject { location, span, .. } => located(location)
                .with_label(*span, "root element")
                .with_help("wrap the build file in a <project> element"),
            KilnError::DuplicateTarget {
                location,
                span,
                first,
                ..
            } => located(location)
                .with_label(*span, "declared again here")
                .with_secondary_label(*first, "first declared here")
                .with_help("target names must be unique within a build file"),
            KilnError::UnknownDefaultTarget { location, span, .. } => located(location)
                .with_label(*span, "unknown target")
                .with_help("name one of the targets declared in this build file"),
            KilnError::Property { location, span, .. } => located(location)
                .with_label(*span, "overwrites a read-only property")
                .with_help("remove `readonly=\"true\"` from the first definition or use `overwrite=\"false\"`"),
        };
        Some(diagnostic)
    }
}
