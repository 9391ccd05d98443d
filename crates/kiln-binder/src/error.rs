//! Error and diagnostic system for the Kiln binder.
//!
//! This module provides:
//! - [`BindError`], the typed failure returned by every binding operation
//! - Error codes for documentation and searchability
//! - [`Diagnostic`], the rendering form with labeled spans, help text and a
//!   source location, also used for non-fatal warnings
//! - Severity levels
//!
//! # Example
//!
//! ```
//! # use kiln_binder::error::{Diagnostic, ErrorCode};
//! # use kiln_core::{Location, Span};
//!
//! let diag = Diagnostic::error("`todir` is a required attribute of <copy>")
//!     .with_code(ErrorCode::E100)
//!     .with_location(Location::new("default.build", 7, 9))
//!     .with_label(Span::new(120..140), "missing `todir`")
//!     .with_help("add a `todir` attribute");
//! ```

mod bind_error;
mod diagnostic;
mod error_code;
mod label;
mod severity;

pub use bind_error::{BindError, Result};
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use severity::Severity;
