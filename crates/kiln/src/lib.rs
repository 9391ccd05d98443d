//! Kiln - loads XML build files into typed, validated build elements.
//!
//! A build file is a `<project>` holding `<property>` definitions, `<target>`
//! elements and the tasks inside them. [`ProjectLoader`] parses the file,
//! binds every element through [`kiln_binder`] and returns a
//! [`LoadedProject`]. Nothing is executed; the loaded project is the
//! complete, checked configuration a build runner works from.

pub mod config;
pub mod properties;
pub mod tasks;
pub mod types;

mod error;
mod loader;
mod project;
mod source_map;
mod structure;
mod task_registry;

pub use kiln_binder::{BindError, BindOptions, Diagnostic, ErrorCode, UnknownPolicy};

pub use error::KilnError;
pub use loader::{LoadedProject, ProjectLoader};
pub use project::{BuildProject, PropertyError, PropertyOptions, PropertyUpdate};
pub use source_map::LineIndex;
pub use structure::{ProjectElement, Target};
pub use task_registry::TaskRegistry;
