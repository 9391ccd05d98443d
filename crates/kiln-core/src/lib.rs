//! Kiln Core Types
//!
//! This crate provides the foundational types shared by the Kiln build-file
//! binding engine and everything built on top of it. It includes:
//!
//! - **Spans**: Byte ranges into a build file ([`span::Span`])
//! - **Locations**: Human-readable `file:line:col` references ([`location::Location`])
//! - **Element metadata**: The per-instance state every bindable build object
//!   carries ([`element::ElementMeta`], [`element::Parent`], [`element::SourceNode`])
//! - **Project**: The build context collaborator consulted while binding
//!   ([`project::Project`])

pub mod element;
pub mod location;
pub mod project;
pub mod span;

pub use element::{ElementMeta, OwnerInfo, Parent, SourceNode};
pub use location::Location;
pub use project::{ExpansionError, Project, ProjectRef};
pub use span::Span;
