//! # Kiln Binder
//!
//! Populates strongly-typed build elements from the XML nodes of a Kiln
//! build file. Element types declare their bindable fields once through
//! [`Element::describe`]; the [`Binder`] then walks a node, expands property
//! references through the owning project, validates and converts attribute
//! text, recurses into nested elements and reports the first problem as a
//! located [`BindError`].
//!
//! ## Usage
//!
//! ```
//! # use std::sync::Arc;
//! # use kiln_binder::{Binder, Describer, Element, ElementKind};
//! # use kiln_core::{ElementMeta, ExpansionError, Location, Project, Span};
//! #
//! # #[derive(Debug)]
//! # struct Plain;
//! #
//! # impl Project for Plain {
//! #     fn expand_properties(&self, raw: &str, _: &Location) -> Result<String, ExpansionError> {
//! #         Ok(raw.to_string())
//! #     }
//! #     fn namespace_uri(&self) -> Option<&str> {
//! #         None
//! #     }
//! #     fn location_of(&self, _: Span) -> Option<Location> {
//! #         None
//! #     }
//! # }
//! #[derive(Debug, Default)]
//! struct Touch {
//!     meta: ElementMeta,
//!     file: String,
//! }
//!
//! impl Element for Touch {
//!     const NAME: &'static str = "touch";
//!     const KIND: ElementKind = ElementKind::Task;
//!
//!     fn describe(d: &mut Describer<Self>) {
//!         d.attribute("file", "file", |t: &mut Touch, v: String| t.file = v)
//!             .required();
//!     }
//!
//!     fn meta(&self) -> &ElementMeta {
//!         &self.meta
//!     }
//!
//!     fn meta_mut(&mut self) -> &mut ElementMeta {
//!         &mut self.meta
//!     }
//! }
//!
//! let document = roxmltree::Document::parse(r#"<touch file="stamp.txt"/>"#).unwrap();
//! let mut binder = Binder::new(Arc::new(Plain));
//! let mut touch = Touch::default();
//!
//! binder.bind(&mut touch, document.root_element())?;
//! assert_eq!(touch.file, "stamp.txt");
//! # Ok::<(), kiln_binder::BindError>(())
//! ```

mod binder;
pub mod coerce;
pub mod descriptor;
mod element;
pub mod error;
mod registry;
pub mod validate;

pub use binder::{BindOptions, Binder, UnknownPolicy};
pub use descriptor::{Describer, DescriptorError, TypeDescriptor};
pub use element::{Element, ElementKind};
pub use error::{BindError, Diagnostic, ErrorCode, Result};
pub use registry::Registry;
