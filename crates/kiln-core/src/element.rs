//! Per-instance state carried by every bindable build element.
//!
//! Concrete element types embed an [`ElementMeta`] and expose it to the
//! binder, which fills it in before any field of the element is bound.

use std::fmt;

use indexmap::IndexMap;

use crate::{Location, ProjectRef, Span};

/// Identifies the task, target or project that owns an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerInfo {
    element: String,
    name: Option<String>,
    location: Location,
}

impl OwnerInfo {
    /// Create owner information.
    ///
    /// # Arguments
    ///
    /// * `element` - XML element name of the owner (`project`, `target`, `copy`, ...)
    /// * `name` - Value of the owner's `name` attribute, if it has one
    /// * `location` - Where the owner was declared
    pub fn new(element: impl Into<String>, name: Option<String>, location: Location) -> Self {
        Self {
            element: element.into(),
            name,
            location,
        }
    }

    /// XML element name of the owner.
    pub fn element(&self) -> &str {
        &self.element
    }

    /// Declared name of the owner, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Where the owner was declared.
    pub fn location(&self) -> &Location {
        &self.location
    }
}

/// Non-owning back-reference from an element to its owner.
///
/// Used only for context lookups such as error messages; it never keeps the
/// owner alive and never implies ownership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parent {
    Project(OwnerInfo),
    Target(OwnerInfo),
    Task(OwnerInfo),
}

impl Parent {
    /// The owner information regardless of the owner kind.
    pub fn info(&self) -> &OwnerInfo {
        match self {
            Parent::Project(info) | Parent::Target(info) | Parent::Task(info) => info,
        }
    }

    /// Name of the enclosing target, if the owner is one.
    pub fn target_name(&self) -> Option<&str> {
        match self {
            Parent::Target(info) => info.name(),
            _ => None,
        }
    }
}

impl fmt::Display for Parent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let info = self.info();
        match info.name() {
            Some(name) => write!(f, "<{} name=\"{}\">", info.element(), name),
            None => write!(f, "<{}>", info.element()),
        }
    }
}

/// Owned record of the XML node an element was bound from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceNode {
    name: String,
    namespace: Option<String>,
    attributes: IndexMap<String, String>,
    span: Span,
}

impl SourceNode {
    /// Create a record of an XML element node.
    pub fn new(
        name: impl Into<String>,
        namespace: Option<String>,
        attributes: IndexMap<String, String>,
        span: Span,
    ) -> Self {
        Self {
            name: name.into(),
            namespace,
            attributes,
            span,
        }
    }

    /// Local tag name of the node.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace URI of the node, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Raw (unexpanded) value of an attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// All attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Byte span of the node in the build file.
    pub fn span(&self) -> Span {
        self.span
    }
}

/// State shared by all bindable build elements.
///
/// An element is created with an empty `ElementMeta`; the binder assigns the
/// project, location, parent and source node before binding any field.
#[derive(Default, Clone)]
pub struct ElementMeta {
    location: Location,
    project: Option<ProjectRef>,
    parent: Option<Parent>,
    source: Option<SourceNode>,
}

impl ElementMeta {
    /// Create empty metadata for a not yet bound element.
    pub fn new() -> Self {
        Self::default()
    }

    /// Where the element was declared; unknown until bound.
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// The owning project, once assigned.
    pub fn project(&self) -> Option<&ProjectRef> {
        self.project.as_ref()
    }

    /// The owning task, target or project, if any.
    pub fn parent(&self) -> Option<&Parent> {
        self.parent.as_ref()
    }

    /// The XML node this element was bound from.
    pub fn source(&self) -> Option<&SourceNode> {
        self.source.as_ref()
    }

    /// Returns `true` once a project has been assigned.
    pub fn is_bindable(&self) -> bool {
        self.project.is_some()
    }

    pub fn set_location(&mut self, location: Location) {
        self.location = location;
    }

    pub fn set_project(&mut self, project: ProjectRef) {
        self.project = Some(project);
    }

    pub fn set_parent(&mut self, parent: Option<Parent>) {
        self.parent = parent;
    }

    pub fn set_source(&mut self, source: SourceNode) {
        self.source = Some(source);
    }
}

impl fmt::Debug for ElementMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementMeta")
            .field("location", &self.location)
            .field("project", &self.project.as_ref().and_then(|p| p.name()))
            .field("parent", &self.parent)
            .field("source", &self.source.as_ref().map(SourceNode::name))
            .finish()
    }
}
