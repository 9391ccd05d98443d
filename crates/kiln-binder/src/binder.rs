//! Populates element instances from XML nodes.
//!
//! Binding proceeds in a fixed order for every element:
//!
//! 1. attribute descriptors, in declaration order, each fully resolved
//!    (expanded, validated, converted and assigned) before the next;
//! 2. the unknown-attribute check;
//! 3. nested element descriptors, in declaration order, recursing into
//!    children;
//! 4. the unknown-child check;
//! 5. the element's [`initialize`](Element::initialize) hook.
//!
//! The first failure aborts the whole binding. Fields assigned before the
//! failure keep their new values; nothing is rolled back.

use std::borrow::Cow;

use indexmap::IndexMap;
use kiln_core::{Location, OwnerInfo, Parent, ProjectRef, SourceNode, Span};
use log::{debug, trace};
use roxmltree::Node;
use serde::Deserialize;

use crate::{
    Element, ElementKind,
    coerce::CoerceError,
    descriptor::{AttributeDescriptor, ElementDescriptor, ElementShape, TypeDescriptor},
    error::{BindError, Diagnostic, Result},
    registry::Registry,
};

/// What to do with attributes or child elements no descriptor claims.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownPolicy {
    /// Skip them silently.
    Ignore,
    /// Record a warning diagnostic and carry on.
    #[default]
    Warn,
    /// Fail the binding.
    Deny,
}

/// Tunable binder behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BindOptions {
    unknown_attributes: UnknownPolicy,
    unknown_elements: UnknownPolicy,
}

impl BindOptions {
    pub fn new(unknown_attributes: UnknownPolicy, unknown_elements: UnknownPolicy) -> Self {
        Self {
            unknown_attributes,
            unknown_elements,
        }
    }

    /// Options that reject anything undeclared.
    pub fn strict() -> Self {
        Self::new(UnknownPolicy::Deny, UnknownPolicy::Deny)
    }

    pub fn unknown_attributes(&self) -> UnknownPolicy {
        self.unknown_attributes
    }

    pub fn unknown_elements(&self) -> UnknownPolicy {
        self.unknown_elements
    }
}

/// Binds XML nodes of one build file to element instances.
///
/// A binder is tied to one project; every element it binds is given that
/// project. Warnings produced under [`UnknownPolicy::Warn`] accumulate until
/// taken with [`take_warnings`](Binder::take_warnings).
#[derive(Debug)]
pub struct Binder<'r> {
    registry: &'r Registry,
    project: ProjectRef,
    options: BindOptions,
    warnings: Vec<Diagnostic>,
}

impl Binder<'static> {
    /// Create a binder using the process-wide [`Registry`].
    pub fn new(project: ProjectRef) -> Self {
        Self::with_registry(Registry::global(), project)
    }
}

impl<'r> Binder<'r> {
    pub fn with_registry(registry: &'r Registry, project: ProjectRef) -> Self {
        Self {
            registry,
            project,
            options: BindOptions::default(),
            warnings: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: BindOptions) -> Self {
        self.options = options;
        self
    }

    pub fn project(&self) -> &ProjectRef {
        &self.project
    }

    pub fn options(&self) -> BindOptions {
        self.options
    }

    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }

    /// Take the warnings recorded so far, leaving none behind.
    pub fn take_warnings(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.warnings)
    }

    /// Bind a top-level element that has no parent.
    ///
    /// # Errors
    ///
    /// Returns the first [`BindError`] encountered; `instance` may be
    /// partially populated afterwards.
    pub fn bind<E: Element>(&mut self, instance: &mut E, node: Node<'_, '_>) -> Result<()> {
        self.bind_child(instance, node, None)
    }

    /// Bind an element owned by `parent`.
    ///
    /// # Errors
    ///
    /// Returns the first [`BindError`] encountered; `instance` may be
    /// partially populated afterwards.
    pub fn bind_child<E: Element>(
        &mut self,
        instance: &mut E,
        node: Node<'_, '_>,
        parent: Option<Parent>,
    ) -> Result<()> {
        let span = node_span(node);
        let location = self.locate(span);
        let descriptor = self
            .registry
            .describe::<E>()
            .map_err(|source| BindError::MalformedType {
                element: E::NAME.to_string(),
                source,
                location: location.clone(),
                span,
            })?;

        trace!(element = E::NAME, location = location.to_string(); "Binding element");

        let owner = owner_of::<E>(node, &location);
        let meta = instance.meta_mut();
        meta.set_project(self.project.clone());
        meta.set_location(location.clone());
        meta.set_parent(parent.clone());
        meta.set_source(source_node(node, span));

        for attribute in descriptor.attributes() {
            self.bind_attribute(instance, attribute, node, &location)?;
        }
        self.check_unknown_attributes(&descriptor, node, &location)?;

        let child_parent = owner.or(parent);
        for element in descriptor.elements() {
            self.bind_element(instance, element, node, &location, &child_parent)?;
        }
        if !E::ACCEPTS_ANY_CHILD {
            self.check_unknown_children(&descriptor, node)?;
        }

        instance
            .initialize()
            .map_err(|message| BindError::InitializationFailed {
                element: E::NAME.to_string(),
                message,
                location: location.clone(),
                span,
            })?;

        trace!(element = E::NAME; "Bound element");
        Ok(())
    }

    /// Source location of a byte span, or the unknown location when the
    /// project cannot map it.
    pub fn locate(&self, span: Span) -> Location {
        self.project.location_of(span).unwrap_or_else(|| {
            debug!(start = span.start(), end = span.end(); "Could not resolve source location");
            Location::unknown()
        })
    }

    /// Returns `true` if `node` is an element in the build-file namespace.
    pub fn is_build_element(&self, node: Node<'_, '_>) -> bool {
        node.is_element() && node.tag_name().namespace() == self.project.namespace_uri()
    }

    /// Build-file child elements of `node` named `name`, in document order.
    pub fn child_elements<'a, 'input>(&self, node: Node<'a, 'input>, name: &str) -> Vec<Node<'a, 'input>> {
        node.children()
            .filter(|child| self.is_build_element(*child) && child.tag_name().name() == name)
            .collect()
    }

    fn bind_attribute<E: Element>(
        &mut self,
        instance: &mut E,
        descriptor: &AttributeDescriptor<E>,
        node: Node<'_, '_>,
        location: &Location,
    ) -> Result<()> {
        let name = descriptor.xml_name();
        let Some(attribute) = node
            .attributes()
            .find(|a| a.namespace().is_none() && a.name() == name)
        else {
            if descriptor.is_required() {
                return Err(BindError::MissingRequiredAttribute {
                    attribute: name.to_string(),
                    element: E::NAME.to_string(),
                    location: location.clone(),
                    span: node_span(node),
                });
            }
            return Ok(());
        };

        let span = Span::from(attribute.range_value());
        let raw = attribute.value();
        let text = if descriptor.expands() {
            let expanded = self
                .project
                .expand_properties(raw, location)
                .map_err(|source| BindError::PropertyExpansion {
                    element: E::NAME.to_string(),
                    attribute: name.to_string(),
                    source,
                    location: location.clone(),
                    span,
                })?;
            Cow::Owned(expanded)
        } else {
            Cow::Borrowed(raw)
        };

        descriptor
            .validators()
            .validate(&text)
            .map_err(|cause| BindError::ValidationFailed {
                element: E::NAME.to_string(),
                attribute: name.to_string(),
                cause,
                location: location.clone(),
                span,
            })?;

        descriptor
            .assign(instance, &text)
            .map_err(|err| match err {
                CoerceError::Invalid { target } => BindError::AttributeCoercionFailed {
                    attribute: name.to_string(),
                    raw: text.to_string(),
                    target,
                    location: location.clone(),
                    span,
                },
                CoerceError::InvalidEnum { valid } => BindError::InvalidEnumValue {
                    attribute: name.to_string(),
                    raw: text.to_string(),
                    valid,
                    location: location.clone(),
                    span,
                },
            })?;

        trace!(element = E::NAME, attribute = name, value = &*text; "Bound attribute");
        Ok(())
    }

    fn bind_element<E: Element>(
        &mut self,
        instance: &mut E,
        descriptor: &ElementDescriptor<E>,
        node: Node<'_, '_>,
        location: &Location,
        parent: &Option<Parent>,
    ) -> Result<()> {
        let name = descriptor.xml_name();
        let missing = || BindError::MissingRequiredElement {
            element: name.to_string(),
            parent: E::NAME.to_string(),
            location: location.clone(),
            span: node_span(node),
        };

        match descriptor.shape() {
            ElementShape::Single(bind) => {
                let Some(child) = self.single_child::<E>(node, name)? else {
                    return if descriptor.is_required() {
                        Err(missing())
                    } else {
                        Ok(())
                    };
                };

                bind(instance, self, child, parent.clone()).unwrap_or_else(|| {
                    let span = node_span(child);
                    Err(BindError::NullElementProperty {
                        element: E::NAME.to_string(),
                        field: descriptor.field(),
                        location: self.locate(span),
                        span,
                    })
                })
            }
            ElementShape::Sequence { item, binder } => {
                let items = match item {
                    None => self.child_elements(node, name),
                    Some(item) => match self.single_child::<E>(node, name)? {
                        Some(container) => {
                            self.check_container(container, item)?;
                            self.child_elements(container, item)
                        }
                        None => Vec::new(),
                    },
                };

                if items.is_empty() && descriptor.is_required() {
                    return Err(missing());
                }

                trace!(element = E::NAME, field = descriptor.field(), count = items.len(); "Binding sequence");
                binder(instance, self, &items, parent.clone())
            }
        }
    }

    fn check_unknown_attributes<E: Element>(
        &mut self,
        descriptor: &TypeDescriptor<E>,
        node: Node<'_, '_>,
        location: &Location,
    ) -> Result<()> {
        for attribute in node.attributes() {
            if attribute.namespace().is_some() || descriptor.attribute(attribute.name()).is_some() {
                continue;
            }
            let err = BindError::UnexpectedAttribute {
                attribute: attribute.name().to_string(),
                element: E::NAME.to_string(),
                location: location.clone(),
                span: Span::from(attribute.range_qname()),
            };
            self.report(self.options.unknown_attributes, err)?;
        }
        Ok(())
    }

    fn check_unknown_children<E: Element>(
        &mut self,
        descriptor: &TypeDescriptor<E>,
        node: Node<'_, '_>,
    ) -> Result<()> {
        let unknown: Vec<_> = node
            .children()
            .filter(|c| self.is_build_element(*c) && descriptor.element(c.tag_name().name()).is_none())
            .collect();
        for child in unknown {
            self.report_unknown_child(child, E::NAME)?;
        }
        Ok(())
    }

    /// The first child named `name`. Repeats are reported as unexpected,
    /// unless `E` dispatches its children itself.
    fn single_child<'a, 'input, E: Element>(
        &mut self,
        node: Node<'a, 'input>,
        name: &str,
    ) -> Result<Option<Node<'a, 'input>>> {
        let mut matches = self.child_elements(node, name).into_iter();
        let first = matches.next();
        if !E::ACCEPTS_ANY_CHILD {
            for repeat in matches {
                self.report_unknown_child(repeat, E::NAME)?;
            }
        }
        Ok(first)
    }

    /// Attributes of a collection container and children other than its
    /// items.
    fn check_container(&mut self, container: Node<'_, '_>, item: &str) -> Result<()> {
        let element = container.tag_name().name();
        for attribute in container.attributes() {
            if attribute.namespace().is_some() {
                continue;
            }
            let span = Span::from(attribute.range_qname());
            let err = BindError::UnexpectedAttribute {
                attribute: attribute.name().to_string(),
                element: element.to_string(),
                location: self.locate(span),
                span,
            };
            self.report(self.options.unknown_attributes, err)?;
        }

        let unknown: Vec<_> = container
            .children()
            .filter(|c| self.is_build_element(*c) && c.tag_name().name() != item)
            .collect();
        for child in unknown {
            self.report_unknown_child(child, element)?;
        }
        Ok(())
    }

    fn report_unknown_child(&mut self, child: Node<'_, '_>, parent: &str) -> Result<()> {
        let span = node_span(child);
        let err = BindError::UnexpectedElement {
            element: child.tag_name().name().to_string(),
            parent: parent.to_string(),
            location: self.locate(span),
            span,
        };
        self.report(self.options.unknown_elements, err)
    }

    fn report(&mut self, policy: UnknownPolicy, err: BindError) -> Result<()> {
        match policy {
            UnknownPolicy::Ignore => {
                trace!(error = err.to_string(); "Ignoring undeclared input");
                Ok(())
            }
            UnknownPolicy::Warn => {
                self.warnings.push(err.to_warning());
                Ok(())
            }
            UnknownPolicy::Deny => Err(err),
        }
    }
}

/// The parent children of an `E` get, if `E` owns its children.
fn owner_of<E: Element>(node: Node<'_, '_>, location: &Location) -> Option<Parent> {
    let info = || OwnerInfo::new(E::NAME, node.attribute("name").map(str::to_string), location.clone());
    match E::KIND {
        ElementKind::Project => Some(Parent::Project(info())),
        ElementKind::Target => Some(Parent::Target(info())),
        ElementKind::Task => Some(Parent::Task(info())),
        ElementKind::DataType | ElementKind::Nested => None,
    }
}

fn source_node(node: Node<'_, '_>, span: Span) -> SourceNode {
    let attributes: IndexMap<String, String> = node
        .attributes()
        .map(|a| (a.name().to_string(), a.value().to_string()))
        .collect();
    SourceNode::new(
        node.tag_name().name(),
        node.tag_name().namespace().map(str::to_string),
        attributes,
        span,
    )
}

fn node_span(node: Node<'_, '_>) -> Span {
    Span::from(node.range())
}
