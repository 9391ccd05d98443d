//! The trait implemented by every bindable build element.

use kiln_core::{ElementMeta, Location, Parent, ProjectRef};

use crate::descriptor::Describer;

/// Role an element plays in a build file.
///
/// Elements of kind [`Project`](ElementKind::Project),
/// [`Target`](ElementKind::Target) and [`Task`](ElementKind::Task) become the
/// parent of the elements nested in them; data types and nested blocks pass
/// their own parent through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Project,
    Target,
    Task,
    DataType,
    Nested,
}

/// A build element that can be bound from an XML node.
///
/// Implementors embed an [`ElementMeta`], declare their bindable fields in
/// [`describe`](Element::describe) and optionally check cross-field rules in
/// [`initialize`](Element::initialize).
pub trait Element: 'static {
    /// XML name the element is written as.
    const NAME: &'static str;

    const KIND: ElementKind = ElementKind::Nested;

    /// Whether child elements not declared in `describe` are left alone
    /// instead of being reported as unknown. Containers whose children are
    /// dispatched elsewhere set this.
    const ACCEPTS_ANY_CHILD: bool = false;

    /// Declare the bindable fields of this type.
    fn describe(describer: &mut Describer<Self>)
    where
        Self: Sized;

    fn meta(&self) -> &ElementMeta;

    fn meta_mut(&mut self) -> &mut ElementMeta;

    /// Runs once after every field has been bound.
    ///
    /// # Errors
    ///
    /// Returns a message explaining why the bound values are not acceptable
    /// together.
    fn initialize(&mut self) -> Result<(), String> {
        Ok(())
    }

    /// Where the element was declared.
    fn location(&self) -> &Location {
        self.meta().location()
    }

    fn project(&self) -> Option<&ProjectRef> {
        self.meta().project()
    }

    fn parent(&self) -> Option<&Parent> {
        self.meta().parent()
    }
}
