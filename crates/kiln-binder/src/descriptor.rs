//! Per-type binding metadata.
//!
//! An element type lists its bindable fields once, in
//! [`Element::describe`](crate::Element::describe), through a [`Describer`].
//! The result is an immutable [`TypeDescriptor`]: the attribute descriptors
//! and nested element descriptors of that type, in declaration order. Every
//! descriptor owns a typed setter, so binding never needs reflection.
//!
//! Nested elements come in three shapes:
//!
//! - **single**: one child element bound into an instance the owner already
//!   holds (`<copy><fileset/></copy>`);
//! - **array**: every matching child becomes a new item, in document order
//!   (`<csc><arg/><arg/></csc>`);
//! - **collection**: a container element whose matching children become the
//!   items (`<fileset><include/><include/></fileset>` seen from its owner).

use std::{collections::HashSet, fmt};

use kiln_core::Parent;
use roxmltree::Node;
use thiserror::Error;

use crate::{
    Binder, Element,
    coerce::{AttributeEnum, CoerceError, FromAttribute, coerce, coerce_enum},
    error::Result,
    validate::{StringValidator, ValidationChain, Validator},
};

type AttributeSetter<T> = Box<dyn Fn(&mut T, &str) -> std::result::Result<(), CoerceError> + Send + Sync>;

type SingleBinder<T> =
    Box<dyn Fn(&mut T, &mut Binder<'_>, Node<'_, '_>, Option<Parent>) -> Option<Result<()>> + Send + Sync>;

type SequenceBinder<T> =
    Box<dyn Fn(&mut T, &mut Binder<'_>, &[Node<'_, '_>], Option<Parent>) -> Result<()> + Send + Sync>;

/// A defect in an element type definition, detected when its descriptor
/// table is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("attribute `{0}` is declared more than once")]
    DuplicateAttribute(&'static str),

    #[error("nested element <{0}> is declared more than once")]
    DuplicateElement(&'static str),

    #[error("field `{0}` is bound more than once")]
    DuplicateField(&'static str),

    #[error("field `{0}` is bound to an empty XML name")]
    EmptyName(&'static str),

    #[error("invalid pattern for field `{field}`: {message}")]
    InvalidPattern { field: &'static str, message: String },
}

/// How one XML attribute maps onto a field.
pub struct AttributeDescriptor<T> {
    field: &'static str,
    xml_name: &'static str,
    type_name: &'static str,
    required: bool,
    expand: bool,
    validators: ValidationChain,
    setter: AttributeSetter<T>,
    defect: Option<DescriptorError>,
}

impl<T> AttributeDescriptor<T> {
    fn new(field: &'static str, xml_name: &'static str, type_name: &'static str, setter: AttributeSetter<T>) -> Self {
        Self {
            field,
            xml_name,
            type_name,
            required: false,
            expand: true,
            validators: ValidationChain::new(),
            setter,
            defect: None,
        }
    }

    /// Mark the attribute as required.
    pub fn required(&mut self) -> &mut Self {
        self.required = true;
        self
    }

    /// Whether `${...}` property references are expanded before the value is
    /// validated. Defaults to `true`.
    pub fn expand(&mut self, expand: bool) -> &mut Self {
        self.expand = expand;
        self
    }

    /// Append a validator to the chain.
    pub fn validator(&mut self, validator: impl Validator + 'static) -> &mut Self {
        self.validators.push(validator);
        self
    }

    /// Reject empty values.
    pub fn non_empty(&mut self) -> &mut Self {
        self.validator(StringValidator::new().allow_empty(false))
    }

    /// Require non-empty values to match a regular expression.
    ///
    /// An invalid expression makes the whole type malformed.
    pub fn pattern(&mut self, pattern: &str) -> &mut Self {
        match StringValidator::new().with_pattern(pattern) {
            Ok(validator) => self.validator(validator),
            Err(err) => {
                self.defect.get_or_insert(DescriptorError::InvalidPattern {
                    field: self.field,
                    message: err.to_string(),
                });
                self
            }
        }
    }

    /// Name of the Rust field this attribute is bound to.
    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn xml_name(&self) -> &'static str {
        self.xml_name
    }

    /// Name of the target type, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn expands(&self) -> bool {
        self.expand
    }

    pub fn validators(&self) -> &ValidationChain {
        &self.validators
    }

    /// Convert the text and assign it to the field.
    pub(crate) fn assign(&self, instance: &mut T, text: &str) -> std::result::Result<(), CoerceError> {
        (self.setter)(instance, text)
    }
}

impl<T> fmt::Debug for AttributeDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeDescriptor")
            .field("field", &self.field)
            .field("xml_name", &self.xml_name)
            .field("type_name", &self.type_name)
            .field("required", &self.required)
            .field("expand", &self.expand)
            .field("validators", &self.validators)
            .finish_non_exhaustive()
    }
}

/// Binding strategy of a nested element descriptor.
pub(crate) enum ElementShape<T> {
    Single(SingleBinder<T>),
    Sequence {
        item: Option<&'static str>,
        binder: SequenceBinder<T>,
    },
}

/// How nested XML elements map onto a field.
pub struct ElementDescriptor<T> {
    field: &'static str,
    xml_name: &'static str,
    required: bool,
    shape: ElementShape<T>,
}

impl<T> ElementDescriptor<T> {
    /// Mark the element as required.
    ///
    /// For arrays and collections this means at least one item must be
    /// present.
    pub fn required(&mut self) -> &mut Self {
        self.required = true;
        self
    }

    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn xml_name(&self) -> &'static str {
        self.xml_name
    }

    /// Item element name of a collection; `None` for the other shapes.
    pub fn item_name(&self) -> Option<&'static str> {
        match &self.shape {
            ElementShape::Sequence { item, .. } => *item,
            ElementShape::Single(_) => None,
        }
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Returns `true` for arrays and collections.
    pub fn is_sequence(&self) -> bool {
        matches!(self.shape, ElementShape::Sequence { .. })
    }

    pub(crate) fn shape(&self) -> &ElementShape<T> {
        &self.shape
    }
}

impl<T> fmt::Debug for ElementDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementDescriptor")
            .field("field", &self.field)
            .field("xml_name", &self.xml_name)
            .field("item_name", &self.item_name())
            .field("required", &self.required)
            .field("sequence", &self.is_sequence())
            .finish()
    }
}

/// Builder handed to [`Element::describe`].
///
/// # Examples
///
/// ```
/// use kiln_binder::{Describer, Element, ElementKind};
/// use kiln_core::ElementMeta;
///
/// #[derive(Debug, Default)]
/// struct Touch {
///     meta: ElementMeta,
///     file: String,
///     millis: Option<u64>,
/// }
///
/// impl Element for Touch {
///     const NAME: &'static str = "touch";
///     const KIND: ElementKind = ElementKind::Task;
///
///     fn describe(d: &mut Describer<Self>) {
///         d.attribute("file", "file", |t: &mut Touch, v: String| t.file = v)
///             .required()
///             .non_empty();
///         d.attribute("millis", "millis", |t: &mut Touch, v: u64| t.millis = Some(v));
///     }
///
///     fn meta(&self) -> &ElementMeta {
///         &self.meta
///     }
///
///     fn meta_mut(&mut self) -> &mut ElementMeta {
///         &mut self.meta
///     }
/// }
/// ```
pub struct Describer<T> {
    attributes: Vec<AttributeDescriptor<T>>,
    elements: Vec<ElementDescriptor<T>>,
}

impl<T: Element> Describer<T> {
    fn new() -> Self {
        Self {
            attributes: Vec::new(),
            elements: Vec::new(),
        }
    }

    /// Bind an XML attribute to a field of any [`FromAttribute`] type.
    pub fn attribute<V, F>(&mut self, field: &'static str, xml_name: &'static str, set: F) -> &mut AttributeDescriptor<T>
    where
        V: FromAttribute + 'static,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let setter = attribute_setter(move |instance: &mut T, text: &str| {
            set(instance, coerce::<V>(text)?);
            Ok(())
        });
        self.push_attribute(AttributeDescriptor::new(field, xml_name, V::TYPE_NAME, setter))
    }

    /// Bind an XML attribute to an enumerated field.
    pub fn enumeration<E, F>(&mut self, field: &'static str, xml_name: &'static str, set: F) -> &mut AttributeDescriptor<T>
    where
        E: AttributeEnum,
        F: Fn(&mut T, E) + Send + Sync + 'static,
    {
        let setter = attribute_setter(move |instance: &mut T, text: &str| {
            set(instance, coerce_enum::<E>(text)?);
            Ok(())
        });
        self.push_attribute(AttributeDescriptor::new(field, xml_name, "enumeration", setter))
    }

    /// Bind a single nested element into an instance the owner already
    /// holds.
    ///
    /// `access` returning `None` while the element is present in the build
    /// file is a defect in the owning type.
    pub fn element<C, F>(&mut self, field: &'static str, xml_name: &'static str, access: F) -> &mut ElementDescriptor<T>
    where
        C: Element,
        F: Fn(&mut T) -> Option<&mut C> + Send + Sync + 'static,
    {
        let binder = single_binder(move |owner: &mut T, binder: &mut Binder<'_>, node: Node<'_, '_>, parent| {
            access(owner).map(|child| binder.bind_child(child, node, parent))
        });
        self.push_element(ElementDescriptor {
            field,
            xml_name,
            required: false,
            shape: ElementShape::Single(binder),
        })
    }

    /// Bind every child named `xml_name` as a new item, in document order.
    ///
    /// The setter always receives the complete sequence, which replaces any
    /// previous value.
    pub fn array<C, F>(&mut self, field: &'static str, xml_name: &'static str, set: F) -> &mut ElementDescriptor<T>
    where
        C: Element + Default,
        F: Fn(&mut T, Vec<C>) + Send + Sync + 'static,
    {
        self.push_sequence::<C, F>(field, xml_name, None, set)
    }

    /// Bind the `item_name` children of the first `xml_name` child as new
    /// items, in document order.
    pub fn collection<C, F>(
        &mut self,
        field: &'static str,
        xml_name: &'static str,
        item_name: &'static str,
        set: F,
    ) -> &mut ElementDescriptor<T>
    where
        C: Element + Default,
        F: Fn(&mut T, Vec<C>) + Send + Sync + 'static,
    {
        self.push_sequence::<C, F>(field, xml_name, Some(item_name), set)
    }

    fn push_sequence<C, F>(
        &mut self,
        field: &'static str,
        xml_name: &'static str,
        item: Option<&'static str>,
        set: F,
    ) -> &mut ElementDescriptor<T>
    where
        C: Element + Default,
        F: Fn(&mut T, Vec<C>) + Send + Sync + 'static,
    {
        let binder = sequence_binder(
            move |owner: &mut T, binder: &mut Binder<'_>, nodes: &[Node<'_, '_>], parent: Option<Parent>| {
                let mut items = Vec::with_capacity(nodes.len());
                for node in nodes {
                    let mut item = C::default();
                    binder.bind_child(&mut item, *node, parent.clone())?;
                    items.push(item);
                }
                set(owner, items);
                Ok(())
            },
        );
        self.push_element(ElementDescriptor {
            field,
            xml_name,
            required: false,
            shape: ElementShape::Sequence { item, binder },
        })
    }

    fn push_attribute(&mut self, descriptor: AttributeDescriptor<T>) -> &mut AttributeDescriptor<T> {
        self.attributes.push(descriptor);
        let last = self.attributes.len() - 1;
        &mut self.attributes[last]
    }

    fn push_element(&mut self, descriptor: ElementDescriptor<T>) -> &mut ElementDescriptor<T> {
        self.elements.push(descriptor);
        let last = self.elements.len() - 1;
        &mut self.elements[last]
    }

    /// Check the collected descriptors and freeze them.
    fn finish(self) -> std::result::Result<TypeDescriptor<T>, DescriptorError> {
        let mut fields = HashSet::new();
        let mut attribute_names = HashSet::new();
        let mut element_names = HashSet::new();

        for attribute in &self.attributes {
            if let Some(defect) = &attribute.defect {
                return Err(defect.clone());
            }
            if attribute.xml_name.is_empty() {
                return Err(DescriptorError::EmptyName(attribute.field));
            }
            if !attribute_names.insert(attribute.xml_name) {
                return Err(DescriptorError::DuplicateAttribute(attribute.xml_name));
            }
            if !fields.insert(attribute.field) {
                return Err(DescriptorError::DuplicateField(attribute.field));
            }
        }

        for element in &self.elements {
            if element.xml_name.is_empty() || element.item_name() == Some("") {
                return Err(DescriptorError::EmptyName(element.field));
            }
            if !element_names.insert(element.xml_name) {
                return Err(DescriptorError::DuplicateElement(element.xml_name));
            }
            if !fields.insert(element.field) {
                return Err(DescriptorError::DuplicateField(element.field));
            }
        }

        Ok(TypeDescriptor {
            name: T::NAME,
            attributes: self.attributes,
            elements: self.elements,
        })
    }
}

/// The complete, immutable binding metadata of one element type.
pub struct TypeDescriptor<T> {
    name: &'static str,
    attributes: Vec<AttributeDescriptor<T>>,
    elements: Vec<ElementDescriptor<T>>,
}

impl<T: Element> TypeDescriptor<T> {
    /// Run the type's describe hook and check the result.
    ///
    /// # Errors
    ///
    /// Returns a [`DescriptorError`] if the type definition is malformed.
    pub fn build() -> std::result::Result<Self, DescriptorError> {
        let mut describer = Describer::new();
        T::describe(&mut describer);
        describer.finish()
    }
}

impl<T> TypeDescriptor<T> {
    /// XML name of the described element.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Attribute descriptors in declaration order.
    pub fn attributes(&self) -> &[AttributeDescriptor<T>] {
        &self.attributes
    }

    /// Nested element descriptors in declaration order.
    pub fn elements(&self) -> &[ElementDescriptor<T>] {
        &self.elements
    }

    pub fn attribute(&self, xml_name: &str) -> Option<&AttributeDescriptor<T>> {
        self.attributes.iter().find(|a| a.xml_name == xml_name)
    }

    pub fn element(&self, xml_name: &str) -> Option<&ElementDescriptor<T>> {
        self.elements.iter().find(|e| e.xml_name == xml_name)
    }
}

impl<T> fmt::Debug for TypeDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("attributes", &self.attributes)
            .field("elements", &self.elements)
            .finish()
    }
}

// The helpers below pin closure signatures to the higher-ranked forms the
// boxed binders need.

fn attribute_setter<T, F>(f: F) -> AttributeSetter<T>
where
    F: Fn(&mut T, &str) -> std::result::Result<(), CoerceError> + Send + Sync + 'static,
{
    Box::new(f)
}

fn single_binder<T, F>(f: F) -> SingleBinder<T>
where
    F: Fn(&mut T, &mut Binder<'_>, Node<'_, '_>, Option<Parent>) -> Option<Result<()>> + Send + Sync + 'static,
{
    Box::new(f)
}

fn sequence_binder<T, F>(f: F) -> SequenceBinder<T>
where
    F: Fn(&mut T, &mut Binder<'_>, &[Node<'_, '_>], Option<Parent>) -> Result<()> + Send + Sync + 'static,
{
    Box::new(f)
}

#[cfg(test)]
mod tests {
    use kiln_core::ElementMeta;

    use super::*;
    use crate::validate::IntRangeValidator;

    #[derive(Debug, Default)]
    struct Include {
        meta: ElementMeta,
        name: String,
    }

    impl Element for Include {
        const NAME: &'static str = "include";

        fn describe(d: &mut Describer<Self>) {
            d.attribute("name", "name", |i: &mut Include, v: String| i.name = v)
                .required();
        }

        fn meta(&self) -> &ElementMeta {
            &self.meta
        }

        fn meta_mut(&mut self) -> &mut ElementMeta {
            &mut self.meta
        }
    }

    #[derive(Debug, Default)]
    struct Archive {
        meta: ElementMeta,
        dest: String,
        level: u8,
        includes: Vec<Include>,
    }

    impl Element for Archive {
        const NAME: &'static str = "archive";

        fn describe(d: &mut Describer<Self>) {
            d.attribute("dest", "dest", |a: &mut Archive, v: String| a.dest = v)
                .required()
                .expand(false);
            d.attribute("level", "level", |a: &mut Archive, v: u8| a.level = v)
                .validator(IntRangeValidator::new(0, 9));
            d.array("includes", "include", |a: &mut Archive, v: Vec<Include>| a.includes = v)
                .required();
        }

        fn meta(&self) -> &ElementMeta {
            &self.meta
        }

        fn meta_mut(&mut self) -> &mut ElementMeta {
            &mut self.meta
        }
    }

    #[test]
    fn test_descriptors_keep_declaration_order() {
        let table = TypeDescriptor::<Archive>::build().unwrap();

        assert_eq!(table.name(), "archive");
        let names: Vec<_> = table.attributes().iter().map(|a| a.xml_name()).collect();
        assert_eq!(names, ["dest", "level"]);
        assert_eq!(table.elements().len(), 1);
    }

    #[test]
    fn test_attribute_flags() {
        let table = TypeDescriptor::<Archive>::build().unwrap();

        let dest = table.attribute("dest").unwrap();
        assert!(dest.is_required());
        assert!(!dest.expands());
        assert_eq!(dest.type_name(), "string");

        let level = table.attribute("level").unwrap();
        assert!(!level.is_required());
        assert!(level.expands());
        assert_eq!(level.validators().len(), 1);
        assert_eq!(level.type_name(), "non-negative integer");
    }

    #[test]
    fn test_element_flags() {
        let table = TypeDescriptor::<Archive>::build().unwrap();

        let include = table.element("include").unwrap();
        assert!(include.is_required());
        assert!(include.is_sequence());
        assert_eq!(include.field(), "includes");
        assert_eq!(include.item_name(), None);
        assert!(table.element("exclude").is_none());
    }

    #[test]
    fn test_setter_coerces_and_assigns() {
        let table = TypeDescriptor::<Archive>::build().unwrap();
        let mut archive = Archive::default();

        table.attribute("level").unwrap().assign(&mut archive, "7").unwrap();
        assert_eq!(archive.level, 7);

        let err = table
            .attribute("level")
            .unwrap()
            .assign(&mut archive, "high")
            .unwrap_err();
        assert_eq!(
            err,
            CoerceError::Invalid {
                target: "non-negative integer"
            }
        );
        assert_eq!(archive.level, 7);
    }

    macro_rules! malformed {
        ($name:ident, |$d:ident| $body:block) => {
            #[derive(Debug, Default)]
            struct $name {
                meta: ElementMeta,
                text: String,
                items: Vec<Include>,
            }

            impl Element for $name {
                const NAME: &'static str = "malformed";

                fn describe($d: &mut Describer<Self>) $body

                fn meta(&self) -> &ElementMeta {
                    &self.meta
                }

                fn meta_mut(&mut self) -> &mut ElementMeta {
                    &mut self.meta
                }
            }
        };
    }

    malformed!(DuplicateAttribute, |d| {
        d.attribute("text", "text", |m: &mut DuplicateAttribute, v: String| m.text = v);
        d.attribute("other", "text", |m: &mut DuplicateAttribute, v: String| m.text = v);
    });

    malformed!(DuplicateElement, |d| {
        d.array("items", "item", |m: &mut DuplicateElement, v: Vec<Include>| m.items = v);
        d.array("more", "item", |m: &mut DuplicateElement, v: Vec<Include>| m.items = v);
    });

    malformed!(FieldBoundTwice, |d| {
        d.attribute("items", "text", |m: &mut FieldBoundTwice, v: String| m.text = v);
        d.array("items", "item", |m: &mut FieldBoundTwice, v: Vec<Include>| m.items = v);
    });

    malformed!(EmptyItemName, |d| {
        d.collection("items", "items", "", |m: &mut EmptyItemName, v: Vec<Include>| m.items = v);
    });

    malformed!(BadPattern, |d| {
        d.attribute("text", "text", |m: &mut BadPattern, v: String| m.text = v)
            .pattern("([a-z]");
    });

    #[test]
    fn test_malformed_types_are_rejected() {
        assert_eq!(
            TypeDescriptor::<DuplicateAttribute>::build().unwrap_err(),
            DescriptorError::DuplicateAttribute("text")
        );
        assert_eq!(
            TypeDescriptor::<DuplicateElement>::build().unwrap_err(),
            DescriptorError::DuplicateElement("item")
        );
        assert_eq!(
            TypeDescriptor::<FieldBoundTwice>::build().unwrap_err(),
            DescriptorError::DuplicateField("items")
        );
        assert_eq!(
            TypeDescriptor::<EmptyItemName>::build().unwrap_err(),
            DescriptorError::EmptyName("items")
        );
        assert!(matches!(
            TypeDescriptor::<BadPattern>::build().unwrap_err(),
            DescriptorError::InvalidPattern { field: "text", .. }
        ));
    }
}
