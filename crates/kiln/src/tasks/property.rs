use kiln_binder::{Describer, Element, ElementKind};
use kiln_core::ElementMeta;

use super::TaskSettings;
use crate::project::PropertyOptions;

const PROPERTY_NAME_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_.\-]*$";

/// `<property name="..." value="..."/>`
///
/// The loader adds the value to the project's property table as soon as the
/// element is bound, so later attributes can refer to it.
#[derive(Debug, Default)]
pub struct PropertyTask {
    meta: ElementMeta,
    settings: TaskSettings,
    name: String,
    value: String,
    overwrite: Option<bool>,
    readonly: bool,
}

impl PropertyTask {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value with property references already expanded.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Whether an existing value is replaced. Defaults to `true`.
    pub fn overwrite(&self) -> bool {
        self.overwrite.unwrap_or(true)
    }

    pub fn readonly(&self) -> bool {
        self.readonly
    }

    pub fn settings(&self) -> &TaskSettings {
        &self.settings
    }

    /// How the value is added to the property table.
    pub fn options(&self) -> PropertyOptions {
        PropertyOptions::new()
            .overwrite(self.overwrite())
            .readonly(self.readonly)
    }
}

impl Element for PropertyTask {
    const NAME: &'static str = "property";
    const KIND: ElementKind = ElementKind::Task;

    fn describe(d: &mut Describer<Self>) {
        d.attribute("name", "name", |p: &mut Self, v: String| p.name = v)
            .required()
            .pattern(PROPERTY_NAME_PATTERN);
        d.attribute("value", "value", |p: &mut Self, v: String| p.value = v)
            .required();
        d.attribute("overwrite", "overwrite", |p: &mut Self, v: bool| p.overwrite = Some(v));
        d.attribute("readonly", "readonly", |p: &mut Self, v: bool| p.readonly = v);
        TaskSettings::describe(d, |p| &mut p.settings);
    }

    fn meta(&self) -> &ElementMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ElementMeta {
        &mut self.meta
    }
}
