//! The `<project>` and `<target>` elements that give a build file its shape.
//!
//! Both accept arbitrary children: the loader dispatches those through the
//! task registry instead of binding them as declared fields.

use kiln_binder::{Describer, Element, ElementKind};
use kiln_core::ElementMeta;

use crate::tasks::AnyTask;

/// Target names are referenced from comma separated `depends` lists.
const TARGET_NAME_PATTERN: &str = r"^[^,\s]+$";

/// The root `<project>` element.
#[derive(Debug, Default)]
pub struct ProjectElement {
    meta: ElementMeta,
    name: Option<String>,
    default_target: Option<String>,
    basedir: Option<String>,
}

impl ProjectElement {
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Target built when none is requested.
    pub fn default_target(&self) -> Option<&str> {
        self.default_target.as_deref()
    }

    pub fn basedir(&self) -> Option<&str> {
        self.basedir.as_deref()
    }
}

impl Element for ProjectElement {
    const NAME: &'static str = "project";
    const KIND: ElementKind = ElementKind::Project;
    const ACCEPTS_ANY_CHILD: bool = true;

    fn describe(d: &mut Describer<Self>) {
        d.attribute("name", "name", |p: &mut Self, v: String| p.name = Some(v));
        d.attribute("default_target", "default", |p: &mut Self, v: String| {
            p.default_target = Some(v)
        })
        .non_empty();
        d.attribute("basedir", "basedir", |p: &mut Self, v: String| p.basedir = Some(v));
    }

    fn meta(&self) -> &ElementMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ElementMeta {
        &mut self.meta
    }
}

/// A named `<target>` and the tasks declared in it, in document order.
#[derive(Debug, Default)]
pub struct Target {
    meta: ElementMeta,
    name: String,
    description: Option<String>,
    depends: Vec<String>,
    tasks: Vec<Box<dyn AnyTask>>,
}

impl Target {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Names of the targets this one depends on, as declared.
    pub fn depends(&self) -> &[String] {
        &self.depends
    }

    pub fn tasks(&self) -> &[Box<dyn AnyTask>] {
        &self.tasks
    }

    pub(crate) fn push_task(&mut self, task: Box<dyn AnyTask>) {
        self.tasks.push(task);
    }
}

impl Element for Target {
    const NAME: &'static str = "target";
    const KIND: ElementKind = ElementKind::Target;
    const ACCEPTS_ANY_CHILD: bool = true;

    fn describe(d: &mut Describer<Self>) {
        d.attribute("name", "name", |t: &mut Self, v: String| t.name = v)
            .required()
            .pattern(TARGET_NAME_PATTERN);
        d.attribute("description", "description", |t: &mut Self, v: String| {
            t.description = Some(v)
        });
        d.attribute("depends", "depends", |t: &mut Self, v: String| {
            t.depends = split_list(&v)
        });
    }

    fn initialize(&mut self) -> Result<(), String> {
        if self.depends.iter().any(|d| d == &self.name) {
            return Err(format!("target `{}` depends on itself", self.name));
        }
        Ok(())
    }

    fn meta(&self) -> &ElementMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ElementMeta {
        &mut self.meta
    }
}

/// Split a comma separated list, dropping blank entries.
fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}
