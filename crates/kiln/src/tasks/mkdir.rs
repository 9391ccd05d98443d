use std::path::{Path, PathBuf};

use kiln_binder::{Describer, Element, ElementKind};
use kiln_core::ElementMeta;

use super::TaskSettings;

/// `<mkdir dir="..."/>`
#[derive(Debug, Default)]
pub struct MkdirTask {
    meta: ElementMeta,
    settings: TaskSettings,
    dir: PathBuf,
}

impl MkdirTask {
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn settings(&self) -> &TaskSettings {
        &self.settings
    }
}

impl Element for MkdirTask {
    const NAME: &'static str = "mkdir";
    const KIND: ElementKind = ElementKind::Task;

    fn describe(d: &mut Describer<Self>) {
        d.attribute("dir", "dir", |m: &mut Self, v: PathBuf| m.dir = v)
            .required()
            .non_empty();
        TaskSettings::describe(d, |m| &mut m.settings);
    }

    fn meta(&self) -> &ElementMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ElementMeta {
        &mut self.meta
    }
}
