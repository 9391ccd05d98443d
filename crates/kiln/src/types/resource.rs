use std::path::{Path, PathBuf};

use kiln_binder::{Describer, Element};
use kiln_core::ElementMeta;

/// A file embedded into a compiled assembly, optionally under a logical
/// name.
#[derive(Debug, Default)]
pub struct Resource {
    meta: ElementMeta,
    file: PathBuf,
    name: Option<String>,
}

impl Resource {
    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl Element for Resource {
    const NAME: &'static str = "resource";

    fn describe(d: &mut Describer<Self>) {
        d.attribute("file", "file", |r: &mut Self, v: PathBuf| r.file = v)
            .required()
            .non_empty();
        d.attribute("name", "name", |r: &mut Self, v: String| r.name = Some(v));
    }

    fn meta(&self) -> &ElementMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ElementMeta {
        &mut self.meta
    }
}
