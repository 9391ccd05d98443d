use std::path::{Path, PathBuf};

use kiln_binder::{Describer, Element, ElementKind};
use kiln_core::ElementMeta;

use super::TaskSettings;
use crate::types::FileSet;

/// `<delete>` a `file`, a `dir`, or the files of a nested `<fileset>`.
#[derive(Debug, Default)]
pub struct DeleteTask {
    meta: ElementMeta,
    settings: TaskSettings,
    file: Option<PathBuf>,
    dir: Option<PathBuf>,
    fileset: Option<FileSet>,
}

impl DeleteTask {
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn fileset(&self) -> Option<&FileSet> {
        self.fileset.as_ref()
    }

    pub fn settings(&self) -> &TaskSettings {
        &self.settings
    }
}

impl Element for DeleteTask {
    const NAME: &'static str = "delete";
    const KIND: ElementKind = ElementKind::Task;

    fn describe(d: &mut Describer<Self>) {
        d.attribute("file", "file", |t: &mut Self, v: PathBuf| t.file = Some(v));
        d.attribute("dir", "dir", |t: &mut Self, v: PathBuf| t.dir = Some(v));
        TaskSettings::describe(d, |t| &mut t.settings);
        d.element("fileset", "fileset", |t: &mut Self| {
            Some(t.fileset.get_or_insert_with(FileSet::default))
        });
    }

    fn initialize(&mut self) -> Result<(), String> {
        let given = [self.file.is_some(), self.dir.is_some(), self.fileset.is_some()]
            .into_iter()
            .filter(|given| *given)
            .count();
        match given {
            1 => Ok(()),
            0 => Err("one of `file`, `dir` or a nested <fileset> is required".to_string()),
            _ => Err("only one of `file`, `dir` or a nested <fileset> may be given".to_string()),
        }
    }

    fn meta(&self) -> &ElementMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ElementMeta {
        &mut self.meta
    }
}
