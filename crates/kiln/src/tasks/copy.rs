use std::path::{Path, PathBuf};

use kiln_binder::{Describer, Element, ElementKind};
use kiln_core::ElementMeta;

use super::TaskSettings;
use crate::types::FileSet;

/// `<copy>` either a single `file` to `tofile`/`todir`, or a nested
/// `<fileset>` to `todir`.
#[derive(Debug, Default)]
pub struct CopyTask {
    meta: ElementMeta,
    settings: TaskSettings,
    file: Option<PathBuf>,
    tofile: Option<PathBuf>,
    todir: Option<PathBuf>,
    overwrite: bool,
    flatten: bool,
    fileset: Option<FileSet>,
}

impl CopyTask {
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn tofile(&self) -> Option<&Path> {
        self.tofile.as_deref()
    }

    pub fn todir(&self) -> Option<&Path> {
        self.todir.as_deref()
    }

    /// Whether newer destination files are replaced too.
    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    /// Whether the directory structure of the sources is dropped.
    pub fn flatten(&self) -> bool {
        self.flatten
    }

    pub fn fileset(&self) -> Option<&FileSet> {
        self.fileset.as_ref()
    }

    pub fn settings(&self) -> &TaskSettings {
        &self.settings
    }
}

impl Element for CopyTask {
    const NAME: &'static str = "copy";
    const KIND: ElementKind = ElementKind::Task;

    fn describe(d: &mut Describer<Self>) {
        d.attribute("file", "file", |c: &mut Self, v: PathBuf| c.file = Some(v));
        d.attribute("tofile", "tofile", |c: &mut Self, v: PathBuf| c.tofile = Some(v));
        d.attribute("todir", "todir", |c: &mut Self, v: PathBuf| c.todir = Some(v));
        d.attribute("overwrite", "overwrite", |c: &mut Self, v: bool| c.overwrite = v);
        d.attribute("flatten", "flatten", |c: &mut Self, v: bool| c.flatten = v);
        TaskSettings::describe(d, |c| &mut c.settings);
        d.element("fileset", "fileset", |c: &mut Self| {
            Some(c.fileset.get_or_insert_with(FileSet::default))
        });
    }

    fn initialize(&mut self) -> Result<(), String> {
        match (&self.file, &self.fileset) {
            (None, None) => Err("either `file` or a nested <fileset> is required".to_string()),
            (Some(_), Some(_)) => Err("`file` and a nested <fileset> cannot be combined".to_string()),
            (Some(_), None) => match (&self.tofile, &self.todir) {
                (None, None) => Err("copying a single file requires `tofile` or `todir`".to_string()),
                (Some(_), Some(_)) => Err("`tofile` and `todir` cannot be combined".to_string()),
                _ => Ok(()),
            },
            (None, Some(_)) if self.tofile.is_some() => {
                Err("`tofile` cannot be used with a <fileset>; use `todir`".to_string())
            }
            (None, Some(_)) if self.todir.is_none() => {
                Err("copying a <fileset> requires `todir`".to_string())
            }
            (None, Some(_)) => Ok(()),
        }
    }

    fn meta(&self) -> &ElementMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ElementMeta {
        &mut self.meta
    }
}
