use std::path::{Path, PathBuf};

use kiln_binder::{Describer, Element, ElementKind};
use kiln_core::ElementMeta;

/// A set of files selected by include and exclude patterns relative to a
/// base directory.
///
/// Patterns are kept as written; matching them against the file system is
/// left to whoever consumes the set.
#[derive(Debug, Default)]
pub struct FileSet {
    meta: ElementMeta,
    basedir: Option<PathBuf>,
    defaultexcludes: Option<bool>,
    includes: Vec<Include>,
    excludes: Vec<Exclude>,
}

impl FileSet {
    pub fn basedir(&self) -> Option<&Path> {
        self.basedir.as_deref()
    }

    /// Whether version-control and editor files are excluded implicitly.
    /// Defaults to `true`.
    pub fn default_excludes(&self) -> bool {
        self.defaultexcludes.unwrap_or(true)
    }

    pub fn includes(&self) -> &[Include] {
        &self.includes
    }

    pub fn excludes(&self) -> &[Exclude] {
        &self.excludes
    }

    pub fn is_empty(&self) -> bool {
        self.includes.is_empty()
    }

    /// Include patterns joined onto the base directory, in document order.
    pub fn include_paths(&self) -> Vec<PathBuf> {
        let basedir = self.basedir.as_deref().unwrap_or(Path::new(""));
        self.includes.iter().map(|i| basedir.join(i.name())).collect()
    }
}

impl Element for FileSet {
    const NAME: &'static str = "fileset";
    const KIND: ElementKind = ElementKind::DataType;

    fn describe(d: &mut Describer<Self>) {
        d.attribute("basedir", "basedir", |f: &mut Self, v: PathBuf| f.basedir = Some(v));
        d.attribute("defaultexcludes", "defaultexcludes", |f: &mut Self, v: bool| {
            f.defaultexcludes = Some(v)
        });
        d.array("includes", "include", |f: &mut Self, v: Vec<Include>| f.includes = v);
        d.array("excludes", "exclude", |f: &mut Self, v: Vec<Exclude>| f.excludes = v);
    }

    fn meta(&self) -> &ElementMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ElementMeta {
        &mut self.meta
    }
}

macro_rules! pattern_element {
    ($(#[$attr:meta])* $ty:ident, $name:literal) => {
        $(#[$attr])*
        #[derive(Debug, Default)]
        pub struct $ty {
            meta: ElementMeta,
            name: String,
        }

        impl $ty {
            /// The pattern, relative to the file set's base directory.
            pub fn name(&self) -> &str {
                &self.name
            }
        }

        impl Element for $ty {
            const NAME: &'static str = $name;

            fn describe(d: &mut Describer<Self>) {
                d.attribute("name", "name", |p: &mut Self, v: String| p.name = v)
                    .required()
                    .non_empty();
            }

            fn meta(&self) -> &ElementMeta {
                &self.meta
            }

            fn meta_mut(&mut self) -> &mut ElementMeta {
                &mut self.meta
            }
        }
    };
}

pattern_element!(
    /// Pattern of files a [`FileSet`] selects.
    Include,
    "include"
);

pattern_element!(
    /// Pattern of files a [`FileSet`] leaves out.
    Exclude,
    "exclude"
);
