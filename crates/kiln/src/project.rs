//! The project a build file is loaded into.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::{Arc, OnceLock, PoisonError, RwLock},
};

use indexmap::IndexMap;
use log::debug;
use thiserror::Error;

use kiln_core::{ExpansionError, Location, Project, Span};

use crate::{properties, source_map::LineIndex};

/// Failure to change the property table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    #[error("property `{0}` is read-only and cannot be overwritten")]
    ReadOnly(String),
}

/// How [`BuildProject::set_property`] treats an existing value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyOptions {
    overwrite: bool,
    readonly: bool,
    external: bool,
}

impl PropertyOptions {
    /// Options for an ordinary build-file property.
    pub fn new() -> Self {
        Self {
            overwrite: true,
            readonly: false,
            external: false,
        }
    }

    /// Options for a property supplied from outside the build file
    /// (configuration or command line). Such values win over build-file
    /// definitions of the same name.
    pub fn external() -> Self {
        Self {
            external: true,
            ..Self::new()
        }
    }

    /// Whether an existing value is replaced. Defaults to `true`.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Whether later definitions are rejected.
    pub fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }
}

impl Default for PropertyOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// What [`BuildProject::set_property`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyUpdate {
    Added,
    Replaced,
    /// The existing value was kept.
    Kept,
}

#[derive(Debug, Clone)]
struct PropertyValue {
    value: String,
    readonly: bool,
    external: bool,
}

/// A build file's project: its source, namespace, base directory and
/// property table.
///
/// The property table sits behind a lock so properties can be added through
/// the shared [`ProjectRef`](kiln_core::ProjectRef) handle while the build
/// file is being loaded.
pub struct BuildProject {
    file: Arc<str>,
    source: String,
    lines: LineIndex,
    namespace: Option<String>,
    source_dir: PathBuf,
    name: OnceLock<String>,
    base_dir: OnceLock<PathBuf>,
    properties: RwLock<IndexMap<String, PropertyValue>>,
}

impl BuildProject {
    /// Create a project for the build file `file` with contents `source`.
    ///
    /// Relative base directories are resolved against the directory holding
    /// the build file.
    pub fn new(file: impl Into<Arc<str>>, source: impl Into<String>, namespace: Option<String>) -> Self {
        let file = file.into();
        let source = source.into();
        let source_dir = Path::new(&*file)
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self {
            lines: LineIndex::new(&source),
            file,
            source,
            namespace,
            source_dir,
            name: OnceLock::new(),
            base_dir: OnceLock::new(),
            properties: RwLock::new(IndexMap::new()),
        }
    }

    /// Name of the build file, as used in locations.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Full text of the build file.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn line_index(&self) -> &LineIndex {
        &self.lines
    }

    /// Record the project's declared name. Only the first call has an effect.
    pub fn set_name(&self, name: impl Into<String>) {
        let _ = self.name.set(name.into());
    }

    /// Record the project's base directory. Relative paths are resolved
    /// against the build file's directory. Only the first call has an effect.
    pub fn set_base_dir(&self, dir: impl AsRef<Path>) {
        let _ = self.base_dir.set(self.source_dir.join(dir));
    }

    /// Directory relative paths in the build file are resolved against.
    pub fn base_dir(&self) -> &Path {
        self.base_dir.get().unwrap_or(&self.source_dir)
    }

    /// Define or update a property.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyError::ReadOnly`] when overwriting a read-only
    /// build-file property. Externally supplied values are kept silently.
    pub fn set_property(
        &self,
        name: &str,
        value: &str,
        options: PropertyOptions,
    ) -> Result<PropertyUpdate, PropertyError> {
        let mut properties = self.properties.write().unwrap_or_else(PoisonError::into_inner);

        let update = match properties.get(name) {
            None => PropertyUpdate::Added,
            Some(_) if !options.overwrite => return Ok(PropertyUpdate::Kept),
            Some(existing) if existing.external && !options.external => {
                debug!(property = name; "Keeping externally supplied property value");
                return Ok(PropertyUpdate::Kept);
            }
            Some(existing) if existing.readonly => {
                return Err(PropertyError::ReadOnly(name.to_string()));
            }
            Some(_) => PropertyUpdate::Replaced,
        };

        properties.insert(
            name.to_string(),
            PropertyValue {
                value: value.to_string(),
                readonly: options.readonly,
                external: options.external,
            },
        );
        debug!(property = name, value, update:?; "Property set");
        Ok(update)
    }

    /// Current value of a property.
    pub fn property(&self, name: &str) -> Option<String> {
        self.read_properties().get(name).map(|p| p.value.clone())
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.read_properties().contains_key(name)
    }

    pub fn is_readonly(&self, name: &str) -> bool {
        self.read_properties().get(name).is_some_and(|p| p.readonly)
    }

    /// Snapshot of every property in definition order.
    pub fn properties(&self) -> IndexMap<String, String> {
        self.read_properties()
            .iter()
            .map(|(name, p)| (name.clone(), p.value.clone()))
            .collect()
    }

    fn read_properties(&self) -> std::sync::RwLockReadGuard<'_, IndexMap<String, PropertyValue>> {
        self.properties.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Project for BuildProject {
    fn name(&self) -> Option<&str> {
        self.name.get().map(String::as_str)
    }

    fn expand_properties(&self, raw: &str, _location: &Location) -> Result<String, ExpansionError> {
        let table = self.read_properties();
        properties::expand(raw, |name| table.get(name).map(|p| p.value.clone()))
            .map(|expanded| expanded.into_owned())
    }

    fn namespace_uri(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn location_of(&self, span: Span) -> Option<Location> {
        let (line, column) = self.lines.position(&self.source, span.start())?;
        Some(Location::new(Arc::clone(&self.file), line, column))
    }
}

impl fmt::Debug for BuildProject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuildProject")
            .field("file", &self.file)
            .field("name", &self.name.get())
            .field("namespace", &self.namespace)
            .field("base_dir", &self.base_dir())
            .field("properties", &self.read_properties().len())
            .finish_non_exhaustive()
    }
}
