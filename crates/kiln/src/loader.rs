//! Loads a build file into a bound project.
//!
//! Loading parses the XML, binds the `<project>` element, then walks its
//! children in document order. `<property>` values enter the property table
//! as soon as they are bound, so every later attribute can refer to them.
//! `<target>` children are dispatched through the [`TaskRegistry`], and so
//! is any other child of `<project>`.

use std::{fs, path::Path, sync::Arc};

use indexmap::IndexMap;
use log::{debug, info};
use roxmltree::{Document, Node};

use kiln_binder::{BindError, Binder, Diagnostic, Element};
use kiln_core::{Location, OwnerInfo, Parent, ProjectRef, Span};

use crate::{
    config::AppConfig,
    error::KilnError,
    project::{BuildProject, PropertyOptions},
    source_map::LineIndex,
    structure::{ProjectElement, Target},
    task_registry::TaskRegistry,
    tasks::{AnyTask, PropertyTask},
};

/// A build file bound into typed elements.
#[derive(Debug)]
pub struct LoadedProject {
    project: Arc<BuildProject>,
    element: ProjectElement,
    targets: IndexMap<String, Target>,
    tasks: Vec<Box<dyn AnyTask>>,
    warnings: Vec<Diagnostic>,
}

impl LoadedProject {
    /// The project with its final property table.
    pub fn project(&self) -> &Arc<BuildProject> {
        &self.project
    }

    /// The bound `<project>` element.
    pub fn element(&self) -> &ProjectElement {
        &self.element
    }

    /// Targets by name, in document order.
    pub fn targets(&self) -> &IndexMap<String, Target> {
        &self.targets
    }

    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.get(name)
    }

    pub fn default_target(&self) -> Option<&Target> {
        self.element.default_target().and_then(|name| self.target(name))
    }

    /// Tasks declared directly inside `<project>`, in document order.
    pub fn tasks(&self) -> &[Box<dyn AnyTask>] {
        &self.tasks
    }

    /// Warnings about undeclared attributes and elements.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }
}

/// Loads build files with one configuration and set of task types.
///
/// # Examples
///
/// ```
/// use kiln::{ProjectLoader, config::AppConfig};
///
/// let source = r#"
/// <project name="app" default="build">
///     <property name="out" value="bin"/>
///     <target name="build">
///         <mkdir dir="${out}"/>
///     </target>
/// </project>"#;
///
/// let loaded = ProjectLoader::new(AppConfig::default())
///     .load_str(source, "default.build")
///     .expect("Failed to load");
///
/// assert_eq!(loaded.default_target().unwrap().tasks().len(), 1);
/// assert_eq!(loaded.project().property("out").as_deref(), Some("bin"));
/// ```
#[derive(Debug, Default)]
pub struct ProjectLoader {
    config: AppConfig,
    tasks: TaskRegistry,
}

impl ProjectLoader {
    /// Create a loader with the built-in tasks.
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            tasks: TaskRegistry::default(),
        }
    }

    pub fn with_task_registry(mut self, tasks: TaskRegistry) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn task_registry(&self) -> &TaskRegistry {
        &self.tasks
    }

    pub fn task_registry_mut(&mut self) -> &mut TaskRegistry {
        &mut self.tasks
    }

    /// Read and load the build file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`KilnError::Io`] if the file cannot be read, otherwise the
    /// errors of [`load_str`](Self::load_str).
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<LoadedProject, KilnError> {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Reading build file");
        let source = fs::read_to_string(path)?;
        self.load_str(&source, &path.display().to_string())
    }

    /// Load a build file from its text. `file` names it in locations.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: malformed XML, a missing
    /// `<project>` root, a binding error, a duplicate target, a read-only
    /// property being redefined or an unknown default target.
    pub fn load_str(&self, source: &str, file: &str) -> Result<LoadedProject, KilnError> {
        info!(file; "Loading build file");

        let document = Document::parse(source).map_err(|err| xml_error(err, source, file))?;
        let root = document.root_element();

        let namespace = self
            .config
            .project()
            .namespace()
            .or(root.tag_name().namespace())
            .map(str::to_string);
        if root.tag_name().name() != ProjectElement::NAME || root.tag_name().namespace() != namespace.as_deref() {
            let span = open_tag_span(root, source);
            return Err(KilnError::NotAProject {
                found: root.tag_name().name().to_string(),
                location: locate(source, file, span),
                span,
                src: source.to_string(),
            });
        }

        let project = Arc::new(BuildProject::new(file, source, namespace));
        let mut load = Load {
            source,
            project: Arc::clone(&project),
            binder: Binder::new(Arc::clone(&project) as ProjectRef)
                .with_options(self.config.binding().bind_options()),
            tasks: &self.tasks,
        };

        for (name, value) in self.config.project().properties() {
            load.define(name, value, PropertyOptions::external(), Span::default())?;
        }
        load.define("kiln.filename", file, builtin(), Span::default())?;
        load.define("kiln.version", env!("CARGO_PKG_VERSION"), builtin(), Span::default())?;

        let mut element = ProjectElement::default();
        load.binder
            .bind(&mut element, root)
            .map_err(|err| KilnError::new_bind_error(err, source))?;

        if let Some(name) = element.name() {
            project.set_name(name);
            load.define("kiln.project.name", name, builtin(), Span::default())?;
        }
        if let Some(basedir) = element.basedir() {
            project.set_base_dir(basedir);
        }
        let basedir = project.base_dir().display().to_string();
        load.define("kiln.project.basedir", &basedir, builtin(), Span::default())?;
        if let Some(default) = element.default_target() {
            load.define("kiln.project.default", default, builtin(), Span::default())?;
        }

        let parent = Parent::Project(OwnerInfo::new(
            ProjectElement::NAME,
            element.name().map(str::to_string),
            element.location().clone(),
        ));
        let mut targets: IndexMap<String, Target> = IndexMap::new();
        let mut tasks = Vec::new();

        let children: Vec<_> = root
            .children()
            .filter(|c| load.binder.is_build_element(*c))
            .collect();
        for child in children {
            if child.tag_name().name() == Target::NAME {
                let target = load.target(child, parent.clone())?;
                if let Some(first) = targets.get(target.name()) {
                    let span = attribute_span(child, "name").unwrap_or_else(|| open_tag_span(child, source));
                    return Err(KilnError::DuplicateTarget {
                        name: target.name().to_string(),
                        location: load.binder.locate(span),
                        span,
                        first: first.meta().source().map(|s| s.span()).unwrap_or_default(),
                        src: source.to_string(),
                    });
                }
                targets.insert(target.name().to_string(), target);
            } else {
                tasks.push(load.task(child, parent.clone())?);
            }
        }

        if let Some(default) = element.default_target() {
            if !targets.contains_key(default) {
                let span = attribute_span(root, "default").unwrap_or_else(|| open_tag_span(root, source));
                return Err(KilnError::UnknownDefaultTarget {
                    name: default.to_string(),
                    location: load.binder.locate(span),
                    span,
                    src: source.to_string(),
                });
            }
        }

        let warnings = load.binder.take_warnings();
        info!(
            file,
            targets = targets.len(),
            tasks = tasks.len(),
            warnings = warnings.len();
            "Build file loaded"
        );

        Ok(LoadedProject {
            project,
            element,
            targets,
            tasks,
            warnings,
        })
    }
}

/// State of one load in progress.
struct Load<'a> {
    source: &'a str,
    project: Arc<BuildProject>,
    binder: Binder<'static>,
    tasks: &'a TaskRegistry,
}

impl Load<'_> {
    fn target(&mut self, node: Node<'_, '_>, parent: Parent) -> Result<Target, KilnError> {
        let mut target = Target::default();
        self.binder
            .bind_child(&mut target, node, Some(parent))
            .map_err(|err| KilnError::new_bind_error(err, self.source))?;
        debug!(target = target.name(); "Bound target");

        let owner = Parent::Target(OwnerInfo::new(
            Target::NAME,
            Some(target.name().to_string()),
            target.location().clone(),
        ));
        let children: Vec<_> = node
            .children()
            .filter(|c| self.binder.is_build_element(*c))
            .collect();
        for child in children {
            let task = self.task(child, owner.clone())?;
            target.push_task(task);
        }
        Ok(target)
    }

    fn task(&mut self, node: Node<'_, '_>, parent: Parent) -> Result<Box<dyn AnyTask>, KilnError> {
        let owner = parent.info().element().to_string();
        let Some(bound) = self.tasks.bind(&mut self.binder, node, Some(parent)) else {
            let span = Span::from(node.range());
            let err = BindError::UnexpectedElement {
                element: node.tag_name().name().to_string(),
                parent: owner,
                location: self.binder.locate(span),
                span,
            };
            return Err(KilnError::new_bind_error(err, self.source));
        };
        let task = bound.map_err(|err| KilnError::new_bind_error(err, self.source))?;

        if let Some(property) = task.downcast_ref::<PropertyTask>() {
            if property.settings().is_enabled() {
                let span = property.meta().source().map(|s| s.span()).unwrap_or_default();
                self.define(property.name(), property.value(), property.options(), span)?;
            }
        }
        Ok(task)
    }

    fn define(&self, name: &str, value: &str, options: PropertyOptions, span: Span) -> Result<(), KilnError> {
        self.project
            .set_property(name, value, options)
            .map(|_| ())
            .map_err(|err| KilnError::Property {
                err,
                location: self.binder.locate(span),
                span,
                src: self.source.to_string(),
            })
    }
}

/// Options of the properties the loader defines itself.
fn builtin() -> PropertyOptions {
    PropertyOptions::new().readonly(true)
}

fn xml_error(err: roxmltree::Error, source: &str, file: &str) -> KilnError {
    let pos = err.pos();
    let offset = LineIndex::new(source)
        .offset(source, pos.row, pos.col)
        .unwrap_or(source.len());
    KilnError::Xml {
        err,
        location: Location::new(file, pos.row, pos.col),
        span: Span::new(offset..offset),
        src: source.to_string(),
    }
}

fn locate(source: &str, file: &str, span: Span) -> Location {
    LineIndex::new(source)
        .position(source, span.start())
        .map_or_else(Location::unknown, |(line, column)| Location::new(file, line, column))
}

/// Span of `<name` at the start of an element.
fn open_tag_span(node: Node<'_, '_>, source: &str) -> Span {
    let start = node.range().start;
    let len = source
        .get(start + 1..)
        .and_then(|rest| rest.find(|c: char| c.is_whitespace() || c == '>' || c == '/'))
        .map_or(1, |end| end + 1);
    Span::new(start..start + len)
}

fn attribute_span(node: Node<'_, '_>, name: &str) -> Option<Span> {
    node.attributes()
        .find(|a| a.namespace().is_none() && a.name() == name)
        .map(|a| Span::from(a.range_value()))
}
