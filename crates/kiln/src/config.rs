//! Configuration types for loading Kiln build files.
//!
//! This module provides configuration structures that control how build
//! files are bound and which properties they start with. All types
//! implement [`serde::Deserialize`] for loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining binding and project settings.
//! - [`BindingConfig`] - How undeclared attributes and elements are treated.
//! - [`ProjectConfig`] - The build-file namespace and predefined properties.
//!
//! # Example
//!
//! ```
//! # use kiln::config::AppConfig;
//! # use kiln_binder::UnknownPolicy;
//! let config = AppConfig::default();
//! assert_eq!(config.binding().unknown_attributes(), UnknownPolicy::Warn);
//! assert!(config.project().properties().is_empty());
//! ```

use indexmap::IndexMap;
use serde::Deserialize;

use kiln_binder::{BindOptions, UnknownPolicy};

/// Top-level configuration combining binding and project settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Binding configuration section.
    #[serde(default)]
    binding: BindingConfig,

    /// Project configuration section.
    #[serde(default)]
    project: ProjectConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(binding: BindingConfig, project: ProjectConfig) -> Self {
        Self { binding, project }
    }

    /// Returns the binding configuration.
    pub fn binding(&self) -> &BindingConfig {
        &self.binding
    }

    /// Returns the project configuration.
    pub fn project(&self) -> &ProjectConfig {
        &self.project
    }

    /// Reject every undeclared attribute and element.
    pub fn strict(mut self) -> Self {
        self.binding = BindingConfig::new(UnknownPolicy::Deny, UnknownPolicy::Deny);
        self
    }

    /// Add or replace a predefined property.
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.project.properties.insert(name.into(), value.into());
        self
    }
}

/// How the binder treats attributes and child elements that no element
/// type declares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct BindingConfig {
    #[serde(default)]
    unknown_attributes: UnknownPolicy,

    #[serde(default)]
    unknown_elements: UnknownPolicy,
}

impl BindingConfig {
    pub fn new(unknown_attributes: UnknownPolicy, unknown_elements: UnknownPolicy) -> Self {
        Self {
            unknown_attributes,
            unknown_elements,
        }
    }

    pub fn unknown_attributes(&self) -> UnknownPolicy {
        self.unknown_attributes
    }

    pub fn unknown_elements(&self) -> UnknownPolicy {
        self.unknown_elements
    }

    /// The binder options these settings describe.
    pub fn bind_options(&self) -> BindOptions {
        BindOptions::new(self.unknown_attributes, self.unknown_elements)
    }
}

/// Settings applied to every loaded project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProjectConfig {
    /// XML namespace of build elements; the document's default namespace
    /// when unset.
    #[serde(default)]
    namespace: Option<String>,

    /// Properties defined before the build file is read. They take
    /// precedence over `<property>` elements of the same name.
    #[serde(default)]
    properties: IndexMap<String, String>,
}

impl ProjectConfig {
    pub fn new(namespace: Option<String>, properties: IndexMap<String, String>) -> Self {
        Self {
            namespace,
            properties,
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn properties(&self) -> &IndexMap<String, String> {
        &self.properties
    }
}
