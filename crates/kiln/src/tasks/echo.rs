use kiln_binder::{Describer, Element, ElementKind, coerce::AttributeEnum};
use kiln_core::ElementMeta;

use super::TaskSettings;

/// Severity an `<echo>` message is written at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Level {
    Debug,
    Verbose,
    #[default]
    Info,
    Warning,
    Error,
}

impl AttributeEnum for Level {
    const VARIANTS: &'static [(&'static str, Self)] = &[
        ("Debug", Self::Debug),
        ("Verbose", Self::Verbose),
        ("Info", Self::Info),
        ("Warning", Self::Warning),
        ("Error", Self::Error),
    ];
}

impl From<Level> for log::Level {
    fn from(level: Level) -> Self {
        match level {
            Level::Debug => log::Level::Trace,
            Level::Verbose => log::Level::Debug,
            Level::Info => log::Level::Info,
            Level::Warning => log::Level::Warn,
            Level::Error => log::Level::Error,
        }
    }
}

/// `<echo message="..." level="Info"/>`
#[derive(Debug, Default)]
pub struct EchoTask {
    meta: ElementMeta,
    settings: TaskSettings,
    message: String,
    level: Level,
}

impl EchoTask {
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn settings(&self) -> &TaskSettings {
        &self.settings
    }
}

impl Element for EchoTask {
    const NAME: &'static str = "echo";
    const KIND: ElementKind = ElementKind::Task;

    fn describe(d: &mut Describer<Self>) {
        d.attribute("message", "message", |e: &mut Self, v: String| e.message = v);
        d.enumeration("level", "level", |e: &mut Self, v: Level| e.level = v);
        TaskSettings::describe(d, |e| &mut e.settings);
    }

    fn meta(&self) -> &ElementMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut ElementMeta {
        &mut self.meta
    }
}
