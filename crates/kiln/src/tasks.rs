//! Built-in tasks.
//!
//! Tasks are bound from the children of `<target>` and `<project>` and kept
//! as [`AnyTask`] trait objects. Binding a task only records its
//! configuration; nothing here runs a task.

use std::{any::Any, fmt};

use kiln_binder::{Describer, Element};
use kiln_core::{ElementMeta, Location};

mod copy;
mod csc;
mod delete;
mod echo;
mod mkdir;
mod property;

pub use copy::CopyTask;
pub use csc::{CscTask, Platform, TargetKind};
pub use delete::DeleteTask;
pub use echo::{EchoTask, Level};
pub use mkdir::MkdirTask;
pub use property::PropertyTask;

/// A bound task of any type.
pub trait AnyTask: fmt::Debug + Send + Sync {
    /// XML name of the task.
    fn task_name(&self) -> &'static str;

    fn task_meta(&self) -> &ElementMeta;

    fn as_any(&self) -> &dyn Any;
}

impl<T> AnyTask for T
where
    T: Element + fmt::Debug + Send + Sync,
{
    fn task_name(&self) -> &'static str {
        T::NAME
    }

    fn task_meta(&self) -> &ElementMeta {
        self.meta()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl dyn AnyTask {
    /// The concrete task, if it is a `T`.
    pub fn downcast_ref<T: AnyTask + 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    pub fn is<T: AnyTask + 'static>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Where the task was declared.
    pub fn location(&self) -> &Location {
        self.task_meta().location()
    }
}

/// Attributes every task accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskSettings {
    failonerror: bool,
    verbose: bool,
    condition: bool,
    unless: bool,
}

impl TaskSettings {
    /// Whether a failure of the task fails the build. Defaults to `true`.
    pub fn fail_on_error(&self) -> bool {
        self.failonerror
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    /// Whether the task's `if` and `unless` conditions let it run.
    pub fn is_enabled(&self) -> bool {
        self.condition && !self.unless
    }

    /// Register the common attributes on a task type.
    pub(crate) fn describe<T: Element>(d: &mut Describer<T>, access: fn(&mut T) -> &mut TaskSettings) {
        d.attribute("failonerror", "failonerror", move |t: &mut T, v: bool| {
            access(t).failonerror = v
        });
        d.attribute("verbose", "verbose", move |t: &mut T, v: bool| access(t).verbose = v);
        d.attribute("if", "if", move |t: &mut T, v: bool| access(t).condition = v);
        d.attribute("unless", "unless", move |t: &mut T, v: bool| access(t).unless = v);
    }
}

impl Default for TaskSettings {
    fn default() -> Self {
        Self {
            failonerror: true,
            verbose: false,
            condition: true,
            unless: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_enable_the_task() {
        let settings = TaskSettings::default();

        assert!(settings.fail_on_error());
        assert!(!settings.verbose());
        assert!(settings.is_enabled());
    }

    #[test]
    fn test_conditions() {
        let skipped = TaskSettings {
            condition: false,
            ..TaskSettings::default()
        };
        let excluded = TaskSettings {
            unless: true,
            ..TaskSettings::default()
        };

        assert!(!skipped.is_enabled());
        assert!(!excluded.is_enabled());
    }

    #[test]
    fn test_downcast() {
        let task: Box<dyn AnyTask> = Box::new(MkdirTask::default());

        assert_eq!(task.task_name(), "mkdir");
        assert!(task.is::<MkdirTask>());
        assert!(task.downcast_ref::<EchoTask>().is_none());
        assert!(task.location().is_unknown());
    }
}
