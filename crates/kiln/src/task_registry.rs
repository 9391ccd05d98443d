//! Maps task element names to the types they are bound into.

use std::fmt;

use indexmap::IndexMap;
use log::debug;
use roxmltree::Node;

use kiln_binder::{Binder, Element, Result};
use kiln_core::Parent;

use crate::tasks::{AnyTask, CopyTask, CscTask, DeleteTask, EchoTask, MkdirTask, PropertyTask};

type TaskFactory = fn(&mut Binder<'_>, Node<'_, '_>, Option<Parent>) -> Result<Box<dyn AnyTask>>;

fn bind_task<T>(binder: &mut Binder<'_>, node: Node<'_, '_>, parent: Option<Parent>) -> Result<Box<dyn AnyTask>>
where
    T: Element + Default + fmt::Debug + Send + Sync,
{
    let mut task = T::default();
    binder.bind_child(&mut task, node, parent)?;
    Ok(Box::new(task))
}

/// The task types a build file may use, by element name.
///
/// [`TaskRegistry::default`] knows the built-in tasks; further task types
/// are added with [`register`](TaskRegistry::register).
pub struct TaskRegistry {
    factories: IndexMap<&'static str, TaskFactory>,
}

impl TaskRegistry {
    /// A registry without any task.
    pub fn empty() -> Self {
        Self {
            factories: IndexMap::new(),
        }
    }

    /// Make `T` available under its element name, replacing any task type
    /// registered under the same name.
    pub fn register<T>(&mut self) -> &mut Self
    where
        T: Element + Default + fmt::Debug + Send + Sync,
    {
        debug!(task = T::NAME; "Registering task");
        self.factories.insert(T::NAME, bind_task::<T>);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered task names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    /// Bind `node` as the task registered under its tag name.
    ///
    /// Returns `None` if no task is registered under that name.
    pub fn bind(
        &self,
        binder: &mut Binder<'_>,
        node: Node<'_, '_>,
        parent: Option<Parent>,
    ) -> Option<Result<Box<dyn AnyTask>>> {
        let factory = self.factories.get(node.tag_name().name())?;
        Some(factory(binder, node, parent))
    }
}

impl Default for TaskRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry
            .register::<PropertyTask>()
            .register::<EchoTask>()
            .register::<CopyTask>()
            .register::<MkdirTask>()
            .register::<DeleteTask>()
            .register::<CscTask>();
        registry
    }
}

impl fmt::Debug for TaskRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
