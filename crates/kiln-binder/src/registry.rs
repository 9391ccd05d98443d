//! Memoised descriptor tables.
//!
//! Describing a type is a pure function of the type, so each table is built
//! once per registry and shared afterwards. Malformed types are not cached:
//! every lookup reports the defect again.

use std::{
    any::{Any, TypeId},
    collections::HashMap,
    fmt,
    sync::{Arc, OnceLock, PoisonError, RwLock},
};

use log::debug;

use crate::{
    Element,
    descriptor::{DescriptorError, TypeDescriptor},
};

type Table = Arc<dyn Any + Send + Sync>;

/// Cache of [`TypeDescriptor`]s keyed by element type.
#[derive(Default)]
pub struct Registry {
    tables: RwLock<HashMap<TypeId, Table>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry used by [`Binder::new`](crate::Binder::new).
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::new)
    }

    /// Get the descriptor table of `T`, building it on first use.
    ///
    /// # Errors
    ///
    /// Returns a [`DescriptorError`] if `T` is malformed.
    pub fn describe<T: Element>(&self) -> Result<Arc<TypeDescriptor<T>>, DescriptorError> {
        if let Some(table) = self.lookup::<T>() {
            return Ok(table);
        }

        let built = Arc::new(TypeDescriptor::<T>::build()?);
        debug!(
            element = T::NAME,
            attributes = built.attributes().len(),
            elements = built.elements().len();
            "Registered element type"
        );

        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        // Another thread may have won the race; keep whichever table landed first.
        let table = tables
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Arc::clone(&built) as Table)
            .clone();
        drop(tables);

        Ok(table.downcast::<TypeDescriptor<T>>().unwrap_or(built))
    }

    /// Number of cached tables.
    pub fn len(&self) -> usize {
        self.tables.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup<T: Element>(&self) -> Option<Arc<TypeDescriptor<T>>> {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        let table = tables.get(&TypeId::of::<T>())?.clone();
        table.downcast::<TypeDescriptor<T>>().ok()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry").field("tables", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use kiln_core::ElementMeta;

    use super::*;
    use crate::Describer;

    #[derive(Debug, Default)]
    struct Mkdir {
        meta: ElementMeta,
        dir: String,
    }

    impl Element for Mkdir {
        const NAME: &'static str = "mkdir";

        fn describe(d: &mut Describer<Self>) {
            d.attribute("dir", "dir", |m: &mut Mkdir, v: String| m.dir = v)
                .required();
        }

        fn meta(&self) -> &ElementMeta {
            &self.meta
        }

        fn meta_mut(&mut self) -> &mut ElementMeta {
            &mut self.meta
        }
    }

    #[derive(Debug, Default)]
    struct Broken {
        meta: ElementMeta,
    }

    impl Element for Broken {
        const NAME: &'static str = "broken";

        fn describe(d: &mut Describer<Self>) {
            d.attribute("a", "", |_: &mut Broken, _: String| {});
        }

        fn meta(&self) -> &ElementMeta {
            &self.meta
        }

        fn meta_mut(&mut self) -> &mut ElementMeta {
            &mut self.meta
        }
    }

    #[test]
    fn test_tables_are_memoised() {
        let registry = Registry::new();
        assert!(registry.is_empty());

        let first = registry.describe::<Mkdir>().unwrap();
        let second = registry.describe::<Mkdir>().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);
        assert_eq!(first.name(), "mkdir");
    }

    #[test]
    fn test_malformed_types_are_not_cached() {
        let registry = Registry::new();

        assert_eq!(
            registry.describe::<Broken>().unwrap_err(),
            DescriptorError::EmptyName("a")
        );
        assert!(registry.describe::<Broken>().is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_global_registry_is_shared() {
        assert!(std::ptr::eq(Registry::global(), Registry::global()));
    }
}
