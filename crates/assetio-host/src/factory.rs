//! In-process manager registry
//!
//! Managers are registered by the application with a constructor and later
//! instantiated by identifier. Nothing here discovers or loads code; the
//! application decides which implementations exist.

use assetio_manager_api::{ApiResult, AssetIoError, ManagerInterface, ManagerInterfaceFactory};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

type Constructor = Box<dyn Fn() -> Arc<dyn ManagerInterface> + Send + Sync>;

/// A [`ManagerInterfaceFactory`] backed by registered constructors.
///
/// ```ignore
/// let mut registry = ManagerRegistry::new();
/// registry.register("org.example.manager", || Arc::new(ExampleManager::default()));
/// let session = Session::new(host, logger, Arc::new(registry));
/// ```
#[derive(Default)]
pub struct ManagerRegistry {
    constructors: BTreeMap<String, Constructor>,
}

impl ManagerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor, replacing any previous one for the same
    /// identifier.
    pub fn register<F>(&mut self, identifier: impl Into<String>, constructor: F)
    where
        F: Fn() -> Arc<dyn ManagerInterface> + Send + Sync + 'static,
    {
        let identifier = identifier.into();
        debug!(manager = %identifier, "Registering manager");
        if self
            .constructors
            .insert(identifier.clone(), Box::new(constructor))
            .is_some()
        {
            debug!(manager = %identifier, "Replaced previously registered manager");
        }
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl ManagerInterfaceFactory for ManagerRegistry {
    fn identifiers(&self) -> Vec<String> {
        self.constructors.keys().cloned().collect()
    }

    fn is_registered(&self, identifier: &str) -> bool {
        self.constructors.contains_key(identifier)
    }

    fn instantiate(&self, identifier: &str) -> ApiResult<Arc<dyn ManagerInterface>> {
        let constructor = self.constructors.get(identifier).ok_or_else(|| {
            AssetIoError::configuration(format!(
                "No manager registered with identifier '{}'",
                identifier
            ))
        })?;
        Ok(constructor())
    }
}

impl fmt::Debug for ManagerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManagerRegistry")
            .field("identifiers", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assetio_manager_api::{Capability, HostSession};

    struct Named(&'static str);

    impl ManagerInterface for Named {
        fn identifier(&self) -> String {
            self.0.to_string()
        }

        fn display_name(&self) -> String {
            self.0.to_uppercase()
        }

        fn has_capability(&self, _capability: Capability) -> bool {
            false
        }

        fn is_entity_reference_string(&self, _some_string: &str, _session: &HostSession) -> bool {
            false
        }
    }

    #[test]
    fn identifiers_are_sorted() {
        let mut registry = ManagerRegistry::new();
        registry.register("org.b", || Arc::new(Named("org.b")));
        registry.register("org.a", || Arc::new(Named("org.a")));

        assert_eq!(registry.identifiers(), vec!["org.a", "org.b"]);
        assert!(registry.is_registered("org.a"));
        assert!(!registry.is_registered("org.c"));
    }

    #[test]
    fn instantiate_calls_constructor_each_time() {
        let mut registry = ManagerRegistry::new();
        registry.register("org.a", || Arc::new(Named("org.a")));

        let first = registry.instantiate("org.a").unwrap();
        let second = registry.instantiate("org.a").unwrap();

        assert_eq!(first.identifier(), "org.a");
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn unknown_identifier_is_a_configuration_error() {
        let registry = ManagerRegistry::new();

        let err = registry.instantiate("org.missing").err().unwrap();
        assert_eq!(
            err,
            AssetIoError::configuration("No manager registered with identifier 'org.missing'")
        );
    }
}
