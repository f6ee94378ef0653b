//! Instantiation of managers by identifier

use crate::{ApiResult, ManagerInterface};
use std::sync::Arc;

/// Produces manager implementations on request.
///
/// How implementations are discovered is up to the implementor; the host
/// only ever selects managers by identifier.
pub trait ManagerInterfaceFactory: Send + Sync {
    /// Identifiers of every manager this factory can instantiate
    fn identifiers(&self) -> Vec<String>;

    fn is_registered(&self, identifier: &str) -> bool {
        self.identifiers().iter().any(|id| id == identifier)
    }

    /// A new, uninitialized instance of the identified manager
    fn instantiate(&self, identifier: &str) -> ApiResult<Arc<dyn ManagerInterface>>;
}
