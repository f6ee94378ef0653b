//! Per-call-sequence context

use crate::TraitsData;
use std::any::Any;
use std::sync::Arc;

/// Opaque state created by a manager and carried by contexts.
///
/// Managers downcast it back to their own type with
/// `state.downcast_ref::<MyState>()`.
pub type ManagerStateHandle = Arc<dyn Any + Send + Sync>;

/// Describes the calling environment of a sequence of API calls.
///
/// Contexts are created through the `Manager` facade so that the manager
/// gets a chance to attach its own state. Cloning a context copies the
/// locale and shares the manager state.
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Traits describing where in the host the calls originate
    pub locale: TraitsData,
    /// State owned by the manager, if it supports stateful contexts
    pub manager_state: Option<ManagerStateHandle>,
}

impl Context {
    /// A context with an empty locale and no manager state
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_locale(locale: TraitsData) -> Self {
        Self {
            locale,
            manager_state: None,
        }
    }

    pub fn has_manager_state(&self) -> bool {
        self.manager_state.is_some()
    }
}
