//! The trait implemented by asset management systems

use crate::{
    ApiResult, AssetIoError, BatchElementError, Capability, Context, DefaultEntityAccess,
    EntityReference, EntityReferencePagerInterface, EntityTraitsAccess, HostSession,
    InfoDictionary, ManagerStateHandle, PolicyAccess, PublishingAccess, RelationsAccess,
    ResolveAccess, StrMap, TraitSet, TraitsData,
};
use std::ops::ControlFlow;

/// Receives the value for one batch index.
///
/// Managers may invoke callbacks from any thread and in any order, but must
/// call exactly one of the success or error callbacks exactly once per
/// input index, and should do so in input order.
pub type SuccessCallback<'a, T> = dyn Fn(usize, T) + Send + Sync + 'a;

/// Receives the error for one batch index.
///
/// A `ControlFlow::Break` return asks the manager to stop processing the
/// batch: it should not start any further elements, report nothing more,
/// and return `Ok(())`. Elements already in flight may still be reported.
pub type BatchElementErrorCallback<'a> =
    dyn Fn(usize, BatchElementError) -> ControlFlow<()> + Send + Sync + 'a;

fn not_implemented(method: &str) -> AssetIoError {
    AssetIoError::not_implemented(format!("'{}' is not implemented by this manager", method))
}

// ============================================================================
// Core Manager Trait
// ============================================================================

/// Implemented by asset management systems.
///
/// Only identity, capability advertisement and reference classification are
/// mandatory at compile time. Everything else defaults to returning
/// [`AssetIoError::NotImplemented`]; a manager advertises what it actually
/// implements through [`has_capability`](Self::has_capability), and the
/// host refuses managers lacking the capabilities it cannot do without.
///
/// Batch methods report per-element outcomes through the callbacks and
/// return `Err` only when the whole call failed.
#[allow(clippy::too_many_arguments)]
pub trait ManagerInterface: Send + Sync {
    // ------------------------------------------------------------------------
    // Identity and lifecycle
    // ------------------------------------------------------------------------

    /// Unique, reverse-DNS style identifier
    fn identifier(&self) -> String;

    /// Human readable name
    fn display_name(&self) -> String;

    /// Static information about the manager. See
    /// [`constants`](crate::constants) for well-known keys.
    fn info(&self) -> InfoDictionary {
        InfoDictionary::new()
    }

    /// Whether the manager implements a group of methods. May change
    /// after [`initialize`](Self::initialize).
    fn has_capability(&self, capability: Capability) -> bool;

    /// Current settings, suitable for passing back to `initialize`
    fn settings(&self, _host_session: &HostSession) -> ApiResult<InfoDictionary> {
        Ok(InfoDictionary::new())
    }

    /// Prepare the manager for use with the given settings
    fn initialize(
        &self,
        _manager_settings: InfoDictionary,
        _host_session: &HostSession,
    ) -> ApiResult<()> {
        Ok(())
    }

    /// Drop any cached data
    fn flush_caches(&self, _host_session: &HostSession) -> ApiResult<()> {
        Ok(())
    }

    /// Substitute manager-specific terms. Defaults to returning the input.
    fn update_terminology(&self, terms: StrMap, _host_session: &HostSession) -> ApiResult<StrMap> {
        Ok(terms)
    }

    // ------------------------------------------------------------------------
    // Policy and identification
    // ------------------------------------------------------------------------

    /// One policy bundle per input trait set
    fn management_policy(
        &self,
        _trait_sets: &[TraitSet],
        _policy_access: PolicyAccess,
        _context: &Context,
        _host_session: &HostSession,
    ) -> ApiResult<Vec<TraitsData>> {
        Err(not_implemented("management_policy"))
    }

    /// Whether the string is one of this manager's entity references
    fn is_entity_reference_string(&self, some_string: &str, host_session: &HostSession) -> bool;

    // ------------------------------------------------------------------------
    // Context state
    // ------------------------------------------------------------------------

    fn create_state(&self, _host_session: &HostSession) -> ApiResult<ManagerStateHandle> {
        Err(not_implemented("create_state"))
    }

    fn create_child_state(
        &self,
        _parent_state: &ManagerStateHandle,
        _host_session: &HostSession,
    ) -> ApiResult<ManagerStateHandle> {
        Err(not_implemented("create_child_state"))
    }

    fn persistence_token_for_state(
        &self,
        _state: &ManagerStateHandle,
        _host_session: &HostSession,
    ) -> ApiResult<String> {
        Err(not_implemented("persistence_token_for_state"))
    }

    fn state_from_persistence_token(
        &self,
        _token: &str,
        _host_session: &HostSession,
    ) -> ApiResult<ManagerStateHandle> {
        Err(not_implemented("state_from_persistence_token"))
    }

    // ------------------------------------------------------------------------
    // Batch entity operations
    // ------------------------------------------------------------------------

    fn entity_exists(
        &self,
        _entity_references: &[EntityReference],
        _context: &Context,
        _host_session: &HostSession,
        _success_callback: &SuccessCallback<'_, bool>,
        _error_callback: &BatchElementErrorCallback<'_>,
    ) -> ApiResult<()> {
        Err(not_implemented("entity_exists"))
    }

    fn entity_traits(
        &self,
        _entity_references: &[EntityReference],
        _entity_traits_access: EntityTraitsAccess,
        _context: &Context,
        _host_session: &HostSession,
        _success_callback: &SuccessCallback<'_, TraitSet>,
        _error_callback: &BatchElementErrorCallback<'_>,
    ) -> ApiResult<()> {
        Err(not_implemented("entity_traits"))
    }

    fn resolve(
        &self,
        _entity_references: &[EntityReference],
        _trait_set: &TraitSet,
        _resolve_access: ResolveAccess,
        _context: &Context,
        _host_session: &HostSession,
        _success_callback: &SuccessCallback<'_, TraitsData>,
        _error_callback: &BatchElementErrorCallback<'_>,
    ) -> ApiResult<()> {
        Err(not_implemented("resolve"))
    }

    /// `None` when the manager has no sensible default for a trait set
    fn default_entity_reference(
        &self,
        _trait_sets: &[TraitSet],
        _default_entity_access: DefaultEntityAccess,
        _context: &Context,
        _host_session: &HostSession,
        _success_callback: &SuccessCallback<'_, Option<EntityReference>>,
        _error_callback: &BatchElementErrorCallback<'_>,
    ) -> ApiResult<()> {
        Err(not_implemented("default_entity_reference"))
    }

    /// Many entities, one relationship
    fn get_with_relationship(
        &self,
        _entity_references: &[EntityReference],
        _relationship_traits_data: &TraitsData,
        _result_trait_set: &TraitSet,
        _page_size: usize,
        _relations_access: RelationsAccess,
        _context: &Context,
        _host_session: &HostSession,
        _success_callback: &SuccessCallback<'_, Box<dyn EntityReferencePagerInterface>>,
        _error_callback: &BatchElementErrorCallback<'_>,
    ) -> ApiResult<()> {
        Err(not_implemented("get_with_relationship"))
    }

    /// One entity, many relationships
    fn get_with_relationships(
        &self,
        _entity_reference: &EntityReference,
        _relationship_traits_datas: &[TraitsData],
        _result_trait_set: &TraitSet,
        _page_size: usize,
        _relations_access: RelationsAccess,
        _context: &Context,
        _host_session: &HostSession,
        _success_callback: &SuccessCallback<'_, Box<dyn EntityReferencePagerInterface>>,
        _error_callback: &BatchElementErrorCallback<'_>,
    ) -> ApiResult<()> {
        Err(not_implemented("get_with_relationships"))
    }

    fn preflight(
        &self,
        _entity_references: &[EntityReference],
        _traits_hints: &[TraitsData],
        _publishing_access: PublishingAccess,
        _context: &Context,
        _host_session: &HostSession,
        _success_callback: &SuccessCallback<'_, EntityReference>,
        _error_callback: &BatchElementErrorCallback<'_>,
    ) -> ApiResult<()> {
        Err(not_implemented("preflight"))
    }

    fn register(
        &self,
        _entity_references: &[EntityReference],
        _entity_traits_datas: &[TraitsData],
        _publishing_access: PublishingAccess,
        _context: &Context,
        _host_session: &HostSession,
        _success_callback: &SuccessCallback<'_, EntityReference>,
        _error_callback: &BatchElementErrorCallback<'_>,
    ) -> ApiResult<()> {
        Err(not_implemented("register"))
    }
}
