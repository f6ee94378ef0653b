//! Host-facing manager facade
//!
//! Wraps a [`ManagerInterface`] and forwards the batch primitives after
//! validating argument shapes. The derived singular/plural call shapes live
//! in [`call_shapes`](crate::call_shapes).

use crate::capability_gate::verify_required_capabilities;
use crate::pager::EntityReferencePager;
use assetio_manager_api::constants::INFO_KEY_ENTITY_REFERENCES_MATCH_PREFIX;
use assetio_manager_api::{
    ApiResult, AssetIoError, BatchElementError, Capability, Context, DefaultEntityAccess,
    EntityReference, EntityReferencePagerInterface, EntityTraitsAccess, HostSession,
    InfoDictionary, LoggerInterface, ManagerInterface, PolicyAccess, PublishingAccess,
    RelationsAccess, ResolveAccess, StrMap, TraitSet, TraitsData,
};
use std::ops::ControlFlow;
use std::sync::Arc;
use tracing::{debug, instrument};

const INVALID_ENTITY_REFERENCE_MESSAGE: &str = "Invalid entity reference: ";

/// The host's view of a manager.
///
/// Classification and context creation may be used straight away; batch
/// entity operations expect [`initialize`](Self::initialize) to have
/// succeeded first.
pub struct Manager {
    manager_interface: Arc<dyn ManagerInterface>,
    host_session: Arc<HostSession>,
    /// Set by `initialize` from the manager's info, read-only afterwards
    entity_reference_prefix: Option<String>,
}

impl Manager {
    pub fn new(
        manager_interface: Arc<dyn ManagerInterface>,
        host_session: Arc<HostSession>,
    ) -> Self {
        Self {
            manager_interface,
            host_session,
            entity_reference_prefix: None,
        }
    }

    // ================================================================
    // Identity and lifecycle
    // ================================================================

    pub fn identifier(&self) -> String {
        self.manager_interface.identifier()
    }

    pub fn display_name(&self) -> String {
        self.manager_interface.display_name()
    }

    pub fn info(&self) -> InfoDictionary {
        self.manager_interface.info()
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        self.manager_interface.has_capability(capability)
    }

    pub fn settings(&self) -> ApiResult<InfoDictionary> {
        self.manager_interface.settings(&self.host_session)
    }

    pub fn update_terminology(&self, terms: StrMap) -> ApiResult<StrMap> {
        self.manager_interface
            .update_terminology(terms, &self.host_session)
    }

    /// Initialize the manager, verify it provides the required
    /// capabilities and pick up its entity reference prefix, if any.
    #[instrument(skip_all)]
    pub fn initialize(&mut self, manager_settings: InfoDictionary) -> ApiResult<()> {
        self.entity_reference_prefix = None;

        self.manager_interface
            .initialize(manager_settings, &self.host_session)?;

        // Only meaningful once initialized: proxy managers configure the
        // manager they delegate to in `initialize`.
        verify_required_capabilities(self.manager_interface.as_ref())?;

        self.entity_reference_prefix = entity_reference_prefix_from_info(
            self.host_session.logger().as_ref(),
            &self.manager_interface.info(),
        );

        debug!(
            manager = %self.manager_interface.identifier(),
            prefix = ?self.entity_reference_prefix,
            "Manager initialized"
        );
        Ok(())
    }

    pub fn flush_caches(&self) -> ApiResult<()> {
        self.manager_interface.flush_caches(&self.host_session)
    }

    pub fn management_policy(
        &self,
        trait_sets: &[TraitSet],
        policy_access: PolicyAccess,
        context: &Context,
    ) -> ApiResult<Vec<TraitsData>> {
        self.manager_interface
            .management_policy(trait_sets, policy_access, context, &self.host_session)
    }

    pub fn host_session(&self) -> &Arc<HostSession> {
        &self.host_session
    }

    // ================================================================
    // Contexts
    // ================================================================

    /// A fresh context. Manager state is only requested when the manager
    /// supports stateful contexts.
    pub fn create_context(&self) -> ApiResult<Context> {
        let mut context = Context::new();
        if self.has_capability(Capability::StatefulContexts) {
            context.manager_state = Some(self.manager_interface.create_state(&self.host_session)?);
        }
        Ok(context)
    }

    /// A context with a copy of the parent's locale and, if the parent has
    /// manager state, state derived from it.
    pub fn create_child_context(&self, parent_context: &Context) -> ApiResult<Context> {
        let mut context = Context::with_locale(parent_context.locale.clone());
        if let Some(parent_state) = &parent_context.manager_state {
            context.manager_state = Some(
                self.manager_interface
                    .create_child_state(parent_state, &self.host_session)?,
            );
        }
        Ok(context)
    }

    /// Token from which an equivalent context can be restored, possibly in
    /// another process. Empty when the context has no manager state.
    pub fn persistence_token_for_context(&self, context: &Context) -> ApiResult<String> {
        match &context.manager_state {
            Some(state) => self
                .manager_interface
                .persistence_token_for_state(state, &self.host_session),
            None => Ok(String::new()),
        }
    }

    pub fn context_from_persistence_token(&self, token: &str) -> ApiResult<Context> {
        let mut context = Context::new();
        if !token.is_empty() {
            context.manager_state = Some(
                self.manager_interface
                    .state_from_persistence_token(token, &self.host_session)?,
            );
        }
        Ok(context)
    }

    // ================================================================
    // Entity references
    // ================================================================

    /// Whether the string is an entity reference for this manager.
    ///
    /// Once initialized with a manager that publishes a reference prefix,
    /// this is a local prefix check and never calls the manager.
    pub fn is_entity_reference_string(&self, some_string: &str) -> bool {
        match &self.entity_reference_prefix {
            Some(prefix) => some_string.starts_with(prefix.as_str()),
            None => self
                .manager_interface
                .is_entity_reference_string(some_string, &self.host_session),
        }
    }

    pub fn create_entity_reference(
        &self,
        entity_reference_string: String,
    ) -> ApiResult<EntityReference> {
        if !self.is_entity_reference_string(&entity_reference_string) {
            return Err(AssetIoError::input_validation(format!(
                "{}{}",
                INVALID_ENTITY_REFERENCE_MESSAGE, entity_reference_string
            )));
        }
        Ok(EntityReference::new_unchecked(entity_reference_string))
    }

    pub fn create_entity_reference_if_valid(
        &self,
        entity_reference_string: String,
    ) -> Option<EntityReference> {
        self.is_entity_reference_string(&entity_reference_string)
            .then(|| EntityReference::new_unchecked(entity_reference_string))
    }

    // ================================================================
    // Batch operations
    // ================================================================

    pub fn entity_exists<S, E>(
        &self,
        entity_references: &[EntityReference],
        context: &Context,
        success_callback: S,
        error_callback: E,
    ) -> ApiResult<()>
    where
        S: Fn(usize, bool) + Send + Sync,
        E: Fn(usize, BatchElementError) -> ControlFlow<()> + Send + Sync,
    {
        self.manager_interface.entity_exists(
            entity_references,
            context,
            &self.host_session,
            &success_callback,
            &error_callback,
        )
    }

    pub fn entity_traits<S, E>(
        &self,
        entity_references: &[EntityReference],
        entity_traits_access: EntityTraitsAccess,
        context: &Context,
        success_callback: S,
        error_callback: E,
    ) -> ApiResult<()>
    where
        S: Fn(usize, TraitSet) + Send + Sync,
        E: Fn(usize, BatchElementError) -> ControlFlow<()> + Send + Sync,
    {
        self.manager_interface.entity_traits(
            entity_references,
            entity_traits_access,
            context,
            &self.host_session,
            &success_callback,
            &error_callback,
        )
    }

    pub fn resolve<S, E>(
        &self,
        entity_references: &[EntityReference],
        trait_set: &TraitSet,
        resolve_access: ResolveAccess,
        context: &Context,
        success_callback: S,
        error_callback: E,
    ) -> ApiResult<()>
    where
        S: Fn(usize, TraitsData) + Send + Sync,
        E: Fn(usize, BatchElementError) -> ControlFlow<()> + Send + Sync,
    {
        self.manager_interface.resolve(
            entity_references,
            trait_set,
            resolve_access,
            context,
            &self.host_session,
            &success_callback,
            &error_callback,
        )
    }

    pub fn default_entity_reference<S, E>(
        &self,
        trait_sets: &[TraitSet],
        default_entity_access: DefaultEntityAccess,
        context: &Context,
        success_callback: S,
        error_callback: E,
    ) -> ApiResult<()>
    where
        S: Fn(usize, Option<EntityReference>) + Send + Sync,
        E: Fn(usize, BatchElementError) -> ControlFlow<()> + Send + Sync,
    {
        self.manager_interface.default_entity_reference(
            trait_sets,
            default_entity_access,
            context,
            &self.host_session,
            &success_callback,
            &error_callback,
        )
    }

    /// Query one relationship for many entities. Each successful element
    /// receives a pager over its related entities.
    #[allow(clippy::too_many_arguments)]
    pub fn get_with_relationship<S, E>(
        &self,
        entity_references: &[EntityReference],
        relationship_traits_data: &TraitsData,
        page_size: usize,
        relations_access: RelationsAccess,
        context: &Context,
        success_callback: S,
        error_callback: E,
        result_trait_set: &TraitSet,
    ) -> ApiResult<()>
    where
        S: Fn(usize, EntityReferencePager) + Send + Sync,
        E: Fn(usize, BatchElementError) -> ControlFlow<()> + Send + Sync,
    {
        validate_page_size(page_size)?;

        let converting_success_callback = self.pager_converting_callback(&success_callback);
        self.manager_interface.get_with_relationship(
            entity_references,
            relationship_traits_data,
            result_trait_set,
            page_size,
            relations_access,
            context,
            &self.host_session,
            &converting_success_callback,
            &error_callback,
        )
    }

    /// Query many relationships for one entity. Each successful element
    /// (one per relationship) receives a pager.
    #[allow(clippy::too_many_arguments)]
    pub fn get_with_relationships<S, E>(
        &self,
        entity_reference: &EntityReference,
        relationship_traits_datas: &[TraitsData],
        page_size: usize,
        relations_access: RelationsAccess,
        context: &Context,
        success_callback: S,
        error_callback: E,
        result_trait_set: &TraitSet,
    ) -> ApiResult<()>
    where
        S: Fn(usize, EntityReferencePager) + Send + Sync,
        E: Fn(usize, BatchElementError) -> ControlFlow<()> + Send + Sync,
    {
        validate_page_size(page_size)?;

        let converting_success_callback = self.pager_converting_callback(&success_callback);
        self.manager_interface.get_with_relationships(
            entity_reference,
            relationship_traits_datas,
            result_trait_set,
            page_size,
            relations_access,
            context,
            &self.host_session,
            &converting_success_callback,
            &error_callback,
        )
    }

    pub fn preflight<S, E>(
        &self,
        entity_references: &[EntityReference],
        traits_hints: &[TraitsData],
        publishing_access: PublishingAccess,
        context: &Context,
        success_callback: S,
        error_callback: E,
    ) -> ApiResult<()>
    where
        S: Fn(usize, EntityReference) + Send + Sync,
        E: Fn(usize, BatchElementError) -> ControlFlow<()> + Send + Sync,
    {
        validate_parallel_lengths(entity_references.len(), traits_hints.len(), "traits hints")?;

        self.manager_interface.preflight(
            entity_references,
            traits_hints,
            publishing_access,
            context,
            &self.host_session,
            &success_callback,
            &error_callback,
        )
    }

    pub fn register<S, E>(
        &self,
        entity_references: &[EntityReference],
        entity_traits_datas: &[TraitsData],
        publishing_access: PublishingAccess,
        context: &Context,
        success_callback: S,
        error_callback: E,
    ) -> ApiResult<()>
    where
        S: Fn(usize, EntityReference) + Send + Sync,
        E: Fn(usize, BatchElementError) -> ControlFlow<()> + Send + Sync,
    {
        validate_parallel_lengths(
            entity_references.len(),
            entity_traits_datas.len(),
            "traits datas",
        )?;

        self.manager_interface.register(
            entity_references,
            entity_traits_datas,
            publishing_access,
            context,
            &self.host_session,
            &success_callback,
            &error_callback,
        )
    }

    /// Managers hand out their own pager type; hosts only ever see
    /// `EntityReferencePager`.
    fn pager_converting_callback<'a, S>(
        &'a self,
        success_callback: &'a S,
    ) -> impl Fn(usize, Box<dyn EntityReferencePagerInterface>) + Send + Sync + 'a
    where
        S: Fn(usize, EntityReferencePager) + Send + Sync,
    {
        let host_session = &self.host_session;
        move |index, pager_interface| {
            let pager = EntityReferencePager::new(pager_interface, Arc::clone(host_session));
            success_callback(index, pager);
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn validate_page_size(page_size: usize) -> ApiResult<()> {
    if page_size == 0 {
        return Err(AssetIoError::input_validation(
            "pageSize must be greater than zero.",
        ));
    }
    Ok(())
}

fn validate_parallel_lengths(
    entity_reference_count: usize,
    other_count: usize,
    other_name: &str,
) -> ApiResult<()> {
    if entity_reference_count != other_count {
        return Err(AssetIoError::input_validation(format!(
            "Parameter lists must be of the same length: {} entity references vs. {} {}.",
            entity_reference_count, other_count, other_name
        )));
    }
    Ok(())
}

/// Extract the entity reference prefix from a manager's info dictionary.
fn entity_reference_prefix_from_info(
    logger: &dyn LoggerInterface,
    info: &InfoDictionary,
) -> Option<String> {
    let value = info.get(INFO_KEY_ENTITY_REFERENCES_MATCH_PREFIX)?;

    match value.as_str() {
        Some(prefix) => {
            logger.debug_api(&format!(
                "Entity reference prefix '{}' provided by manager's info() dict. Subsequent \
                 calls to is_entity_reference_string will use this prefix rather than call \
                 the manager's implementation.",
                prefix
            ));
            Some(prefix.to_string())
        }
        None => {
            logger.warning(
                "Entity reference prefix given but is an invalid type: should be a string.",
            );
            None
        }
    }
}
