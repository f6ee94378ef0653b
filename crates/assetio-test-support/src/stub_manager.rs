//! A deterministic in-memory manager
//!
//! `StubManager` keeps its entities in memory and counts every call made to
//! it, so tests can assert both on results and on which manager methods the
//! host actually invoked.
//!
//! ```ignore
//! let stub = Arc::new(
//!     StubManager::new("org.test.stub")
//!         .with_entity("stub:///cat", traits_data(&["image"]))
//!         .with_element_error("stub:///dog", BatchElementError::new(ErrorCode::AuthError, "no")),
//! );
//! ```

use assetio_manager_api::constants::INFO_KEY_ENTITY_REFERENCES_MATCH_PREFIX;
use assetio_manager_api::{
    ApiResult, AssetIoError, BatchElementError, BatchElementErrorCallback, BatchElementResult,
    Capability, Context, DefaultEntityAccess, EntityReference, EntityReferencePagerInterface,
    EntityTraitsAccess, ErrorCode, HostSession, InfoDictionary, ManagerInterface,
    ManagerStateHandle, PolicyAccess, PropertyValue, PublishingAccess, RelationsAccess,
    ResolveAccess, StrMap, SuccessCallback, TraitSet, TraitsData,
};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Prefix of the persistence tokens produced by the stub
pub const STATE_TOKEN_PREFIX: &str = "stub-state:";

/// Order in which the stub invokes batch callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallbackOrder {
    /// Input order
    #[default]
    Forward,
    /// Reverse input order
    Reverse,
    /// One thread per element
    Threaded,
}

/// Manager state attached to contexts by the stub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubState {
    pub id: usize,
    pub parent: Option<usize>,
}

pub struct StubManager {
    identifier: String,
    capabilities: Mutex<HashSet<Capability>>,
    capabilities_after_initialize: Option<HashSet<Capability>>,
    info: InfoDictionary,
    reference_scheme: String,
    entities: Mutex<BTreeMap<String, TraitsData>>,
    element_errors: HashMap<String, BatchElementError>,
    relations: HashMap<(String, String), Vec<EntityReference>>,
    policy: TraitsData,
    terminology: StrMap,
    callback_order: CallbackOrder,
    call_failure: Option<AssetIoError>,
    initialize_failure: Mutex<Option<AssetIoError>>,
    settings: Mutex<InfoDictionary>,
    next_state_id: AtomicUsize,
    closed_pagers: Arc<AtomicUsize>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl StubManager {
    /// A stub with the capabilities hosts require, recognising references
    /// starting with `stub://`.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            capabilities: Mutex::new(
                [
                    Capability::EntityReferenceIdentification,
                    Capability::ManagementPolicyQueries,
                    Capability::EntityTraitIntrospection,
                    Capability::Resolution,
                    Capability::Publishing,
                    Capability::ExistenceQueries,
                    Capability::RelationshipQueries,
                    Capability::DefaultEntityReferences,
                ]
                .into_iter()
                .collect(),
            ),
            capabilities_after_initialize: None,
            info: InfoDictionary::new(),
            reference_scheme: "stub://".to_string(),
            entities: Mutex::new(BTreeMap::new()),
            element_errors: HashMap::new(),
            relations: HashMap::new(),
            policy: TraitsData::new(),
            terminology: StrMap::new(),
            callback_order: CallbackOrder::default(),
            call_failure: None,
            initialize_failure: Mutex::new(None),
            settings: Mutex::new(InfoDictionary::new()),
            next_state_id: AtomicUsize::new(1),
            closed_pagers: Arc::new(AtomicUsize::new(0)),
            calls: Mutex::new(HashMap::new()),
        }
    }

    // ================================================================
    // Builder
    // ================================================================

    pub fn with_capabilities(self, capabilities: impl IntoIterator<Item = Capability>) -> Self {
        *self.capabilities.lock() = capabilities.into_iter().collect();
        self
    }

    pub fn with_capability(self, capability: Capability) -> Self {
        self.capabilities.lock().insert(capability);
        self
    }

    pub fn without_capability(self, capability: Capability) -> Self {
        self.capabilities.lock().remove(&capability);
        self
    }

    /// Replace the advertised capabilities once `initialize` has run
    pub fn with_capabilities_after_initialize(
        mut self,
        capabilities: impl IntoIterator<Item = Capability>,
    ) -> Self {
        self.capabilities_after_initialize = Some(capabilities.into_iter().collect());
        self
    }

    pub fn with_info(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.info.insert(key.into(), value.into());
        self
    }

    /// Publish the reference scheme as the entity reference match prefix
    pub fn with_published_prefix(self) -> Self {
        let scheme = self.reference_scheme.clone();
        self.with_info(INFO_KEY_ENTITY_REFERENCES_MATCH_PREFIX, scheme)
    }

    /// Strings starting with `scheme` are entity references
    pub fn with_reference_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.reference_scheme = scheme.into();
        self
    }

    pub fn with_entity(self, reference: impl Into<String>, traits_data: TraitsData) -> Self {
        self.entities.lock().insert(reference.into(), traits_data);
        self
    }

    /// Report `error` for `reference` from every batch method
    pub fn with_element_error(
        mut self,
        reference: impl Into<String>,
        error: BatchElementError,
    ) -> Self {
        self.element_errors.insert(reference.into(), error);
        self
    }

    /// Entities related to `reference` through relationship trait
    /// `relationship_trait`
    pub fn with_relations(
        mut self,
        reference: impl Into<String>,
        relationship_trait: impl Into<String>,
        related: Vec<EntityReference>,
    ) -> Self {
        self.relations
            .insert((reference.into(), relationship_trait.into()), related);
        self
    }

    /// Policy returned for every trait set by `management_policy`
    pub fn with_policy(mut self, policy: TraitsData) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_terminology(
        mut self,
        term: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        self.terminology.insert(term.into(), replacement.into());
        self
    }

    pub fn with_callback_order(mut self, callback_order: CallbackOrder) -> Self {
        self.callback_order = callback_order;
        self
    }

    /// Fail every batch call as a whole with `error`
    pub fn with_call_failure(mut self, error: AssetIoError) -> Self {
        self.call_failure = Some(error);
        self
    }

    pub fn with_initialize_failure(self, error: AssetIoError) -> Self {
        self.set_initialize_failure(Some(error));
        self
    }

    /// Make later `initialize` calls fail with `error`, or succeed again
    /// with `None`.
    pub fn set_initialize_failure(&self, error: Option<AssetIoError>) {
        *self.initialize_failure.lock() = error;
    }

    // ================================================================
    // Inspection
    // ================================================================

    /// How many times the named `ManagerInterface` method was called
    pub fn call_count(&self, method: &str) -> usize {
        self.calls.lock().get(method).copied().unwrap_or(0)
    }

    /// Number of pagers the host has closed
    pub fn closed_pager_count(&self) -> usize {
        self.closed_pagers.load(Ordering::SeqCst)
    }

    /// Traits registered (or seeded) for a reference
    pub fn entity(&self, reference: &str) -> Option<TraitsData> {
        self.entities.lock().get(reference).cloned()
    }

    fn record_call(&self, method: &'static str) {
        *self.calls.lock().entry(method).or_insert(0) += 1;
    }

    fn new_state(&self, parent: Option<usize>) -> ManagerStateHandle {
        let id = self.next_state_id.fetch_add(1, Ordering::SeqCst);
        Arc::new(StubState { id, parent })
    }

    /// Run a batch, reporting each element in the configured order.
    fn run_batch<I, T>(
        &self,
        method: &'static str,
        items: &[I],
        element: impl Fn(&I) -> BatchElementResult<T> + Sync,
        success_callback: &SuccessCallback<'_, T>,
        error_callback: &BatchElementErrorCallback<'_>,
    ) -> ApiResult<()>
    where
        I: Sync,
    {
        self.record_call(method);
        if let Some(error) = &self.call_failure {
            return Err(error.clone());
        }

        // Set once an error callback asks the stub to stop.
        let stopped = AtomicBool::new(false);
        let emit = |index: usize| {
            if stopped.load(Ordering::SeqCst) {
                return;
            }
            match element(&items[index]) {
                Ok(value) => success_callback(index, value),
                Err(error) => {
                    if error_callback(index, error).is_break() {
                        stopped.store(true, Ordering::SeqCst);
                    }
                }
            }
        };

        match self.callback_order {
            CallbackOrder::Forward => {
                for index in 0..items.len() {
                    emit(index);
                }
            }
            CallbackOrder::Reverse => {
                for index in (0..items.len()).rev() {
                    emit(index);
                }
            }
            CallbackOrder::Threaded => {
                let emit = &emit;
                std::thread::scope(|scope| {
                    for index in 0..items.len() {
                        scope.spawn(move || emit(index));
                    }
                });
            }
        }
        Ok(())
    }

    fn element_error(&self, reference: &EntityReference) -> Option<BatchElementError> {
        self.element_errors.get(reference.as_str()).cloned()
    }

    fn lookup(&self, reference: &EntityReference) -> BatchElementResult<TraitsData> {
        if let Some(error) = self.element_error(reference) {
            return Err(error);
        }
        self.entity(reference.as_str()).ok_or_else(|| {
            BatchElementError::new(
                ErrorCode::InvalidEntityReference,
                format!("Entity '{}' not found", reference),
            )
        })
    }

    fn pager_for(
        &self,
        reference: &EntityReference,
        relationship: &TraitsData,
        page_size: usize,
    ) -> Box<dyn EntityReferencePagerInterface> {
        let related = relationship
            .trait_set()
            .into_iter()
            .find_map(|trait_id| {
                self.relations
                    .get(&(reference.as_str().to_string(), trait_id))
                    .cloned()
            })
            .unwrap_or_default();

        Box::new(StubPager {
            pages: related.chunks(page_size.max(1)).map(<[_]>::to_vec).collect(),
            current: 0,
            closed: Arc::clone(&self.closed_pagers),
        })
    }
}

/// Copy of `data` restricted to the traits in `trait_set`
fn restrict(data: &TraitsData, trait_set: &TraitSet) -> TraitsData {
    let mut restricted = TraitsData::new();
    for trait_id in trait_set.iter().filter(|id| data.has_trait(id)) {
        restricted.add_trait(trait_id.as_str());
        for key in data.trait_property_keys(trait_id) {
            if let Some(value) = data.get_trait_property(trait_id, &key) {
                restricted.set_trait_property(trait_id.as_str(), key, value.clone());
            }
        }
    }
    restricted
}

impl ManagerInterface for StubManager {
    fn identifier(&self) -> String {
        self.identifier.clone()
    }

    fn display_name(&self) -> String {
        format!("Stub ({})", self.identifier)
    }

    fn info(&self) -> InfoDictionary {
        self.record_call("info");
        self.info.clone()
    }

    fn has_capability(&self, capability: Capability) -> bool {
        self.capabilities.lock().contains(&capability)
    }

    fn settings(&self, _host_session: &HostSession) -> ApiResult<InfoDictionary> {
        self.record_call("settings");
        Ok(self.settings.lock().clone())
    }

    fn initialize(
        &self,
        manager_settings: InfoDictionary,
        host_session: &HostSession,
    ) -> ApiResult<()> {
        self.record_call("initialize");
        if let Some(error) = self.initialize_failure.lock().clone() {
            return Err(error);
        }
        host_session.logger().debug(&format!(
            "{} initialized for {}",
            self.identifier,
            host_session.host().identifier()
        ));

        *self.settings.lock() = manager_settings;
        if let Some(capabilities) = &self.capabilities_after_initialize {
            *self.capabilities.lock() = capabilities.clone();
        }
        Ok(())
    }

    fn flush_caches(&self, _host_session: &HostSession) -> ApiResult<()> {
        self.record_call("flush_caches");
        Ok(())
    }

    fn update_terminology(
        &self,
        mut terms: StrMap,
        _host_session: &HostSession,
    ) -> ApiResult<StrMap> {
        self.record_call("update_terminology");
        for (term, value) in terms.iter_mut() {
            if let Some(replacement) = self.terminology.get(term) {
                *value = replacement.clone();
            }
        }
        Ok(terms)
    }

    fn management_policy(
        &self,
        trait_sets: &[TraitSet],
        _policy_access: PolicyAccess,
        _context: &Context,
        _host_session: &HostSession,
    ) -> ApiResult<Vec<TraitsData>> {
        self.record_call("management_policy");
        Ok(vec![self.policy.clone(); trait_sets.len()])
    }

    fn is_entity_reference_string(&self, some_string: &str, _host_session: &HostSession) -> bool {
        self.record_call("is_entity_reference_string");
        some_string.starts_with(self.reference_scheme.as_str())
    }

    fn create_state(&self, _host_session: &HostSession) -> ApiResult<ManagerStateHandle> {
        self.record_call("create_state");
        Ok(self.new_state(None))
    }

    fn create_child_state(
        &self,
        parent_state: &ManagerStateHandle,
        _host_session: &HostSession,
    ) -> ApiResult<ManagerStateHandle> {
        self.record_call("create_child_state");
        let parent = parent_state
            .downcast_ref::<StubState>()
            .ok_or_else(|| AssetIoError::input_validation("Not a stub manager state"))?;
        Ok(self.new_state(Some(parent.id)))
    }

    fn persistence_token_for_state(
        &self,
        state: &ManagerStateHandle,
        _host_session: &HostSession,
    ) -> ApiResult<String> {
        self.record_call("persistence_token_for_state");
        let state = state
            .downcast_ref::<StubState>()
            .ok_or_else(|| AssetIoError::input_validation("Not a stub manager state"))?;
        Ok(format!("{}{}", STATE_TOKEN_PREFIX, state.id))
    }

    fn state_from_persistence_token(
        &self,
        token: &str,
        _host_session: &HostSession,
    ) -> ApiResult<ManagerStateHandle> {
        self.record_call("state_from_persistence_token");
        let id = token
            .strip_prefix(STATE_TOKEN_PREFIX)
            .and_then(|id| id.parse().ok())
            .ok_or_else(|| {
                AssetIoError::input_validation(format!("Invalid persistence token '{}'", token))
            })?;
        Ok(Arc::new(StubState { id, parent: None }))
    }

    fn entity_exists(
        &self,
        entity_references: &[EntityReference],
        _context: &Context,
        _host_session: &HostSession,
        success_callback: &SuccessCallback<'_, bool>,
        error_callback: &BatchElementErrorCallback<'_>,
    ) -> ApiResult<()> {
        self.run_batch(
            "entity_exists",
            entity_references,
            |reference| match self.element_error(reference) {
                Some(error) => Err(error),
                None => Ok(self.entities.lock().contains_key(reference.as_str())),
            },
            success_callback,
            error_callback,
        )
    }

    fn entity_traits(
        &self,
        entity_references: &[EntityReference],
        _entity_traits_access: EntityTraitsAccess,
        _context: &Context,
        _host_session: &HostSession,
        success_callback: &SuccessCallback<'_, TraitSet>,
        error_callback: &BatchElementErrorCallback<'_>,
    ) -> ApiResult<()> {
        self.run_batch(
            "entity_traits",
            entity_references,
            |reference| self.lookup(reference).map(|data| data.trait_set()),
            success_callback,
            error_callback,
        )
    }

    fn resolve(
        &self,
        entity_references: &[EntityReference],
        trait_set: &TraitSet,
        _resolve_access: ResolveAccess,
        _context: &Context,
        _host_session: &HostSession,
        success_callback: &SuccessCallback<'_, TraitsData>,
        error_callback: &BatchElementErrorCallback<'_>,
    ) -> ApiResult<()> {
        self.run_batch(
            "resolve",
            entity_references,
            |reference| self.lookup(reference).map(|data| restrict(&data, trait_set)),
            success_callback,
            error_callback,
        )
    }

    fn default_entity_reference(
        &self,
        trait_sets: &[TraitSet],
        _default_entity_access: DefaultEntityAccess,
        _context: &Context,
        _host_session: &HostSession,
        success_callback: &SuccessCallback<'_, Option<EntityReference>>,
        error_callback: &BatchElementErrorCallback<'_>,
    ) -> ApiResult<()> {
        self.run_batch(
            "default_entity_reference",
            trait_sets,
            |trait_set| {
                let entities = self.entities.lock();
                let default = entities
                    .iter()
                    .find(|(_, data)| trait_set.is_subset(&data.trait_set()))
                    .map(|(reference, _)| EntityReference::new_unchecked(reference.as_str()));
                Ok(default)
            },
            success_callback,
            error_callback,
        )
    }

    fn get_with_relationship(
        &self,
        entity_references: &[EntityReference],
        relationship_traits_data: &TraitsData,
        _result_trait_set: &TraitSet,
        page_size: usize,
        _relations_access: RelationsAccess,
        _context: &Context,
        _host_session: &HostSession,
        success_callback: &SuccessCallback<'_, Box<dyn EntityReferencePagerInterface>>,
        error_callback: &BatchElementErrorCallback<'_>,
    ) -> ApiResult<()> {
        self.run_batch(
            "get_with_relationship",
            entity_references,
            |reference| match self.element_error(reference) {
                Some(error) => Err(error),
                None => Ok(self.pager_for(reference, relationship_traits_data, page_size)),
            },
            success_callback,
            error_callback,
        )
    }

    fn get_with_relationships(
        &self,
        entity_reference: &EntityReference,
        relationship_traits_datas: &[TraitsData],
        _result_trait_set: &TraitSet,
        page_size: usize,
        _relations_access: RelationsAccess,
        _context: &Context,
        _host_session: &HostSession,
        success_callback: &SuccessCallback<'_, Box<dyn EntityReferencePagerInterface>>,
        error_callback: &BatchElementErrorCallback<'_>,
    ) -> ApiResult<()> {
        self.run_batch(
            "get_with_relationships",
            relationship_traits_datas,
            |relationship| match self.element_error(entity_reference) {
                Some(error) => Err(error),
                None => Ok(self.pager_for(entity_reference, relationship, page_size)),
            },
            success_callback,
            error_callback,
        )
    }

    fn preflight(
        &self,
        entity_references: &[EntityReference],
        _traits_hints: &[TraitsData],
        _publishing_access: PublishingAccess,
        _context: &Context,
        _host_session: &HostSession,
        success_callback: &SuccessCallback<'_, EntityReference>,
        error_callback: &BatchElementErrorCallback<'_>,
    ) -> ApiResult<()> {
        self.run_batch(
            "preflight",
            entity_references,
            |reference| match self.element_error(reference) {
                Some(error) => Err(error),
                None => Ok(reference.clone()),
            },
            success_callback,
            error_callback,
        )
    }

    fn register(
        &self,
        entity_references: &[EntityReference],
        entity_traits_datas: &[TraitsData],
        _publishing_access: PublishingAccess,
        _context: &Context,
        _host_session: &HostSession,
        success_callback: &SuccessCallback<'_, EntityReference>,
        error_callback: &BatchElementErrorCallback<'_>,
    ) -> ApiResult<()> {
        let items: Vec<(&EntityReference, &TraitsData)> =
            entity_references.iter().zip(entity_traits_datas).collect();

        self.run_batch(
            "register",
            &items,
            |(reference, traits_data)| match self.element_error(reference) {
                Some(error) => Err(error),
                None => {
                    self.entities
                        .lock()
                        .insert(reference.as_str().to_string(), (*traits_data).clone());
                    Ok((*reference).clone())
                }
            },
            success_callback,
            error_callback,
        )
    }
}

/// Pages over a fixed list of references
struct StubPager {
    pages: Vec<Vec<EntityReference>>,
    current: usize,
    closed: Arc<AtomicUsize>,
}

impl EntityReferencePagerInterface for StubPager {
    fn has_next(&mut self, _host_session: &HostSession) -> ApiResult<bool> {
        Ok(self.current + 1 < self.pages.len())
    }

    fn get(&mut self, _host_session: &HostSession) -> ApiResult<Vec<EntityReference>> {
        Ok(self.pages.get(self.current).cloned().unwrap_or_default())
    }

    fn next(&mut self, _host_session: &HostSession) -> ApiResult<()> {
        self.current += 1;
        Ok(())
    }

    fn close(&mut self, _host_session: &HostSession) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}
