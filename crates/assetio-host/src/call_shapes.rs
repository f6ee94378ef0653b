//! Singular and plural call shapes derived from the batch primitives
//!
//! Each `*_one` / `*_many` method runs the corresponding batch method on
//! [`Manager`] with aggregating callbacks, then lets the policy tag decide
//! how element errors come back. Under `Exception` the first element error
//! also asks the manager to stop the batch:
//!
//! ```ignore
//! let traits = manager.resolve_one(&entity_reference, &trait_set,
//!     ResolveAccess::Read, &context, error_policy::Exception)?;
//!
//! let results = manager.resolve_many(&entity_references, &trait_set,
//!     ResolveAccess::Read, &context, error_policy::Variant)?;
//! ```

use crate::manager::Manager;
use crate::policy::{BatchCollector, BatchElementErrorPolicy};
use assetio_manager_api::{
    Access, ApiResult, AssetIoError, BatchElementError, BatchElementErrorCallback, Context,
    EntityReference, EntityTraitsAccess, PublishingAccess, ResolveAccess, SuccessCallback,
    TraitSet, TraitsData,
};
use std::slice;

impl Manager {
    /// Run one batch call with aggregating callbacks and materialise the
    /// outcome under policy `P`.
    fn collect_batch<T, P>(
        &self,
        _policy: P,
        subjects: &[EntityReference],
        access: Option<Access>,
        batch: impl FnOnce(
            &SuccessCallback<'_, T>,
            &BatchElementErrorCallback<'_>,
        ) -> ApiResult<()>,
    ) -> ApiResult<Vec<P::Element<T>>>
    where
        T: Send,
        P: BatchElementErrorPolicy,
    {
        let collector = BatchCollector::with_len(subjects.len(), P::STOP_ON_ERROR);

        let success_callback = |index: usize, value: T| collector.on_success(index, value);
        let error_callback =
            |index: usize, error: BatchElementError| collector.on_error(index, error);
        batch(&success_callback, &error_callback)?;

        P::finish(collector.finish()?, subjects, access)
    }

    // ================================================================
    // resolve
    // ================================================================

    pub fn resolve_one<P: BatchElementErrorPolicy>(
        &self,
        entity_reference: &EntityReference,
        trait_set: &TraitSet,
        resolve_access: ResolveAccess,
        context: &Context,
        policy: P,
    ) -> ApiResult<P::Element<TraitsData>> {
        single(self.resolve_many(
            slice::from_ref(entity_reference),
            trait_set,
            resolve_access,
            context,
            policy,
        )?)
    }

    pub fn resolve_many<P: BatchElementErrorPolicy>(
        &self,
        entity_references: &[EntityReference],
        trait_set: &TraitSet,
        resolve_access: ResolveAccess,
        context: &Context,
        policy: P,
    ) -> ApiResult<Vec<P::Element<TraitsData>>> {
        self.collect_batch::<TraitsData, P>(
            policy,
            entity_references,
            Some(resolve_access.into()),
            |success, error| {
                self.resolve(
                    entity_references,
                    trait_set,
                    resolve_access,
                    context,
                    success,
                    error,
                )
            },
        )
    }

    // ================================================================
    // preflight
    // ================================================================

    pub fn preflight_one<P: BatchElementErrorPolicy>(
        &self,
        entity_reference: &EntityReference,
        traits_hint: &TraitsData,
        publishing_access: PublishingAccess,
        context: &Context,
        policy: P,
    ) -> ApiResult<P::Element<EntityReference>> {
        single(self.preflight_many(
            slice::from_ref(entity_reference),
            slice::from_ref(traits_hint),
            publishing_access,
            context,
            policy,
        )?)
    }

    pub fn preflight_many<P: BatchElementErrorPolicy>(
        &self,
        entity_references: &[EntityReference],
        traits_hints: &[TraitsData],
        publishing_access: PublishingAccess,
        context: &Context,
        policy: P,
    ) -> ApiResult<Vec<P::Element<EntityReference>>> {
        self.collect_batch::<EntityReference, P>(
            policy,
            entity_references,
            Some(publishing_access.into()),
            |success, error| {
                self.preflight(
                    entity_references,
                    traits_hints,
                    publishing_access,
                    context,
                    success,
                    error,
                )
            },
        )
    }

    // ================================================================
    // register
    // ================================================================

    pub fn register_one<P: BatchElementErrorPolicy>(
        &self,
        entity_reference: &EntityReference,
        entity_traits_data: &TraitsData,
        publishing_access: PublishingAccess,
        context: &Context,
        policy: P,
    ) -> ApiResult<P::Element<EntityReference>> {
        single(self.register_many(
            slice::from_ref(entity_reference),
            slice::from_ref(entity_traits_data),
            publishing_access,
            context,
            policy,
        )?)
    }

    pub fn register_many<P: BatchElementErrorPolicy>(
        &self,
        entity_references: &[EntityReference],
        entity_traits_datas: &[TraitsData],
        publishing_access: PublishingAccess,
        context: &Context,
        policy: P,
    ) -> ApiResult<Vec<P::Element<EntityReference>>> {
        self.collect_batch::<EntityReference, P>(
            policy,
            entity_references,
            Some(publishing_access.into()),
            |success, error| {
                self.register(
                    entity_references,
                    entity_traits_datas,
                    publishing_access,
                    context,
                    success,
                    error,
                )
            },
        )
    }

    // ================================================================
    // entity_exists
    // ================================================================

    pub fn entity_exists_one<P: BatchElementErrorPolicy>(
        &self,
        entity_reference: &EntityReference,
        context: &Context,
        policy: P,
    ) -> ApiResult<P::Element<bool>> {
        single(self.entity_exists_many(slice::from_ref(entity_reference), context, policy)?)
    }

    pub fn entity_exists_many<P: BatchElementErrorPolicy>(
        &self,
        entity_references: &[EntityReference],
        context: &Context,
        policy: P,
    ) -> ApiResult<Vec<P::Element<bool>>> {
        self.collect_batch::<bool, P>(policy, entity_references, None, |success, error| {
            self.entity_exists(entity_references, context, success, error)
        })
    }

    // ================================================================
    // entity_traits
    // ================================================================

    pub fn entity_traits_one<P: BatchElementErrorPolicy>(
        &self,
        entity_reference: &EntityReference,
        entity_traits_access: EntityTraitsAccess,
        context: &Context,
        policy: P,
    ) -> ApiResult<P::Element<TraitSet>> {
        single(self.entity_traits_many(
            slice::from_ref(entity_reference),
            entity_traits_access,
            context,
            policy,
        )?)
    }

    pub fn entity_traits_many<P: BatchElementErrorPolicy>(
        &self,
        entity_references: &[EntityReference],
        entity_traits_access: EntityTraitsAccess,
        context: &Context,
        policy: P,
    ) -> ApiResult<Vec<P::Element<TraitSet>>> {
        self.collect_batch::<TraitSet, P>(
            policy,
            entity_references,
            Some(entity_traits_access.into()),
            |success, error| {
                self.entity_traits(
                    entity_references,
                    entity_traits_access,
                    context,
                    success,
                    error,
                )
            },
        )
    }
}

/// Unwrap the result of a one-element batch.
fn single<T>(mut elements: Vec<T>) -> ApiResult<T> {
    match (elements.pop(), elements.is_empty()) {
        (Some(element), true) => Ok(element),
        _ => Err(AssetIoError::unhandled(
            "Expected exactly one result for a single-element batch",
        )),
    }
}
