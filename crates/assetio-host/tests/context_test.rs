//! Context creation, derivation and persistence

mod common;

use assetio_manager_api::{Capability, PolicyAccess};
use assetio_test_support::stub_manager::STATE_TOKEN_PREFIX;
use assetio_test_support::{trait_set, traits_data, StubManager, StubState};
use common::initialized_manager;
use std::sync::Arc;

fn stateful_stub() -> Arc<StubManager> {
    Arc::new(StubManager::new("org.test.stub").with_capability(Capability::StatefulContexts))
}

fn state_of(context: &assetio_manager_api::Context) -> StubState {
    context
        .manager_state
        .as_ref()
        .and_then(|state| state.downcast_ref::<StubState>())
        .cloned()
        .expect("stub state")
}

#[test]
fn test_create_context_without_stateful_capability_has_no_state() {
    let stub = Arc::new(StubManager::new("org.test.stub"));
    let (manager, _logger) = initialized_manager(&stub);

    let context = manager.create_context().unwrap();

    assert!(!context.has_manager_state());
    assert!(context.locale.is_empty());
    assert_eq!(stub.call_count("create_state"), 0);
}

#[test]
fn test_create_context_with_stateful_capability_has_state() {
    let stub = stateful_stub();
    let (manager, _logger) = initialized_manager(&stub);

    let context = manager.create_context().unwrap();

    assert_eq!(state_of(&context).parent, None);
    assert_eq!(stub.call_count("create_state"), 1);
}

#[test]
fn test_child_context_locale_is_independent() {
    let stub = stateful_stub();
    let (manager, _logger) = initialized_manager(&stub);
    let mut parent = manager.create_context().unwrap();
    parent.locale = traits_data(&["host.scene"]);

    let mut child = manager.create_child_context(&parent).unwrap();
    assert_eq!(child.locale, parent.locale);

    child.locale.add_trait("host.render");
    assert_eq!(parent.locale.trait_set(), trait_set(&["host.scene"]));

    parent.locale.set_trait_property("host.scene", "frame", 12);
    assert!(child.locale.get_trait_property("host.scene", "frame").is_none());
}

#[test]
fn test_child_context_state_derives_from_parent_state() {
    let stub = stateful_stub();
    let (manager, _logger) = initialized_manager(&stub);
    let parent = manager.create_context().unwrap();

    let child = manager.create_child_context(&parent).unwrap();

    assert_eq!(state_of(&child).parent, Some(state_of(&parent).id));
    assert_eq!(stub.call_count("create_child_state"), 1);
}

#[test]
fn test_child_of_stateless_context_has_no_state() {
    let stub = stateful_stub();
    let (manager, _logger) = initialized_manager(&stub);

    let child = manager
        .create_child_context(&assetio_manager_api::Context::new())
        .unwrap();

    assert!(!child.has_manager_state());
    assert_eq!(stub.call_count("create_child_state"), 0);
}

#[test]
fn test_persistence_token_round_trip() {
    let stub = stateful_stub();
    let (manager, _logger) = initialized_manager(&stub);
    let context = manager.create_context().unwrap();

    let token = manager.persistence_token_for_context(&context).unwrap();
    assert_eq!(token, format!("{}{}", STATE_TOKEN_PREFIX, state_of(&context).id));

    let restored = manager.context_from_persistence_token(&token).unwrap();
    assert_eq!(state_of(&restored).id, state_of(&context).id);
}

#[test]
fn test_stateless_persistence_never_calls_manager() {
    let stub = stateful_stub();
    let (manager, _logger) = initialized_manager(&stub);

    let token = manager
        .persistence_token_for_context(&assetio_manager_api::Context::new())
        .unwrap();
    assert_eq!(token, "");

    let context = manager.context_from_persistence_token("").unwrap();
    assert!(!context.has_manager_state());

    assert_eq!(stub.call_count("persistence_token_for_state"), 0);
    assert_eq!(stub.call_count("state_from_persistence_token"), 0);
}

#[test]
fn test_management_policy_is_one_bundle_per_trait_set() {
    let stub = Arc::new(StubManager::new("org.test.stub").with_policy(traits_data(&["managed"])));
    let (manager, _logger) = initialized_manager(&stub);

    let policies = manager
        .management_policy(
            &[trait_set(&["image"]), trait_set(&["audio"])],
            PolicyAccess::Read,
            &manager.create_context().unwrap(),
        )
        .unwrap();

    assert_eq!(policies, vec![traits_data(&["managed"]); 2]);
}
