//! Relationship queries and host-facing pagers

mod common;

use assetio_host::EntityReferencePager;
use assetio_manager_api::{
    AssetIoError, BatchElementError, Context, EntityReference, ErrorCode, RelationsAccess,
};
use assetio_test_support::{entity_refs, trait_set, traits_data, StubManager};
use common::initialized_manager;
use parking_lot::Mutex;
use std::ops::ControlFlow;
use std::sync::Arc;

fn related(count: usize) -> Vec<EntityReference> {
    (0..count)
        .map(|i| EntityReference::new_unchecked(format!("stub://shot/{}", i)))
        .collect()
}

fn stub() -> Arc<StubManager> {
    Arc::new(
        StubManager::new("org.test.stub")
            .with_relations("stub://seq", "children", related(5))
            .with_relations("stub://seq", "parent", entity_refs(&["stub://show"]))
            .with_element_error(
                "stub://locked",
                BatchElementError::new(ErrorCode::EntityAccessError, "locked"),
            ),
    )
}

/// Collect pagers handed to the success callback, keyed by index
fn collect_pagers() -> (
    Mutex<Vec<(usize, EntityReferencePager)>>,
    Mutex<Vec<(usize, BatchElementError)>>,
) {
    (Mutex::new(Vec::new()), Mutex::new(Vec::new()))
}

#[test]
fn test_get_with_relationship_pages_through_results() {
    let stub = stub();
    let (manager, _logger) = initialized_manager(&stub);
    let (pagers, errors) = collect_pagers();

    manager
        .get_with_relationship(
            &entity_refs(&["stub://seq", "stub://locked"]),
            &traits_data(&["children"]),
            2,
            RelationsAccess::Read,
            &Context::new(),
            |index, pager| pagers.lock().push((index, pager)),
            |index, error| {
                errors.lock().push((index, error));
                ControlFlow::Continue(())
            },
            &trait_set(&[]),
        )
        .unwrap();

    let mut pagers = pagers.into_inner();
    assert_eq!(pagers.len(), 1);
    let (index, mut pager) = pagers.remove(0);
    assert_eq!(index, 0);

    assert_eq!(pager.get().unwrap(), related(5)[0..2].to_vec());
    assert!(pager.has_next().unwrap());
    pager.next().unwrap();
    assert_eq!(pager.get().unwrap(), related(5)[2..4].to_vec());
    pager.next().unwrap();
    assert_eq!(pager.get().unwrap(), related(5)[4..].to_vec());
    assert!(!pager.has_next().unwrap());

    let errors = errors.into_inner();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].0, 1);
    assert_eq!(errors[0].1.code, ErrorCode::EntityAccessError);
}

#[test]
fn test_get_with_relationships_gives_one_pager_per_relationship() {
    let stub = stub();
    let (manager, _logger) = initialized_manager(&stub);
    let (pagers, errors) = collect_pagers();

    manager
        .get_with_relationships(
            &entity_refs(&["stub://seq"])[0],
            &[traits_data(&["parent"]), traits_data(&["children"])],
            10,
            RelationsAccess::Read,
            &Context::new(),
            |index, pager| pagers.lock().push((index, pager)),
            |index, error| {
                errors.lock().push((index, error));
                ControlFlow::Continue(())
            },
            &trait_set(&["shot"]),
        )
        .unwrap();

    let mut pagers = pagers.into_inner();
    pagers.sort_by_key(|(index, _)| *index);
    let pages: Vec<Vec<Vec<EntityReference>>> = pagers
        .into_iter()
        .map(|(_, pager)| pager.pages().collect::<Result<_, _>>().unwrap())
        .collect();

    assert_eq!(pages, vec![vec![entity_refs(&["stub://show"])], vec![related(5)]]);
    assert!(errors.into_inner().is_empty());
}

#[test]
fn test_pages_iterator_yields_every_page() {
    let stub = stub();
    let (manager, _logger) = initialized_manager(&stub);
    let (pagers, errors) = collect_pagers();

    manager
        .get_with_relationship(
            &entity_refs(&["stub://seq"]),
            &traits_data(&["children"]),
            3,
            RelationsAccess::Read,
            &Context::new(),
            |index, pager| pagers.lock().push((index, pager)),
            |index, error| {
                errors.lock().push((index, error));
                ControlFlow::Continue(())
            },
            &trait_set(&[]),
        )
        .unwrap();

    let (_, pager) = pagers.into_inner().remove(0);
    let pages: Vec<_> = pager.pages().map(Result::unwrap).collect();

    assert_eq!(pages, vec![related(5)[0..3].to_vec(), related(5)[3..].to_vec()]);
}

#[test]
fn test_no_related_entities_yields_no_pages() {
    let stub = stub();
    let (manager, _logger) = initialized_manager(&stub);
    let (pagers, errors) = collect_pagers();

    manager
        .get_with_relationship(
            &entity_refs(&["stub://orphan"]),
            &traits_data(&["children"]),
            3,
            RelationsAccess::Read,
            &Context::new(),
            |index, pager| pagers.lock().push((index, pager)),
            |index, error| {
                errors.lock().push((index, error));
                ControlFlow::Continue(())
            },
            &trait_set(&[]),
        )
        .unwrap();

    let (_, pager) = pagers.into_inner().remove(0);
    assert_eq!(pager.pages().count(), 0);
}

#[test]
fn test_dropping_pager_closes_manager_pager() {
    let stub = stub();
    let (manager, _logger) = initialized_manager(&stub);
    let (pagers, errors) = collect_pagers();

    manager
        .get_with_relationships(
            &entity_refs(&["stub://seq"])[0],
            &[traits_data(&["parent"]), traits_data(&["children"])],
            1,
            RelationsAccess::Read,
            &Context::new(),
            |index, pager| pagers.lock().push((index, pager)),
            |index, error| {
                errors.lock().push((index, error));
                ControlFlow::Continue(())
            },
            &trait_set(&[]),
        )
        .unwrap();

    assert_eq!(stub.closed_pager_count(), 0);
    drop(pagers);
    assert_eq!(stub.closed_pager_count(), 2);
    drop(errors);
}

#[test]
fn test_zero_page_size_is_rejected_before_calling_manager() {
    let stub = stub();
    let (manager, _logger) = initialized_manager(&stub);
    let expected = AssetIoError::input_validation("pageSize must be greater than zero.");

    let single = manager.get_with_relationship(
        &entity_refs(&["stub://seq"]),
        &traits_data(&["children"]),
        0,
        RelationsAccess::Read,
        &Context::new(),
        |_, _| panic!("no pager expected"),
        |_, _| panic!("no error expected"),
        &trait_set(&[]),
    );
    let multiple = manager.get_with_relationships(
        &entity_refs(&["stub://seq"])[0],
        &[traits_data(&["children"])],
        0,
        RelationsAccess::Read,
        &Context::new(),
        |_, _| panic!("no pager expected"),
        |_, _| panic!("no error expected"),
        &trait_set(&[]),
    );

    assert_eq!(single.unwrap_err(), expected);
    assert_eq!(multiple.unwrap_err(), expected);
    assert_eq!(stub.call_count("get_with_relationship"), 0);
    assert_eq!(stub.call_count("get_with_relationships"), 0);
}

#[test]
fn test_default_entity_reference_matches_trait_set() {
    let stub = Arc::new(
        StubManager::new("org.test.stub").with_entity("stub://cam", traits_data(&["camera"])),
    );
    let (manager, _logger) = initialized_manager(&stub);
    let results = Mutex::new(Vec::new());

    manager
        .default_entity_reference(
            &[trait_set(&["camera"]), trait_set(&["light"])],
            assetio_manager_api::DefaultEntityAccess::Read,
            &Context::new(),
            |index, reference| results.lock().push((index, reference)),
            |_, _| panic!("no error expected"),
        )
        .unwrap();

    assert_eq!(
        results.into_inner(),
        vec![
            (0, Some(entity_refs(&["stub://cam"])[0].clone())),
            (1, None)
        ]
    );
}
