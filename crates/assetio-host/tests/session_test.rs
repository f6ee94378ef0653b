//! Manager selection and lazy initialization through `Session`

use assetio_config::AppConfig;
use assetio_host::{ManagerRegistry, Session, SessionSettings};
use assetio_manager_api::{
    AssetIoError, InfoDictionary, ManagerInterface, PropertyValue, Severity,
};
use assetio_test_support::mocks::mock_host_interface;
use assetio_test_support::{
    create_test_config, MockManagerInterfaceFactory, RecordingLogger, StubManager,
};
use std::sync::Arc;

const MANAGER_A: &str = "org.test.a";
const MANAGER_B: &str = "org.test.b";

fn some_settings() -> InfoDictionary {
    let mut settings = InfoDictionary::new();
    settings.insert("k".to_string(), PropertyValue::from("v"));
    settings
}

/// A factory knowing `MANAGER_A` and `MANAGER_B`, expecting `instantiations`
/// calls in total
fn factory(stub: &Arc<StubManager>, instantiations: usize) -> MockManagerInterfaceFactory {
    let mut factory = MockManagerInterfaceFactory::new();
    factory
        .expect_is_registered()
        .returning(|identifier| identifier == MANAGER_A || identifier == MANAGER_B);
    factory
        .expect_identifiers()
        .returning(|| vec![MANAGER_A.to_string(), MANAGER_B.to_string()]);
    let stub = stub.clone();
    factory
        .expect_instantiate()
        .times(instantiations)
        .returning(move |_| Ok(stub.clone() as Arc<dyn ManagerInterface>));
    factory
}

fn session_with(factory: MockManagerInterfaceFactory) -> (Session, Arc<RecordingLogger>) {
    let logger = Arc::new(RecordingLogger::new());
    let session = Session::new(
        Arc::new(mock_host_interface("org.test.host")),
        logger.clone(),
        Arc::new(factory),
    );
    (session, logger)
}

#[test]
fn test_registered_managers_come_from_factory() {
    let stub = Arc::new(StubManager::new(MANAGER_A));
    let (session, _logger) = session_with(factory(&stub, 0));

    assert_eq!(session.registered_managers(), vec![MANAGER_A, MANAGER_B]);
}

#[test]
fn test_use_manager_defers_instantiation() {
    let stub = Arc::new(StubManager::new(MANAGER_A));
    let (mut session, _logger) = session_with(factory(&stub, 0));

    session.use_manager(MANAGER_A, InfoDictionary::new()).unwrap();

    assert_eq!(stub.call_count("initialize"), 0);
}

#[test]
fn test_use_manager_rejects_unknown_identifier() {
    let stub = Arc::new(StubManager::new(MANAGER_A));
    let (mut session, _logger) = session_with(factory(&stub, 0));

    let err = session
        .use_manager("org.test.unknown", InfoDictionary::new())
        .unwrap_err();

    assert_eq!(err, AssetIoError::configuration("Unknown manager 'org.test.unknown'"));
}

#[test]
fn test_current_manager_is_none_without_selection() {
    let stub = Arc::new(StubManager::new(MANAGER_A));
    let (mut session, _logger) = session_with(factory(&stub, 0));

    assert!(session.current_manager().unwrap().is_none());
}

#[test]
fn test_current_manager_initializes_once() {
    let stub = Arc::new(StubManager::new(MANAGER_A));
    let (mut session, logger) = session_with(factory(&stub, 1));
    session.use_manager(MANAGER_A, some_settings()).unwrap();

    let first = session.current_manager().unwrap().unwrap();
    let second = session.current_manager().unwrap().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(stub.call_count("initialize"), 1);
    assert_eq!(first.settings().unwrap(), some_settings());
    assert_eq!(
        logger.messages(Severity::Debug),
        vec![format!("{} initialized for org.test.host", MANAGER_A)]
    );
}

#[test]
fn test_selecting_another_manager_reinitializes() {
    let stub = Arc::new(StubManager::new(MANAGER_A));
    let (mut session, _logger) = session_with(factory(&stub, 2));

    session.use_manager(MANAGER_A, InfoDictionary::new()).unwrap();
    let first = session.current_manager().unwrap().unwrap();

    session.use_manager(MANAGER_B, InfoDictionary::new()).unwrap();
    let second = session.current_manager().unwrap().unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(stub.call_count("initialize"), 2);
}

#[test]
fn test_failed_initialization_is_retried_on_next_request() {
    let stub = Arc::new(StubManager::new(MANAGER_A).with_initialize_failure(
        AssetIoError::configuration("no library"),
    ));
    let (mut session, _logger) = session_with(factory(&stub, 2));
    session.use_manager(MANAGER_A, InfoDictionary::new()).unwrap();

    assert!(session.current_manager().is_err());
    assert!(session.current_manager().is_err());
}

#[test]
fn test_settings_without_selection_are_empty() {
    let stub = Arc::new(StubManager::new(MANAGER_A));
    let (mut session, _logger) = session_with(factory(&stub, 0));

    assert_eq!(session.settings().unwrap(), SessionSettings::default());
}

#[test]
fn test_settings_include_identifier_and_manager_settings() {
    let stub = Arc::new(StubManager::new(MANAGER_A));
    let (mut session, _logger) = session_with(factory(&stub, 1));
    session.use_manager(MANAGER_A, some_settings()).unwrap();

    let settings = session.settings().unwrap();

    assert_eq!(settings, SessionSettings::new(MANAGER_A, some_settings()));
    assert_eq!(stub.call_count("settings"), 1);
}

#[test]
fn test_set_settings_selects_manager_lazily() {
    let stub = Arc::new(StubManager::new(MANAGER_A));
    let (mut session, _logger) = session_with(factory(&stub, 1));
    let mut dictionary = some_settings();
    dictionary.insert("manager".to_string(), PropertyValue::from(MANAGER_A));

    session
        .set_settings(SessionSettings::from_dictionary(dictionary).unwrap())
        .unwrap();
    assert_eq!(stub.call_count("initialize"), 0);

    let manager = session.current_manager().unwrap().unwrap();
    assert_eq!(manager.settings().unwrap(), some_settings());
}

#[test]
fn test_use_configured_manager() {
    let stub = Arc::new(StubManager::new(MANAGER_A));
    let (mut session, _logger) = session_with(factory(&stub, 1));

    assert!(!session.use_configured_manager(&AppConfig::default()).unwrap());
    assert!(session.use_configured_manager(&create_test_config(MANAGER_A)).unwrap());

    let manager = session.current_manager().unwrap().unwrap();
    assert_eq!(manager.identifier(), MANAGER_A);
}

#[test]
fn test_session_with_registry() {
    let mut registry = ManagerRegistry::new();
    registry.register(MANAGER_A, || Arc::new(StubManager::new(MANAGER_A)));
    let mut session = Session::new(
        Arc::new(mock_host_interface("org.test.host")),
        Arc::new(RecordingLogger::new()),
        Arc::new(registry),
    );

    session.use_manager(MANAGER_A, InfoDictionary::new()).unwrap();
    let manager = session.current_manager().unwrap().unwrap();

    assert_eq!(manager.display_name(), format!("Stub ({})", MANAGER_A));
    assert_eq!(session.registered_managers(), vec![MANAGER_A]);
}
