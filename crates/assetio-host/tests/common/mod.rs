//! Shared test utilities

#![allow(dead_code)]

use assetio_host::Manager;
use assetio_manager_api::{Host, HostSession, InfoDictionary, LoggerInterface};
use assetio_test_support::mocks::mock_host_interface;
use assetio_test_support::{RecordingLogger, StubManager};
use std::sync::Arc;

pub const HOST_IDENTIFIER: &str = "org.test.host";

pub fn create_host_session(logger: Arc<dyn LoggerInterface>) -> Arc<HostSession> {
    let host = Host::new(Arc::new(mock_host_interface(HOST_IDENTIFIER)));
    Arc::new(HostSession::new(host, logger))
}

/// A facade over `stub` that has not been initialized
pub fn uninitialized_manager(stub: &Arc<StubManager>) -> (Manager, Arc<RecordingLogger>) {
    let logger = Arc::new(RecordingLogger::new());
    let manager = Manager::new(stub.clone(), create_host_session(logger.clone()));
    (manager, logger)
}

/// A facade over `stub`, initialized with empty settings
pub fn initialized_manager(stub: &Arc<StubManager>) -> (Manager, Arc<RecordingLogger>) {
    let (mut manager, logger) = uninitialized_manager(stub);
    manager
        .initialize(InfoDictionary::new())
        .expect("stub manager should initialize");
    (manager, logger)
}
