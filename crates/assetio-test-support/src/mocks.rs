//! Mock implementations for testing

use assetio_manager_api::{
    ApiResult, HostInterface, InfoDictionary, LoggerInterface, ManagerInterface,
    ManagerInterfaceFactory, Severity,
};
use mockall::mock;
use std::sync::Arc;

mock! {
    pub Logger {}

    impl LoggerInterface for Logger {
        fn log(&self, severity: Severity, message: &str);
    }
}

mock! {
    pub HostInterface {}

    impl HostInterface for HostInterface {
        fn identifier(&self) -> String;
        fn display_name(&self) -> String;
        fn info(&self) -> InfoDictionary;
    }
}

mock! {
    pub ManagerInterfaceFactory {}

    impl ManagerInterfaceFactory for ManagerInterfaceFactory {
        fn identifiers(&self) -> Vec<String>;
        fn is_registered(&self, identifier: &str) -> bool;
        fn instantiate(&self, identifier: &str) -> ApiResult<Arc<dyn ManagerInterface>>;
    }
}

/// A host interface answering identity queries with fixed values
pub fn mock_host_interface(identifier: &str) -> MockHostInterface {
    let mut host = MockHostInterface::new();
    let id = identifier.to_string();
    host.expect_identifier().returning(move || id.clone());
    host.expect_display_name()
        .returning(|| "Test Host".to_string());
    host.expect_info().returning(InfoDictionary::new);
    host
}
