//! Test support utilities and fixtures for assetio host and manager tests

pub mod fixtures;
pub mod logging;
pub mod mocks;
pub mod stub_manager;

pub use fixtures::{create_test_config, entity_refs, trait_set, traits_data};
pub use logging::RecordingLogger;
pub use mocks::{MockHostInterface, MockLogger, MockManagerInterfaceFactory};
pub use stub_manager::{CallbackOrder, StubManager, StubState};
