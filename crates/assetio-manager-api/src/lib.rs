//! Manager API for assetio
//!
//! This crate defines the boundary between a host application and an
//! asset management system ("manager"). Managers implement the
//! [`ManagerInterface`] trait; hosts never call it directly but go through
//! the `Manager` facade in `assetio-host`, which adapts the batch,
//! callback-based methods defined here into the calling conventions hosts
//! expect.
//!
//! # Architecture
//!
//! - **Data model**: [`EntityReference`], [`TraitsData`], [`Context`]
//! - **Plugin boundary**: [`ManagerInterface`], [`EntityReferencePagerInterface`],
//!   [`ManagerInterfaceFactory`]
//! - **Host facilities**: [`HostSession`], [`Host`], [`LoggerInterface`]
//! - **Errors**: [`AssetIoError`], [`BatchElementError`]

// ============================================================================
// Module Declarations
// ============================================================================

pub mod access;
pub mod capability;
pub mod context;
pub mod entity_reference;
pub mod errors;
pub mod factory;
pub mod host;
pub mod log;
pub mod manager_interface;
pub mod pager;
pub mod traits_data;

// Re-exports
pub use access::{
    Access, DefaultEntityAccess, EntityTraitsAccess, PolicyAccess, PublishingAccess,
    RelationsAccess, ResolveAccess,
};
pub use capability::Capability;
pub use context::{Context, ManagerStateHandle};
pub use entity_reference::EntityReference;
pub use errors::{
    batch_element_exception_message, ApiResult, AssetIoError, BatchElementError,
    BatchElementResult, ErrorCode,
};
pub use factory::ManagerInterfaceFactory;
pub use host::{Host, HostInterface, HostSession};
pub use log::{LoggerInterface, Severity, SeverityFilter, TracingLogger};
pub use manager_interface::{BatchElementErrorCallback, ManagerInterface, SuccessCallback};
pub use pager::EntityReferencePagerInterface;
pub use traits_data::{InfoDictionary, PropertyValue, StrMap, TraitSet, TraitSets, TraitsData};

// ============================================================================
// Well-known keys
// ============================================================================

/// Keys with a defined meaning in a manager's `info()` dictionary.
pub mod constants {
    /// Maps to a string prefix. When present, a string is an entity
    /// reference if and only if it starts with this prefix, which lets the
    /// host classify references without calling into the manager.
    pub const INFO_KEY_ENTITY_REFERENCES_MATCH_PREFIX: &str = "entityReferencesMatchPrefix";

    /// Session setting holding the identifier of the selected manager.
    pub const SETTING_MANAGER_IDENTIFIER: &str = "manager";
}
