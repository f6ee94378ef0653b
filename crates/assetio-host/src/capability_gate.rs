//! Mandatory capability verification

use assetio_manager_api::{ApiResult, AssetIoError, Capability, ManagerInterface};

/// Capabilities every manager must provide, in the order they are checked
/// and reported.
pub const REQUIRED_CAPABILITIES: [Capability; 3] = [
    Capability::EntityReferenceIdentification,
    Capability::ManagementPolicyQueries,
    Capability::EntityTraitIntrospection,
];

/// Fail with a configuration error naming every missing required
/// capability.
///
/// Must be called after the manager's own `initialize`: proxy managers only
/// know their real capabilities once configured. Nothing calls this again
/// automatically.
pub fn verify_required_capabilities(manager_interface: &dyn ManagerInterface) -> ApiResult<()> {
    let missing: Vec<&str> = REQUIRED_CAPABILITIES
        .iter()
        .filter(|capability| !manager_interface.has_capability(**capability))
        .map(|capability| capability.name())
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    Err(AssetIoError::configuration(format!(
        "Manager implementation for '{}' does not support the required capabilities: {}",
        manager_interface.identifier(),
        missing.join(", ")
    )))
}
