//! Capabilities a manager can advertise
//!
//! A manager reports the optional groups of API methods it implements via
//! [`ManagerInterface::has_capability`](crate::ManagerInterface::has_capability).
//! Hosts use the same enum to query the facade.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A group of related API methods a manager may implement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    /// `create_state` and friends; contexts carry manager state
    StatefulContexts,
    /// `update_terminology`
    CustomTerminology,
    /// `resolve`
    Resolution,
    /// `preflight` and `register`
    Publishing,
    /// `get_with_relationship` and `get_with_relationships`
    RelationshipQueries,
    /// `entity_exists`
    ExistenceQueries,
    /// `default_entity_reference`
    DefaultEntityReferences,
    /// `is_entity_reference_string`
    EntityReferenceIdentification,
    /// `management_policy`
    ManagementPolicyQueries,
    /// `entity_traits`
    EntityTraitIntrospection,
}

impl Capability {
    /// All capabilities, in declaration order
    pub const ALL: [Capability; 10] = [
        Capability::StatefulContexts,
        Capability::CustomTerminology,
        Capability::Resolution,
        Capability::Publishing,
        Capability::RelationshipQueries,
        Capability::ExistenceQueries,
        Capability::DefaultEntityReferences,
        Capability::EntityReferenceIdentification,
        Capability::ManagementPolicyQueries,
        Capability::EntityTraitIntrospection,
    ];

    /// Stable name used in messages and configuration
    pub const fn name(self) -> &'static str {
        match self {
            Capability::StatefulContexts => "statefulContexts",
            Capability::CustomTerminology => "customTerminology",
            Capability::Resolution => "resolution",
            Capability::Publishing => "publishing",
            Capability::RelationshipQueries => "relationshipQueries",
            Capability::ExistenceQueries => "existenceQueries",
            Capability::DefaultEntityReferences => "defaultEntityReferences",
            Capability::EntityReferenceIdentification => "entityReferenceIdentification",
            Capability::ManagementPolicyQueries => "managementPolicyQueries",
            Capability::EntityTraitIntrospection => "entityTraitIntrospection",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
