//! Access modes restricting what a batch call may do.
//!
//! Each API method accepts only the access modes that make sense for it.
//! They all map onto the wider [`Access`] enum, which is what error
//! messages render.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every access mode understood by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Access {
    Read,
    Write,
    CreateRelated,
    Required,
    ManagerDriven,
}

impl Access {
    /// Name used when rendering error messages
    pub const fn name(self) -> &'static str {
        match self {
            Access::Read => "read",
            Access::Write => "write",
            Access::CreateRelated => "createRelated",
            Access::Required => "required",
            Access::ManagerDriven => "managerDriven",
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declares a narrowed access enum that converts into [`Access`].
macro_rules! access_subset {
    ($(#[$meta:meta])* $name:ident { $($variant:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "camelCase")]
        pub enum $name {
            $($variant,)+
        }

        impl From<$name> for Access {
            fn from(access: $name) -> Self {
                match access {
                    $($name::$variant => Access::$variant,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                Access::from(*self).fmt(f)
            }
        }
    };
}

access_subset!(
    /// Access for `resolve`
    ResolveAccess { Read, Write }
);

access_subset!(
    /// Access for `preflight` and `register`
    PublishingAccess { Write, CreateRelated }
);

access_subset!(
    /// Access for `management_policy`
    PolicyAccess { Read, Write, CreateRelated, Required, ManagerDriven }
);

access_subset!(
    /// Access for relationship queries
    RelationsAccess { Read, Write, CreateRelated }
);

access_subset!(
    /// Access for `default_entity_reference`
    DefaultEntityAccess { Read, Write, CreateRelated }
);

access_subset!(
    /// Access for `entity_traits`
    EntityTraitsAccess { Read, Write }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subsets_convert_to_matching_access() {
        assert_eq!(Access::from(ResolveAccess::Write), Access::Write);
        assert_eq!(
            Access::from(PublishingAccess::CreateRelated),
            Access::CreateRelated
        );
        assert_eq!(
            Access::from(PolicyAccess::ManagerDriven),
            Access::ManagerDriven
        );
    }

    #[test]
    fn display_uses_camel_case_names() {
        assert_eq!(PublishingAccess::CreateRelated.to_string(), "createRelated");
        assert_eq!(ResolveAccess::Read.to_string(), "read");
        assert_eq!(PolicyAccess::Required.to_string(), "required");
    }
}
