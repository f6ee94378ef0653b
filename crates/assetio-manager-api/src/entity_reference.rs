//! Entity references

use serde::Serialize;
use std::fmt;

/// A string that a manager has confirmed identifies one of its entities.
///
/// Hosts obtain references through `Manager::create_entity_reference` (or
/// `create_entity_reference_if_valid`), which validates the string first.
/// There is deliberately no `From<String>` or `Deserialize` impl.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntityReference(String);

impl EntityReference {
    /// Wrap a string without validating it.
    ///
    /// Intended for manager implementations returning references they
    /// produced themselves, and for tests. Hosts should use the facade's
    /// validating constructors instead.
    pub fn new_unchecked(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for EntityReference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
