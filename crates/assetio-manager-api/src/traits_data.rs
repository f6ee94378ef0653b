//! Trait data: the opaque payload exchanged between hosts and managers
//!
//! A [`TraitsData`] is a set of trait ids, each carrying an optional set of
//! simple typed properties. This layer does not interpret trait ids; it only
//! stores and copies them.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// A set of trait ids
pub type TraitSet = BTreeSet<String>;

/// One trait set per batch element
pub type TraitSets = Vec<TraitSet>;

/// String-to-string map, used for terminology substitution
pub type StrMap = HashMap<String, String>;

/// Settings and info dictionaries exchanged with a manager
pub type InfoDictionary = HashMap<String, PropertyValue>;

/// A simple value stored in a trait property or an info/settings dictionary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl PropertyValue {
    /// Name of the contained type, for diagnostics
    pub const fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Int(_) => "int",
            PropertyValue::Float(_) => "float",
            PropertyValue::Str(_) => "string",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::Str(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(value) => Some(*value),
            _ => None,
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        PropertyValue::Int(i64::from(value))
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Float(value)
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::Str(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::Str(value.to_string())
    }
}

/// A bundle of traits and their properties.
///
/// `TraitsData` is a plain value: cloning it produces an independent copy,
/// which is what gives child contexts their own locale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitsData {
    traits: BTreeMap<String, BTreeMap<String, PropertyValue>>,
}

impl TraitsData {
    /// Create an empty bundle
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bundle imbued with the given traits and no properties
    pub fn from_trait_set(trait_set: &TraitSet) -> Self {
        let mut data = Self::new();
        data.add_traits(trait_set);
        data
    }

    /// The ids of all traits in this bundle
    pub fn trait_set(&self) -> TraitSet {
        self.traits.keys().cloned().collect()
    }

    pub fn has_trait(&self, trait_id: &str) -> bool {
        self.traits.contains_key(trait_id)
    }

    /// Add a trait without properties; a no-op if already present
    pub fn add_trait(&mut self, trait_id: impl Into<String>) {
        self.traits.entry(trait_id.into()).or_default();
    }

    pub fn add_traits(&mut self, trait_set: &TraitSet) {
        for trait_id in trait_set {
            self.add_trait(trait_id.as_str());
        }
    }

    /// Set a property, adding the trait if it is not yet present
    pub fn set_trait_property(
        &mut self,
        trait_id: impl Into<String>,
        property_key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) {
        self.traits
            .entry(trait_id.into())
            .or_default()
            .insert(property_key.into(), value.into());
    }

    pub fn get_trait_property(&self, trait_id: &str, property_key: &str) -> Option<&PropertyValue> {
        self.traits.get(trait_id)?.get(property_key)
    }

    /// Keys of the properties set on a trait. Empty if the trait is absent.
    pub fn trait_property_keys(&self, trait_id: &str) -> BTreeSet<String> {
        self.traits
            .get(trait_id)
            .map(|properties| properties.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn trait_set(ids: &[&str]) -> TraitSet {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[test]
    fn setting_a_property_imbues_the_trait() {
        let mut data = TraitsData::new();
        data.set_trait_property("locatable", "location", "file:///tmp/a.exr");

        assert!(data.has_trait("locatable"));
        assert_eq!(
            data.get_trait_property("locatable", "location"),
            Some(&PropertyValue::from("file:///tmp/a.exr"))
        );
        assert_eq!(data.get_trait_property("locatable", "missing"), None);
    }

    #[test]
    fn from_trait_set_has_no_properties() {
        let data = TraitsData::from_trait_set(&trait_set(&["a", "b"]));

        assert_eq!(data.trait_set(), trait_set(&["a", "b"]));
        assert!(data.trait_property_keys("a").is_empty());
    }

    #[test]
    fn clones_are_independent() {
        let mut original = TraitsData::new();
        original.set_trait_property("t", "k", 1);

        let mut copy = original.clone();
        copy.set_trait_property("t", "k", 2);
        copy.add_trait("other");

        assert_eq!(original.get_trait_property("t", "k"), Some(&PropertyValue::Int(1)));
        assert!(!original.has_trait("other"));
    }

    #[test]
    fn property_values_deserialize_untagged() {
        let values: Vec<PropertyValue> =
            serde_json::from_str(r#"[true, 3, 1.5, "s"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                PropertyValue::Bool(true),
                PropertyValue::Int(3),
                PropertyValue::Float(1.5),
                PropertyValue::Str("s".to_string()),
            ]
        );
    }
}
