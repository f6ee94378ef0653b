//! Small builders for test data

use assetio_config::{AppConfig, ManagerConfig};
use assetio_manager_api::{EntityReference, TraitSet, TraitsData};

/// Configuration selecting `manager_identifier`, with debug logging
pub fn create_test_config(manager_identifier: &str) -> AppConfig {
    let mut config = AppConfig::default();
    config.manager = Some(ManagerConfig::new(manager_identifier));
    config.logging.level = "debug".to_string();
    config
}

/// Entity references, without classification
pub fn entity_refs(references: &[&str]) -> Vec<EntityReference> {
    references
        .iter()
        .map(|reference| EntityReference::new_unchecked(*reference))
        .collect()
}

pub fn trait_set(trait_ids: &[&str]) -> TraitSet {
    trait_ids.iter().map(|id| id.to_string()).collect()
}

/// Traits data holding the given traits, with no properties
pub fn traits_data(trait_ids: &[&str]) -> TraitsData {
    TraitsData::from_trait_set(&trait_set(trait_ids))
}
