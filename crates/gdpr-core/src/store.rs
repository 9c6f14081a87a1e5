//! Policy lookup per entity type

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::FieldPolicy;

/// All configured field policies for one entity type, nested
/// bundle → field name → policy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyStore {
    entity_type: String,
    bundles: BTreeMap<String, BTreeMap<String, FieldPolicy>>,
}

impl PolicyStore {
    pub fn new(entity_type: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            bundles: BTreeMap::new(),
        }
    }

    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    pub fn insert(&mut self, policy: FieldPolicy) {
        self.bundles
            .entry(policy.bundle.clone())
            .or_default()
            .insert(policy.field_name.clone(), policy);
    }

    /// Configured policy for a field, or the unconfigured default.
    /// Never fails for unknown fields.
    pub fn get(&self, bundle: &str, field_name: &str) -> FieldPolicy {
        self.get_configured(bundle, field_name)
            .cloned()
            .unwrap_or_else(|| {
                FieldPolicy::unconfigured(self.entity_type.as_str(), bundle, field_name)
            })
    }

    pub fn get_configured(&self, bundle: &str, field_name: &str) -> Option<&FieldPolicy> {
        self.bundles.get(bundle).and_then(|b| b.get(field_name))
    }

    pub fn fields_for_bundle(
        &self,
        bundle: &str,
    ) -> impl Iterator<Item = &FieldPolicy> {
        self.bundles.get(bundle).into_iter().flat_map(|b| b.values())
    }

    /// All configured policies across every bundle.
    pub fn iter(&self) -> impl Iterator<Item = &FieldPolicy> {
        self.bundles.values().flat_map(|b| b.values())
    }
}

/// Policy stores for every configured entity type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyCatalog {
    stores: BTreeMap<String, PolicyStore>,
}

impl PolicyCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, store: PolicyStore) {
        self.stores.insert(store.entity_type().to_string(), store);
    }

    pub fn store(&self, entity_type: &str) -> Option<&PolicyStore> {
        self.stores.get(entity_type)
    }

    pub fn stores(&self) -> impl Iterator<Item = &PolicyStore> {
        self.stores.values()
    }
}
