#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use gdpr_core::{
    EntityRef, FieldPolicy, FieldValue, MemoryRepository, PolicyCatalog, PolicyStore,
    RelationshipMode, RtaDisposition, RtfDisposition,
};
use gdpr_engine::ComplianceEngine;
use gdpr_sanitizers::SanitizerRegistry;

pub fn enabled(entity_type: &str, bundle: &str, field: &str) -> FieldPolicy {
    let mut policy = FieldPolicy::unconfigured(entity_type, bundle, field);
    policy.enabled = true;
    policy
}

pub fn rta(
    entity_type: &str,
    bundle: &str,
    field: &str,
    disposition: RtaDisposition,
) -> FieldPolicy {
    let mut policy = enabled(entity_type, bundle, field);
    policy.rta = disposition;
    policy
}

pub fn rtf(
    entity_type: &str,
    bundle: &str,
    field: &str,
    disposition: RtfDisposition,
    sanitizer: Option<&str>,
) -> FieldPolicy {
    let mut policy = enabled(entity_type, bundle, field);
    policy.rtf = disposition;
    policy.sanitizer = sanitizer.map(str::to_string);
    policy
}

pub fn follow(entity_type: &str, bundle: &str, field: &str) -> FieldPolicy {
    let mut policy = enabled(entity_type, bundle, field);
    policy.relationship = RelationshipMode::Follow;
    policy
}

pub fn owner(entity_type: &str, bundle: &str, field: &str) -> FieldPolicy {
    let mut policy = enabled(entity_type, bundle, field);
    policy.relationship = RelationshipMode::Owner;
    policy
}

pub fn catalog(policies: Vec<FieldPolicy>) -> PolicyCatalog {
    let mut stores: BTreeMap<String, PolicyStore> = BTreeMap::new();
    for policy in policies {
        stores
            .entry(policy.entity_type.clone())
            .or_insert_with(|| PolicyStore::new(policy.entity_type.clone()))
            .insert(policy);
    }
    let mut catalog = PolicyCatalog::new();
    for store in stores.into_values() {
        catalog.insert(store);
    }
    catalog
}

pub fn reference(target_type: &str, target_id: &str) -> FieldValue {
    FieldValue::References(vec![EntityRef::new(target_type, target_id)])
}

pub fn references(target_type: &str, target_ids: &[&str]) -> FieldValue {
    FieldValue::References(
        target_ids
            .iter()
            .map(|id| EntityRef::new(target_type, *id))
            .collect(),
    )
}

pub fn text(value: &str) -> FieldValue {
    FieldValue::Text(value.to_string())
}

pub fn engine(repo: Arc<MemoryRepository>, catalog: PolicyCatalog) -> ComplianceEngine {
    ComplianceEngine::new(
        repo,
        Arc::new(catalog),
        Arc::new(SanitizerRegistry::with_defaults()),
    )
}
