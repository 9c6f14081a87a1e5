//! Recursive entity-graph traversal
//!
//! Walks a root entity's reachable graph through enabled "follow" reference
//! fields and reverse "owner" relationships, visiting each distinct entity
//! exactly once and handing every new node to a caller-supplied visitor.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use gdpr_core::{
    Cardinality, Entity, EntityRepository, Error, FieldMeta, FieldPolicy, PolicyCatalog,
    PolicyStore, Result,
};

/// Entity type used by the toolkit's own request tracking. Never traversed,
/// even when an administrator enables a reference pointing at it.
pub const TASK_ENTITY_TYPE: &str = "gdpr_task";

/// Bounds for a single traversal run. Cycle detection only prevents exact
/// revisits, not combinatorial growth across many distinct owners, so runs
/// are capped on visited-node count.
#[derive(Debug, Clone, Copy)]
pub struct TraversalLimits {
    pub max_nodes: usize,
}

impl Default for TraversalLimits {
    fn default() -> Self {
        Self { max_nodes: 10_000 }
    }
}

/// Per-node callback implemented by the request visitors.
pub trait NodeVisitor {
    fn on_entity(
        &mut self,
        entity: &Entity,
        policies: &PolicyStore,
        fields: &[FieldMeta],
        row_id: &str,
        parent: Option<&FieldPolicy>,
    ) -> Result<()>;
}

/// Entities a single traversal run has already handled, keyed by type.
#[derive(Debug, Default)]
struct TraversalProgress {
    visited: HashMap<String, HashSet<String>>,
    count: usize,
}

impl TraversalProgress {
    fn contains(&self, entity_type: &str, id: &str) -> bool {
        self.visited
            .get(entity_type)
            .is_some_and(|ids| ids.contains(id))
    }

    fn record(&mut self, entity_type: &str, id: &str) {
        self.visited
            .entry(entity_type.to_string())
            .or_default()
            .insert(id.to_string());
        self.count += 1;
    }
}

/// A reverse relationship: some entity type's reference field declares its
/// target as owner, so instances are discovered by query from the target.
#[derive(Debug, Clone)]
pub struct OwnerRelationship {
    pub entity_type: String,
    pub bundle: String,
    pub field_name: String,
    pub target_type: String,
    pub policy: FieldPolicy,
}

/// The recursive engine. One instance serves one traversal run; the owner
/// index is computed at construction and reused for every visited node.
pub struct GraphTraversal {
    repository: Arc<dyn EntityRepository>,
    policies: Arc<PolicyCatalog>,
    limits: TraversalLimits,
    reverse_relationships: Vec<OwnerRelationship>,
}

impl GraphTraversal {
    pub fn new(
        repository: Arc<dyn EntityRepository>,
        policies: Arc<PolicyCatalog>,
        limits: TraversalLimits,
    ) -> Result<Self> {
        let reverse_relationships = collect_owner_relationships(&policies, repository.as_ref())?;
        Ok(Self {
            repository,
            policies,
            limits,
            reverse_relationships,
        })
    }

    pub fn owner_relationships(&self) -> &[OwnerRelationship] {
        &self.reverse_relationships
    }

    pub fn traverse(&self, root: &Entity, visitor: &mut dyn NodeVisitor) -> Result<()> {
        let mut progress = TraversalProgress::default();
        self.visit(root, &mut progress, None, None, visitor)
    }

    fn visit(
        &self,
        entity: &Entity,
        progress: &mut TraversalProgress,
        row_id: Option<&str>,
        parent: Option<&FieldPolicy>,
        visitor: &mut dyn NodeVisitor,
    ) -> Result<()> {
        // Config-style types carry no fields and no personal data.
        if !self.repository.is_fieldable(&entity.entity_type) {
            return Ok(());
        }

        // Never follow links back into the toolkit's own request records.
        if entity.entity_type == TASK_ENTITY_TYPE {
            return Ok(());
        }

        if progress.contains(&entity.entity_type, &entity.id) {
            return Ok(());
        }
        if progress.count >= self.limits.max_nodes {
            return Err(Error::NodeLimit(progress.count));
        }
        progress.record(&entity.entity_type, &entity.id);

        let row_id = row_id.unwrap_or(&entity.id).to_string();
        debug!(
            entity_type = %entity.entity_type,
            id = %entity.id,
            row_id = %row_id,
            "visiting entity"
        );

        let fields = self
            .repository
            .field_definitions(&entity.entity_type, &entity.bundle)?;
        let fallback_store;
        let store = match self.policies.store(&entity.entity_type) {
            Some(store) => store,
            None => {
                fallback_store = PolicyStore::new(entity.entity_type.clone());
                &fallback_store
            }
        };

        visitor.on_entity(entity, store, &fields, &row_id, parent)?;

        // Forward edges: enabled reference fields marked "follow".
        for meta in fields.iter().filter(|m| m.is_reference()) {
            let refs = entity.references(&meta.name);
            if refs.is_empty() {
                continue;
            }

            let policy = store.get(&entity.bundle, &meta.name);
            if !policy.follows() {
                continue;
            }

            for child_ref in refs {
                let Some(child) = self
                    .repository
                    .load(&child_ref.target_type, &child_ref.target_id)?
                else {
                    continue;
                };
                // To-one children stay on the parent's export row; to-many
                // children each start a row of their own.
                let child_row = match meta.cardinality {
                    Cardinality::Single => Some(row_id.as_str()),
                    Cardinality::Multiple => None,
                };
                self.visit(&child, progress, child_row, Some(&policy), visitor)?;
            }
        }

        // Reverse edges: entities elsewhere that declare this one as owner.
        for relationship in &self.reverse_relationships {
            if relationship.target_type != entity.entity_type {
                continue;
            }
            let ids = self.repository.query(
                &relationship.entity_type,
                &relationship.field_name,
                &entity.id,
            )?;
            for id in ids {
                let Some(related) = self.repository.load(&relationship.entity_type, &id)? else {
                    continue;
                };
                self.visit(&related, progress, None, Some(&relationship.policy), visitor)?;
            }
        }

        Ok(())
    }
}

/// Scans every configured entity type for enabled "owner" policies and
/// resolves each against the repository's field introspection. Called once
/// per run; early versions of this engine recomputed the index per visited
/// node, which did not scale.
fn collect_owner_relationships(
    catalog: &PolicyCatalog,
    repository: &dyn EntityRepository,
) -> Result<Vec<OwnerRelationship>> {
    let mut relationships = Vec::new();
    for store in catalog.stores() {
        for policy in store.iter() {
            if !policy.is_owner() {
                continue;
            }
            let definitions = repository.field_definitions(store.entity_type(), &policy.bundle)?;
            let Some(meta) = definitions
                .iter()
                .find(|m| m.name == policy.field_name && m.is_reference())
            else {
                continue;
            };
            let Some(target_type) = meta.target_type.clone() else {
                continue;
            };
            relationships.push(OwnerRelationship {
                entity_type: store.entity_type().to_string(),
                bundle: policy.bundle.clone(),
                field_name: policy.field_name.clone(),
                target_type,
                policy: policy.clone(),
            });
        }
    }
    Ok(relationships)
}
