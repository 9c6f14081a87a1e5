//! Persistence contract consumed by the traversal engine

use crate::{Entity, FieldMeta, Result};

/// Abstract storage operations against the CMS persistence layer.
///
/// The engine never talks to storage directly; everything it needs —
/// loading, reverse-relationship queries, field introspection and the
/// commit-phase transaction — goes through this trait.
pub trait EntityRepository: Send + Sync {
    /// Load an entity, possibly served from a cache.
    fn load(&self, entity_type: &str, id: &str) -> Result<Option<Entity>>;

    /// Load a fresh copy bypassing any cache. Required before mutating an
    /// entity so other in-memory references are not corrupted.
    fn load_unchanged(&self, entity_type: &str, id: &str) -> Result<Option<Entity>>;

    fn save(&self, entity: &Entity) -> Result<()>;

    fn delete(&self, entity: &Entity) -> Result<()>;

    /// Ids of all `entity_type` entities whose field `field_name` references
    /// (or equals) `target_id`. Used for reverse owner discovery.
    fn query(&self, entity_type: &str, field_name: &str, target_id: &str) -> Result<Vec<String>>;

    /// Field definitions for a bundle. Unknown types or bundles yield an
    /// empty list, not an error.
    fn field_definitions(&self, entity_type: &str, bundle: &str) -> Result<Vec<FieldMeta>>;

    /// Whether the entity type carries fields at all. Config-only types are
    /// not fieldable and out of scope for personal-data traversal.
    fn is_fieldable(&self, entity_type: &str) -> bool;

    /// Open the transaction wrapping the destructive commit phase.
    fn begin(&self) -> Result<()>;

    fn commit(&self) -> Result<()>;

    fn rollback(&self) -> Result<()>;
}
