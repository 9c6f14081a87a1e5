//! In-memory reference repository

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use crate::{Entity, EntityRepository, Error, FieldMeta, FieldValue, Result};

type EntityKey = (String, String);

#[derive(Default)]
struct State {
    entities: BTreeMap<EntityKey, Entity>,
    definitions: BTreeMap<EntityKey, Vec<FieldMeta>>,
    fieldable: BTreeSet<String>,
    snapshot: Option<BTreeMap<EntityKey, Entity>>,
}

/// `EntityRepository` backed by in-process maps.
///
/// Backs the CLI fixture datasets and the integration tests. Transactions
/// are snapshot-based: `begin` clones the entity table, `rollback` restores
/// it wholesale.
#[derive(Default)]
pub struct MemoryRepository {
    state: Mutex<State>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the field definitions for a bundle and marks the entity
    /// type fieldable.
    pub fn define_fields(&self, entity_type: &str, bundle: &str, fields: Vec<FieldMeta>) {
        let mut state = self.state.lock().unwrap();
        state.fieldable.insert(entity_type.to_string());
        state
            .definitions
            .insert((entity_type.to_string(), bundle.to_string()), fields);
    }

    pub fn insert(&self, entity: Entity) {
        let mut state = self.state.lock().unwrap();
        state
            .entities
            .insert((entity.entity_type.clone(), entity.id.clone()), entity);
    }

    /// Direct read used by tests to observe persisted state.
    pub fn get(&self, entity_type: &str, id: &str) -> Option<Entity> {
        self.state
            .lock()
            .unwrap()
            .entities
            .get(&(entity_type.to_string(), id.to_string()))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.state.lock().unwrap().entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn field_matches(value: &FieldValue, target_id: &str) -> bool {
    match value {
        FieldValue::References(refs) => refs.iter().any(|r| r.target_id == target_id),
        FieldValue::Text(text) => text == target_id,
        FieldValue::Integer(id) => id.to_string() == target_id,
        _ => false,
    }
}

impl EntityRepository for MemoryRepository {
    fn load(&self, entity_type: &str, id: &str) -> Result<Option<Entity>> {
        Ok(self.get(entity_type, id))
    }

    // No cache layer here, so an unchanged load is a plain load.
    fn load_unchanged(&self, entity_type: &str, id: &str) -> Result<Option<Entity>> {
        Ok(self.get(entity_type, id))
    }

    fn save(&self, entity: &Entity) -> Result<()> {
        self.insert(entity.clone());
        Ok(())
    }

    fn delete(&self, entity: &Entity) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state
            .entities
            .remove(&(entity.entity_type.clone(), entity.id.clone()));
        Ok(())
    }

    fn query(&self, entity_type: &str, field_name: &str, target_id: &str) -> Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .entities
            .values()
            .filter(|e| e.entity_type == entity_type)
            .filter(|e| {
                e.value(field_name)
                    .is_some_and(|v| field_matches(v, target_id))
            })
            .map(|e| e.id.clone())
            .collect())
    }

    fn field_definitions(&self, entity_type: &str, bundle: &str) -> Result<Vec<FieldMeta>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .definitions
            .get(&(entity_type.to_string(), bundle.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn is_fieldable(&self, entity_type: &str) -> bool {
        self.state.lock().unwrap().fieldable.contains(entity_type)
    }

    fn begin(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.snapshot.is_some() {
            return Err(Error::Transaction("transaction already open".to_string()));
        }
        state.snapshot = Some(state.entities.clone());
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state
            .snapshot
            .take()
            .ok_or_else(|| Error::Transaction("no open transaction".to_string()))?;
        Ok(())
    }

    fn rollback(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let snapshot = state
            .snapshot
            .take()
            .ok_or_else(|| Error::Transaction("no open transaction".to_string()))?;
        state.entities = snapshot;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntityRef;

    #[test]
    fn test_insert_and_load() {
        let repo = MemoryRepository::new();
        repo.insert(Entity::new("user", "user", "1"));

        assert_eq!(repo.len(), 1);
        assert!(!repo.is_empty());
        assert!(repo.load("user", "1").unwrap().is_some());
        assert!(repo.load("user", "2").unwrap().is_none());
        assert!(repo.load("node", "1").unwrap().is_none());
    }

    #[test]
    fn test_query_by_reference() {
        let repo = MemoryRepository::new();
        repo.insert(Entity::new("comment", "comment", "10").with_value(
            "author",
            FieldValue::References(vec![EntityRef::new("user", "1")]),
        ));
        repo.insert(Entity::new("comment", "comment", "11").with_value(
            "author",
            FieldValue::References(vec![EntityRef::new("user", "2")]),
        ));

        let ids = repo.query("comment", "author", "1").unwrap();
        assert_eq!(ids, vec!["10".to_string()]);
    }

    #[test]
    fn test_rollback_restores_entities() {
        let repo = MemoryRepository::new();
        repo.insert(
            Entity::new("user", "user", "1")
                .with_value("mail", FieldValue::Text("a@b.c".to_string())),
        );

        repo.begin().unwrap();
        let mut changed = repo.get("user", "1").unwrap();
        changed.clear_value("mail");
        repo.save(&changed).unwrap();
        repo.delete(&Entity::new("user", "user", "1")).unwrap();
        repo.rollback().unwrap();

        let restored = repo.get("user", "1").unwrap();
        assert_eq!(
            restored.value("mail"),
            Some(&FieldValue::Text("a@b.c".to_string()))
        );
    }

    #[test]
    fn test_commit_keeps_changes() {
        let repo = MemoryRepository::new();
        repo.insert(Entity::new("user", "user", "1"));

        repo.begin().unwrap();
        repo.delete(&Entity::new("user", "user", "1")).unwrap();
        repo.commit().unwrap();

        assert!(repo.get("user", "1").is_none());
        assert!(repo.commit().is_err());
    }
}
