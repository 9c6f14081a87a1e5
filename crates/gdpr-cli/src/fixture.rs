//! Fixture datasets
//!
//! The CLI stands in for the CMS: a JSON dataset describes field schemas
//! and entity instances, loaded into the in-memory repository.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use gdpr_core::{Entity, FieldMeta, MemoryRepository};

/// Field definitions for one (entity type, bundle) pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleSchema {
    pub entity_type: String,
    pub bundle: String,
    pub fields: Vec<FieldMeta>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub schemas: Vec<BundleSchema>,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

impl Dataset {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset {}", path.display()))?;
        let dataset = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse dataset {}", path.display()))?;
        Ok(dataset)
    }

    pub fn into_repository(self) -> Arc<MemoryRepository> {
        let repo = Arc::new(MemoryRepository::new());
        for schema in self.schemas {
            repo.define_fields(&schema.entity_type, &schema.bundle, schema.fields);
        }
        for entity in self.entities {
            repo.insert(entity);
        }
        repo
    }
}

/// Parses a `type:id` root entity reference.
pub fn parse_entity_ref(value: &str) -> Result<(String, String)> {
    match value.split_once(':') {
        Some((entity_type, id)) if !entity_type.is_empty() && !id.is_empty() => {
            Ok((entity_type.to_string(), id.to_string()))
        }
        _ => bail!("Invalid entity reference '{value}', expected 'type:id'"),
    }
}
