//! Result containers handed back to the request handler

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Entity, RtaDisposition};

/// One exported field occurrence in a Right to Access result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRecord {
    pub entity_type: String,
    pub bundle: String,
    pub entity_id: String,
    pub field_name: String,
    /// Logical output file this record is grouped into.
    pub file: String,
    /// Export row the record belongs to; children of a to-one reference
    /// share the parent's row, children of a to-many reference get their own.
    pub row_id: String,
    pub label: String,
    pub value: String,
    pub notes: String,
    pub rta: RtaDisposition,
}

impl ExportRecord {
    pub fn plugin_key(&self) -> String {
        format!("{}|{}|{}", self.entity_type, self.bundle, self.field_name)
    }
}

/// File referenced from an exported field, to be copied by the packaging
/// step alongside the structured data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    pub file_id: String,
    pub path: String,
}

/// Structured Right to Access dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessResult {
    /// Records keyed by `entityType|bundle|field|entityId`.
    pub records: BTreeMap<String, ExportRecord>,
    pub assets: Vec<AssetRef>,
    #[serde(with = "time::serde::timestamp")]
    pub generated_at: OffsetDateTime,
}

impl AccessResult {
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            assets: Vec::new(),
            generated_at: OffsetDateTime::now_utc(),
        }
    }

    pub fn insert(&mut self, record: ExportRecord) {
        let key = format!("{}|{}", record.plugin_key(), record.entity_id);
        self.records.insert(key, record);
    }
}

impl Default for AccessResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Field-level disposition applied during a forget run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldAction {
    Anonymize,
    Remove,
    DeleteEntity,
}

/// Audit record for one field disposition, success or failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub entity_id: String,
    /// `entity_type.bundle` of the processed entity.
    pub entity_type: String,
    pub field_name: String,
    pub action: FieldAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sanitizer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Outcome of a Right to be Forgotten run.
///
/// When `errors` is non-empty nothing was persisted; the entity lists
/// describe what the run would have done.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForgetOutcome {
    pub errors: Vec<String>,
    /// Entities whose field mutations were (or would be) saved.
    pub successes: Vec<Entity>,
    /// Entities on which at least one field disposition failed.
    pub failures: Vec<Entity>,
    /// Entities scheduled for whole-entity deletion.
    pub to_delete: Vec<Entity>,
    pub log: Vec<LogEntry>,
}

impl ForgetOutcome {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}
