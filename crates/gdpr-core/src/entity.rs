use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Reference to another entity held in a field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub target_type: String,
    pub target_id: String,
}

impl EntityRef {
    pub fn new(target_type: impl Into<String>, target_id: impl Into<String>) -> Self {
        Self {
            target_type: target_type.into(),
            target_id: target_id.into(),
        }
    }
}

/// A raw field value as handed over by the persistence layer.
///
/// Untagged so fixture documents can write plain JSON scalars; timestamps
/// are written as RFC 3339 strings to keep them distinguishable from text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Timestamp(#[serde(with = "time::serde::rfc3339")] OffsetDateTime),
    Text(String),
    References(Vec<EntityRef>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Stringified form used in export rows. Booleans and timestamps render
    /// the way the CMS coerces them ("1"/"0", Unix seconds).
    pub fn display_string(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Boolean(value) => if *value { "1" } else { "0" }.to_string(),
            FieldValue::Integer(value) => value.to_string(),
            FieldValue::Timestamp(value) => value.unix_timestamp().to_string(),
            FieldValue::Text(value) => value.clone(),
            FieldValue::References(refs) => refs
                .iter()
                .map(|r| r.target_id.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// A loaded entity instance: identity plus raw field values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub entity_type: String,
    pub bundle: String,
    pub id: String,
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl Entity {
    pub fn new(
        entity_type: impl Into<String>,
        bundle: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            bundle: bundle.into(),
            id: id.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_value(mut self, field: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(field.into(), value);
        self
    }

    pub fn value(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn set_value(&mut self, field: impl Into<String>, value: FieldValue) {
        self.fields.insert(field.into(), value);
    }

    /// Nulls out a field, keeping the key so a save persists the removal.
    pub fn clear_value(&mut self, field: &str) {
        self.fields.insert(field.to_string(), FieldValue::Null);
    }

    /// Referenced entities held in a field, or an empty slice for anything
    /// that is not a populated reference field.
    pub fn references(&self, field: &str) -> &[EntityRef] {
        match self.fields.get(field) {
            Some(FieldValue::References(refs)) => refs,
            _ => &[],
        }
    }
}
