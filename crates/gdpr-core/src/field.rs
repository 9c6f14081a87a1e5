//! Introspected field definitions

use serde::{Deserialize, Serialize};

/// Declared data type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Email,
    Date,
    Integer,
    Boolean,
    Reference,
}

/// How many values the field can hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    #[default]
    Single,
    Multiple,
}

/// Field definition supplied by the repository's introspection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMeta {
    pub name: String,
    #[serde(default)]
    pub label: String,
    pub field_type: FieldType,
    /// Target entity type for reference fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
    #[serde(default)]
    pub cardinality: Cardinality,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub is_computed: bool,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default)]
    pub is_read_only: bool,
    /// Whether this field is (part of) the entity's identifier.
    #[serde(default)]
    pub is_key: bool,
}

impl FieldMeta {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            field_type,
            target_type: None,
            cardinality: Cardinality::Single,
            max_length: None,
            is_computed: false,
            is_required: false,
            is_read_only: false,
            is_key: false,
        }
    }

    pub fn reference(name: impl Into<String>, target_type: impl Into<String>) -> Self {
        let mut meta = Self::new(name, FieldType::Reference);
        meta.target_type = Some(target_type.into());
        meta
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn multi_valued(mut self) -> Self {
        self.cardinality = Cardinality::Multiple;
        self
    }

    pub fn computed(mut self) -> Self {
        self.is_computed = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.is_read_only = true;
        self
    }

    pub fn key(mut self) -> Self {
        self.is_key = true;
        self
    }

    pub fn is_reference(&self) -> bool {
        self.field_type == FieldType::Reference
    }

    /// File/blob references get special export handling (asset side-list).
    pub fn references_files(&self) -> bool {
        self.is_reference() && self.target_type.as_deref() == Some("file")
    }
}
