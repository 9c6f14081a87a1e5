//! Per-field GDPR policy

use serde::{Deserialize, Serialize};

/// Right to Access disposition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RtaDisposition {
    Included,
    Maybe,
    #[default]
    NotIncluded,
}

impl RtaDisposition {
    /// Whether the field shows up in an export at all ("maybe" is surfaced
    /// for manual review).
    pub fn exports(&self) -> bool {
        matches!(self, RtaDisposition::Included | RtaDisposition::Maybe)
    }
}

/// Right to be Forgotten disposition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RtfDisposition {
    Anonymize,
    Remove,
    Maybe,
    #[default]
    NotIncluded,
}

/// Traversal behavior of a reference field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipMode {
    /// Do not traverse through this field.
    #[default]
    Disabled,
    /// Traverse forward into the referenced entities.
    Follow,
    /// This entity is owned by the referenced entity; it is discovered via
    /// a reverse query from the target side instead of a forward walk.
    Owner,
}

/// Immutable per-(entity type, bundle, field) configuration record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPolicy {
    pub entity_type: String,
    pub bundle: String,
    pub field_name: String,
    pub enabled: bool,
    pub rta: RtaDisposition,
    pub rtf: RtfDisposition,
    pub relationship: RelationshipMode,
    /// Sanitizer id used when `rtf` is `anonymize`; falls back to the
    /// field-type default when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sanitizer: Option<String>,
    #[serde(default)]
    pub notes: String,
    /// Export-grouping key; defaults to the target entity type when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sars_filename: Option<String>,
}

impl FieldPolicy {
    /// The policy an unreviewed field gets: invisible to traversal and to
    /// both visitors. Absence of configuration is meaningful, not an error.
    pub fn unconfigured(
        entity_type: impl Into<String>,
        bundle: impl Into<String>,
        field_name: impl Into<String>,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            bundle: bundle.into(),
            field_name: field_name.into(),
            enabled: false,
            rta: RtaDisposition::NotIncluded,
            rtf: RtfDisposition::NotIncluded,
            relationship: RelationshipMode::Disabled,
            sanitizer: None,
            notes: String::new(),
            sars_filename: None,
        }
    }

    /// A disabled field never exposes its relationship mode.
    pub fn follows(&self) -> bool {
        self.enabled && self.relationship == RelationshipMode::Follow
    }

    pub fn is_owner(&self) -> bool {
        self.enabled && self.relationship == RelationshipMode::Owner
    }
}
