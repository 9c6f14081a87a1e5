//! Anonymization strategies for Right to be Forgotten processing
//!
//! Each strategy produces a replacement value for one field. Strategies are
//! registered explicitly under a string id — there is no runtime plugin
//! discovery. Field policies name a sanitizer id; fields without an explicit
//! id fall back to a default keyed by the field's declared data type.

pub mod date;
pub mod email;
pub mod random;
pub mod text;
pub mod username;

use std::collections::HashMap;
use std::sync::Arc;

use gdpr_core::{FieldMeta, FieldType, FieldValue, Result};

pub use date::DateSanitizer;
pub use email::EmailSanitizer;
pub use text::TextSanitizer;
pub use username::UsernameSanitizer;

/// Strategy producing a replacement value for anonymization.
pub trait Sanitizer: Send + Sync {
    /// Identifier field policies and the registry refer to.
    fn id(&self) -> &'static str;

    /// Human-readable label for admin listings.
    fn label(&self) -> &'static str;

    fn sanitize(&self, input: &FieldValue, meta: &FieldMeta) -> Result<FieldValue>;
}

/// Explicit id → strategy map with per-field-type defaults.
pub struct SanitizerRegistry {
    by_id: HashMap<String, Arc<dyn Sanitizer>>,
    type_defaults: HashMap<FieldType, String>,
}

impl SanitizerRegistry {
    pub fn empty() -> Self {
        Self {
            by_id: HashMap::new(),
            type_defaults: HashMap::new(),
        }
    }

    /// Registry pre-populated with the built-in strategies and their type
    /// defaults.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(EmailSanitizer));
        registry.register(Arc::new(UsernameSanitizer));
        registry.register(Arc::new(TextSanitizer));
        registry.register(Arc::new(DateSanitizer));
        registry.set_type_default(FieldType::Email, "email");
        registry.set_type_default(FieldType::Text, "text");
        registry.set_type_default(FieldType::Date, "date");
        registry
    }

    pub fn register(&mut self, sanitizer: Arc<dyn Sanitizer>) {
        self.by_id.insert(sanitizer.id().to_string(), sanitizer);
    }

    pub fn set_type_default(&mut self, field_type: FieldType, id: &str) {
        self.type_defaults.insert(field_type, id.to_string());
    }

    pub fn get(&self, id: &str) -> Option<Arc<dyn Sanitizer>> {
        self.by_id.get(id).cloned()
    }

    /// Resolves the strategy for a field. An explicitly configured sanitizer
    /// id always wins; the type default is consulted only when the policy
    /// carries no id. Returns `None` when nothing can be resolved.
    pub fn resolve(
        &self,
        explicit: Option<&str>,
        field_type: FieldType,
    ) -> Option<Arc<dyn Sanitizer>> {
        match explicit {
            Some(id) => self.get(id),
            None => self
                .type_defaults
                .get(&field_type)
                .and_then(|id| self.get(id)),
        }
    }

    /// (id, label) pairs of every registered strategy, sorted by id.
    pub fn list(&self) -> Vec<(String, String)> {
        let mut entries: Vec<_> = self
            .by_id
            .values()
            .map(|s| (s.id().to_string(), s.label().to_string()))
            .collect();
        entries.sort();
        entries
    }
}

impl Default for SanitizerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
