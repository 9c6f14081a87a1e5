use gdpr_core::{FieldMeta, FieldValue, Result};

use crate::{random, Sanitizer};

const SUFFIX_LENGTH: usize = 4;

/// Replaces text with a short `anon_`-prefixed random string, clipped to the
/// field's maximum length when one is declared.
pub struct TextSanitizer;

impl Sanitizer for TextSanitizer {
    fn id(&self) -> &'static str {
        "text"
    }

    fn label(&self) -> &'static str {
        "Text sanitizer"
    }

    fn sanitize(&self, input: &FieldValue, meta: &FieldMeta) -> Result<FieldValue> {
        if input.is_null() || input.as_text().is_some_and(str::is_empty) {
            return Ok(input.clone());
        }
        let mut value = format!("anon_{}", random::string(SUFFIX_LENGTH));
        if let Some(max_length) = meta.max_length {
            value.truncate(max_length);
        }
        Ok(FieldValue::Text(value))
    }
}
