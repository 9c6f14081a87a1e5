use gdpr_core::{FieldMeta, FieldValue, Result};

use crate::{random, Sanitizer};

const LOCAL_PART_LENGTH: usize = 12;

/// Replaces an email address with `anon_<word>@example.com`.
pub struct EmailSanitizer;

impl Sanitizer for EmailSanitizer {
    fn id(&self) -> &'static str {
        "email"
    }

    fn label(&self) -> &'static str {
        "Email sanitizer"
    }

    fn sanitize(&self, input: &FieldValue, _meta: &FieldMeta) -> Result<FieldValue> {
        if input.is_null() {
            return Ok(FieldValue::Null);
        }
        Ok(FieldValue::Text(format!(
            "anon_{}@example.com",
            random::word(LOCAL_PART_LENGTH)
        )))
    }
}
