use gdpr_core::{FieldMeta, FieldValue, Result};

use crate::{random, Sanitizer};

const NAME_LENGTH: usize = 7;

/// Replaces a username with a random alphanumeric name.
pub struct UsernameSanitizer;

impl Sanitizer for UsernameSanitizer {
    fn id(&self) -> &'static str {
        "username"
    }

    fn label(&self) -> &'static str {
        "Username sanitizer"
    }

    fn sanitize(&self, input: &FieldValue, _meta: &FieldMeta) -> Result<FieldValue> {
        if input.is_null() {
            return Ok(FieldValue::Null);
        }
        let mut value = random::name(NAME_LENGTH);
        while Some(value.as_str()) == input.as_text() {
            value = random::name(NAME_LENGTH);
        }
        Ok(FieldValue::Text(value))
    }
}
