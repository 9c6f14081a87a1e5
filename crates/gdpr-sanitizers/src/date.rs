use gdpr_core::{FieldMeta, FieldValue, Result};
use time::macros::datetime;
use time::OffsetDateTime;

use crate::Sanitizer;

/// Fixed placeholder date; obviously synthetic but still a valid value for
/// date columns with no null option.
const PLACEHOLDER: OffsetDateTime = datetime!(1000-01-01 0:00 UTC);

/// Replaces any date or timestamp with the fixed placeholder.
pub struct DateSanitizer;

impl Sanitizer for DateSanitizer {
    fn id(&self) -> &'static str {
        "date"
    }

    fn label(&self) -> &'static str {
        "Date sanitizer"
    }

    fn sanitize(&self, _input: &FieldValue, _meta: &FieldMeta) -> Result<FieldValue> {
        Ok(FieldValue::Timestamp(PLACEHOLDER))
    }
}
