//! Best-effort string to number coercion for untyped metadata values.
//!
//! The rule is deliberately naive: text containing a `.` is tried as a
//! float, anything else as an integer, and text that fails to parse is kept
//! as-is. Version strings like `"1.0.3"` stay text and zero-padded codes like
//! `"007"` become `7`; both are accepted behavior.

use super::PropertyValue;

/// Coerce a property value.
///
/// Non-text values are returned unchanged. Never fails.
pub fn coerce(value: PropertyValue) -> PropertyValue {
    match value {
        PropertyValue::Text(text) => coerce_str(&text).unwrap_or(PropertyValue::Text(text)),
        other => other,
    }
}

fn coerce_str(text: &str) -> Option<PropertyValue> {
    // Surrounding whitespace is ignored by the numeric parse only.
    let trimmed = text.trim();
    if text.contains('.') {
        trimmed.parse::<f64>().ok().map(PropertyValue::Float)
    } else {
        trimmed.parse::<i64>().ok().map(PropertyValue::Int)
    }
}
