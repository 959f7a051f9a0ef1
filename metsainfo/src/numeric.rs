//! Estonian-locale numeric parsing
//!
//! The registry formats numbers with a space (or non-breaking space) as the
//! thousands separator and a comma as the decimal separator, e.g. `1 234,5`.

use crate::types::Value;
use crate::ParseError;

/// Parses an Estonian-locale decimal string into an `f64`.
///
/// Returns [`ParseError::NotNumeric`] on anything that does not parse;
/// callers are expected to fall back to keeping the original string.
pub fn parse_decimal(s: &str) -> Result<f64, ParseError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(ParseError::NotNumeric(s.to_string()));
    }

    let mut normalized = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        match c {
            // Thousands separators; the source emits both variants
            ' ' | '\u{a0}' => continue,
            ',' => normalized.push('.'),
            c => normalized.push(c),
        }
    }

    fast_float::parse(&normalized).map_err(|_| ParseError::NotNumeric(s.to_string()))
}

/// Try/fallback helper: numeric cells become [`Value::Float`], anything else
/// stays as the original text.
pub fn value_or_text(s: &str) -> Value {
    match parse_decimal(s) {
        Ok(f) => Value::Float(f),
        Err(_) => Value::Text(s.to_string()),
    }
}
