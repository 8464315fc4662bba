//! Input validation helpers
//!
//! Centralized text length constants and validation functions.
//! Limits are chosen based on:
//! - Reasonable UX limits for names, descriptions, addresses
//! - SurrealDB strings have no built-in length enforcement

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: inventory item, category, unit
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions and notes
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// Short identifiers: payment method, zip code, country, etc.
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Addresses
pub const MAX_ADDRESS_LEN: usize = 500;

// ── Validation helpers (CRUD handlers) ──────────────────────────────

/// Validate that a required string is non-empty (after trim) and within the
/// length limit. On failure pushes a `field: reason` entry onto `errors`.
pub fn check_required_text(value: &str, field: &str, max_len: usize, errors: &mut Vec<String>) {
    if value.trim().is_empty() {
        errors.push(format!("{field}: must not be empty"));
    } else if value.len() > max_len {
        errors.push(format!(
            "{field}: too long ({} chars, max {max_len})",
            value.len()
        ));
    }
}

/// Validate that an optional string, if present, is within the length limit.
pub fn check_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
    errors: &mut Vec<String>,
) {
    if let Some(v) = value
        && v.len() > max_len
    {
        errors.push(format!(
            "{field}: too long ({} chars, max {max_len})",
            v.len()
        ));
    }
}

/// Validate that a numeric value is not negative.
pub fn check_non_negative(value: i64, field: &str, errors: &mut Vec<String>) {
    if value < 0 {
        errors.push(format!("{field}: must not be negative"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_text_rejects_whitespace_only() {
        let mut errors = Vec::new();
        check_required_text("   ", "name", MAX_NAME_LEN, &mut errors);
        assert_eq!(errors, vec!["name: must not be empty".to_string()]);
    }

    #[test]
    fn required_text_enforces_length() {
        let mut errors = Vec::new();
        check_required_text(&"x".repeat(MAX_NAME_LEN + 1), "name", MAX_NAME_LEN, &mut errors);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("name: too long"));
    }

    #[test]
    fn non_negative_flags_negatives_only() {
        let mut errors = Vec::new();
        check_non_negative(0, "quantity", &mut errors);
        check_non_negative(5, "threshold", &mut errors);
        assert!(errors.is_empty());
        check_non_negative(-1, "quantity", &mut errors);
        assert_eq!(errors, vec!["quantity: must not be negative".to_string()]);
    }
}
