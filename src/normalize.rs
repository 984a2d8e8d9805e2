//! Value normalization and numeric coercion.
//!
//! Raw field values are canonicalized before any comparison: a fixed table of
//! HTML-entity sequences is decoded and surrounding whitespace is trimmed.
//! The table is deliberately small and closed; extend it by adding entries,
//! never by pulling in a general entity decoder.

/// Fixed entity substitution table. Order does not matter: no replacement
/// character can combine with surrounding text to form another entry.
const ENTITY_TABLE: &[(&str, &str)] = &[
    ("&#x20AC;", "\u{20AC}"), // euro sign
    ("&#xA0;", "\u{A0}"),     // non-breaking space
    ("&lt;", "<"),
    ("&gt;", ">"),
];

/// Canonicalize a raw field value.
///
/// `None` (element present but empty) becomes the empty string. Entities are
/// decoded before trimming so that an encoded non-breaking space at either
/// edge is removed, which keeps the operation idempotent.
pub fn normalize(raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return String::new();
    };

    let mut value = raw.to_string();
    for (entity, replacement) in ENTITY_TABLE {
        if value.contains(entity) {
            value = value.replace(entity, replacement);
        }
    }
    value.trim().to_string()
}

/// Attempt a locale-free decimal float parse of a canonical value.
///
/// Returns `None` when the value is not numeric. This is a classification
/// step, not a fallible operation: callers fall back to string comparison.
pub fn try_numeric(canonical: &str) -> Option<f64> {
    canonical.parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_becomes_empty() {
        assert_eq!(normalize(None), "");
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(normalize(Some("  100  ")), "100");
        assert_eq!(normalize(Some("\tvalue\n")), "value");
    }

    #[test]
    fn test_entity_table() {
        assert_eq!(normalize(Some("price &#x20AC;100")), "price \u{20AC}100");
        assert_eq!(normalize(Some("a&#xA0;b")), "a\u{A0}b");
        assert_eq!(normalize(Some("&lt;tag&gt;")), "<tag>");
    }

    #[test]
    fn test_unknown_entities_untouched() {
        // Only the four-entry table is decoded.
        assert_eq!(normalize(Some("&amp; &quot; &#39;")), "&amp; &quot; &#39;");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "  100 ",
            "&lt;a&gt;",
            "x&#xA0;",
            "&#xA0;y&#xA0;",
            "plain",
            "",
            "&#x20AC; 9.99 ",
        ];
        for input in inputs {
            let once = normalize(Some(input));
            let twice = normalize(Some(&once));
            assert_eq!(once, twice, "normalize not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_encoded_nbsp_at_edge_is_trimmed() {
        // Decode happens before trim, so the encoded space vanishes.
        assert_eq!(normalize(Some("100&#xA0;")), "100");
    }

    #[test]
    fn test_try_numeric_success() {
        assert_eq!(try_numeric("3.0"), Some(3.0));
        assert_eq!(try_numeric("3"), Some(3.0));
        assert_eq!(try_numeric("3.0"), try_numeric("3"));
        assert_eq!(try_numeric("-12.5"), Some(-12.5));
        assert_eq!(try_numeric("1e3"), Some(1000.0));
    }

    #[test]
    fn test_try_numeric_failure() {
        assert_eq!(try_numeric("abc"), None);
        assert_eq!(try_numeric(""), None);
        assert_eq!(try_numeric("12,5"), None);
        assert_eq!(try_numeric("100 EUR"), None);
    }
}
