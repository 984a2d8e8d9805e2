//! Value-level comparison between two record mappings.
//!
//! For every title common to both documents, every field appearing on
//! either side is compared after normalization. When both sides coerce to
//! numbers the comparison is numeric (exact equality on the parsed value,
//! no epsilon); otherwise the normalized strings are compared.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::extractor::{FieldMap, RecordMap};
use crate::normalize::{normalize, try_numeric};

/// Placeholder substituted when a field is structurally absent from one
/// side. Distinct from present-but-empty, which normalizes to "".
pub const NOT_PRESENT: &str = "Not Present";

/// Field carrying the record's external reference identifier.
const REFERENCE_FIELD: &str = "Property_Reference";

/// One record's one field where normalized values differ between the two
/// documents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MismatchRow {
    /// Reference identifier of the record. The numeric-mismatch branch
    /// carries side 1's `Property_Reference`, the string-mismatch branch
    /// side 2's. This asymmetry is a fixed contract.
    pub reference_id: String,
    pub title: String,
    pub field: String,
    /// Normalized value on side 1.
    pub value_left: String,
    /// Normalized value on side 2.
    pub value_right: String,
}

/// Result of a value comparison across two record mappings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueDiff {
    /// Titles present in both documents, in sorted order.
    pub common_titles: BTreeSet<String>,
    /// Mismatch rows, sorted by (title, field).
    pub mismatches: Vec<MismatchRow>,
}

impl ValueDiff {
    /// Number of distinct titles with at least one mismatch.
    pub fn mismatched_title_count(&self) -> usize {
        self.mismatches
            .iter()
            .map(|row| row.title.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }
}

/// Compare field values between two record mappings for every title common
/// to both. Rows come out sorted by (title, field) because both maps
/// iterate in key order.
pub fn compare_values(left: &RecordMap, right: &RecordMap) -> ValueDiff {
    let common_titles: BTreeSet<String> = left
        .keys()
        .filter(|title| right.contains_key(*title))
        .cloned()
        .collect();

    let mut mismatches = Vec::new();
    for title in &common_titles {
        let fields_left = &left[title];
        let fields_right = &right[title];

        let all_fields: BTreeSet<&String> =
            fields_left.keys().chain(fields_right.keys()).collect();

        for field in all_fields {
            let value_left = normalized_value(fields_left, field);
            let value_right = normalized_value(fields_right, field);

            let numeric_left = try_numeric(&value_left);
            let numeric_right = try_numeric(&value_right);

            let (differs, reference_id) = match (numeric_left, numeric_right) {
                (Some(a), Some(b)) => (a != b, reference_id(fields_left)),
                _ => (value_left != value_right, reference_id(fields_right)),
            };

            if differs {
                mismatches.push(MismatchRow {
                    reference_id,
                    title: title.clone(),
                    field: field.clone(),
                    value_left,
                    value_right,
                });
            }
        }
    }

    ValueDiff {
        common_titles,
        mismatches,
    }
}

/// Normalize a field's value for comparison. A structurally absent field
/// normalizes the literal sentinel, not the empty string.
fn normalized_value(fields: &FieldMap, field: &str) -> String {
    match fields.get(field) {
        Some(text) => normalize(text.as_deref()),
        None => normalize(Some(NOT_PRESENT)),
    }
}

/// Raw reference identifier of a record, defaulting to the sentinel when
/// the field is absent.
fn reference_id(fields: &FieldMap) -> String {
    match fields.get(REFERENCE_FIELD) {
        Some(Some(text)) => text.clone(),
        Some(None) => String::new(),
        None => NOT_PRESENT.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn record(fields: &[(&str, Option<&str>)]) -> FieldMap {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
            .collect()
    }

    fn records(entries: Vec<(&str, FieldMap)>) -> RecordMap {
        entries
            .into_iter()
            .map(|(title, fields)| (title.to_string(), fields))
            .collect()
    }

    #[test]
    fn test_numeric_equivalence_suppresses_mismatch() {
        // " 100 " and "100.00" differ as strings but agree numerically.
        let left = records(vec![("Unit 1", record(&[("Price", Some(" 100 "))]))]);
        let right = records(vec![("Unit 1", record(&[("Price", Some("100.00"))]))]);

        let result = compare_values(&left, &right);
        assert!(result.mismatches.is_empty());
        assert!(result.common_titles.contains("Unit 1"));
    }

    #[test]
    fn test_numeric_mismatch_uses_left_reference() {
        let left = records(vec![(
            "Unit 1",
            record(&[("Price", Some("100")), ("Property_Reference", Some("L-1"))]),
        )]);
        let right = records(vec![(
            "Unit 1",
            record(&[("Price", Some("200")), ("Property_Reference", Some("R-1"))]),
        )]);

        let result = compare_values(&left, &right);
        // Two rows: Price, and the differing Property_Reference itself.
        assert_eq!(result.mismatches.len(), 2);
        let row = result
            .mismatches
            .iter()
            .find(|r| r.field == "Price")
            .unwrap();
        assert_eq!(row.reference_id, "L-1");
        assert_eq!(row.value_left, "100");
        assert_eq!(row.value_right, "200");
    }

    #[test]
    fn test_string_mismatch_uses_right_reference() {
        let left = records(vec![(
            "Unit 1",
            record(&[("Zone", Some("North")), ("Property_Reference", Some("L-1"))]),
        )]);
        let right = records(vec![(
            "Unit 1",
            record(&[("Zone", Some("South")), ("Property_Reference", Some("R-1"))]),
        )]);

        let result = compare_values(&left, &right);
        // Two rows: Zone, and the differing Property_Reference itself.
        assert_eq!(result.mismatches.len(), 2);
        let row = result
            .mismatches
            .iter()
            .find(|r| r.field == "Zone")
            .unwrap();
        assert_eq!(row.reference_id, "R-1");
    }

    #[test]
    fn test_absent_field_compares_against_sentinel() {
        let left = records(vec![("Unit 1", record(&[("Notes", Some("Nice"))]))]);
        let right = records(vec![("Unit 1", record(&[]))]);

        let result = compare_values(&left, &right);
        assert_eq!(result.mismatches.len(), 1);
        let row = &result.mismatches[0];
        assert_eq!(row.value_left, "Nice");
        assert_eq!(row.value_right, NOT_PRESENT);
    }

    #[test]
    fn test_absent_distinguished_from_present_but_empty() {
        // Present-but-empty normalizes to "", which differs from the
        // sentinel on the absent side.
        let left = records(vec![("Unit 1", record(&[("Notes", None)]))]);
        let right = records(vec![("Unit 1", record(&[]))]);

        let result = compare_values(&left, &right);
        assert_eq!(result.mismatches.len(), 1);
        assert_eq!(result.mismatches[0].value_left, "");
        assert_eq!(result.mismatches[0].value_right, NOT_PRESENT);
    }

    #[test]
    fn test_only_common_titles_compared() {
        let left = records(vec![
            ("Unit 1", record(&[("Price", Some("1"))])),
            ("Only Left", record(&[("Price", Some("2"))])),
        ]);
        let right = records(vec![
            ("Unit 1", record(&[("Price", Some("1"))])),
            ("Only Right", record(&[("Price", Some("3"))])),
        ]);

        let result = compare_values(&left, &right);
        assert_eq!(
            result.common_titles,
            BTreeSet::from(["Unit 1".to_string()])
        );
        assert!(result.mismatches.is_empty());
    }

    #[test]
    fn test_missing_reference_defaults_to_sentinel() {
        let left = records(vec![("Unit 1", record(&[("Zone", Some("A"))]))]);
        let right = records(vec![("Unit 1", record(&[("Zone", Some("B"))]))]);

        let result = compare_values(&left, &right);
        assert_eq!(result.mismatches[0].reference_id, NOT_PRESENT);
    }

    #[test]
    fn test_rows_sorted_by_title_then_field() {
        let mk = |price: &str, zone: &str| {
            record(&[("Price", Some(price)), ("Zone", Some(zone))])
        };
        let left = records(vec![("B Unit", mk("1", "X")), ("A Unit", mk("3", "Y"))]);
        let right = records(vec![("B Unit", mk("2", "Z")), ("A Unit", mk("4", "W"))]);

        let result = compare_values(&left, &right);
        let keys: Vec<(String, String)> = result
            .mismatches
            .iter()
            .map(|r| (r.title.clone(), r.field.clone()))
            .collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
        assert_eq!(result.mismatches.len(), 4);
        assert_eq!(result.mismatched_title_count(), 2);
    }

    #[test]
    fn test_entity_decoding_applied_before_comparison() {
        let left = records(vec![("Unit 1", record(&[("Price", Some("&#x20AC;100"))]))]);
        let right = records(vec![("Unit 1", record(&[("Price", Some("\u{20AC}100"))]))]);

        let result = compare_values(&left, &right);
        assert!(result.mismatches.is_empty());
    }

    #[test]
    fn test_empty_maps_yield_empty_diff() {
        let result = compare_values(&BTreeMap::new(), &BTreeMap::new());
        assert!(result.common_titles.is_empty());
        assert!(result.mismatches.is_empty());
    }
}
