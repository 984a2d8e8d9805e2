//! Structural (field-presence) comparison.
//!
//! Directional: the reference side is ground truth, and the diff reports
//! which of its fields the target side lacks. Forward and reverse
//! comparisons are the same primitive with swapped arguments.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Result of one directional structural comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralDiff {
    /// All field names on the reference side, sorted.
    pub reference_fields: Vec<String>,
    /// Reference fields absent from the target side, sorted.
    pub missing_fields: Vec<String>,
    /// Count of reference fields.
    pub total_reference_fields: usize,
    /// Count of missing fields.
    pub total_missing: usize,
}

impl StructuralDiff {
    /// Percentage of reference fields present on the target side.
    /// An empty reference set counts as a full match.
    pub fn match_rate(&self) -> f64 {
        if self.total_reference_fields == 0 {
            100.0
        } else {
            (self.total_reference_fields - self.total_missing) as f64
                / self.total_reference_fields as f64
                * 100.0
        }
    }

    /// True when the target side carries every reference field.
    pub fn is_complete(&self) -> bool {
        self.total_missing == 0
    }
}

/// Compute `missing = reference − target`.
pub fn diff(reference: &BTreeSet<String>, target: &BTreeSet<String>) -> StructuralDiff {
    let reference_fields: Vec<String> = reference.iter().cloned().collect();
    let missing_fields: Vec<String> = reference.difference(target).cloned().collect();

    StructuralDiff {
        total_reference_fields: reference_fields.len(),
        total_missing: missing_fields.len(),
        reference_fields,
        missing_fields,
    }
}
