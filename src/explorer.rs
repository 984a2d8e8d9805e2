//! Single-document field exploration.
//!
//! Answers "what values does this field take" for one document: occurrence
//! counts, empty versus non-empty split, and a value distribution. Unlike
//! the extractors, exploration looks at every element in the document, not
//! just children of `property`.

use std::collections::{BTreeSet, HashMap};

use roxmltree::Document;
use serde::{Deserialize, Serialize};

use crate::error::{ComparisonError, Result};

/// One distinct value and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldValueCount {
    pub value: String,
    pub count: usize,
}

/// Distribution of a single field's values across a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldAnalysis {
    pub field: String,
    /// Number of elements with this tag, empty or not.
    pub total_occurrences: usize,
    /// Elements whose text was absent or whitespace-only.
    pub empty_count: usize,
    /// Distinct non-empty values with counts, sorted by count descending
    /// then value ascending.
    pub distribution: Vec<FieldValueCount>,
}

impl FieldAnalysis {
    pub fn non_empty_count(&self) -> usize {
        self.total_occurrences - self.empty_count
    }

    pub fn unique_value_count(&self) -> usize {
        self.distribution.len()
    }
}

/// Analyze every occurrence of `field` anywhere in the document.
pub fn analyze_field(xml: &str, doc_ref: &str, field: &str) -> Result<FieldAnalysis> {
    let doc = Document::parse(xml).map_err(|e| ComparisonError::malformed(doc_ref, e))?;

    let mut total_occurrences = 0;
    let mut empty_count = 0;
    let mut counts: HashMap<String, usize> = HashMap::new();

    for node in doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == field)
    {
        total_occurrences += 1;
        match node.text().map(str::trim) {
            Some(text) if !text.is_empty() => {
                *counts.entry(text.to_string()).or_default() += 1;
            }
            _ => empty_count += 1,
        }
    }

    let mut distribution: Vec<FieldValueCount> = counts
        .into_iter()
        .map(|(value, count)| FieldValueCount { value, count })
        .collect();
    distribution.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));

    Ok(FieldAnalysis {
        field: field.to_string(),
        total_occurrences,
        empty_count,
        distribution,
    })
}

/// Every distinct element tag in the document, for discovery listings.
pub fn collect_field_names(xml: &str, doc_ref: &str) -> Result<BTreeSet<String>> {
    let doc = Document::parse(xml).map_err(|e| ComparisonError::malformed(doc_ref, e))?;

    Ok(doc
        .descendants()
        .filter(|n| n.is_element())
        .map(|n| n.tag_name().name().to_string())
        .collect())
}
