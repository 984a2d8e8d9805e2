//! Record and field-set extraction from XML documents.
//!
//! A record is one `property` element, identified by the text of its `Title`
//! child. Only direct children of `property` are captured; nested structure
//! deeper than one level is not represented.

use std::collections::{BTreeMap, BTreeSet};

use roxmltree::Document;

use crate::error::{ComparisonError, Result};

/// Field name → text content of the element (`None` when the element is
/// present but empty or self-closing).
pub type FieldMap = BTreeMap<String, Option<String>>;

/// Record title → field mapping. BTreeMap keeps iteration deterministic for
/// downstream reporting.
pub type RecordMap = BTreeMap<String, FieldMap>;

/// Tag name of the element a record is built from.
const RECORD_TAG: &str = "property";

/// Tag name of the child element that identifies a record.
const TITLE_TAG: &str = "Title";

/// Extract every titled record from an XML document.
///
/// Locates every `property` element at any depth. A `property` lacking a
/// `Title` child, or whose `Title` text is empty, is excluded entirely. A
/// later record with a duplicate title overwrites an earlier one.
///
/// `doc_ref` names the document in error reports (typically the file name).
pub fn extract_records(xml: &str, doc_ref: &str) -> Result<RecordMap> {
    let doc = Document::parse(xml).map_err(|e| ComparisonError::malformed(doc_ref, e))?;

    let mut records = RecordMap::new();
    for node in record_nodes(&doc) {
        let title = node
            .children()
            .filter(|n| n.is_element())
            .find(|n| n.tag_name().name() == TITLE_TAG)
            .and_then(|n| n.text());

        let Some(title) = title else { continue };
        if title.is_empty() {
            continue;
        }

        let fields: FieldMap = node
            .children()
            .filter(|n| n.is_element())
            .map(|child| {
                (
                    child.tag_name().name().to_string(),
                    child.text().map(str::to_string),
                )
            })
            .collect();

        records.insert(title.to_string(), fields);
    }

    Ok(records)
}

/// Extract the set of distinct field names appearing as direct children of
/// any `property` in a document.
///
/// Title-agnostic: a `property` without a `Title` still contributes its
/// child tag names here, unlike [`extract_records`]. This asymmetry between
/// structural and value comparisons is intentional.
pub fn extract_field_names(xml: &str, doc_ref: &str) -> Result<BTreeSet<String>> {
    let doc = Document::parse(xml).map_err(|e| ComparisonError::malformed(doc_ref, e))?;

    let mut fields = BTreeSet::new();
    for node in record_nodes(&doc) {
        for child in node.children().filter(|n| n.is_element()) {
            fields.insert(child.tag_name().name().to_string());
        }
    }

    Ok(fields)
}

fn record_nodes<'a, 'input>(
    doc: &'a Document<'input>,
) -> impl Iterator<Item = roxmltree::Node<'a, 'input>> {
    doc.descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == RECORD_TAG)
}
