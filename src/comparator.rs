//! Comparison orchestration.
//!
//! Selects the extraction + differ pipeline for a requested mode and
//! assembles the result payload. Stateless per call: nothing persists
//! across comparisons. An optional [`ResultCache`] memoizes whole outcomes
//! at this boundary, since a comparison is a pure function of its inputs.

use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

use moka::future::Cache;
use serde::{Deserialize, Serialize};

use crate::error::{ComparisonError, Result};
use crate::extractor::{extract_field_names, extract_records};
use crate::structural::{self, StructuralDiff};
use crate::value_diff::{self, ValueDiff};

/// Requested comparison pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonMode {
    /// Report fields of document 1 missing from document 2.
    MissingFields,
    /// Report fields of document 2 missing from document 1.
    MissingFieldsReverse,
    /// Report value mismatches for titles common to both documents.
    FieldValues,
}

impl ComparisonMode {
    /// Parse a mode string. Any unknown string fails with
    /// [`ComparisonError::UnsupportedMode`]; modes are never defaulted.
    pub fn parse(mode: &str) -> Result<Self> {
        match mode {
            "missing-fields" => Ok(ComparisonMode::MissingFields),
            "missing-fields-reverse" => Ok(ComparisonMode::MissingFieldsReverse),
            "field-values" => Ok(ComparisonMode::FieldValues),
            other => Err(ComparisonError::UnsupportedMode {
                mode: other.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonMode::MissingFields => "missing-fields",
            ComparisonMode::MissingFieldsReverse => "missing-fields-reverse",
            ComparisonMode::FieldValues => "field-values",
        }
    }
}

impl std::str::FromStr for ComparisonMode {
    type Err = ComparisonError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl std::fmt::Display for ComparisonMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result payload of one comparison, per mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComparisonOutcome {
    Structural(StructuralDiff),
    Values(ValueDiff),
}

/// Run one comparison between two documents.
///
/// `name1`/`name2` identify the documents in error reports. Either a full
/// result payload is returned or an error, never both.
pub fn compare_documents(
    doc1: &str,
    doc2: &str,
    name1: &str,
    name2: &str,
    mode: ComparisonMode,
) -> Result<ComparisonOutcome> {
    match mode {
        ComparisonMode::MissingFields => {
            let reference = extract_field_names(doc1, name1)?;
            let target = extract_field_names(doc2, name2)?;
            Ok(ComparisonOutcome::Structural(structural::diff(
                &reference, &target,
            )))
        }
        ComparisonMode::MissingFieldsReverse => {
            let target = extract_field_names(doc1, name1)?;
            let reference = extract_field_names(doc2, name2)?;
            Ok(ComparisonOutcome::Structural(structural::diff(
                &reference, &target,
            )))
        }
        ComparisonMode::FieldValues => {
            let left = extract_records(doc1, name1)?;
            let right = extract_records(doc2, name2)?;
            Ok(ComparisonOutcome::Values(value_diff::compare_values(
                &left, &right,
            )))
        }
    }
}

/// In-memory cache of comparison outcomes, keyed by document contents,
/// document names and mode.
///
/// Purely an optimization at the orchestration boundary; correctness never
/// depends on it. Errors are not cached.
pub struct ResultCache {
    cache: Cache<String, Arc<ComparisonOutcome>>,
}

impl ResultCache {
    pub fn new(max_capacity: u64) -> Self {
        let cache = Cache::builder().max_capacity(max_capacity).build();
        Self { cache }
    }

    /// Look up a prior outcome for the same inputs, computing and storing
    /// it on a miss.
    pub async fn compare_documents(
        &self,
        doc1: &str,
        doc2: &str,
        name1: &str,
        name2: &str,
        mode: ComparisonMode,
    ) -> Result<Arc<ComparisonOutcome>> {
        let key = Self::cache_key(doc1, doc2, name1, name2, mode);

        if let Some(outcome) = self.cache.get(&key).await {
            return Ok(outcome);
        }

        let outcome = Arc::new(compare_documents(doc1, doc2, name1, name2, mode)?);
        self.cache.insert(key, Arc::clone(&outcome)).await;
        Ok(outcome)
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    fn cache_key(doc1: &str, doc2: &str, name1: &str, name2: &str, mode: ComparisonMode) -> String {
        let mut hasher = DefaultHasher::new();
        doc1.hash(&mut hasher);
        doc2.hash(&mut hasher);
        let content_hash = hasher.finish();
        format!("{}\u{1f}{}\u{1f}{}\u{1f}{:016x}", name1, name2, mode, content_hash)
    }
}
