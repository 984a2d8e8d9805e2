//! Batch missing-field checker.
//!
//! Validates each XML file in a batch against the reference field set,
//! counting how many records lack each required field. Files are processed
//! concurrently with bounded parallelism; a malformed document is reported
//! per-file without halting the batch.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::Arc;

use futures::future::try_join_all;
use roxmltree::Document;
use serde::{Deserialize, Serialize};

use crate::error::{ComparisonError, Result};
use crate::structural::{self, StructuralDiff};

/// Outcome of checking one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CheckStatus {
    /// File parsed; counts are per required field.
    Checked(FieldCheckReport),
    /// File could not be processed (malformed XML, unreadable, ...).
    Error { message: String },
}

impl CheckStatus {
    pub fn is_error(&self) -> bool {
        matches!(self, CheckStatus::Error { .. })
    }
}

/// Per-file field coverage report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldCheckReport {
    /// Total number of records (`property` elements) in the file.
    pub total_records: usize,
    /// Required field → number of records lacking it as a direct child.
    pub missing_counts: BTreeMap<String, usize>,
    /// Structural diff of the reference set against the file's field set.
    pub structural: StructuralDiff,
}

/// One file's entry in the batch result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileCheckResult {
    pub path: PathBuf,
    pub status: CheckStatus,
}

/// Checker configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckerConfig {
    /// Number of files checked concurrently.
    pub max_concurrent_checks: usize,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_checks: num_cpus::get(),
        }
    }
}

/// Batch checker holding the reference field set.
#[derive(Debug)]
pub struct FieldChecker {
    required_fields: Arc<BTreeSet<String>>,
    config: CheckerConfig,
}

impl FieldChecker {
    /// Create a checker. The reference set must be non-empty; an empty set
    /// is a caller error surfaced by the schema loader beforehand.
    pub fn new(required_fields: BTreeSet<String>, config: CheckerConfig) -> Result<Self> {
        if required_fields.is_empty() {
            return Err(ComparisonError::MissingReferenceData {
                path: "<reference field set>".to_string(),
                details: "required field set is empty".to_string(),
            });
        }
        Ok(Self {
            required_fields: Arc::new(required_fields),
            config,
        })
    }

    /// Check one document's content against the reference set.
    pub fn check_content(&self, xml: &str, doc_ref: &str) -> Result<FieldCheckReport> {
        check_document(xml, doc_ref, &self.required_fields)
    }

    /// Check a batch of files concurrently. Always returns one entry per
    /// input file; per-file failures land in [`CheckStatus::Error`].
    pub async fn check_files(&self, files: Vec<PathBuf>) -> Result<Vec<FileCheckResult>> {
        if files.is_empty() {
            return Ok(Vec::new());
        }

        let semaphore = Arc::new(tokio::sync::Semaphore::new(
            self.config.max_concurrent_checks,
        ));

        let tasks: Vec<_> = files
            .into_iter()
            .map(|path| {
                let required = Arc::clone(&self.required_fields);
                let semaphore = Arc::clone(&semaphore);

                tokio::spawn(async move {
                    let _permit = semaphore.acquire().await.map_err(|_| {
                        ComparisonError::Concurrency {
                            details: "failed to acquire checker semaphore".to_string(),
                        }
                    })?;

                    let status = match tokio::fs::read_to_string(&path).await {
                        Ok(content) => {
                            match check_document(&content, &path.display().to_string(), &required)
                            {
                                Ok(report) => CheckStatus::Checked(report),
                                Err(e) => CheckStatus::Error {
                                    message: e.to_string(),
                                },
                            }
                        }
                        Err(e) => CheckStatus::Error {
                            message: e.to_string(),
                        },
                    };

                    Ok::<FileCheckResult, ComparisonError>(FileCheckResult { path, status })
                })
            })
            .collect();

        let task_results = try_join_all(tasks)
            .await
            .map_err(|e| ComparisonError::Concurrency {
                details: format!("task join error: {}", e),
            })?;

        let mut results = Vec::with_capacity(task_results.len());
        for result in task_results {
            results.push(result?);
        }
        Ok(results)
    }
}

/// Count records missing each required field in one document.
fn check_document(
    xml: &str,
    doc_ref: &str,
    required_fields: &BTreeSet<String>,
) -> Result<FieldCheckReport> {
    let doc = Document::parse(xml).map_err(|e| ComparisonError::malformed(doc_ref, e))?;

    let mut total_records = 0;
    let mut missing_counts: BTreeMap<String, usize> = required_fields
        .iter()
        .map(|field| (field.clone(), 0))
        .collect();
    let mut seen_fields = BTreeSet::new();

    for record in doc
        .descendants()
        .filter(|n| n.is_element() && n.tag_name().name() == "property")
    {
        total_records += 1;

        let child_tags: BTreeSet<&str> = record
            .children()
            .filter(|n| n.is_element())
            .map(|n| n.tag_name().name())
            .collect();

        for tag in &child_tags {
            seen_fields.insert(tag.to_string());
        }
        for field in required_fields {
            if !child_tags.contains(field.as_str()) {
                *missing_counts.entry(field.clone()).or_default() += 1;
            }
        }
    }

    Ok(FieldCheckReport {
        total_records,
        missing_counts,
        structural: structural::diff(required_fields, &seen_fields),
    })
}
