//! Human-readable formatting of comparison results.
//!
//! The engine returns plain payloads; this module turns them into terminal
//! output. Export formats (CSV, HTML, PDF) are projections of the same
//! payloads and live outside this crate.

use atty;

use crate::checker::{CheckStatus, FileCheckResult};
use crate::cli::VerbosityLevel;
use crate::comparator::ComparisonOutcome;
use crate::explorer::FieldAnalysis;
use crate::structural::StructuralDiff;
use crate::value_diff::ValueDiff;

/// Output formatter with verbosity and color handling.
pub struct Output {
    verbosity: VerbosityLevel,
    show_colors: bool,
}

impl Output {
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            show_colors: atty::is(atty::Stream::Stdout),
        }
    }

    #[cfg(test)]
    fn plain(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            show_colors: false,
        }
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if self.show_colors {
            format!("\x1b[{}m{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    pub fn format_outcome(&self, outcome: &ComparisonOutcome, name1: &str, name2: &str) -> String {
        // Quiet mode surfaces differences only.
        if self.verbosity == VerbosityLevel::Quiet {
            let clean = match outcome {
                ComparisonOutcome::Structural(diff) => diff.is_complete(),
                ComparisonOutcome::Values(diff) => diff.mismatches.is_empty(),
            };
            if clean {
                return String::new();
            }
        }

        match outcome {
            ComparisonOutcome::Structural(diff) => self.format_structural(diff),
            ComparisonOutcome::Values(diff) => self.format_values(diff, name1, name2),
        }
    }

    pub fn format_structural(&self, diff: &StructuralDiff) -> String {
        let mut output = String::new();
        output.push_str("Structural Comparison:\n");
        output.push_str(&format!(
            "  Reference fields: {}\n",
            diff.total_reference_fields
        ));

        if diff.is_complete() {
            output.push_str(&format!("  {} no missing fields\n", self.colorize("OK", "32")));
        } else {
            output.push_str(&format!(
                "  {} {} missing: {}\n",
                self.colorize("MISSING", "31"),
                diff.total_missing,
                diff.missing_fields.join(", ")
            ));
        }
        output.push_str(&format!("  Match rate: {:.1}%\n", diff.match_rate()));

        if self.verbosity >= VerbosityLevel::Verbose {
            output.push_str(&format!(
                "  Reference field set: {}\n",
                diff.reference_fields.join(", ")
            ));
        }

        output
    }

    pub fn format_values(&self, diff: &ValueDiff, name1: &str, name2: &str) -> String {
        let mut output = String::new();
        output.push_str("Value Comparison:\n");
        output.push_str(&format!("  Common titles: {}\n", diff.common_titles.len()));

        if diff.mismatches.is_empty() {
            output.push_str(&format!(
                "  {} no mismatches found between the field values\n",
                self.colorize("OK", "32")
            ));
            return output;
        }

        output.push_str(&format!(
            "  {} {} records with {} mismatched rows\n",
            self.colorize("MISMATCH", "31"),
            diff.mismatched_title_count(),
            diff.mismatches.len()
        ));

        if self.verbosity >= VerbosityLevel::Normal {
            output.push('\n');
            output.push_str(&format!(
                "  {:<14} {:<24} {:<18} {:<20} {:<20}\n",
                "Reference", "Title", "Field", name1, name2
            ));
            for row in &diff.mismatches {
                output.push_str(&format!(
                    "  {:<14} {:<24} {:<18} {:<20} {:<20}\n",
                    row.reference_id, row.title, row.field, row.value_left, row.value_right
                ));
            }
        }

        output
    }

    pub fn format_check_results(&self, results: &[FileCheckResult]) -> String {
        let mut output = String::new();
        for result in results {
            output.push_str("-----------------------------------------\n");
            output.push_str(&format!("File: {}\n", result.path.display()));
            match &result.status {
                CheckStatus::Checked(report) => {
                    output.push_str(&format!(
                        "Total number of records: {}\n",
                        report.total_records
                    ));
                    output.push_str("Number of records missing each field:\n");
                    for (field, count) in &report.missing_counts {
                        let line = format!("  {}: {} records\n", field, count);
                        if *count > 0 {
                            output.push_str(&self.colorize(&line, "33"));
                        } else {
                            output.push_str(&line);
                        }
                    }
                    if self.verbosity >= VerbosityLevel::Verbose {
                        output.push_str(&format!(
                            "Field match rate: {:.1}%\n",
                            report.structural.match_rate()
                        ));
                    }
                }
                CheckStatus::Error { message } => {
                    output.push_str(&format!(
                        "{} {}\n",
                        self.colorize("ERROR", "31"),
                        message
                    ));
                }
            }
        }
        if !results.is_empty() {
            output.push_str("-----------------------------------------\n");
        }
        output
    }

    pub fn format_field_analysis(&self, analysis: &FieldAnalysis) -> String {
        let mut output = String::new();
        output.push_str(&format!("Analysis for field '{}':\n", analysis.field));
        output.push_str(&format!(
            "  Total occurrences: {}\n",
            analysis.total_occurrences
        ));
        output.push_str(&format!("  Unique values: {}\n", analysis.unique_value_count()));
        output.push_str(&format!("  Empty values: {}\n", analysis.empty_count));
        output.push_str(&format!("  Non-empty values: {}\n", analysis.non_empty_count()));

        if !analysis.distribution.is_empty() {
            output.push_str("  Value distribution:\n");
            let limit = if self.verbosity >= VerbosityLevel::Verbose {
                analysis.distribution.len()
            } else {
                10.min(analysis.distribution.len())
            };
            for entry in &analysis.distribution[..limit] {
                let percentage = entry.count as f64 / analysis.total_occurrences as f64 * 100.0;
                output.push_str(&format!(
                    "    {:<30} {:>6} ({:.2}%)\n",
                    entry.value, entry.count, percentage
                ));
            }
            if limit < analysis.distribution.len() {
                output.push_str(&format!(
                    "    ... {} more values (use --verbose to list all)\n",
                    analysis.distribution.len() - limit
                ));
            }
        }

        output
    }
}
