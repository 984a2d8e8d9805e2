//! # xml-compare Library
//!
//! Compares structured records extracted from XML documents against a
//! reference field set or against each other, reporting missing fields and
//! value-level mismatches.
//!
//! The core is synchronous and stateless per call: documents arrive as
//! already-decoded text, every comparison returns a freshly allocated
//! payload, and nothing persists across invocations. Async appears only at
//! the edges, for file I/O, batch checking, and result caching.

pub mod checker;
pub mod cli;
pub mod comparator;
pub mod config;
pub mod error;
pub mod explorer;
pub mod extractor;
pub mod file_discovery;
pub mod normalize;
pub mod output;
pub mod schema_loader;
pub mod structural;
pub mod value_diff;

pub use checker::{CheckStatus, CheckerConfig, FieldCheckReport, FieldChecker, FileCheckResult};
pub use cli::{Cli, Command, VerbosityLevel};
pub use comparator::{ComparisonMode, ComparisonOutcome, ResultCache, compare_documents};
pub use config::{Config, ConfigManager};
pub use error::ComparisonError;
pub use explorer::{FieldAnalysis, FieldValueCount, analyze_field, collect_field_names};
pub use extractor::{FieldMap, RecordMap, extract_field_names, extract_records};
pub use file_discovery::FileDiscovery;
pub use normalize::{normalize, try_numeric};
pub use output::Output;
pub use schema_loader::{load_required_fields, parse_required_fields};
pub use structural::StructuralDiff;
pub use value_diff::{MismatchRow, NOT_PRESENT, ValueDiff, compare_values};
