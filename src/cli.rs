use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Only show critical errors
    Quiet,
    /// Show standard information
    #[default]
    Normal,
    /// Show detailed information
    Verbose,
    /// Show all available debugging information
    Debug,
}

/// Compare XML record feeds for missing fields and value mismatches
#[derive(Parser, Debug, Clone)]
#[command(name = "xml-compare")]
#[command(about = "Compare XML record feeds against each other or a reference field set")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Path to a TOML configuration file
    #[arg(long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Compare two XML documents
    Compare {
        /// First XML document
        file1: PathBuf,

        /// Second XML document
        file2: PathBuf,

        /// Comparison mode: missing-fields, missing-fields-reverse, or field-values
        #[arg(short = 'm', long = "mode", default_value = "missing-fields")]
        mode: String,
    },

    /// Check XML files against a required-field descriptor
    Check {
        /// Directory or file to check
        path: PathBuf,

        /// JSON file listing required fields
        #[arg(short = 'r', long = "required-fields")]
        required_fields: PathBuf,

        /// File extensions to process (comma-separated)
        #[arg(short = 'e', long = "extensions")]
        extensions: Option<String>,

        /// Include file patterns (glob syntax)
        #[arg(long = "include", action = clap::ArgAction::Append)]
        include_patterns: Vec<String>,

        /// Exclude file patterns (glob syntax)
        #[arg(long = "exclude", action = clap::ArgAction::Append)]
        exclude_patterns: Vec<String>,

        /// Number of files checked concurrently
        #[arg(short = 't', long = "threads")]
        threads: Option<usize>,
    },

    /// Explore the values of one field in an XML document
    Explore {
        /// XML document to analyze
        file: PathBuf,

        /// Field (element tag) to analyze; omit to list available fields
        #[arg(short = 'f', long = "field")]
        field: Option<String>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

/// Split a comma-separated extension list into cleaned entries.
pub fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
