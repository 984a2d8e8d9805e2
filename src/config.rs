//! Layered configuration: defaults, then an optional TOML file, then
//! `XML_COMPARE_*` environment variables, then CLI flags.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cli::{self, Cli, Command};
use crate::error::{ComparisonError, Result};

/// Trait for abstracting environment variable access
pub trait EnvProvider {
    fn get(&self, key: &str) -> Option<String>;
}

/// System environment variable provider for production use
pub struct SystemEnvProvider;

impl EnvProvider for SystemEnvProvider {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub files: FileConfig,
    pub check: CheckConfig,
    pub cache: CacheConfig,
}

/// File processing configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FileConfig {
    /// File extensions to process
    pub extensions: Vec<String>,
    /// Include patterns (glob syntax)
    pub include_patterns: Vec<String>,
    /// Exclude patterns (glob syntax)
    pub exclude_patterns: Vec<String>,
}

/// Batch check configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CheckConfig {
    /// Number of files checked concurrently
    pub threads: Option<usize>,
}

/// Result cache configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum number of cached comparison outcomes
    pub max_entries: u64,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["xml".to_string()],
            include_patterns: vec![],
            exclude_patterns: vec![],
        }
    }
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self { threads: None }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { max_entries: 64 }
    }
}

impl Config {
    pub fn thread_count(&self) -> usize {
        self.check.threads.unwrap_or_else(num_cpus::get)
    }
}

/// Configuration manager for loading and merging configurations
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration with precedence: defaults -> file -> environment -> CLI.
    pub async fn load_config(cli: &Cli) -> Result<Config> {
        let mut config = Config::default();

        if let Some(config_path) = &cli.config {
            let file_config = Self::load_from_file(config_path).await?;
            config = file_config;
        }

        config = Self::apply_environment_overrides(config, &SystemEnvProvider);
        config = Self::merge_with_cli(config, cli);
        Self::validate_config(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub async fn load_from_file(path: &Path) -> Result<Config> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            ComparisonError::Config(format!(
                "cannot read configuration file {}: {}",
                path.display(),
                e
            ))
        })?;

        toml::from_str(&content).map_err(|e| {
            ComparisonError::Config(format!(
                "invalid configuration file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Apply `XML_COMPARE_*` environment variable overrides.
    pub fn apply_environment_overrides(mut config: Config, env: &dyn EnvProvider) -> Config {
        if let Some(extensions) = env.get("XML_COMPARE_EXTENSIONS") {
            let parsed = cli::parse_extensions(&extensions);
            if !parsed.is_empty() {
                config.files.extensions = parsed;
            }
        }
        if let Some(threads) = env.get("XML_COMPARE_THREADS")
            && let Ok(threads) = threads.parse::<usize>()
        {
            config.check.threads = Some(threads);
        }
        if let Some(entries) = env.get("XML_COMPARE_CACHE_ENTRIES")
            && let Ok(entries) = entries.parse::<u64>()
        {
            config.cache.max_entries = entries;
        }
        config
    }

    /// Apply CLI argument overrides (highest precedence).
    pub fn merge_with_cli(mut config: Config, cli: &Cli) -> Config {
        if let Command::Check {
            extensions,
            include_patterns,
            exclude_patterns,
            threads,
            ..
        } = &cli.command
        {
            if let Some(extensions) = extensions {
                let parsed = cli::parse_extensions(extensions);
                if !parsed.is_empty() {
                    config.files.extensions = parsed;
                }
            }
            if !include_patterns.is_empty() {
                config.files.include_patterns = include_patterns.clone();
            }
            if !exclude_patterns.is_empty() {
                config.files.exclude_patterns = exclude_patterns.clone();
            }
            if threads.is_some() {
                config.check.threads = *threads;
            }
        }
        config
    }

    /// Validate the merged configuration.
    pub fn validate_config(config: &Config) -> Result<()> {
        if config.files.extensions.is_empty() {
            return Err(ComparisonError::Config(
                "at least one file extension must be configured".to_string(),
            ));
        }
        if let Some(threads) = config.check.threads
            && threads == 0
        {
            return Err(ComparisonError::Config(
                "number of threads must be greater than 0".to_string(),
            ));
        }
        if config.cache.max_entries == 0 {
            return Err(ComparisonError::Config(
                "cache.max_entries must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct FakeEnv(HashMap<String, String>);

    impl EnvProvider for FakeEnv {
        fn get(&self, key: &str) -> Option<String> {
            self.0.get(key).cloned()
        }
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.files.extensions, vec!["xml".to_string()]);
        assert_eq!(config.cache.max_entries, 64);
        assert!(config.check.threads.is_none());
        assert!(config.thread_count() > 0);
    }

    #[test]
    fn test_toml_round_trip() {
        let toml_text = r#"
            [files]
            extensions = ["xml", "cmdi"]
            exclude_patterns = ["**/archive/**"]

            [check]
            threads = 2

            [cache]
            max_entries = 8
        "#;
        let config: Config = toml::from_str(toml_text).unwrap();
        assert_eq!(config.files.extensions, vec!["xml", "cmdi"]);
        assert_eq!(config.check.threads, Some(2));
        assert_eq!(config.cache.max_entries, 8);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("[check]\nthreads = 3\n").unwrap();
        assert_eq!(config.check.threads, Some(3));
        assert_eq!(config.files.extensions, vec!["xml".to_string()]);
    }

    #[test]
    fn test_environment_overrides() {
        let env = FakeEnv(HashMap::from([
            ("XML_COMPARE_EXTENSIONS".to_string(), "xml,cmdi".to_string()),
            ("XML_COMPARE_THREADS".to_string(), "4".to_string()),
        ]));
        let config = ConfigManager::apply_environment_overrides(Config::default(), &env);
        assert_eq!(config.files.extensions, vec!["xml", "cmdi"]);
        assert_eq!(config.check.threads, Some(4));
    }

    #[test]
    fn test_invalid_environment_value_ignored() {
        let env = FakeEnv(HashMap::from([(
            "XML_COMPARE_THREADS".to_string(),
            "not-a-number".to_string(),
        )]));
        let config = ConfigManager::apply_environment_overrides(Config::default(), &env);
        assert!(config.check.threads.is_none());
    }

    #[test]
    fn test_validation_rejects_zero_threads() {
        let mut config = Config::default();
        config.check.threads = Some(0);
        assert!(ConfigManager::validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_rejects_empty_extensions() {
        let mut config = Config::default();
        config.files.extensions.clear();
        assert!(ConfigManager::validate_config(&config).is_err());
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(&path, "[cache]\nmax_entries = 5\n")
            .await
            .unwrap();

        let config = ConfigManager::load_from_file(&path).await.unwrap();
        assert_eq!(config.cache.max_entries, 5);
    }

    #[tokio::test]
    async fn test_missing_config_file_is_error() {
        let err = ConfigManager::load_from_file(Path::new("/nonexistent/config.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, ComparisonError::Config(_)));
    }
}
