//! Async discovery of XML feed files for batch checking.

use std::path::{Path, PathBuf};

use globset::{GlobSet, GlobSetBuilder};
use tokio::fs;

use crate::error::{ComparisonError, Result};

/// Recursive file discovery filtered by extension and glob patterns.
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    /// File extensions to include (e.g. ["xml"])
    extensions: Vec<String>,
    include_set: Option<GlobSet>,
    exclude_set: Option<GlobSet>,
    /// Maximum depth for directory traversal (None = unlimited)
    max_depth: Option<usize>,
    follow_symlinks: bool,
}

impl Default for FileDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

impl FileDiscovery {
    pub fn new() -> Self {
        Self {
            extensions: vec!["xml".to_string()],
            include_set: None,
            exclude_set: None,
            max_depth: None,
            follow_symlinks: false,
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_include_patterns(mut self, patterns: Vec<String>) -> Result<Self> {
        self.include_set = Self::build_glob_set(patterns, "include")?;
        Ok(self)
    }

    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Result<Self> {
        self.exclude_set = Self::build_glob_set(patterns, "exclude")?;
        Ok(self)
    }

    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    fn build_glob_set(patterns: Vec<String>, kind: &str) -> Result<Option<GlobSet>> {
        if patterns.is_empty() {
            return Ok(None);
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = globset::GlobBuilder::new(&pattern)
                .literal_separator(true)
                .build()
                .map_err(|e| {
                    ComparisonError::Config(format!("Invalid glob pattern '{}': {}", pattern, e))
                })?;
            builder.add(glob);
        }

        Ok(Some(builder.build().map_err(|e| {
            ComparisonError::Config(format!("Failed to build {} glob set: {}", kind, e))
        })?))
    }

    /// Discover files in the given path (file or directory). Results are
    /// sorted for deterministic batch ordering.
    pub async fn discover_files(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let metadata = fs::metadata(path).await.map_err(ComparisonError::from)?;

        if metadata.is_file() {
            if self.should_process(path) {
                return Ok(vec![path.to_path_buf()]);
            }
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        let mut read_dir = fs::read_dir(path).await.map_err(ComparisonError::from)?;

        while let Some(entry) = read_dir.next_entry().await.map_err(ComparisonError::from)? {
            let entry_path = entry.path();

            if entry_path.is_symlink() && !self.follow_symlinks {
                continue;
            }

            if let Err(e) = self
                .discover_files_recursive(&entry_path, 0, &mut files)
                .await
            {
                eprintln!("Warning: Error processing {}: {}", entry_path.display(), e);
            }
        }

        files.sort();
        Ok(files)
    }

    fn discover_files_recursive<'a>(
        &'a self,
        path: &'a Path,
        depth: usize,
        files: &'a mut Vec<PathBuf>,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<()>> + 'a>> {
        Box::pin(async move {
            if let Some(max_depth) = self.max_depth
                && depth > max_depth
            {
                return Ok(());
            }

            let metadata = fs::metadata(path).await.map_err(|e| {
                ComparisonError::FileSystemTraversal {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                }
            })?;

            if metadata.is_file() {
                if self.should_process(path) {
                    files.push(path.to_path_buf());
                }
                return Ok(());
            }

            let mut read_dir = fs::read_dir(path).await.map_err(ComparisonError::from)?;
            while let Some(entry) = read_dir.next_entry().await.map_err(ComparisonError::from)? {
                let entry_path = entry.path();

                if entry_path.is_symlink() && !self.follow_symlinks {
                    continue;
                }

                self.discover_files_recursive(&entry_path, depth + 1, files)
                    .await?;
            }

            Ok(())
        })
    }

    /// Extension filter first, then include/exclude globs.
    fn should_process(&self, path: &Path) -> bool {
        let extension_matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| e == ext))
            .unwrap_or(false);
        if !extension_matches {
            return false;
        }

        if let Some(ref exclude) = self.exclude_set
            && exclude.is_match(path)
        {
            return false;
        }

        if let Some(ref include) = self.include_set {
            return include.is_match(path);
        }

        true
    }
}
