//! Reference scanner
//!
//! Walks the project tree and builds the usage map: every namespaced
//! component reference, attributed to the first file that mentions it.

mod pattern;

pub use pattern::ReferencePattern;

use crate::error::ConfigError;
use crate::models::{AiscriptConfig, UsageMap};
use crate::Result;
use anyhow::Context;
use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Scans a project root for component references
pub struct Scanner {
    root: PathBuf,
    include: Vec<Pattern>,
    exclude: Vec<Pattern>,
    skip_dirs: Vec<PathBuf>,
    pattern: ReferencePattern,
}

impl Scanner {
    /// Build a scanner from the include/exclude globs and namespace in `config`
    ///
    /// The root is canonicalized so that directory exclusion compares like
    /// with like, whatever form the caller passed.
    pub fn new(root: &Path, config: &AiscriptConfig) -> Result<Self> {
        Ok(Self {
            root: canonical(root),
            include: compile_patterns(&config.include)?,
            exclude: compile_patterns(&config.exclude)?,
            skip_dirs: Vec::new(),
            pattern: ReferencePattern::new(&config.namespace)?,
        })
    }

    /// Never descend into `dir` (used for the generated output directory)
    pub fn exclude_dir(mut self, dir: &Path) -> Self {
        let dir = if dir.is_relative() {
            self.root.join(dir)
        } else {
            dir.to_path_buf()
        };
        self.skip_dirs.push(canonical(&dir));
        self
    }

    pub fn namespace(&self) -> &str {
        self.pattern.namespace()
    }

    /// Files to scan, in traversal order (entries sorted by name per directory)
    pub fn collect_files(&self) -> Vec<PathBuf> {
        WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !self.is_excluded(e))
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::debug!("Skipping unreadable entry: {}", err);
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .filter(|e| self.is_included(e.path()))
            .map(|e| e.into_path())
            .collect()
    }

    /// Build the usage map for the whole tree
    pub fn scan(&self) -> UsageMap {
        let mut usages = UsageMap::new();

        for path in self.collect_files() {
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(err) => {
                    tracing::debug!("Skipping {}: {}", path.display(), err);
                    continue;
                }
            };

            for name in self.pattern.component_names(&content) {
                if usages.record(name, &path) {
                    tracing::debug!("Found {} in {}", name, path.display());
                }
            }
        }

        usages
    }

    /// `scan` on the blocking pool, for callers running on the async runtime
    pub async fn scan_async(self) -> Result<UsageMap> {
        tokio::task::spawn_blocking(move || self.scan())
            .await
            .context("Scan task panicked")
    }

    fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }

    fn is_excluded(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 {
            return false;
        }

        let path = entry.path();
        if entry.file_type().is_dir() && self.skip_dirs.iter().any(|d| d == path) {
            return true;
        }

        let rel = self.relative(path);
        self.exclude.iter().any(|p| p.matches_path(rel))
    }

    fn is_included(&self, path: &Path) -> bool {
        let rel = self.relative(path);
        self.include.iter().any(|p| p.matches_path(rel))
    }
}

/// Canonical form of `path`; a path that does not exist yet is resolved
/// through its parent so it still matches once created
fn canonical(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }

    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) if !parent.as_os_str().is_empty() => {
            canonical(parent).join(name)
        }
        _ => path.to_path_buf(),
    }
}

fn compile_patterns(patterns: &[String]) -> std::result::Result<Vec<Pattern>, ConfigError> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|source| ConfigError::Pattern {
                pattern: p.clone(),
                source,
            })
        })
        .collect()
}
