pub mod scan;
pub mod sync;

use crate::Result;
use anyhow::Context;
use std::env;
use std::path::{Path, PathBuf};

/// Canonical project root: the explicit `--root`, or the current directory
pub(crate) fn project_root(root: Option<&Path>) -> Result<PathBuf> {
    let root = match root {
        Some(path) => path.to_path_buf(),
        None => env::current_dir()?,
    };

    if !root.is_dir() {
        anyhow::bail!("Project root is not a directory: {}", root.display());
    }

    root.canonicalize()
        .with_context(|| format!("Failed to resolve {}", root.display()))
}

/// Path shown in progress output, relative to the root when possible
pub(crate) fn display_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}
