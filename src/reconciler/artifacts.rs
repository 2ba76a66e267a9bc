use crate::error::ComponentError;
use crate::models::dialect::ARTIFACT_EXTENSIONS;
use crate::models::{detect_dialect_for_path, Dialect, UsageMap, UsageRecord};
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

/// Where a component's artifact belongs, derived from its usage site
#[derive(Debug, Clone)]
pub struct ExpectedArtifact {
    pub dialect: Dialect,
    pub path: PathBuf,
    /// Usage-site text, reused as generation context
    pub context: String,
}

impl ExpectedArtifact {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Read the usage site and work out the artifact path for `record`
pub async fn expected_artifact(
    record: &UsageRecord,
    output_dir: &Path,
) -> Result<ExpectedArtifact, ComponentError> {
    let context = tokio::fs::read_to_string(&record.source_file)
        .await
        .map_err(|source| ComponentError::ReadSource {
            path: record.source_file.clone(),
            source,
        })?;

    let dialect = detect_dialect_for_path(&record.source_file, &context);
    tracing::debug!(
        "{} resolves to {} from {}",
        record.component_name,
        dialect,
        record.source_file.display()
    );
    let path = output_dir.join(format!(
        "{}.{}",
        record.component_name,
        dialect.output_extension()
    ));

    Ok(ExpectedArtifact {
        dialect,
        path,
        context,
    })
}

pub async fn artifact_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// Artifact files in `output_dir` that the usage map does not expect
///
/// A file is kept only when it is exactly `<Name>.<ext>` for a record's
/// current dialect, so an artifact left behind by a dialect change is an
/// orphan too. Records whose usage site cannot be read keep any artifact
/// with their name. Only files with an artifact extension are considered,
/// and `index_file` is never reported. A missing output directory has no
/// orphans.
pub async fn find_orphans(
    output_dir: &Path,
    usages: &UsageMap,
    index_file: &str,
) -> io::Result<Vec<(String, PathBuf)>> {
    let mut orphans = Vec::new();

    let mut expected = HashSet::new();
    let mut unresolved = HashSet::new();
    for record in usages {
        match expected_artifact(record, output_dir).await {
            Ok(artifact) => {
                expected.insert(artifact.file_name());
            }
            Err(err) => {
                tracing::debug!("Keeping any {} artifact: {}", record.component_name, err);
                unresolved.insert(record.component_name.as_str());
            }
        }
    }

    let mut entries = match tokio::fs::read_dir(output_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(orphans),
        Err(e) => return Err(e),
    };

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !entry.file_type().await?.is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy() == index_file {
            continue;
        }

        let is_artifact = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| ARTIFACT_EXTENSIONS.contains(&e))
            .unwrap_or(false);
        if !is_artifact {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().to_string();
        if expected.contains(&file_name) {
            continue;
        }

        if let Some(name) = path.file_stem().and_then(|s| s.to_str()) {
            if !unresolved.contains(name) {
                orphans.push((name.to_string(), path.clone()));
            }
        }
    }

    orphans.sort_by(|a, b| a.1.cmp(&b.1));
    Ok(orphans)
}
