use super::artifacts::{artifact_exists, expected_artifact, find_orphans};
use crate::models::{Dialect, UsageMap};
use crate::Result;
use std::path::{Path, PathBuf};

/// A component and where its artifact goes
#[derive(Debug, Clone)]
pub struct PlannedArtifact {
    pub component_name: String,
    pub source_file: PathBuf,
    pub dialect: Dialect,
    pub artifact_path: PathBuf,
}

/// What a reconciliation pass would do, computed without side effects
#[derive(Debug, Default)]
pub struct ReconcilePlan {
    /// Artifacts that would be deleted
    pub orphans: Vec<PathBuf>,
    pub to_generate: Vec<PlannedArtifact>,
    pub existing: Vec<PlannedArtifact>,
    /// Usage sites that could not be read (generation would fail)
    pub unreadable: Vec<PathBuf>,
}

impl ReconcilePlan {
    pub fn is_noop(&self) -> bool {
        self.orphans.is_empty() && self.to_generate.is_empty()
    }
}

/// Dry-run a reconciliation pass against `output_dir`
pub async fn plan(usages: &UsageMap, output_dir: &Path, index_file: &str) -> Result<ReconcilePlan> {
    let mut plan = ReconcilePlan::default();

    if usages.is_empty() {
        return Ok(plan);
    }

    plan.orphans = find_orphans(output_dir, usages, index_file)
        .await?
        .into_iter()
        .map(|(_, path)| path)
        .collect();

    for record in usages {
        let expected = match expected_artifact(record, output_dir).await {
            Ok(expected) => expected,
            Err(_) => {
                plan.unreadable.push(record.source_file.clone());
                continue;
            }
        };

        let exists = artifact_exists(&expected.path).await;
        let planned = PlannedArtifact {
            component_name: record.component_name.clone(),
            source_file: record.source_file.clone(),
            dialect: expected.dialect,
            artifact_path: expected.path,
        };

        if exists {
            plan.existing.push(planned);
        } else {
            plan.to_generate.push(planned);
        }
    }

    Ok(plan)
}
