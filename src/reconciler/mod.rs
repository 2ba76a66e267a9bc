//! Reconciler
//!
//! Makes the output directory match the current usage map in three ordered
//! phases: prune orphaned artifacts, generate the missing ones, then rebuild
//! the index from the artifacts actually on disk.

pub mod artifacts;
pub mod index;
pub mod plan;

pub use index::{render_index, IndexEntry};
pub use plan::{plan, PlannedArtifact, ReconcilePlan};

use crate::error::ComponentError;
use crate::generator::{ComponentGenerator, GenerationRequest};
use crate::models::{AiscriptConfig, UsageMap, UsageRecord};
use crate::Result;
use anyhow::Context;
use artifacts::{artifact_exists, expected_artifact, find_orphans};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Outcome of one reconciliation pass
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub deleted: Vec<String>,
    pub generated: Vec<String>,
    pub skipped: Vec<String>,
    pub failed: Vec<(String, ComponentError)>,
    /// Components listed in the rebuilt index, in index order
    pub indexed: Vec<String>,
    /// Index file path, when one was written
    pub index_path: Option<PathBuf>,
}

impl ReconcileReport {
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Result of handling a single component in the generation phase
#[derive(Debug)]
enum ComponentOutcome {
    Skipped,
    Generated,
    Failed(ComponentError),
}

pub struct Reconciler {
    generator: Arc<dyn ComponentGenerator>,
    output_dir: PathBuf,
    namespace: String,
    index_file: String,
    concurrency: usize,
    show_progress: bool,
}

impl Reconciler {
    pub fn new(
        generator: Arc<dyn ComponentGenerator>,
        output_dir: impl Into<PathBuf>,
        config: &AiscriptConfig,
    ) -> Self {
        Self {
            generator,
            output_dir: output_dir.into(),
            namespace: config.namespace.clone(),
            index_file: config.index_file.clone(),
            concurrency: config.concurrency.max(1),
            show_progress: false,
        }
    }

    /// Show a spinner while a request is in flight (sequential mode only)
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn index_path(&self) -> PathBuf {
        self.output_dir.join(&self.index_file)
    }

    /// Run prune → generate → index over `usages`
    ///
    /// An empty usage map leaves the output directory untouched. Per-component
    /// failures land in the report; only directory-level I/O errors abort.
    pub async fn reconcile(&self, usages: &UsageMap) -> Result<ReconcileReport> {
        let mut report = ReconcileReport::default();

        if usages.is_empty() {
            return Ok(report);
        }

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| format!("Failed to create {}", self.output_dir.display()))?;

        self.prune_orphans(usages, &mut report).await?;
        self.generate_missing(usages, &mut report).await?;

        let entries = self.collect_index_entries(usages).await;
        let index_path = self.index_path();
        index::write_index(&index_path, &render_index(&self.namespace, &entries)).await?;

        report.indexed = entries.into_iter().map(|e| e.component_name).collect();
        report.index_path = Some(index_path);

        Ok(report)
    }

    /// Phase 1: delete artifacts the usage map no longer expects
    async fn prune_orphans(&self, usages: &UsageMap, report: &mut ReconcileReport) -> Result<()> {
        let orphans = find_orphans(&self.output_dir, usages, &self.index_file)
            .await
            .with_context(|| format!("Failed to list {}", self.output_dir.display()))?;

        let (deleted, failed) = remove_orphans(orphans).await;
        report.deleted = deleted;
        report.failed.extend(failed);

        Ok(())
    }

    /// Phase 2: generate every component whose artifact is absent
    async fn generate_missing(&self, usages: &UsageMap, report: &mut ReconcileReport) -> Result<()> {
        let outcomes = if self.concurrency <= 1 {
            let mut outcomes = Vec::with_capacity(usages.len());
            for record in usages {
                let outcome = process_component(
                    self.generator.as_ref(),
                    record,
                    &self.output_dir,
                    self.show_progress,
                )
                .await;
                outcomes.push((record.component_name.clone(), outcome));
            }
            outcomes
        } else {
            self.generate_pooled(usages).await?
        };

        for (name, outcome) in outcomes {
            match outcome {
                ComponentOutcome::Skipped => report.skipped.push(name),
                ComponentOutcome::Generated => report.generated.push(name),
                ComponentOutcome::Failed(err) => report.failed.push((name, err)),
            }
        }

        Ok(())
    }

    /// Bounded worker pool; outcomes come back in usage-map order
    async fn generate_pooled(
        &self,
        usages: &UsageMap,
    ) -> Result<Vec<(String, ComponentOutcome)>> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for (position, record) in usages.iter().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let generator = Arc::clone(&self.generator);
            let output_dir = self.output_dir.clone();
            let record = record.clone();

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let outcome =
                    process_component(generator.as_ref(), &record, &output_dir, false).await;
                (position, record.component_name, outcome)
            });
        }

        let mut outcomes = Vec::with_capacity(usages.len());
        while let Some(joined) = tasks.join_next().await {
            let (position, name, outcome) = joined.context("Generation task panicked")?;
            outcomes.push((position, name, outcome));
        }

        outcomes.sort_by_key(|(position, _, _)| *position);
        Ok(outcomes
            .into_iter()
            .map(|(_, name, outcome)| (name, outcome))
            .collect())
    }

    /// Phase 3 input: usage-map components whose artifact is on disk
    async fn collect_index_entries(&self, usages: &UsageMap) -> Vec<IndexEntry> {
        let mut entries = Vec::with_capacity(usages.len());

        for record in usages {
            let expected = match expected_artifact(record, &self.output_dir).await {
                Ok(expected) => expected,
                Err(err) => {
                    tracing::debug!("Leaving {} out of the index: {}", record.component_name, err);
                    continue;
                }
            };

            if artifact_exists(&expected.path).await {
                entries.push(IndexEntry {
                    component_name: record.component_name.clone(),
                    file_name: expected.file_name(),
                });
            } else {
                tracing::debug!(
                    "Leaving {} out of the index: {} is missing",
                    record.component_name,
                    expected.path.display()
                );
            }
        }

        entries
    }
}

/// Delete each orphan; a file that cannot be removed is reported, not fatal
async fn remove_orphans(
    orphans: Vec<(String, PathBuf)>,
) -> (Vec<String>, Vec<(String, ComponentError)>) {
    let mut deleted = Vec::with_capacity(orphans.len());
    let mut failed = Vec::new();

    for (name, path) in orphans {
        println!("{}", format!("🗑️  Deleting unused component: {}", name).yellow());
        match tokio::fs::remove_file(&path).await {
            Ok(()) => deleted.push(name),
            Err(source) => {
                let err = ComponentError::DeleteArtifact { path, source };
                eprintln!("{}", format!("❌ Error deleting {}: {}", name, err).red());
                failed.push((name, err));
            }
        }
    }

    (deleted, failed)
}

/// Skip, or generate and write, one component
async fn process_component(
    generator: &dyn ComponentGenerator,
    record: &UsageRecord,
    output_dir: &Path,
    show_progress: bool,
) -> ComponentOutcome {
    let name = &record.component_name;

    match generate_component(generator, record, output_dir, show_progress).await {
        Ok(true) => {
            println!("{}", format!("✅ Created {}", name).green());
            ComponentOutcome::Generated
        }
        Ok(false) => {
            println!("{}", format!("✓ {} already exists", name).bright_black());
            ComponentOutcome::Skipped
        }
        Err(err) => {
            eprintln!("{}", format!("❌ Error generating {}: {}", name, err).red());
            ComponentOutcome::Failed(err)
        }
    }
}

/// Returns `Ok(false)` when the artifact already exists
async fn generate_component(
    generator: &dyn ComponentGenerator,
    record: &UsageRecord,
    output_dir: &Path,
    show_progress: bool,
) -> std::result::Result<bool, ComponentError> {
    let expected = expected_artifact(record, output_dir).await?;

    if artifact_exists(&expected.path).await {
        return Ok(false);
    }

    println!(
        "{}",
        format!("🤖 Generating {} ({})...", record.component_name, expected.dialect).cyan()
    );

    let request = GenerationRequest {
        component_name: record.component_name.clone(),
        context: expected.context,
        dialect: expected.dialect,
    };

    let spinner = show_progress.then(|| spinner(generator.name()));
    let generated = generator.generate(&request).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let code = generated?;
    tokio::fs::write(&expected.path, code)
        .await
        .map_err(|source| ComponentError::WriteArtifact {
            path: expected.path.clone(),
            source,
        })?;

    Ok(true)
}

fn spinner(service: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(style.tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "));
    }
    pb.set_message(format!("Waiting for {}...", service));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}
