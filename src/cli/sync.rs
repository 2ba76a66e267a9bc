//! Sync command: scan, prune, generate, rebuild the index

use super::{display_path, project_root};
use crate::generator::{AnthropicGenerator, ComponentGenerator};
use crate::models::{AiscriptConfig, Credentials, UsageMap};
use crate::reconciler::{plan, ReconcilePlan, ReconcileReport, Reconciler};
use crate::scanner::Scanner;
use crate::Result;
use anyhow::Context;
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug, Default, Clone)]
pub struct SyncArgs {
    /// Project root to scan (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Directory for generated components, relative to the root
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Model used by the generation service
    #[arg(short, long)]
    pub model: Option<String>,

    /// Maximum concurrent generation requests
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Show what would change without generating or deleting anything
    #[arg(long)]
    pub dry_run: bool,
}

/// Load aiscript.toml and apply command-line overrides
pub fn load_config(root: &Path, args: &SyncArgs) -> Result<AiscriptConfig> {
    let mut config = AiscriptConfig::load(root)?;

    if let Some(ref dir) = args.output_dir {
        config.output_dir = Some(dir.clone());
    }
    if let Some(ref model) = args.model {
        config.model = model.clone();
    }
    if let Some(concurrency) = args.concurrency {
        config.concurrency = concurrency;
    }

    config.validate()?;
    Ok(config)
}

pub async fn run(args: SyncArgs) -> Result<()> {
    let root = project_root(args.root.as_deref())?;
    let config = load_config(&root, &args)?;

    if args.dry_run {
        return run_dry(&root, &config).await;
    }

    let credentials = Credentials::from_env(&config)?;
    let generator = AnthropicGenerator::new(&config, credentials)?;

    run_with_generator(&root, &config, Arc::new(generator)).await?;
    Ok(())
}

/// Full pipeline with an injected generation service
pub async fn run_with_generator(
    root: &Path,
    config: &AiscriptConfig,
    generator: Arc<dyn ComponentGenerator>,
) -> Result<ReconcileReport> {
    let output_dir = config.resolve_output_dir(root);

    let Some(usages) = scan(root, config, &output_dir).await? else {
        return Ok(ReconcileReport::default());
    };

    let reconciler = Reconciler::new(generator, output_dir, config)
        .with_progress(config.concurrency == 1);
    let report = reconciler
        .reconcile(&usages)
        .await
        .context("Reconciliation failed")?;

    print_report(&report, root);
    println!("{}", "Done! 🎉".green().bold());

    Ok(report)
}

async fn run_dry(root: &Path, config: &AiscriptConfig) -> Result<()> {
    let output_dir = config.resolve_output_dir(root);

    let Some(usages) = scan(root, config, &output_dir).await? else {
        return Ok(());
    };

    let plan = plan(&usages, &output_dir, &config.index_file).await?;
    print_plan(&plan, root);

    Ok(())
}

/// Scan and print what was found; `None` when there is nothing to do
async fn scan(
    root: &Path,
    config: &AiscriptConfig,
    output_dir: &Path,
) -> Result<Option<UsageMap>> {
    println!(
        "{}",
        format!("🔍 Scanning for {} component usages...", config.namespace).cyan()
    );

    let usages = Scanner::new(root, config)?
        .exclude_dir(output_dir)
        .scan_async()
        .await?;

    if usages.is_empty() {
        println!("No {} component usages found.", config.namespace);
        return Ok(None);
    }

    println!("Found {} component(s) to process...", usages.len());
    for record in &usages {
        println!(
            "{}",
            format!(
                "  • {} ({})",
                record.component_name,
                display_path(&record.source_file, root)
            )
            .bright_black()
        );
    }
    println!();

    Ok(Some(usages))
}

fn print_report(report: &ReconcileReport, root: &Path) {
    println!();
    println!("{}", "Summary".cyan().bold());
    println!("{}", "-------".bright_black());
    println!("  Generated: {}", report.generated.len().to_string().green());
    println!("  Existing:  {}", report.skipped.len().to_string().bright_black());
    println!("  Deleted:   {}", report.deleted.len().to_string().yellow());

    if report.has_failures() {
        println!("  Failed:    {}", report.failed.len().to_string().red());
        for (name, err) in &report.failed {
            println!("    {} {}", format!("{}:", name).red(), err);
        }
    }

    if let Some(ref index_path) = report.index_path {
        println!(
            "  Index:     {} ({} components)",
            display_path(index_path, root),
            report.indexed.len()
        );
    }
    println!();
}

fn print_plan(plan: &ReconcilePlan, root: &Path) {
    println!("{}", "Dry run: no files will be changed".yellow().bold());
    println!();

    for path in &plan.orphans {
        println!(
            "{}",
            format!("🗑️  Would delete {}", display_path(path, root)).yellow()
        );
    }
    for planned in &plan.to_generate {
        println!(
            "{}",
            format!(
                "🤖 Would generate {} → {} ({})",
                planned.component_name,
                display_path(&planned.artifact_path, root),
                planned.dialect
            )
            .cyan()
        );
    }
    for planned in &plan.existing {
        println!(
            "{}",
            format!("✓ {} already exists", planned.component_name).bright_black()
        );
    }
    for path in &plan.unreadable {
        println!(
            "{}",
            format!("❌ Cannot read {}", display_path(path, root)).red()
        );
    }

    if plan.is_noop() {
        println!();
        println!("{}", "Output directory is up to date.".green());
    }
}
