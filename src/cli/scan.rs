//! Scan command: print the usage map without touching the output directory

use super::{display_path, project_root};
use crate::models::AiscriptConfig;
use crate::scanner::Scanner;
use crate::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

#[derive(Args, Debug, Default, Clone)]
pub struct ScanArgs {
    /// Project root to scan (default: current directory)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long)]
    pub json: bool,
}

pub async fn run(args: ScanArgs) -> Result<()> {
    let root = project_root(args.root.as_deref())?;
    let config = AiscriptConfig::load(&root)?;
    let output_dir = config.resolve_output_dir(&root);

    let usages = Scanner::new(&root, &config)?
        .exclude_dir(&output_dir)
        .scan_async()
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(usages.records())?);
        return Ok(());
    }

    if usages.is_empty() {
        println!("No {} component usages found.", config.namespace);
        return Ok(());
    }

    println!(
        "{}",
        format!("Found {} component(s):", usages.len()).cyan().bold()
    );
    for record in &usages {
        println!(
            "  {}.{} {}",
            config.namespace,
            record.component_name.green(),
            format!("({})", display_path(&record.source_file, &root)).bright_black()
        );
    }

    Ok(())
}
