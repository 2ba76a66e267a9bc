use aiscript::cli::scan::ScanArgs;
use aiscript::cli::sync::SyncArgs;
use aiscript::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::io;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aiscript")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate UI components from their usages in your source tree", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbose diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan, prune unused components, generate missing ones and rebuild the index (default)
    Sync(SyncArgs),

    /// List component usages without changing anything
    Scan(ScanArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create tokio runtime");

    if let Err(e) = runtime.block_on(run_async(cli)) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

async fn run_async(cli: Cli) -> Result<()> {
    match cli.command.unwrap_or_else(|| Commands::Sync(SyncArgs::default())) {
        Commands::Sync(args) => aiscript::cli::sync::run(args).await?,
        Commands::Scan(args) => aiscript::cli::scan::run(args).await?,
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "aiscript", &mut io::stdout());
        }
    }

    Ok(())
}

// Progress goes to stdout; diagnostics go to stderr
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "aiscript=debug" } else { "aiscript=info" };

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = default_level.parse() {
        filter = filter.add_directive(directive);
    }

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
