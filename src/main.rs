//! astrograph CLI entry point (§6, §9): subcommands `analyze`, `serve`,
//! `suppress`, `suppressions`, `clear`, parsed before any engine work
//! starts so `tracing-subscriber` is initialized first.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "astrograph")]
#[command(about = "Structural code-duplication detection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Project root to analyze (defaults to current directory)
    #[arg(short, long, default_value = ".")]
    root: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk the project, cluster duplicates, and write a report
    Analyze,
    /// Start the HTTP server (and, if configured, the file watcher)
    Serve {
        #[arg(short, long, default_value = "7890")]
        port: u16,

        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
    /// Suppress a duplicate cluster by its key
    Suppress {
        cluster_key: String,
        #[arg(short, long)]
        reason: String,
    },
    /// List currently active suppressions
    Suppressions,
    /// Remove the on-disk index and suppression log
    Clear,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!("astrograph={log_level}")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("astrograph v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("project root: {}", cli.root.display());

    match cli.command {
        Commands::Analyze => commands::analyze(cli.root).await,
        Commands::Serve { port, host } => commands::serve(cli.root, host, port).await,
        Commands::Suppress { cluster_key, reason } => commands::suppress(cli.root, cluster_key, reason),
        Commands::Suppressions => commands::suppressions(cli.root),
        Commands::Clear => commands::clear(cli.root),
    }
}
