use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use item_manager::{Session, SessionEnd, SqliteConfig, SqliteItemService};
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Manage items stored in a local SQLite database from the terminal
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the database file (created if missing)
    #[arg(
        long,
        value_name = "FILE",
        env = "ITEM_MANAGER_DB",
        default_value = "./database/database.db"
    )]
    db_path: PathBuf,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    ensure_parent_dir(&args.db_path)?;
    let config = SqliteConfig::new(args.db_path.to_string_lossy());
    let service = Arc::new(SqliteItemService::new(config));
    service
        .connect()
        .await
        .with_context(|| format!("opening {}", args.db_path.display()))?;

    let stdin = BufReader::new(tokio::io::stdin());
    let mut session = Session::new(Arc::clone(&service), stdin, std::io::stdout());

    tokio::select! {
        end = session.run() => {
            let end = end.context("terminal I/O failed")?;
            if end == SessionEnd::EndOfInput {
                info!("input closed");
            }
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("listening for interrupt")?;
            println!("\nShutting down...");
        }
    }

    if let Err(err) = service.close().await {
        warn!(error = %err, "closing database failed");
    }
    // A blocking stdin read may still be parked on the runtime's blocking
    // pool; exiting directly avoids waiting on it at runtime shutdown.
    std::process::exit(0)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .init();
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir)
            .with_context(|| format!("creating database directory {}", dir.display())),
        _ => Ok(()),
    }
}
