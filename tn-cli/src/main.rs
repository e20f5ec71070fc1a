//! Tinode local store CLI.
//!
//! Inspects and maintains the on-device cache database from the terminal:
//! shows where it lives, reports table statistics, wipes it, and switches
//! the signed-in account. Useful for debugging a device's local state.

mod commands;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use tn_core::config::AppConfig;
use tn_core::error::TnResult;
use tn_core::logging;

/// Tinode local cache database tool.
#[derive(Parser)]
#[command(
    name = "tinode-db",
    version,
    about = "Inspect and manage the Tinode local cache database"
)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json).
    #[arg(short = 'f', long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output for scripting.
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Database management commands.
    Db {
        #[command(subcommand)]
        action: commands::db::DbAction,
    },
    /// Show and switch the signed-in account.
    Account {
        #[command(subcommand)]
        action: commands::account::AccountAction,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> TnResult<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = match cli.config.as_deref() {
        Some(path) => AppConfig::load_from_file(std::path::Path::new(path))?,
        None => AppConfig::load_default()?,
    };

    // Initialize logging; fall back to stderr when the log directory is unusable
    let level_override = cli.verbose.then_some("debug");
    let _guard = match logging::init_logging(&config, level_override) {
        Ok(guard) => Some(guard),
        Err(e) => {
            logging::init_console_logging(level_override.unwrap_or(config.logging.level.as_str()));
            warn!("file logging unavailable: {e}");
            None
        }
    };

    info!("tinode-db v{}", tn_core::constants::APP_VERSION);

    // Dispatch to command handlers
    match cli.command {
        Commands::Db { action } => commands::db::run(&config, action, cli.format),
        Commands::Account { action } => commands::account::run(&config, action, cli.format),
    }
}
