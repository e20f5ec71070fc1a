//! Database management commands.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use comfy_table::{Table, presets::UTF8_FULL, modifiers::UTF8_ROUND_CORNERS, ContentArrangement};
use console::style;
use dialoguer::Confirm;

use tn_core::config::AppConfig;
use tn_core::constants::SCHEMA_VERSION;
use tn_core::error::{TnError, TnResult};
use crate::OutputFormat;

#[derive(Subcommand)]
pub enum DbAction {
    /// Show the database file path.
    Path,
    /// Show database statistics.
    Stats,
    /// Run an integrity check.
    Check,
    /// Reset the database (WARNING: destroys all cached data).
    Reset {
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn run(config: &AppConfig, action: DbAction, format: OutputFormat) -> TnResult<()> {
    let db_path = config.effective_db_path()?;

    match action {
        DbAction::Path => {
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::json!({"path": db_path.display().to_string()}));
                }
                OutputFormat::Text => {
                    println!("{}", db_path.display());
                }
            }
        }
        DbAction::Stats => {
            let store = super::open_store(config)?;
            let sql = store.sql_store();
            let stats = sql.stats()?;
            let schema_version = sql.schema_version()?;

            let file_size = std::fs::metadata(&db_path).ok().map(|m| m.len());
            let wal_path = wal_path(&db_path);
            let wal_size = std::fs::metadata(&wal_path).ok().map(|m| m.len());

            let journal_mode: String = sql
                .with_conn(|conn| {
                    conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))
                        .map_err(|e| TnError::Database(e.to_string()))
                })
                .unwrap_or_else(|_| "unknown".to_string());

            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::json!({
                        "path": db_path.display().to_string(),
                        "schema_version": schema_version,
                        "active_uid": store.current_uid(),
                        "tables": {
                            "accounts": stats.accounts,
                            "users": stats.users,
                            "topics": stats.topics,
                            "subscribers": stats.subscribers,
                            "messages": stats.messages,
                        },
                        "file_size_bytes": file_size,
                        "wal_size_bytes": wal_size,
                        "journal_mode": journal_mode,
                    }));
                }
                OutputFormat::Text => {
                    println!("{}", style("Database Statistics").bold().underlined());
                    println!("  Path:            {}", db_path.display());
                    println!("  Schema version:  {}", schema_version);
                    println!("  Journal mode:    {}", journal_mode);
                    println!(
                        "  Active account:  {}",
                        store.current_uid().unwrap_or_else(|| "(none)".to_string())
                    );
                    println!();

                    let mut table = Table::new();
                    table
                        .load_preset(UTF8_FULL)
                        .apply_modifier(UTF8_ROUND_CORNERS)
                        .set_content_arrangement(ContentArrangement::Dynamic);

                    table.set_header(vec!["Table", "Row Count"]);
                    table.add_row(vec!["accounts".to_string(), stats.accounts.to_string()]);
                    table.add_row(vec!["users".to_string(), stats.users.to_string()]);
                    table.add_row(vec!["topics".to_string(), stats.topics.to_string()]);
                    table.add_row(vec!["subscribers".to_string(), stats.subscribers.to_string()]);
                    table.add_row(vec!["messages".to_string(), stats.messages.to_string()]);

                    println!("{table}");

                    println!();
                    println!("{}", style("Storage").bold().underlined());
                    if let Some(size) = file_size {
                        println!("  Database:        {}", super::format_bytes(size));
                    }
                    if let Some(size) = wal_size {
                        println!("  WAL file:        {}", super::format_bytes(size));
                    }
                }
            }
        }
        DbAction::Check => {
            // Read before opening: opening stamps the current version.
            match tn_store::schema::stored_schema_version(&db_path)? {
                Some(version) if version == SCHEMA_VERSION => {
                    println!("  {} Schema version {}.", style("OK").green().bold(), version);
                }
                Some(version) => {
                    println!(
                        "  {} Schema version {} (expected {}); cached data will be dropped.",
                        style("WARN").yellow().bold(),
                        version,
                        SCHEMA_VERSION
                    );
                }
                None => println!("  {} No database file yet; creating one.", style("INFO").cyan().bold()),
            }

            let store = super::open_store(config)?;
            let sql = store.sql_store();

            match sql.integrity_check() {
                Ok(()) => {
                    println!("  {} Integrity check passed.", style("OK").green().bold());
                }
                Err(e) => {
                    println!("  {} Integrity check failed: {}", style("FAIL").red().bold(), e);
                }
            }

            let fk_violations: Vec<String> = sql.with_conn(|conn| {
                let mut stmt = conn
                    .prepare("PRAGMA foreign_key_check")
                    .map_err(|e| TnError::Database(e.to_string()))?;
                let rows: Vec<String> = stmt
                    .query_map([], |row| {
                        let table: String = row.get(0)?;
                        let rowid: i64 = row.get(1)?;
                        let parent: String = row.get(2)?;
                        Ok(format!("{table} row {rowid} -> {parent}"))
                    })
                    .map_err(|e| TnError::Database(e.to_string()))?
                    .filter_map(|r| r.ok())
                    .collect();
                Ok(rows)
            })?;

            if fk_violations.is_empty() {
                println!("  {} Foreign key constraints OK.", style("OK").green().bold());
            } else {
                println!(
                    "  {} {} foreign key violation(s):",
                    style("WARN").yellow().bold(),
                    fk_violations.len()
                );
                for v in fk_violations.iter().take(10) {
                    println!("    - {v}");
                }
            }
        }
        DbAction::Reset { yes } => {
            println!(
                "  {} This will delete ALL cached data and sign out.",
                style("WARNING").red().bold()
            );
            println!("  Database: {}", db_path.display());

            let confirmed = yes
                || Confirm::new()
                    .with_prompt("  Are you sure you want to reset the database?")
                    .default(false)
                    .interact()
                    .unwrap_or(false);

            if !confirmed {
                println!("  Reset cancelled.");
                return Ok(());
            }

            let store = super::open_store(config)?;
            store.reset()?;
            println!("  {} Database reset complete.", style("OK").green().bold());
        }
    }

    Ok(())
}

/// SQLite names the WAL file by appending `-wal` to the full file name.
fn wal_path(db_path: &Path) -> PathBuf {
    PathBuf::from(format!("{}-wal", db_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wal_path_appends_suffix() {
        assert_eq!(wal_path(Path::new("/tmp/custom.db")), PathBuf::from("/tmp/custom.db-wal"));
        assert_eq!(
            wal_path(Path::new("/data/database.sqlite")),
            PathBuf::from("/data/database.sqlite-wal")
        );
        assert_eq!(wal_path(Path::new("/data/cache")), PathBuf::from("/data/cache-wal"));
    }
}
