//! Schema version bookkeeping and low-level schema inspection.
//!
//! The version lives in the SQLite header field `PRAGMA user_version`
//! rather than in a table, so it survives dropping every table.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};
use tracing::{error, info};
use tn_core::error::{TnError, TnResult};

/// Read the schema version stamped into the database header.
/// A freshly created file reports 0.
pub fn schema_version(conn: &Connection) -> TnResult<i32> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
        .map_err(|e| TnError::Database(format!("failed to read schema version: {e}")))
}

/// Schema version of the file at `path` without opening the store, which
/// would reconcile it. `None` when no file exists yet.
pub fn stored_schema_version(path: &Path) -> TnResult<Option<i32>> {
    if !path.exists() {
        return Ok(None);
    }
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_WRITE)
        .map_err(|e| TnError::Open(format!("{}: {e}", path.display())))?;
    schema_version(&conn).map(Some)
}

/// Stamp the schema version into the database header.
pub fn set_schema_version(conn: &Connection, version: i32) -> TnResult<()> {
    conn.pragma_update(None, "user_version", version)
        .map_err(|e| TnError::Database(format!("failed to write schema version: {e}")))?;
    Ok(())
}

/// Whether a table with the given name exists.
pub fn table_exists(conn: &Connection, name: &str) -> TnResult<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [name],
            |row| row.get(0),
        )
        .map_err(|e| TnError::Database(e.to_string()))?;
    Ok(count > 0)
}

/// Run a SQLite integrity check.
pub fn integrity_check(conn: &Connection) -> TnResult<()> {
    let result: String = conn
        .query_row("PRAGMA integrity_check", [], |row| row.get(0))
        .map_err(|e| TnError::Database(e.to_string()))?;

    if result != "ok" {
        error!("database integrity check failed: {result}");
        return Err(TnError::IntegrityCheck(result));
    }

    info!("database integrity check passed");
    Ok(())
}
