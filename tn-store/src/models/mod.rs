//! Sub-stores: one table-backed collection per cached entity.
//!
//! Tables reference each other (users and topics belong to an account,
//! subscribers and messages to a topic and a user), so creation runs parents
//! first and teardown runs children first.

pub mod account;
pub mod user;
pub mod topic;
pub mod subscriber;
pub mod message;

use rusqlite::Connection;
use tracing::debug;
use tn_core::error::{TnError, TnResult};

/// Table lifecycle shared by every sub-store.
pub trait SubStore: Send + Sync {
    /// Name of the backing table.
    fn table_name(&self) -> &'static str;

    /// DDL for the table and its indexes. Must use `IF NOT EXISTS`.
    fn schema_sql(&self) -> &'static str;

    /// Create the table. Creating an existing table is a no-op.
    fn create_table(&self, conn: &Connection) -> TnResult<()> {
        conn.execute_batch(self.schema_sql()).map_err(|e| {
            TnError::Database(format!("failed to create table {}: {e}", self.table_name()))
        })?;
        debug!(table = self.table_name(), "table ready");
        Ok(())
    }

    /// Drop the table together with its indexes. A missing table is not an error.
    fn destroy_table(&self, conn: &Connection) -> TnResult<()> {
        let sql = format!("DROP TABLE IF EXISTS {}", self.table_name());
        conn.execute_batch(&sql).map_err(|e| {
            TnError::Database(format!("failed to drop table {}: {e}", self.table_name()))
        })?;
        debug!(table = self.table_name(), "table dropped");
        Ok(())
    }
}
