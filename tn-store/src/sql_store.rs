//! Generic query facade handed to downstream collaborators (sync, UI
//! models) that need to run their own SQL against the local store.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rusqlite::Connection;
use tn_core::error::{TnError, TnResult};

use crate::models::account::ActiveAccount;
use crate::schema;

/// Query facade bound to the store's connection.
///
/// Cloning is cheap; every clone shares the same connection. Closures passed
/// to [`SqlStore::with_conn`] and [`SqlStore::transaction`] run while the
/// connection is locked and must not call back into the owning
/// [`LocalStore`](crate::LocalStore).
#[derive(Clone)]
pub struct SqlStore {
    conn: Arc<Mutex<Connection>>,
    account: Arc<RwLock<ActiveAccount>>,
}

impl SqlStore {
    pub(crate) fn new(conn: Arc<Mutex<Connection>>, account: Arc<RwLock<ActiveAccount>>) -> Self {
        Self { conn, account }
    }

    /// Run a function against the locked connection.
    pub fn with_conn<T, F>(&self, f: F) -> TnResult<T>
    where
        F: FnOnce(&Connection) -> TnResult<T>,
    {
        let conn = self.conn.lock();
        f(&conn)
    }

    /// Execute a function within a database transaction.
    pub fn transaction<T, F>(&self, f: F) -> TnResult<T>
    where
        F: FnOnce(&Connection) -> TnResult<T>,
    {
        let conn = self.conn.lock();
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| TnError::Database(e.to_string()))?;

        let result = f(&tx)?;

        tx.commit()
            .map_err(|e| TnError::Database(e.to_string()))?;

        Ok(result)
    }

    /// User id of the active account, if any.
    pub fn my_uid(&self) -> Option<String> {
        self.account.read().uid().map(str::to_owned)
    }

    /// Schema version currently stamped into the database.
    pub fn schema_version(&self) -> TnResult<i32> {
        schema::schema_version(&self.conn.lock())
    }

    /// Run a SQLite integrity check.
    pub fn integrity_check(&self) -> TnResult<()> {
        schema::integrity_check(&self.conn.lock())
    }

    /// Get row counts per sub-store table. Missing tables count as empty.
    pub fn stats(&self) -> TnResult<StoreStats> {
        let conn = self.conn.lock();

        let count = |table: &str| -> TnResult<i64> {
            let sql = format!("SELECT COUNT(*) FROM {table}");
            conn.query_row(&sql, [], |row| row.get(0))
                .map_err(|e| TnError::Database(e.to_string()))
        };

        Ok(StoreStats {
            accounts: count("accounts").unwrap_or(0),
            users: count("users").unwrap_or(0),
            topics: count("topics").unwrap_or(0),
            subscribers: count("subscribers").unwrap_or(0),
            messages: count("messages").unwrap_or(0),
        })
    }
}

/// Database row count statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreStats {
    pub accounts: i64,
    pub users: i64,
    pub topics: i64,
    pub subscribers: i64,
    pub messages: i64,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "accounts={}, users={}, topics={}, subscribers={}, messages={}",
            self.accounts, self.users, self.topics, self.subscribers, self.messages
        )
    }
}
