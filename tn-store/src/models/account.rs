//! Device accounts and the single-active-account invariant.

use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use tn_core::error::{TnError, TnResult};

use super::SubStore;

/// An account that has signed in on this device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAccount {
    pub id: i64,
    pub uid: String,
    pub active: bool,
    /// Credential validation methods the server still expects (e.g. "email").
    pub cred_methods: Vec<String>,
    /// Push token registered for this account, if any.
    pub device_id: Option<String>,
}

impl StoredAccount {
    /// Construct a StoredAccount from a database row.
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let cred_methods: String = row.get("cred_methods")?;
        let cred_methods = serde_json::from_str(&cred_methods)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;
        Ok(Self {
            id: row.get("id")?,
            uid: row.get("uid")?,
            active: row.get::<_, i32>("active")? != 0,
            cred_methods,
            device_id: row.get("device_id")?,
        })
    }
}

/// In-memory view of which account is signed in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ActiveAccount {
    /// No account is signed in.
    #[default]
    LoggedOut,
    /// The given account is signed in.
    Active(StoredAccount),
}

impl ActiveAccount {
    /// User id of the signed-in account.
    pub fn uid(&self) -> Option<&str> {
        match self {
            ActiveAccount::LoggedOut => None,
            ActiveAccount::Active(account) => Some(&account.uid),
        }
    }

    /// The signed-in account record.
    pub fn account(&self) -> Option<&StoredAccount> {
        match self {
            ActiveAccount::LoggedOut => None,
            ActiveAccount::Active(account) => Some(account),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, ActiveAccount::Active(_))
    }
}

impl From<Option<StoredAccount>> for ActiveAccount {
    fn from(account: Option<StoredAccount>) -> Self {
        account.map_or(ActiveAccount::LoggedOut, ActiveAccount::Active)
    }
}

/// Table of accounts. At most one row has `active = 1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AccountDb;

impl SubStore for AccountDb {
    fn table_name(&self) -> &'static str {
        "accounts"
    }

    fn schema_sql(&self) -> &'static str {
        r#"
        CREATE TABLE IF NOT EXISTS accounts (
            id                              INTEGER PRIMARY KEY AUTOINCREMENT,
            uid                             TEXT NOT NULL UNIQUE,
            active                          INTEGER NOT NULL DEFAULT 0,
            cred_methods                    TEXT NOT NULL DEFAULT '[]',
            device_id                       TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_accounts_active ON accounts(active);
        "#
    }
}

impl AccountDb {
    /// Find the account currently flagged active.
    pub fn get_active_account(&self, conn: &Connection) -> TnResult<Option<StoredAccount>> {
        match conn.query_row(
            "SELECT * FROM accounts WHERE active = 1 ORDER BY id LIMIT 1",
            [],
            StoredAccount::from_row,
        ) {
            Ok(a) => Ok(Some(a)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(TnError::Database(e.to_string())),
        }
    }

    /// Find an account by user id.
    pub fn get_by_uid(&self, conn: &Connection, uid: &str) -> TnResult<Option<StoredAccount>> {
        match conn.query_row("SELECT * FROM accounts WHERE uid = ?1", [uid], StoredAccount::from_row) {
            Ok(a) => Ok(Some(a)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(TnError::Database(e.to_string())),
        }
    }

    /// Clear the activation flag on every account.
    pub fn deactivate_all(&self, conn: &Connection) -> TnResult<()> {
        conn.execute("UPDATE accounts SET active = 0 WHERE active <> 0", [])
            .map_err(|e| TnError::Database(e.to_string()))?;
        Ok(())
    }

    /// Make `uid` the only active account, creating its row if needed.
    ///
    /// Runs in its own transaction, so it must not be called while another
    /// transaction is open on `conn`.
    pub fn add_or_activate_account(&self, conn: &Connection, uid: &str) -> TnResult<StoredAccount> {
        if uid.is_empty() {
            return Err(TnError::Account("cannot activate an account with an empty uid".into()));
        }

        let tx = conn
            .unchecked_transaction()
            .map_err(|e| TnError::Database(e.to_string()))?;

        tx.execute("UPDATE accounts SET active = 0 WHERE active <> 0 AND uid <> ?1", [uid])
            .map_err(|e| TnError::Database(e.to_string()))?;

        tx.execute(
            "INSERT INTO accounts (uid, active) VALUES (?1, 1)
            ON CONFLICT(uid) DO UPDATE SET active = 1",
            [uid],
        )
        .map_err(|e| TnError::Database(e.to_string()))?;

        let account = tx
            .query_row("SELECT * FROM accounts WHERE uid = ?1", [uid], StoredAccount::from_row)
            .map_err(|e| TnError::Database(e.to_string()))?;

        tx.commit().map_err(|e| TnError::Database(e.to_string()))?;
        Ok(account)
    }

    /// Store the push token for an account.
    pub fn update_device_id(&self, conn: &Connection, id: i64, device_id: Option<&str>) -> TnResult<()> {
        conn.execute(
            "UPDATE accounts SET device_id = ?1 WHERE id = ?2",
            params![device_id, id],
        )
        .map_err(|e| TnError::Database(e.to_string()))?;
        Ok(())
    }

    /// Store the credential methods awaiting validation for an account.
    pub fn update_cred_methods(&self, conn: &Connection, id: i64, methods: &[String]) -> TnResult<()> {
        let encoded = serde_json::to_string(methods)?;
        conn.execute(
            "UPDATE accounts SET cred_methods = ?1 WHERE id = ?2",
            params![encoded, id],
        )
        .map_err(|e| TnError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete an account by its local database ID.
    pub fn delete(&self, conn: &Connection, id: i64) -> TnResult<bool> {
        let changed = conn
            .execute("DELETE FROM accounts WHERE id = ?1", [id])
            .map_err(|e| TnError::Database(e.to_string()))?;
        Ok(changed > 0)
    }
}
