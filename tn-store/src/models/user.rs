//! Cached user profiles, scoped to the account that fetched them.

use super::SubStore;

/// Table of users known to an account.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserDb;

impl SubStore for UserDb {
    fn table_name(&self) -> &'static str {
        "users"
    }

    fn schema_sql(&self) -> &'static str {
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id                              INTEGER PRIMARY KEY AUTOINCREMENT,
            account_id                      INTEGER NOT NULL REFERENCES accounts(id),
            uid                             TEXT NOT NULL,
            updated                         INTEGER,
            pub                             TEXT
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_users_account_uid ON users(account_id, uid);
        "#
    }
}
