//! Cached topics (conversations) and their sync cursors.

use super::SubStore;

/// Table of topics the account is subscribed to.
///
/// `status` holds an [`ObjectStatus`](crate::status::ObjectStatus) code; the
/// `*_local_seq` columns track the range of messages present locally.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopicDb;

impl SubStore for TopicDb {
    fn table_name(&self) -> &'static str {
        "topics"
    }

    fn schema_sql(&self) -> &'static str {
        r#"
        CREATE TABLE IF NOT EXISTS topics (
            id                              INTEGER PRIMARY KEY AUTOINCREMENT,
            account_id                      INTEGER NOT NULL REFERENCES accounts(id),
            status                          INTEGER NOT NULL DEFAULT 0,
            topic                           TEXT NOT NULL,
            type                            INTEGER NOT NULL DEFAULT 0,
            visible                         INTEGER,
            created                         INTEGER,
            updated                         INTEGER,
            read                            INTEGER NOT NULL DEFAULT 0,
            recv                            INTEGER NOT NULL DEFAULT 0,
            seq                             INTEGER NOT NULL DEFAULT 0,
            clear                           INTEGER NOT NULL DEFAULT 0,
            max_del                         INTEGER NOT NULL DEFAULT 0,
            access_mode                     TEXT,
            defacs                          TEXT,
            last_used                       INTEGER,
            min_local_seq                   INTEGER,
            max_local_seq                   INTEGER,
            next_unsent_seq                 INTEGER,
            tags                            TEXT,
            pub                             TEXT,
            priv                            TEXT
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_topics_account_topic ON topics(account_id, topic);
        CREATE INDEX IF NOT EXISTS idx_topics_status ON topics(status);
        "#
    }
}
