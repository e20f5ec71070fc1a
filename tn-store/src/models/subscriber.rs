//! Topic membership rows.

use super::SubStore;

/// Table linking users to the topics they are subscribed to.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubscriberDb;

impl SubStore for SubscriberDb {
    fn table_name(&self) -> &'static str {
        "subscribers"
    }

    fn schema_sql(&self) -> &'static str {
        r#"
        CREATE TABLE IF NOT EXISTS subscribers (
            id                              INTEGER PRIMARY KEY AUTOINCREMENT,
            topic_id                        INTEGER NOT NULL REFERENCES topics(id),
            user_id                         INTEGER NOT NULL REFERENCES users(id),
            status                          INTEGER NOT NULL DEFAULT 0,
            mode                            TEXT,
            updated                         INTEGER,
            read                            INTEGER NOT NULL DEFAULT 0,
            recv                            INTEGER NOT NULL DEFAULT 0,
            clear                           INTEGER NOT NULL DEFAULT 0,
            last_seen                       INTEGER,
            user_agent                      TEXT,
            priv                            TEXT
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_subscribers_topic_user ON subscribers(topic_id, user_id);
        CREATE INDEX IF NOT EXISTS idx_subscribers_user ON subscribers(user_id);
        "#
    }
}
