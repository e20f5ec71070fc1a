//! Cached messages, including drafts and queued outgoing messages.

use super::SubStore;

/// Table of messages. Outgoing messages carry a pending
/// [`ObjectStatus`](crate::status::ObjectStatus) until the server assigns
/// them a `seq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageDb;

impl SubStore for MessageDb {
    fn table_name(&self) -> &'static str {
        "messages"
    }

    fn schema_sql(&self) -> &'static str {
        r#"
        CREATE TABLE IF NOT EXISTS messages (
            id                              INTEGER PRIMARY KEY AUTOINCREMENT,
            topic_id                        INTEGER NOT NULL REFERENCES topics(id),
            user_id                         INTEGER REFERENCES users(id),
            status                          INTEGER NOT NULL DEFAULT 0,
            sender                          TEXT,
            ts                              INTEGER,
            seq                             INTEGER,
            high                            INTEGER,
            del_id                          INTEGER,
            head                            TEXT,
            content                         TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_messages_topic_seq ON messages(topic_id, seq);
        CREATE INDEX IF NOT EXISTS idx_messages_topic_status ON messages(topic_id, status);
        "#
    }
}
