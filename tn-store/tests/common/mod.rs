//! Shared test utilities for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::{params, Connection};
use tempfile::TempDir;
use tn_core::config::DatabaseConfig;
use tn_store::{LocalStore, ObjectStatus};

/// Sub-store tables, parents first.
pub const TABLES: [&str; 5] = ["accounts", "users", "topics", "subscribers", "messages"];

/// Path of the database file inside a temp dir.
pub fn db_path(dir: &TempDir) -> PathBuf {
    dir.path().join("database.sqlite")
}

/// Open a fully initialized store at `path`.
pub fn open_store(path: &Path) -> Arc<LocalStore> {
    LocalStore::open(path, &DatabaseConfig::default()).expect("failed to open test store")
}

/// Create a temp dir holding a fully initialized store.
/// The TempDir must be held alive for the duration of the test.
pub fn create_test_store() -> (Arc<LocalStore>, TempDir) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let store = open_store(&db_path(&dir));
    (store, dir)
}

/// Overwrite the stored schema version behind the store's back.
pub fn stamp_version(path: &Path, version: i32) {
    let conn = Connection::open(path).expect("failed to open raw connection");
    conn.pragma_update(None, "user_version", version)
        .expect("failed to stamp version");
}

/// Whether `table` exists, checked through a raw connection.
pub fn table_exists(path: &Path, table: &str) -> bool {
    let conn = Connection::open(path).expect("failed to open raw connection");
    tn_store::schema::table_exists(&conn, table).expect("failed to inspect schema")
}

/// Insert a topic with one synced message from the account's own user.
pub fn seed_topic(store: &LocalStore, account_id: i64, topic: &str) {
    store
        .sql_store()
        .transaction(|conn| {
            conn.execute(
                "INSERT INTO users (account_id, uid) VALUES (?1, ?2)",
                params![account_id, format!("{topic}-owner")],
            )
            .expect("failed to insert user");
            let user_id = conn.last_insert_rowid();

            conn.execute(
                "INSERT INTO topics (account_id, topic, status) VALUES (?1, ?2, ?3)",
                params![account_id, topic, ObjectStatus::Synced],
            )
            .expect("failed to insert topic");
            let topic_id = conn.last_insert_rowid();

            conn.execute(
                "INSERT INTO subscribers (topic_id, user_id, status) VALUES (?1, ?2, ?3)",
                params![topic_id, user_id, ObjectStatus::Synced],
            )
            .expect("failed to insert subscriber");

            conn.execute(
                "INSERT INTO messages (topic_id, user_id, status, seq, content) VALUES (?1, ?2, ?3, 1, 'hello')",
                params![topic_id, user_id, ObjectStatus::Synced],
            )
            .expect("failed to insert message");
            Ok(())
        })
        .expect("failed to seed topic");
}
