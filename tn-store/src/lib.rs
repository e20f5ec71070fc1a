//! Tinode local store - on-device SQLite cache for the messaging client.
//!
//! This crate owns local persistence bootstrap: opening the cache database,
//! wiping it when the schema version changes, creating the sub-store tables
//! (accounts, users, topics, subscribers, messages), and tracking which
//! account is signed in on the device.

pub mod db;
pub mod schema;
pub mod models;
pub mod status;
pub mod sql_store;

// Re-export key types
pub use db::{LocalStore, SharedStore};
pub use models::SubStore;
pub use models::account::{AccountDb, ActiveAccount, StoredAccount};
pub use models::message::MessageDb;
pub use models::subscriber::SubscriberDb;
pub use models::topic::TopicDb;
pub use models::user::UserDb;
pub use sql_store::{SqlStore, StoreStats};
pub use status::ObjectStatus;
