//! Tests for the process-wide store instance.
//!
//! Kept in their own test binary: the global slot can only be filled once
//! per process.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tempfile::TempDir;
use tn_core::config::{AppConfig, DatabaseConfig};
use tn_store::{LocalStore, SharedStore};

#[test]
fn shared_instance_is_identical_across_calls() {
    let dir = TempDir::new().unwrap();
    let mut config = AppConfig::default();
    config.database.path = common::db_path(&dir).display().to_string();

    let first = LocalStore::init_shared(&config).unwrap();
    let second = LocalStore::init_shared(&config).unwrap();
    let third = LocalStore::shared().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first, &third));
    assert_eq!(first.path(), common::db_path(&dir).as_path());

    first.set_active_account(Some("alice"));
    assert_eq!(third.current_uid().as_deref(), Some("alice"));
}

#[test]
fn concurrent_first_use_opens_once() {
    let dir = TempDir::new().unwrap();
    let path = common::db_path(&dir);
    let slot = SharedStore::new();
    let opens = AtomicUsize::new(0);

    let stores: Vec<Arc<LocalStore>> = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                s.spawn(|| {
                    slot.get_or_try_init(|| {
                        opens.fetch_add(1, Ordering::SeqCst);
                        LocalStore::open(&path, &DatabaseConfig::default())
                    })
                    .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(opens.load(Ordering::SeqCst), 1);
    for store in &stores[1..] {
        assert!(Arc::ptr_eq(&stores[0], store));
    }
}
