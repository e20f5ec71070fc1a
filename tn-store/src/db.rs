//! Local store bootstrap, schema versioning, and account activation.
//!
//! Opening the store compares `PRAGMA user_version` with
//! [`SCHEMA_VERSION`]. A mismatch drops every sub-store table; there are no
//! incremental migrations, the next sync repopulates the cache from the
//! server.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use parking_lot::{Mutex, RwLock};
use rusqlite::Connection;
use tracing::{debug, error, info, warn};

use tn_core::config::{AppConfig, DatabaseConfig};
use tn_core::constants::SCHEMA_VERSION;
use tn_core::error::{TnError, TnResult};

use crate::models::account::{AccountDb, ActiveAccount};
use crate::models::message::MessageDb;
use crate::models::subscriber::SubscriberDb;
use crate::models::topic::TopicDb;
use crate::models::user::UserDb;
use crate::models::SubStore;
use crate::schema;
use crate::sql_store::SqlStore;

/// Owner of the on-device cache database.
///
/// Construct one with [`LocalStore::open`] at the application's composition
/// root and pass the `Arc` to consumers. [`LocalStore::shared`] exists for
/// code that needs a process-wide instance.
pub struct LocalStore {
    path: PathBuf,
    conn: Arc<Mutex<Connection>>,
    sql_store: SqlStore,
    account_db: AccountDb,
    user_db: UserDb,
    topic_db: TopicDb,
    subscriber_db: SubscriberDb,
    message_db: MessageDb,
    account: Arc<RwLock<ActiveAccount>>,
}

impl LocalStore {
    /// Open the store and create its tables. This is the usual entry point.
    pub fn open(db_path: &Path, config: &DatabaseConfig) -> TnResult<Arc<Self>> {
        let store = Self::connect(db_path, config)?;
        store.on_create()?;
        Ok(Arc::new(store))
    }

    /// Open the database file and reconcile its schema version.
    ///
    /// This:
    /// 1. Creates the database file and parent directories if needed
    /// 2. Applies connection pragmas (WAL, foreign keys, busy timeout)
    /// 3. Runs an integrity check if configured
    /// 4. Drops every sub-store table when the stored schema version is stale
    ///
    /// Tables are not created here; call [`LocalStore::on_create`] next.
    /// Any failure is reported as [`TnError::Open`]: without a store the
    /// application cannot proceed.
    pub fn connect(db_path: &Path, config: &DatabaseConfig) -> TnResult<Self> {
        info!("opening local store at {}", db_path.display());

        let conn = open_connection(db_path, config).map_err(|e| {
            error!("failed to open local store at {}: {e}", db_path.display());
            TnError::Open(format!("{}: {e}", db_path.display()))
        })?;

        let stored_version = schema::schema_version(&conn).map_err(|e| {
            error!("failed to read schema version: {e}");
            TnError::Open(e.to_string())
        })?;

        let conn = Arc::new(Mutex::new(conn));
        let account = Arc::new(RwLock::new(ActiveAccount::LoggedOut));
        let store = Self {
            path: db_path.to_path_buf(),
            sql_store: SqlStore::new(Arc::clone(&conn), Arc::clone(&account)),
            conn,
            account_db: AccountDb,
            user_db: UserDb,
            topic_db: TopicDb,
            subscriber_db: SubscriberDb,
            message_db: MessageDb,
            account,
        };

        if stored_version != SCHEMA_VERSION {
            if stored_version == 0 {
                info!("initializing new local store (schema version {SCHEMA_VERSION})");
            } else {
                warn!(
                    "local store schema version {stored_version} does not match {SCHEMA_VERSION}, dropping cached data"
                );
            }
            store.on_destroy().map_err(|e| {
                error!("failed to drop stale tables: {e}");
                TnError::Open(e.to_string())
            })?;
        }

        Ok(store)
    }

    /// Create every sub-store table, load the active account, and stamp
    /// the current schema version.
    pub fn on_create(&self) -> TnResult<()> {
        let conn = self.conn.lock();
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| TnError::Database(e.to_string()))?;

        for store in self.sub_stores() {
            store.create_table(&tx)?;
        }

        let active = self.account_db.get_active_account(&tx)?;
        schema::set_schema_version(&tx, SCHEMA_VERSION)?;

        tx.commit()
            .map_err(|e| TnError::Database(e.to_string()))?;

        if let Some(ref account) = active {
            info!(uid = %account.uid, "restored active account");
        }
        *self.account.write() = ActiveAccount::from(active);

        debug!("local store ready at schema version {SCHEMA_VERSION}");
        Ok(())
    }

    /// Drop every sub-store table, children before parents.
    ///
    /// Foreign keys are not enforced during the drop: a stale file may hold
    /// tables this version does not know about that still reference ours.
    pub fn on_destroy(&self) -> TnResult<()> {
        let conn = self.conn.lock();

        // foreign_keys is a no-op inside a transaction, so toggle it around one.
        conn.execute_batch("PRAGMA foreign_keys=OFF;")
            .map_err(|e| TnError::Database(e.to_string()))?;
        let dropped = self.drop_tables(&conn);
        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .map_err(|e| TnError::Database(e.to_string()))?;
        dropped?;

        *self.account.write() = ActiveAccount::LoggedOut;
        info!("local store tables dropped");
        Ok(())
    }

    /// Wipe the cache and recreate empty tables.
    pub fn reset(&self) -> TnResult<()> {
        warn!("resetting local store - all cached data will be lost");
        self.on_destroy()?;
        self.on_create()?;
        info!("local store reset complete");
        Ok(())
    }

    fn drop_tables(&self, conn: &Connection) -> TnResult<()> {
        let tx = conn
            .unchecked_transaction()
            .map_err(|e| TnError::Database(e.to_string()))?;

        for store in self.sub_stores().iter().rev() {
            store.destroy_table(&tx)?;
        }

        tx.commit()
            .map_err(|e| TnError::Database(e.to_string()))
    }

    /// Sub-stores in creation order: parents before children.
    fn sub_stores(&self) -> [&dyn SubStore; 5] {
        [
            &self.account_db,
            &self.user_db,
            &self.topic_db,
            &self.subscriber_db,
            &self.message_db,
        ]
    }

    // ─── Accessors ───────────────────────────────────────────────────────

    /// Path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Query facade bound to this store's connection.
    pub fn sql_store(&self) -> &SqlStore {
        &self.sql_store
    }

    pub fn account_db(&self) -> &AccountDb {
        &self.account_db
    }

    pub fn user_db(&self) -> &UserDb {
        &self.user_db
    }

    pub fn topic_db(&self) -> &TopicDb {
        &self.topic_db
    }

    pub fn subscriber_db(&self) -> &SubscriberDb {
        &self.subscriber_db
    }

    pub fn message_db(&self) -> &MessageDb {
        &self.message_db
    }

    // ─── Account identity ────────────────────────────────────────────────

    /// Snapshot of the signed-in account.
    pub fn active_account(&self) -> ActiveAccount {
        self.account.read().clone()
    }

    /// User id of the signed-in account.
    pub fn current_uid(&self) -> Option<String> {
        self.account.read().uid().map(str::to_owned)
    }

    /// Whether an account is signed in.
    pub fn is_ready(&self) -> bool {
        self.account.read().is_active()
    }

    /// Whether `candidate` is the signed-in user. `None` never matches.
    pub fn is_own_identity(&self, candidate: Option<&str>) -> bool {
        match (candidate, self.account.read().uid()) {
            (Some(candidate), Some(uid)) => candidate == uid,
            _ => false,
        }
    }

    /// Switch the active account and report failures.
    ///
    /// `None` only clears the in-memory state; persisted activation flags
    /// are left alone. `Some(uid)` deactivates the previous account (when
    /// one is active) and then activates `uid`, creating its row if needed.
    /// If the account sub-store fails, the in-memory state is reset to
    /// [`ActiveAccount::LoggedOut`] before the error is returned.
    pub fn try_set_active_account(&self, uid: Option<&str>) -> TnResult<ActiveAccount> {
        let Some(uid) = uid else {
            *self.account.write() = ActiveAccount::LoggedOut;
            return Ok(ActiveAccount::LoggedOut);
        };

        let conn = self.conn.lock();
        let mut current = self.account.write();

        let activated = if current.is_active() {
            self.account_db
                .deactivate_all(&conn)
                .and_then(|()| self.account_db.add_or_activate_account(&conn, uid))
        } else {
            self.account_db.add_or_activate_account(&conn, uid)
        };

        match activated {
            Ok(account) => {
                info!(uid = %account.uid, "account activated");
                *current = ActiveAccount::Active(account);
                Ok(current.clone())
            }
            Err(e) => {
                *current = ActiveAccount::LoggedOut;
                Err(e)
            }
        }
    }

    /// Switch the active account, degrading to logged out on failure.
    ///
    /// Failures are logged and swallowed; use
    /// [`LocalStore::try_set_active_account`] to observe them.
    pub fn set_active_account(&self, uid: Option<&str>) {
        if let Err(e) = self.try_set_active_account(uid) {
            warn!("failed to activate account, continuing logged out: {e}");
        }
    }

    /// Sign out: clear every persisted activation flag (best effort) and
    /// the in-memory active account.
    pub fn logout(&self) {
        {
            let conn = self.conn.lock();
            if let Err(e) = self.account_db.deactivate_all(&conn) {
                debug!("ignoring failure to deactivate accounts on logout: {e}");
            }
        }
        self.set_active_account(None);
        info!("logged out");
    }

    // ─── Process-wide instance ───────────────────────────────────────────

    /// Process-wide store at the location named by the default config file.
    ///
    /// The first call opens the database; later calls return the same
    /// `Arc`. Concurrent first calls open the file exactly once.
    pub fn shared() -> TnResult<Arc<Self>> {
        SHARED.get_or_try_init(|| {
            let config = AppConfig::load_default()?;
            Self::open(&config.effective_db_path()?, &config.database)
        })
    }

    /// Initialize the process-wide store from an explicit configuration.
    /// Returns the existing instance if one was already published.
    pub fn init_shared(config: &AppConfig) -> TnResult<Arc<Self>> {
        SHARED.get_or_try_init(|| Self::open(&config.effective_db_path()?, &config.database))
    }
}

static SHARED: SharedStore = SharedStore::new();

/// Lazily initialized slot holding at most one store.
///
/// A failed initializer publishes nothing, so the next caller retries.
pub struct SharedStore {
    cell: OnceCell<Arc<LocalStore>>,
}

impl SharedStore {
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// The published store, if initialization already succeeded.
    pub fn get(&self) -> Option<Arc<LocalStore>> {
        self.cell.get().cloned()
    }

    /// Return the published store or run `init` to create it. Concurrent
    /// callers block until the running initializer finishes.
    pub fn get_or_try_init<F>(&self, init: F) -> TnResult<Arc<LocalStore>>
    where
        F: FnOnce() -> TnResult<Arc<LocalStore>>,
    {
        self.cell.get_or_try_init(init).map(Arc::clone)
    }
}

impl Default for SharedStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Open the SQLite file and apply connection pragmas.
fn open_connection(db_path: &Path, config: &DatabaseConfig) -> TnResult<Connection> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let conn = Connection::open(db_path).map_err(|e| TnError::Database(e.to_string()))?;

    apply_pragmas(&conn, config).map_err(|e| TnError::Database(e.to_string()))?;

    if config.integrity_check_on_startup {
        schema::integrity_check(&conn)?;
    }

    Ok(conn)
}

fn apply_pragmas(conn: &Connection, config: &DatabaseConfig) -> rusqlite::Result<()> {
    conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))?;

    if config.wal_mode {
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    }

    conn.execute_batch(
        "PRAGMA synchronous=NORMAL;
         PRAGMA temp_store=MEMORY;
         PRAGMA foreign_keys=ON;",
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (Arc<LocalStore>, TempDir) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database.sqlite");
        let store = LocalStore::open(&path, &DatabaseConfig::default()).unwrap();
        (store, dir)
    }

    #[test]
    fn test_open_creates_file_and_stamps_version() {
        let (store, dir) = test_store();
        assert!(dir.path().join("database.sqlite").exists());
        assert_eq!(store.sql_store().schema_version().unwrap(), SCHEMA_VERSION);
        assert_eq!(store.current_uid(), None);
        assert!(!store.is_ready());
    }

    #[test]
    fn test_open_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a").join("b").join("database.sqlite");
        let store = LocalStore::open(&path, &DatabaseConfig::default()).unwrap();
        assert_eq!(store.path(), path.as_path());
        assert!(path.exists());
    }

    #[test]
    fn test_wal_and_foreign_keys_enabled() {
        let (store, _dir) = test_store();
        store
            .sql_store()
            .with_conn(|conn| {
                let journal_mode: String = conn
                    .query_row("PRAGMA journal_mode", [], |row| row.get(0))
                    .unwrap();
                assert_eq!(journal_mode.to_lowercase(), "wal");
                let fk: i64 = conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0)).unwrap();
                assert_eq!(fk, 1);
                Ok(())
            })
            .unwrap();
    }

    #[test]
    fn test_on_create_is_idempotent() {
        let (store, _dir) = test_store();
        store.on_create().unwrap();
        store.on_create().unwrap();
    }

    #[test]
    fn test_on_destroy_is_idempotent() {
        let (store, _dir) = test_store();
        store.on_destroy().unwrap();
        store.on_destroy().unwrap();
    }

    #[test]
    fn test_on_destroy_restores_foreign_keys() {
        let (store, _dir) = test_store();
        store.on_destroy().unwrap();
        let fk: i64 = store
            .sql_store()
            .with_conn(|conn| {
                conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))
                    .map_err(|e| TnError::Database(e.to_string()))
            })
            .unwrap();
        assert_eq!(fk, 1);
    }

    #[test]
    fn test_is_own_identity() {
        let (store, _dir) = test_store();
        assert!(!store.is_own_identity(None));
        assert!(!store.is_own_identity(Some("usrAlice")));

        store.set_active_account(Some("usrAlice"));
        assert!(store.is_own_identity(Some("usrAlice")));
        assert!(!store.is_own_identity(Some("usrBob")));
        assert!(!store.is_own_identity(None));
    }

    #[test]
    fn test_reset_clears_accounts() {
        let (store, _dir) = test_store();
        store.set_active_account(Some("usrAlice"));
        store.reset().unwrap();

        assert_eq!(store.current_uid(), None);
        assert_eq!(store.sql_store().stats().unwrap().accounts, 0);
        assert_eq!(store.sql_store().schema_version().unwrap(), SCHEMA_VERSION);
    }

    #[test]
    fn test_shared_slot_retries_after_failure() {
        let slot = SharedStore::new();
        let failed = slot.get_or_try_init(|| Err(TnError::Open("unavailable".into())));
        assert!(failed.is_err());
        assert!(slot.get().is_none());

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("database.sqlite");
        let store = slot
            .get_or_try_init(|| LocalStore::open(&path, &DatabaseConfig::default()))
            .unwrap();
        let again = slot.get_or_try_init(|| unreachable!()).unwrap();
        assert!(Arc::ptr_eq(&store, &again));
    }
}
