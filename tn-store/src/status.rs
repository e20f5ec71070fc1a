//! Lifecycle stamp shared by every syncable record (topics, subscriptions,
//! messages).

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// Send/sync progress of a locally cached object.
///
/// Variants are ordered: everything from [`ObjectStatus::Synced`] upward is
/// shown in the UI, while `Draft`, `Queued` and `Sending` are pending sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[repr(i32)]
pub enum ObjectStatus {
    /// Status not set.
    #[default]
    Undefined = 0,
    /// Not ready to be sent to the server.
    Draft = 1,
    /// Ready but not yet sent.
    Queued = 2,
    /// Being sent to the server.
    Sending = 3,
    /// Received by the server.
    Synced = 4,
    /// Hard-deleted.
    DeletedHard = 5,
    /// Soft-deleted.
    DeletedSoft = 6,
    /// Rejected by the server.
    Rejected = 7,
}

impl ObjectStatus {
    /// Lowest status at which an object becomes visible in the UI.
    pub const VISIBLE: ObjectStatus = ObjectStatus::Synced;

    /// Convert an integer code to a status. Unknown codes map to `Undefined`.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::Draft,
            2 => Self::Queued,
            3 => Self::Sending,
            4 => Self::Synced,
            5 => Self::DeletedHard,
            6 => Self::DeletedSoft,
            7 => Self::Rejected,
            _ => Self::Undefined,
        }
    }

    /// Get the integer code stored in the database.
    pub fn code(&self) -> i32 {
        *self as i32
    }

    /// Whether the object passes the UI visibility filter.
    pub fn is_visible(&self) -> bool {
        *self >= Self::VISIBLE
    }

    /// Whether the object is still waiting to reach the server.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Draft | Self::Queued | Self::Sending)
    }

    /// Whether the object was deleted, softly or permanently.
    pub fn is_deleted(&self) -> bool {
        matches!(self, Self::DeletedHard | Self::DeletedSoft)
    }
}

impl ToSql for ObjectStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for ObjectStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        i32::column_result(value).map(Self::from_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_status_ordering() {
        assert!(ObjectStatus::Undefined < ObjectStatus::Draft);
        assert!(ObjectStatus::Sending < ObjectStatus::Synced);
        assert!(ObjectStatus::DeletedSoft < ObjectStatus::Rejected);
        assert_eq!(ObjectStatus::VISIBLE, ObjectStatus::Synced);
    }

    #[test]
    fn test_visibility_and_pending() {
        assert!(!ObjectStatus::Queued.is_visible());
        assert!(ObjectStatus::Synced.is_visible());
        assert!(ObjectStatus::Rejected.is_visible());

        let pending: Vec<_> = (0..=7)
            .map(ObjectStatus::from_code)
            .filter(ObjectStatus::is_pending)
            .collect();
        assert_eq!(
            pending,
            vec![ObjectStatus::Draft, ObjectStatus::Queued, ObjectStatus::Sending]
        );
        assert!(ObjectStatus::DeletedHard.is_deleted());
        assert!(!ObjectStatus::Rejected.is_deleted());
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(ObjectStatus::from_code(42), ObjectStatus::Undefined);
        assert_eq!(ObjectStatus::from_code(-1), ObjectStatus::Undefined);
        assert_eq!(ObjectStatus::Rejected.code(), 7);
    }

    #[test]
    fn test_status_stored_as_integer() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (status INTEGER NOT NULL)").unwrap();
        conn.execute("INSERT INTO t (status) VALUES (?1)", [ObjectStatus::Sending])
            .unwrap();

        let raw: i32 = conn.query_row("SELECT status FROM t", [], |row| row.get(0)).unwrap();
        assert_eq!(raw, 3);

        let status: ObjectStatus = conn
            .query_row("SELECT status FROM t", [], |row| row.get(0))
            .unwrap();
        assert_eq!(status, ObjectStatus::Sending);
    }
}
