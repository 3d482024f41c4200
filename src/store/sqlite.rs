//! SQLite-backed reading store.
//!
//! Schema matches the ingestion side: `device_readings` holds raw
//! observations, `reference_ranges` holds per-element healthy/critical
//! bounds. Date and time live in text columns (`YYYY-MM-DD`, `HH:MM:SS[.fff]`)
//! so range predicates compare lexicographically.

use crate::store::types::{FetchResult, RawReading, ReferenceRange};
use crate::store::{ReadingStore, StoreError};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;
use tracing::warn;

/// Reading store backed by a SQLite database file.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open(path.as_ref())
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Open an existing store read-only. Fails if the file does not exist.
    pub fn open_read_only(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let conn = Connection::open_with_flags(
            path.as_ref(),
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Open an in-memory store (tests and demos).
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let store = Self { conn };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Create tables if they do not exist. Safe to call on every open.
    fn ensure_schema(&self) -> Result<(), StoreError> {
        self.conn
            .execute_batch(
                r#"
                CREATE TABLE IF NOT EXISTS device_readings (
                    id            INTEGER PRIMARY KEY AUTOINCREMENT,
                    date_logged   TEXT    NOT NULL,
                    time_stamp    TEXT    NOT NULL,
                    recorded_value REAL   NOT NULL,
                    element_name  TEXT    NOT NULL,
                    user_id       INTEGER NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_readings_user_date
                    ON device_readings (user_id, date_logged);

                CREATE TABLE IF NOT EXISTS reference_ranges (
                    element_name          TEXT PRIMARY KEY,
                    lower_critical_limit  REAL,
                    lower_limit           REAL,
                    upper_limit           REAL,
                    upper_critical_limit  REAL
                );
                "#,
            )
            .map_err(|e| StoreError::Query(e.to_string()))
    }

    /// Insert one reading. Used by the ingestion path and tests; the engine
    /// itself never writes readings.
    pub fn insert_reading(
        &self,
        element_name: &str,
        value: f64,
        date_logged: &str,
        time_stamp: &str,
        user_id: i64,
    ) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT INTO device_readings (date_logged, time_stamp, recorded_value, element_name, user_id)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![date_logged, time_stamp, value, element_name, user_id],
            )
            .map(|_| ())
            .map_err(|e| StoreError::Query(e.to_string()))
    }

    /// Insert or replace the reference bounds for an element.
    pub fn insert_reference_range(&self, range: &ReferenceRange) -> Result<(), StoreError> {
        self.conn
            .execute(
                "INSERT OR REPLACE INTO reference_ranges
                 (element_name, lower_critical_limit, lower_limit, upper_limit, upper_critical_limit)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    range.element_name,
                    range.lower_critical_limit,
                    range.lower_limit,
                    range.upper_limit,
                    range.upper_critical_limit,
                ],
            )
            .map(|_| ())
            .map_err(|e| StoreError::Query(e.to_string()))
    }
}

impl ReadingStore for SqliteStore {
    fn fetch_readings(
        &self,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, StoreError> {
        // Distinct elements are store-wide, not per user: an element that a
        // user has never logged still yields an (empty) series downstream.
        let mut stmt = self
            .conn
            .prepare_cached("SELECT DISTINCT element_name FROM device_readings")
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let elements = stmt
            .query_map([], |row| row.get::<_, String>(0))
            .map_err(|e| StoreError::Query(e.to_string()))?
            .collect::<Result<_, _>>()
            .map_err(|e| StoreError::Query(e.to_string()))?;

        // Open interval on both sides: boundary dates are excluded.
        let mut stmt = self
            .conn
            .prepare_cached(
                "SELECT date_logged, time_stamp, recorded_value, element_name, user_id
                 FROM device_readings
                 WHERE ?1 < date_logged
                   AND ?2 > date_logged
                   AND user_id = ?3
                 ORDER BY id",
            )
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let raw_rows = stmt
            .query_map(
                params![
                    start.format("%Y-%m-%d").to_string(),
                    end.format("%Y-%m-%d").to_string(),
                    user_id
                ],
                |row| {
                    Ok(RawReading {
                        date_logged: row.get(0)?,
                        time_stamp: row.get(1)?,
                        value: row.get(2)?,
                        element_name: row.get(3)?,
                        user_id: row.get(4)?,
                    })
                },
            )
            .map_err(|e| StoreError::Query(e.to_string()))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::Query(e.to_string()))?;

        let mut result = FetchResult {
            elements,
            ..Default::default()
        };
        for raw in raw_rows {
            match raw.parse() {
                Ok(reading) => result.readings.push(reading),
                Err(e) => {
                    warn!(error = %e, "dropping reading with unparseable timestamp");
                    result.dropped_rows += 1;
                }
            }
        }
        Ok(result)
    }

    fn reference_range(&self, element_name: &str) -> Result<Option<ReferenceRange>, StoreError> {
        let mut stmt = self
            .conn
            .prepare_cached(
                "SELECT element_name, lower_critical_limit, lower_limit, upper_limit, upper_critical_limit
                 FROM reference_ranges
                 WHERE element_name = ?1",
            )
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let mut rows = stmt
            .query_map(params![element_name], |row| {
                Ok(ReferenceRange {
                    element_name: row.get(0)?,
                    lower_critical_limit: row.get(1)?,
                    lower_limit: row.get(2)?,
                    upper_limit: row.get(3)?,
                    upper_critical_limit: row.get(4)?,
                })
            })
            .map_err(|e| StoreError::Query(e.to_string()))?;
        rows.next()
            .transpose()
            .map_err(|e| StoreError::Query(e.to_string()))
    }

    fn user_ids(&self) -> Result<Vec<i64>, StoreError> {
        let mut stmt = self
            .conn
            .prepare_cached("SELECT DISTINCT user_id FROM device_readings ORDER BY user_id")
            .map_err(|e| StoreError::Query(e.to_string()))?;
        let ids = stmt
            .query_map([], |row| row.get::<_, i64>(0))
            .map_err(|e| StoreError::Query(e.to_string()))?
            .collect::<Result<_, _>>()
            .map_err(|e| StoreError::Query(e.to_string()));
        ids
    }
}
