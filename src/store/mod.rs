//! Reading store boundary.
//!
//! The engine fetches one immutable snapshot of readings per analysis request
//! and derives everything from it without further I/O. This module defines
//! that boundary: the `ReadingStore` trait plus the SQLite-backed and
//! in-memory implementations.

pub mod memory;
pub mod sqlite;
pub mod types;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use types::{FetchResult, MalformedTimestamp, RawReading, Reading, ReferenceRange};

use chrono::NaiveDate;

/// Query surface every backend provides.
///
/// `fetch_readings` uses an **open interval**: only rows with
/// `start < date_logged < end` are returned, excluding both boundary dates.
/// Callers wanting a closed range must widen by one day on each side.
pub trait ReadingStore {
    /// Fetch all readings for a user strictly inside `(start, end)`, plus the
    /// set of distinct element names the store knows for that user.
    ///
    /// An empty result is not an error; rows with unparseable date/time text
    /// are dropped and counted in `FetchResult::dropped_rows`.
    fn fetch_readings(
        &self,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, StoreError>;

    /// Look up the reference bounds for an element. `None` when the element
    /// has no reference row.
    fn reference_range(&self, element_name: &str) -> Result<Option<ReferenceRange>, StoreError>;

    /// Distinct user ids with at least one reading.
    fn user_ids(&self) -> Result<Vec<i64>, StoreError>;
}

/// Store failures. Fatal per request; never retried internally.
#[derive(Debug)]
pub enum StoreError {
    /// The underlying store cannot be reached or opened
    Unavailable(String),
    /// A query against a reachable store failed
    Query(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Unavailable(e) => write!(f, "store unavailable: {e}"),
            StoreError::Query(e) => write!(f, "store query failed: {e}"),
        }
    }
}

impl std::error::Error for StoreError {}
