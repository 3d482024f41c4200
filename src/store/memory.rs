//! In-memory reading store.
//!
//! Backs tests and demos with the same fetch semantics as the SQLite store:
//! open-interval date filtering, store-wide distinct elements, insertion
//! order preserved.

use crate::store::types::{FetchResult, Reading, ReferenceRange};
use crate::store::{ReadingStore, StoreError};
use chrono::NaiveDate;
use std::collections::HashMap;

/// Reading store holding everything in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    readings: Vec<Reading>,
    ranges: HashMap<String, ReferenceRange>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a reading.
    pub fn push(&mut self, reading: Reading) {
        self.readings.push(reading);
    }

    /// Add a reference range.
    pub fn push_range(&mut self, range: ReferenceRange) {
        self.ranges.insert(range.element_name.clone(), range);
    }

    /// Builder-style variant of [`push`](Self::push).
    pub fn with_reading(mut self, reading: Reading) -> Self {
        self.push(reading);
        self
    }

    /// Builder-style variant of [`push_range`](Self::push_range).
    pub fn with_range(mut self, range: ReferenceRange) -> Self {
        self.push_range(range);
        self
    }
}

impl ReadingStore for MemoryStore {
    fn fetch_readings(
        &self,
        user_id: i64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchResult, StoreError> {
        let mut result = FetchResult::default();
        for reading in &self.readings {
            result.elements.insert(reading.element_name.clone());
            if reading.user_id == user_id
                && reading.date_logged > start
                && reading.date_logged < end
            {
                result.readings.push(reading.clone());
            }
        }
        Ok(result)
    }

    fn reference_range(&self, element_name: &str) -> Result<Option<ReferenceRange>, StoreError> {
        Ok(self.ranges.get(element_name).cloned())
    }

    fn user_ids(&self) -> Result<Vec<i64>, StoreError> {
        let mut ids: Vec<i64> = self.readings.iter().map(|r| r.user_id).collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn reading(user: i64, element: &str, value: f64, date: &str, time: &str) -> Reading {
        Reading::new(
            user,
            element,
            value,
            date.parse::<NaiveDate>().unwrap(),
            time.parse::<NaiveTime>().unwrap(),
        )
    }

    #[test]
    fn fetch_matches_sqlite_boundary_semantics() {
        let store = MemoryStore::new()
            .with_reading(reading(1, "Glucose", 80.0, "2024-10-25", "08:00:00"))
            .with_reading(reading(1, "Glucose", 85.0, "2024-10-26", "08:00:00"))
            .with_reading(reading(1, "Glucose", 95.0, "2024-10-28", "08:00:00"));

        let result = store
            .fetch_readings(
                1,
                NaiveDate::from_ymd_opt(2024, 10, 25).unwrap(),
                NaiveDate::from_ymd_opt(2024, 10, 28).unwrap(),
            )
            .unwrap();
        assert_eq!(result.readings.len(), 1);
        assert_eq!(result.readings[0].value, 85.0);
    }

    #[test]
    fn elements_cover_all_users() {
        let store = MemoryStore::new()
            .with_reading(reading(1, "Glucose", 80.0, "2024-10-26", "08:00:00"))
            .with_reading(reading(2, "Cortisol", 300.0, "2024-10-26", "08:00:00"));

        let result = store
            .fetch_readings(
                1,
                NaiveDate::from_ymd_opt(2024, 10, 25).unwrap(),
                NaiveDate::from_ymd_opt(2024, 10, 28).unwrap(),
            )
            .unwrap();
        assert!(result.elements.contains("Cortisol"));
        assert_eq!(result.readings.len(), 1);
    }
}
