//! Row types shared by every store backend.
//!
//! A `Reading` is one sensor observation. Readings are created by an external
//! ingestion path and are immutable once fetched; the engine never mutates or
//! deletes them.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One biomarker observation for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Owning user
    pub user_id: i64,
    /// Case-sensitive biomarker identifier (e.g. "Cortisol")
    pub element_name: String,
    /// Recorded value
    pub value: f64,
    /// Calendar date the value was logged
    pub date_logged: NaiveDate,
    /// Time of day, sub-second precision
    pub time_stamp: NaiveTime,
}

impl Reading {
    pub fn new(
        user_id: i64,
        element_name: impl Into<String>,
        value: f64,
        date_logged: NaiveDate,
        time_stamp: NaiveTime,
    ) -> Self {
        Self {
            user_id,
            element_name: element_name.into(),
            value,
            date_logged,
            time_stamp,
        }
    }

    /// Full timestamp, combining the logged date and the time of day.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.date_logged.and_time(self.time_stamp)
    }
}

/// A reading as it comes off the wire: date and time still in text form.
///
/// The store keeps date and time as text columns; rows whose text does not
/// parse are dropped (and counted) rather than failing the whole fetch.
#[derive(Debug, Clone)]
pub struct RawReading {
    pub user_id: i64,
    pub element_name: String,
    pub value: f64,
    pub date_logged: String,
    pub time_stamp: String,
}

impl RawReading {
    /// Parse the text date/time fields into a typed `Reading`.
    ///
    /// Accepts `YYYY-MM-DD` dates and `HH:MM:SS` times with an optional
    /// fractional-second suffix.
    pub fn parse(self) -> Result<Reading, MalformedTimestamp> {
        let date = NaiveDate::parse_from_str(&self.date_logged, "%Y-%m-%d").map_err(|_| {
            MalformedTimestamp {
                field: "date_logged",
                text: self.date_logged.clone(),
            }
        })?;
        let time = NaiveTime::parse_from_str(&self.time_stamp, "%H:%M:%S%.f").map_err(|_| {
            MalformedTimestamp {
                field: "time_stamp",
                text: self.time_stamp.clone(),
            }
        })?;
        Ok(Reading {
            user_id: self.user_id,
            element_name: self.element_name,
            value: self.value,
            date_logged: date,
            time_stamp: time,
        })
    }
}

/// A row whose date or time text could not be parsed.
#[derive(Debug, Clone)]
pub struct MalformedTimestamp {
    /// Which field failed to parse
    pub field: &'static str,
    /// The offending text
    pub text: String,
}

impl std::fmt::Display for MalformedTimestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "malformed {}: {:?}", self.field, self.text)
    }
}

impl std::error::Error for MalformedTimestamp {}

/// Per-element healthy/critical bounds.
///
/// Any absent bound means no threshold is defined for that side; the
/// classifier treats a partially-defined range as "N/A".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRange {
    pub element_name: String,
    pub lower_critical_limit: Option<f64>,
    pub lower_limit: Option<f64>,
    pub upper_limit: Option<f64>,
    pub upper_critical_limit: Option<f64>,
}

impl ReferenceRange {
    /// True when all four bounds are present.
    pub fn is_complete(&self) -> bool {
        self.lower_critical_limit.is_some()
            && self.lower_limit.is_some()
            && self.upper_limit.is_some()
            && self.upper_critical_limit.is_some()
    }
}

/// Result of one range fetch: the snapshot every downstream pass works from.
#[derive(Debug, Clone, Default)]
pub struct FetchResult {
    /// All readings in the queried window, in store order
    pub readings: Vec<Reading>,
    /// Distinct element names present in the store
    pub elements: BTreeSet<String>,
    /// Rows dropped because their date/time text did not parse
    pub dropped_rows: usize,
}

impl FetchResult {
    /// True when the fetch matched no rows.
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_reading_parses_subsecond_time() {
        let raw = RawReading {
            user_id: 1,
            element_name: "Cortisol".to_string(),
            value: 140.0,
            date_logged: "2024-10-27".to_string(),
            time_stamp: "08:30:15.250".to_string(),
        };
        let reading = raw.parse().unwrap();
        assert_eq!(reading.date_logged, NaiveDate::from_ymd_opt(2024, 10, 27).unwrap());
        assert_eq!(
            reading.time_stamp,
            NaiveTime::from_hms_milli_opt(8, 30, 15, 250).unwrap()
        );
    }

    #[test]
    fn test_raw_reading_parses_whole_second_time() {
        let raw = RawReading {
            user_id: 1,
            element_name: "Glucose".to_string(),
            value: 90.0,
            date_logged: "2024-10-27".to_string(),
            time_stamp: "23:59:59".to_string(),
        };
        assert!(raw.parse().is_ok());
    }

    #[test]
    fn test_raw_reading_rejects_garbage_date() {
        let raw = RawReading {
            user_id: 1,
            element_name: "Glucose".to_string(),
            value: 90.0,
            date_logged: "27/10/2024".to_string(),
            time_stamp: "08:00:00".to_string(),
        };
        let err = raw.parse().unwrap_err();
        assert_eq!(err.field, "date_logged");
    }

    #[test]
    fn test_timestamp_combines_date_and_time() {
        let reading = Reading::new(
            1,
            "Glucose",
            90.0,
            NaiveDate::from_ymd_opt(2024, 10, 27).unwrap(),
            NaiveTime::from_hms_opt(8, 15, 0).unwrap(),
        );
        assert_eq!(
            reading.timestamp(),
            NaiveDate::from_ymd_opt(2024, 10, 27)
                .unwrap()
                .and_hms_opt(8, 15, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_reference_range_completeness() {
        let mut range = ReferenceRange {
            element_name: "Glucose".to_string(),
            lower_critical_limit: Some(50.0),
            lower_limit: Some(60.0),
            upper_limit: Some(100.0),
            upper_critical_limit: Some(120.0),
        };
        assert!(range.is_complete());
        range.upper_limit = None;
        assert!(!range.is_complete());
    }
}
