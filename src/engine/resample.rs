//! Resampling of raw readings into fixed-width time buckets.
//!
//! Buckets are anchored to the Unix epoch so a given resolution always
//! produces the same bucket boundaries across runs. Each bucket reduces to
//! the arithmetic mean of the readings inside it; buckets with no readings
//! produce no output row (sparse series, never zero-filled).

use crate::engine::stats;
use crate::store::Reading;
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Width of a resampling bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    millis: i64,
}

impl Resolution {
    pub fn from_secs(secs: i64) -> Option<Self> {
        (secs > 0).then_some(Self {
            millis: secs * 1000,
        })
    }

    pub fn minutes(n: i64) -> Option<Self> {
        Self::from_secs(n * 60)
    }

    pub fn hours(n: i64) -> Option<Self> {
        Self::from_secs(n * 3600)
    }

    /// Parse a short resolution string: `"30s"`, `"1m"`, `"1h"`, `"1d"`.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let unit = s.chars().last()?;
        let n: i64 = s[..s.len() - unit.len_utf8()].parse().ok()?;
        match unit {
            's' => Self::from_secs(n),
            'm' => Self::minutes(n),
            'h' => Self::hours(n),
            'd' => Self::from_secs(n * 86_400),
            _ => None,
        }
    }

    /// Epoch-anchored start of the bucket containing `ts`.
    fn bucket_start(&self, ts: NaiveDateTime) -> NaiveDateTime {
        let ms = ts.and_utc().timestamp_millis();
        let start = ms.div_euclid(self.millis) * self.millis;
        DateTime::from_timestamp_millis(start)
            .map(|dt| dt.naive_utc())
            .unwrap_or(ts)
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let secs = self.millis / 1000;
        if secs % 86_400 == 0 {
            write!(f, "{}d", secs / 86_400)
        } else if secs % 3600 == 0 {
            write!(f, "{}h", secs / 3600)
        } else if secs % 60 == 0 {
            write!(f, "{}m", secs / 60)
        } else {
            write!(f, "{secs}s")
        }
    }
}

/// One resampled bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResampledPoint {
    /// Start of the bucket (inclusive; the bucket spans one resolution width)
    pub bucket_start: NaiveDateTime,
    /// Mean of all readings whose timestamp fell inside the bucket
    pub mean_value: f64,
}

/// Ordered sparse series for one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResampledSeries {
    pub element_name: String,
    pub points: Vec<ResampledPoint>,
}

impl ResampledSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Resample readings into per-element bucket-mean series.
///
/// One grouped pass keyed by `(element, bucket)` rather than a scan per
/// element; only the numeric `value` column survives into the output. Every
/// element in `elements` gets an entry, empty when it has no rows in range.
pub fn resample(
    readings: &[Reading],
    elements: &BTreeSet<String>,
    resolution: Resolution,
) -> BTreeMap<String, ResampledSeries> {
    // (element, bucket start) -> accumulated values. BTreeMap ordering gives
    // each element's buckets in ascending time order for free.
    let mut groups: BTreeMap<(String, NaiveDateTime), Vec<f64>> = BTreeMap::new();
    for reading in readings {
        let bucket = resolution.bucket_start(reading.timestamp());
        groups
            .entry((reading.element_name.clone(), bucket))
            .or_default()
            .push(reading.value);
    }

    let mut series: BTreeMap<String, ResampledSeries> = elements
        .iter()
        .map(|element| {
            (
                element.clone(),
                ResampledSeries {
                    element_name: element.clone(),
                    points: Vec::new(),
                },
            )
        })
        .collect();

    for ((element, bucket_start), values) in groups {
        let Some(mean_value) = stats::mean(&values) else {
            continue;
        };
        series
            .entry(element.clone())
            .or_insert_with(|| ResampledSeries {
                element_name: element,
                points: Vec::new(),
            })
            .points
            .push(ResampledPoint {
                bucket_start,
                mean_value,
            });
    }

    series
}
