//! Grouped trend statistics.
//!
//! Two passes over the same snapshot: readings grouped by `(day, element)`
//! and by `(hour-of-day, element)`. The hour pass ignores the calendar date,
//! aggregating every day's readings at that hour into a diurnal profile.
//! Each group carries a mean and population variance; a trailing window-2
//! rolling mean/std is then derived over each element's ordered groups.

use crate::engine::stats;
use crate::store::Reading;
use chrono::{NaiveDate, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key of one trend group: a calendar date or an hour of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GroupKey {
    Day(NaiveDate),
    /// Hour of day, 0..=23; renders as `"HH:00:00"`
    Hour(u32),
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupKey::Day(date) => write!(f, "{date}"),
            GroupKey::Hour(h) => write!(f, "{h:02}:00:00"),
        }
    }
}

/// Aggregate over one `(key, element)` group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendGroup {
    pub key: GroupKey,
    pub element_name: String,
    /// Mean of the group's readings
    pub mean: f64,
    /// Population variance of the group's readings
    pub population_variance: f64,
    /// Trailing window-2 rolling mean over this element's group means;
    /// undefined for the element's first group
    pub rolling_mean_w2: Option<f64>,
    /// Trailing window-2 rolling sample std over this element's group means;
    /// undefined for the element's first group
    pub rolling_std_w2: Option<f64>,
}

/// Group readings by `(date_logged, element)`.
///
/// Output is ordered by element, then date ascending, so each element's
/// rolling sequence is contiguous.
pub fn by_day(readings: &[Reading]) -> Vec<TrendGroup> {
    grouped(readings, |r| GroupKey::Day(r.date_logged))
}

/// Group readings by `(hour-of-day, element)`, ignoring the date.
pub fn by_hour(readings: &[Reading]) -> Vec<TrendGroup> {
    grouped(readings, |r| GroupKey::Hour(r.time_stamp.hour()))
}

fn grouped(readings: &[Reading], key_of: impl Fn(&Reading) -> GroupKey) -> Vec<TrendGroup> {
    let mut groups: BTreeMap<(String, GroupKey), Vec<f64>> = BTreeMap::new();
    for reading in readings {
        groups
            .entry((reading.element_name.clone(), key_of(reading)))
            .or_default()
            .push(reading.value);
    }

    let mut out = Vec::with_capacity(groups.len());
    let mut previous: Option<(String, f64)> = None;
    for ((element, key), values) in groups {
        // Groups are non-empty by construction.
        let mean = stats::mean(&values).expect("non-empty group");
        let population_variance = stats::population_variance(&values).expect("non-empty group");

        // Rolling stats pair this group's mean with the previous group of the
        // same element; the element's first group has no window.
        let window = match &previous {
            Some((prev_element, prev_mean)) if *prev_element == element => {
                Some([*prev_mean, mean])
            }
            _ => None,
        };
        let rolling_mean_w2 = window.as_ref().and_then(|pair| stats::mean(pair));
        let rolling_std_w2 = window.as_ref().and_then(|pair| stats::sample_std(pair));
        previous = Some((element.clone(), mean));

        out.push(TrendGroup {
            key,
            element_name: element,
            mean,
            population_variance,
            rolling_mean_w2,
            rolling_std_w2,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn reading(element: &str, value: f64, date: &str, time: &str) -> Reading {
        Reading::new(
            1,
            element,
            value,
            date.parse::<NaiveDate>().unwrap(),
            time.parse::<NaiveTime>().unwrap(),
        )
    }

    #[test]
    fn test_by_day_group_stats() {
        let readings = [
            reading("Glucose", 80.0, "2024-10-26", "08:00:00"),
            reading("Glucose", 100.0, "2024-10-26", "14:00:00"),
            reading("Glucose", 110.0, "2024-10-27", "08:00:00"),
        ];
        let groups = by_day(&readings);
        assert_eq!(groups.len(), 2);

        let first = &groups[0];
        assert_eq!(first.key, GroupKey::Day("2024-10-26".parse().unwrap()));
        assert_eq!(first.mean, 90.0);
        assert!((first.population_variance - 100.0).abs() < 1e-9);
        assert_eq!(first.rolling_mean_w2, None);
        assert_eq!(first.rolling_std_w2, None);

        let second = &groups[1];
        assert_eq!(second.mean, 110.0);
        // Single sample: variance zero.
        assert!(second.population_variance.abs() < 1e-9);
        assert_eq!(second.rolling_mean_w2, Some(100.0));
        let expected_std = (110.0_f64 - 90.0).abs() / 2.0_f64.sqrt();
        assert!((second.rolling_std_w2.unwrap() - expected_std).abs() < 1e-9);
    }

    #[test]
    fn test_rolling_never_crosses_elements() {
        let readings = [
            reading("Cortisol", 300.0, "2024-10-26", "08:00:00"),
            reading("Glucose", 90.0, "2024-10-26", "08:00:00"),
        ];
        let groups = by_day(&readings);
        // Both are the first group of their element: no rolling stats.
        assert!(groups.iter().all(|g| g.rolling_mean_w2.is_none()));
    }

    #[test]
    fn test_by_hour_aggregates_across_days() {
        let readings = [
            reading("Glucose", 80.0, "2024-10-26", "08:15:00"),
            reading("Glucose", 90.0, "2024-10-27", "08:45:00"),
            reading("Glucose", 120.0, "2024-10-27", "13:00:00"),
        ];
        let groups = by_hour(&readings);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, GroupKey::Hour(8));
        assert_eq!(groups[0].mean, 85.0);
        assert_eq!(groups[1].key, GroupKey::Hour(13));
        assert_eq!(groups[1].mean, 120.0);
    }

    #[test]
    fn test_hour_key_renders_padded() {
        assert_eq!(GroupKey::Hour(8).to_string(), "08:00:00");
        assert_eq!(GroupKey::Hour(23).to_string(), "23:00:00");
    }

    #[test]
    fn test_empty_input_yields_no_groups() {
        assert!(by_day(&[]).is_empty());
        assert!(by_hour(&[]).is_empty());
    }

    #[test]
    fn test_variance_non_negative_across_groups() {
        let readings = [
            reading("Glucose", 1e6, "2024-10-26", "08:00:00"),
            reading("Glucose", 1e6 + 2.0, "2024-10-26", "09:00:00"),
            reading("Glucose", 1e6 + 4.0, "2024-10-26", "10:00:00"),
        ];
        for group in by_day(&readings) {
            assert!(group.population_variance >= -1e-6);
        }
    }
}
