//! All-time per-element baseline.
//!
//! One mean/variance per element across the whole queried window, no time
//! bucketing. Downstream narrative steps compare the by-day and by-hour
//! trends against this.

use crate::engine::stats;
use crate::store::Reading;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// All-time aggregate for one element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalBaseline {
    pub element_name: String,
    pub mean: f64,
    pub population_variance: f64,
    /// Number of readings behind the aggregate
    pub count: usize,
}

/// Compute the baseline for every element present in the snapshot.
pub fn summarize(readings: &[Reading]) -> BTreeMap<String, HistoricalBaseline> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for reading in readings {
        groups
            .entry(reading.element_name.as_str())
            .or_default()
            .push(reading.value);
    }

    groups
        .into_iter()
        .map(|(element, values)| {
            let baseline = HistoricalBaseline {
                element_name: element.to_string(),
                mean: stats::mean(&values).expect("non-empty group"),
                population_variance: stats::population_variance(&values)
                    .expect("non-empty group"),
                count: values.len(),
            };
            (element.to_string(), baseline)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn reading(element: &str, value: f64, date: &str) -> Reading {
        Reading::new(
            1,
            element,
            value,
            date.parse::<NaiveDate>().unwrap(),
            NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_baseline_per_element() {
        let readings = [
            reading("Glucose", 80.0, "2024-10-26"),
            reading("Glucose", 100.0, "2024-10-27"),
            reading("Cortisol", 250.0, "2024-10-26"),
        ];
        let baselines = summarize(&readings);
        assert_eq!(baselines.len(), 2);

        let glucose = &baselines["Glucose"];
        assert_eq!(glucose.mean, 90.0);
        assert!((glucose.population_variance - 100.0).abs() < 1e-9);
        assert_eq!(glucose.count, 2);

        let cortisol = &baselines["Cortisol"];
        assert_eq!(cortisol.mean, 250.0);
        assert!(cortisol.population_variance.abs() < 1e-9);
    }

    #[test]
    fn test_empty_input_yields_empty_mapping() {
        assert!(summarize(&[]).is_empty());
    }
}
