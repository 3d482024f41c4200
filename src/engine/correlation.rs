//! Cross-element correlation over the diurnal profile.
//!
//! The by-hour trend groups pivot into an hour × element matrix of group
//! means. Every unordered element pair gets a Pearson correlation computed
//! pairwise-complete: only hours where both elements have a mean participate.
//! Pairs with fewer than two overlapping hours, or with a constant operand,
//! have no defined correlation and carry `None` rather than a made-up zero.

use crate::engine::trends::{GroupKey, TrendGroup};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Correlation between one unordered pair of elements.
///
/// Edges are emitted only with `element_a < element_b` (string order), so the
/// diagonal and the mirrored lower triangle never appear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationEdge {
    pub element_a: String,
    pub element_b: String,
    /// Pearson correlation; `None` when not computable
    pub correlation: Option<f64>,
}

/// Compute the deduplicated pairwise correlation edges from by-hour groups.
pub fn by_hour_correlation(by_hour: &[TrendGroup]) -> Vec<CorrelationEdge> {
    // element -> (hour -> group mean)
    let mut pivot: BTreeMap<&str, BTreeMap<u32, f64>> = BTreeMap::new();
    for group in by_hour {
        if let GroupKey::Hour(hour) = group.key {
            pivot
                .entry(group.element_name.as_str())
                .or_default()
                .insert(hour, group.mean);
        }
    }

    let elements: Vec<&str> = pivot.keys().copied().collect();
    let mut edges = Vec::new();
    for (i, &a) in elements.iter().enumerate() {
        for &b in &elements[i + 1..] {
            let (xs, ys) = overlapping(&pivot[a], &pivot[b]);
            edges.push(CorrelationEdge {
                element_a: a.to_string(),
                element_b: b.to_string(),
                correlation: pearson(&xs, &ys),
            });
        }
    }
    edges
}

/// Values of both series restricted to their shared hours.
fn overlapping(a: &BTreeMap<u32, f64>, b: &BTreeMap<u32, f64>) -> (Vec<f64>, Vec<f64>) {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for (hour, &x) in a {
        if let Some(&y) = b.get(hour) {
            xs.push(x);
            ys.push(y);
        }
    }
    (xs, ys)
}

/// Pearson correlation of two equal-length samples.
///
/// `None` below two points or when either sample is constant.
fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    debug_assert_eq!(xs.len(), ys.len());
    if xs.len() < 2 {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&x, &y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        return None;
    }
    Some(cov / denom)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(element: &str, hour: u32, mean: f64) -> TrendGroup {
        TrendGroup {
            key: GroupKey::Hour(hour),
            element_name: element.to_string(),
            mean,
            population_variance: 0.0,
            rolling_mean_w2: None,
            rolling_std_w2: None,
        }
    }

    #[test]
    fn test_perfectly_correlated_pair() {
        let groups = vec![
            group("Cortisol", 8, 100.0),
            group("Cortisol", 12, 200.0),
            group("Cortisol", 18, 300.0),
            group("Glucose", 8, 10.0),
            group("Glucose", 12, 20.0),
            group("Glucose", 18, 30.0),
        ];
        let edges = by_hour_correlation(&groups);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].element_a, "Cortisol");
        assert_eq!(edges[0].element_b, "Glucose");
        assert!((edges[0].correlation.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_anticorrelated_pair() {
        let groups = vec![
            group("A", 0, 1.0),
            group("A", 1, 2.0),
            group("A", 2, 3.0),
            group("B", 0, 3.0),
            group("B", 1, 2.0),
            group("B", 2, 1.0),
        ];
        let edges = by_hour_correlation(&groups);
        assert!((edges[0].correlation.unwrap() + 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_self_or_mirrored_edges() {
        let groups = vec![
            group("A", 0, 1.0),
            group("A", 1, 2.0),
            group("B", 0, 5.0),
            group("B", 1, 6.0),
            group("C", 0, 9.0),
            group("C", 1, 8.0),
        ];
        let edges = by_hour_correlation(&groups);
        assert_eq!(edges.len(), 3);
        for edge in &edges {
            assert!(edge.element_a < edge.element_b);
        }
    }

    #[test]
    fn test_pairwise_complete_uses_only_shared_hours() {
        let groups = vec![
            group("A", 0, 1.0),
            group("A", 1, 2.0),
            group("A", 2, 100.0), // hour 2 has no B value, must be ignored
            group("B", 0, 10.0),
            group("B", 1, 20.0),
            group("B", 3, -5.0), // hour 3 has no A value, must be ignored
        ];
        let edges = by_hour_correlation(&groups);
        assert!((edges[0].correlation.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_insufficient_overlap_is_undefined() {
        let groups = vec![
            group("A", 0, 1.0),
            group("A", 1, 2.0),
            group("B", 1, 5.0),
            group("B", 2, 6.0),
        ];
        let edges = by_hour_correlation(&groups);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].correlation, None);
    }

    #[test]
    fn test_constant_series_is_undefined() {
        let groups = vec![
            group("A", 0, 7.0),
            group("A", 1, 7.0),
            group("B", 0, 1.0),
            group("B", 1, 2.0),
        ];
        let edges = by_hour_correlation(&groups);
        assert_eq!(edges[0].correlation, None);
    }

    #[test]
    fn test_symmetry_of_underlying_pearson() {
        let xs = [1.0, 4.0, 2.0, 8.0];
        let ys = [2.0, 3.0, 1.0, 9.0];
        let ab = pearson(&xs, &ys).unwrap();
        let ba = pearson(&ys, &xs).unwrap();
        assert!((ab - ba).abs() < 1e-12);
    }

    #[test]
    fn test_empty_input_yields_no_edges() {
        assert!(by_hour_correlation(&[]).is_empty());
    }
}
