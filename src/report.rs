//! Per-request analysis orchestration and plain-text rendering.
//!
//! One analysis request fetches one immutable snapshot of readings and
//! derives every aggregate from it: resampled display series, by-day and
//! by-hour trend groups, all-time baselines, and correlation edges. The
//! rendered text blocks are consumed verbatim by a downstream narrative
//! summarizer; nothing here decides what that narrative says.

use crate::classify;
use crate::engine::{
    baseline, by_day, by_hour, by_hour_correlation, resample, CorrelationEdge, HistoricalBaseline,
    ResampledSeries, Resolution, TrendGroup,
};
use crate::store::{ReadingStore, StoreError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use tracing::debug;

/// Parameters of one analysis run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub user_id: i64,
    /// Open-interval lower bound: readings ON this date are excluded
    pub start: NaiveDate,
    /// Open-interval upper bound: readings ON this date are excluded
    pub end: NaiveDate,
    pub resolution: Resolution,
}

impl AnalysisRequest {
    /// Build a request covering `first..=last` inclusive by widening the
    /// open fetch interval one day on each side.
    pub fn inclusive(user_id: i64, first: NaiveDate, last: NaiveDate, resolution: Resolution) -> Self {
        Self {
            user_id,
            start: first.pred_opt().unwrap_or(first),
            end: last.succ_opt().unwrap_or(last),
            resolution,
        }
    }
}

/// All aggregates derived from one snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub user_id: i64,
    pub resolution: Resolution,
    /// Per-element resampled display series
    pub series: BTreeMap<String, ResampledSeries>,
    /// (day, element) trend groups
    pub by_day: Vec<TrendGroup>,
    /// (hour-of-day, element) trend groups — the diurnal profile
    pub by_hour: Vec<TrendGroup>,
    /// All-time per-element baselines
    pub baselines: BTreeMap<String, HistoricalBaseline>,
    /// Deduplicated pairwise correlation edges
    pub correlations: Vec<CorrelationEdge>,
    /// Rows dropped at fetch time for unparseable timestamps
    pub dropped_rows: usize,
}

/// Run one full analysis: a single fetch, then pure derivation.
pub fn analyze<S: ReadingStore>(
    store: &S,
    request: &AnalysisRequest,
) -> Result<AnalysisReport, StoreError> {
    let snapshot = store.fetch_readings(request.user_id, request.start, request.end)?;
    debug!(
        user_id = request.user_id,
        readings = snapshot.readings.len(),
        elements = snapshot.elements.len(),
        dropped = snapshot.dropped_rows,
        "fetched snapshot"
    );

    let series = resample(&snapshot.readings, &snapshot.elements, request.resolution);
    let by_day = by_day(&snapshot.readings);
    let by_hour = by_hour(&snapshot.readings);
    let correlations = by_hour_correlation(&by_hour);
    let baselines = baseline::summarize(&snapshot.readings);
    debug!(
        day_groups = by_day.len(),
        hour_groups = by_hour.len(),
        edges = correlations.len(),
        "derived aggregates"
    );

    Ok(AnalysisReport {
        user_id: request.user_id,
        resolution: request.resolution,
        series,
        by_day,
        by_hour,
        baselines,
        correlations,
        dropped_rows: snapshot.dropped_rows,
    })
}

impl AnalysisReport {
    /// Render each element's resampled series as its own text block.
    pub fn render_series(&self) -> Vec<String> {
        self.series
            .values()
            .map(|series| render_one_series(series, self.resolution, None))
            .collect()
    }

    /// Like [`render_series`](Self::render_series), but each point carries
    /// its healthy-range annotation looked up from the store.
    pub fn render_classified_series<S: ReadingStore>(
        &self,
        store: &S,
    ) -> Result<Vec<String>, StoreError> {
        let mut blocks = Vec::with_capacity(self.series.len());
        for series in self.series.values() {
            let range = store.reference_range(&series.element_name)?;
            blocks.push(render_one_series(series, self.resolution, range.as_ref()));
        }
        Ok(blocks)
    }

    /// Render the four aggregate tables as one labeled text block.
    pub fn render_stats(&self) -> String {
        let mut out = String::new();

        out.push_str("Statistical analysis grouped by hour:\n");
        render_trend_groups(&mut out, &self.by_hour);

        out.push_str("\nStatistical analysis grouped by day:\n");
        render_trend_groups(&mut out, &self.by_day);

        out.push_str("\nUser average across all time:\n");
        if self.baselines.is_empty() {
            out.push_str("  insufficient data\n");
        }
        for baseline in self.baselines.values() {
            let _ = writeln!(
                out,
                "  {}  mean={:.4}  variance={:.4}  n={}",
                baseline.element_name, baseline.mean, baseline.population_variance, baseline.count
            );
        }

        out.push_str("\nCorrelation between elements by hour:\n");
        if self.correlations.is_empty() {
            out.push_str("  insufficient data\n");
        }
        for edge in &self.correlations {
            match edge.correlation {
                Some(r) => {
                    let _ = writeln!(out, "  {} ~ {}  r={:.4}", edge.element_a, edge.element_b, r);
                }
                None => {
                    let _ = writeln!(
                        out,
                        "  {} ~ {}  not computable",
                        edge.element_a, edge.element_b
                    );
                }
            }
        }

        out
    }
}

fn render_trend_groups(out: &mut String, groups: &[TrendGroup]) {
    if groups.is_empty() {
        out.push_str("  insufficient data\n");
        return;
    }
    for group in groups {
        let _ = write!(
            out,
            "  {}  {}  mean={:.4}  variance={:.4}",
            group.key, group.element_name, group.mean, group.population_variance
        );
        match (group.rolling_mean_w2, group.rolling_std_w2) {
            (Some(m), Some(s)) => {
                let _ = writeln!(out, "  rolling_mean={m:.4}  rolling_std={s:.4}");
            }
            _ => {
                let _ = writeln!(out, "  rolling=n/a");
            }
        }
    }
}

fn render_one_series(
    series: &ResampledSeries,
    resolution: Resolution,
    range: Option<&crate::store::ReferenceRange>,
) -> String {
    let mut out = format!("{} (resampled at {}):\n", series.element_name, resolution);
    if series.points.is_empty() {
        out.push_str("  no readings in range\n");
        return out;
    }
    for point in &series.points {
        let _ = write!(
            out,
            "  {}  {:.4}",
            point.bucket_start.format("%Y-%m-%d %H:%M:%S"),
            point.mean_value
        );
        if range.is_some() {
            let category = classify::classify_value(range, point.mean_value);
            let _ = write!(out, "  {}", category.annotation());
        }
        out.push('\n');
    }
    out
}
