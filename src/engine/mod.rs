//! Pure computation core.
//!
//! Everything here is a function of one immutable snapshot of readings:
//! - resampling into fixed-width bucket-mean series
//! - by-day and by-hour trend groups with window-2 rolling stats
//! - pairwise-complete Pearson correlation over the diurnal profile
//! - all-time per-element baselines

pub mod baseline;
pub mod correlation;
pub mod resample;
pub mod stats;
pub mod trends;

// Re-export commonly used types
pub use baseline::{summarize, HistoricalBaseline};
pub use correlation::{by_hour_correlation, CorrelationEdge};
pub use resample::{resample, ResampledPoint, ResampledSeries, Resolution};
pub use trends::{by_day, by_hour, GroupKey, TrendGroup};
