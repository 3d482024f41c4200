//! Biotrend - biomarker time-series aggregation and trend engine.
//!
//! This library ingests irregularly-sampled physiological readings per user
//! and element (e.g. cortisol, glucose) and produces the structured numeric
//! aggregates a downstream narrative summarizer consumes:
//!
//! - per-element resampled display series at a caller-chosen resolution
//! - by-day and by-hour trend groups (mean, population variance, window-2
//!   rolling mean/std)
//! - pairwise-complete Pearson correlations over the diurnal profile
//! - all-time per-element baselines
//! - healthy-range classifications against per-element reference bounds
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Biotrend                            │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐    ┌────────────┐    ┌─────────────────────┐  │
//! │  │   Store   │──▶ │  Snapshot  │──▶ │ Resampler           │  │
//! │  │ (SQLite)  │    │ (one fetch)│    │ Trend Aggregator    │  │
//! │  └───────────┘    └────────────┘    │ Correlation Analyzer│  │
//! │        │                            │ Hist. Summarizer    │  │
//! │        ▼                            └─────────────────────┘  │
//! │  ┌───────────┐                               │               │
//! │  │ Reference │──▶ Range Classifier           ▼               │
//! │  │  ranges   │                        AnalysisReport         │
//! │  └───────────┘                      (plain-text blocks)      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything downstream of the fetch is a pure function of one immutable
//! snapshot; concurrent requests each take their own snapshot and share
//! nothing mutable. The reference-range table is read-only and safe to share.
//!
//! # Example
//!
//! ```no_run
//! use biotrend::engine::Resolution;
//! use biotrend::report::{analyze, AnalysisRequest};
//! use biotrend::store::SqliteStore;
//!
//! let store = SqliteStore::open("readings.sqlite").expect("open store");
//! let request = AnalysisRequest::inclusive(
//!     1,
//!     "2024-10-26".parse().unwrap(),
//!     "2024-10-28".parse().unwrap(),
//!     Resolution::hours(1).unwrap(),
//! );
//! let report = analyze(&store, &request).expect("analysis failed");
//! println!("{}", report.render_stats());
//! ```

pub mod classify;
pub mod config;
pub mod engine;
pub mod report;
pub mod store;

// Re-export key types at crate root for convenience
pub use classify::{classify, classify_strict, classify_value, ClassifyError, RangeCategory};
pub use config::{Config, ConfigError};
pub use engine::{
    CorrelationEdge, HistoricalBaseline, ResampledPoint, ResampledSeries, Resolution, TrendGroup,
};
pub use report::{analyze, AnalysisReport, AnalysisRequest};
pub use store::{
    FetchResult, MemoryStore, Reading, ReadingStore, ReferenceRange, SqliteStore, StoreError,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
