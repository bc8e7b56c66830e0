//! Cadence prepares irregular time series for a forecasting backend and
//! shapes what comes back.
//!
//! Overview
//! - Selects one series (or all groups) and an inclusive training range.
//! - Resolves a sampling frequency: explicit, or inferred per group.
//! - Deduplicates (last write wins) and reindexes every group onto its regular
//!   calendar grid, then fills gaps with the requested imputation policy.
//! - Calls the registered `Forecaster` under a timeout and splits its result
//!   into historical and future segments, resolving interval and quantile
//!   columns by name.
//!
//! Key behaviors and trade-offs
//! - Fail fast: frequency and imputation errors abort before the forecaster is
//!   contacted, so no external call is wasted on a series it cannot use.
//! - Column resolution is lenient: unresolved levels or quantiles are reported
//!   in the `ForecastReport` while resolved columns stay usable.
//! - Short series: when the shortest prepared group has fewer rows than
//!   `min_interval_history`, requested levels are dropped with a warning.
//! - Redraws: `ForecastReport::segments` re-partitions the cached result for a
//!   new display window without another forecaster call.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use cadence::{Cadence, ColumnBindings, DisplayWindow};
//!
//! let cadence = Cadence::builder()
//!     .with_forecaster(Arc::new(cadence_mock::MockForecaster::new()))
//!     .build()?;
//!
//! let req = cadence
//!     .new_request(ColumnBindings::default())
//!     .with_series_id("store-1")
//!     .with_horizon(14);
//! let report = cadence.forecast(&table, &req).await?;
//! let segments = report.segments(&DisplayWindow::all());
//! for (ts, y) in segments.future.series(report.result.point_column()).unwrap_or_default() {
//!     println!("{ts} {y:?}");
//! }
//! ```
//!
//! See `cadence/examples/` for a runnable end-to-end demonstration.
#![warn(missing_docs)]

pub(crate) mod core;
mod pipeline;

pub use core::{Cadence, CadenceBuilder};
pub use pipeline::{ForecastReport, PreparedSeries};

pub use cadence_types::{
    CadenceConfig, CadenceError, ColumnBindings, DisplayWindow, ForecastRequest, Frequency,
    ImputationPolicy, IntervalSpec, PreparationReport,
};

// Re-export core types for convenience
pub use cadence_core::{
    ColumnResolution, DisplaySegments, ForecastInput, ForecastTable, Forecaster, GroupKey,
    IntervalColumns, QuantileColumn, Record, RowKey, Segment, SeriesTable,
};
