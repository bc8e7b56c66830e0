//! cadence-core
//!
//! Core tables, traits, and time-series utilities shared across cadence.
//!
//! - `types`: configuration, request, and error types re-exported from `cadence-types`.
//! - `table`: records, series tables, and forecast result tables.
//! - `forecaster`: the `Forecaster` trait implemented by forecasting backends.
//! - `timeseries`: frequency inference, grid reconciliation, imputation,
//!   result partitioning, and interval column resolution.
//!
#![warn(missing_docs)]

/// The `Forecaster` trait and its input envelope.
pub mod forecaster;
/// Records, series tables, and forecast tables.
pub mod table;
/// Time-series regularization and result shaping.
pub mod timeseries;
pub mod types;

pub use forecaster::{ForecastInput, Forecaster};
pub use table::{ForecastTable, GroupKey, Record, RowKey, SeriesTable};
pub use timeseries::columns::{
    ColumnResolution, IntervalColumns, QuantileColumn, interval_column_names,
    quantile_column_name, resolve_interval_columns, resolve_quantile_columns,
};
pub use timeseries::grid::{MAX_GRID_POINTS, ReconcileStats, reconcile, reconcile_detailed};
pub use timeseries::impute::{ensure_complete, impute};
pub use timeseries::infer::{infer_frequency, infer_frequency_grouped, infer_frequency_strict};
pub use timeseries::partition::{DisplaySegments, Segment, partition, partition_within, train_cutoff};
pub use types::*;
