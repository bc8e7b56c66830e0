//! Time-series utilities shared by the pipeline and orchestrator.
//!
//! Modules include:
//! - `infer`: infer the sampling frequency of a timestamp column
//! - `calendar`: grid stepping for calendar and fixed frequencies
//! - `grid`: deduplicate and reindex each group onto its regular grid
//! - `impute`: fill missing target values per group
//! - `partition`: split a forecast result into historical and future rows
//! - `columns`: locate interval and quantile columns in a forecast result
/// Calendar arithmetic for grid generation.
pub mod calendar;
/// Interval and quantile column resolution.
pub mod columns;
/// Grid reconciliation.
pub mod grid;
/// Missing-value imputation.
pub mod impute;
/// Frequency inference helpers.
pub mod infer;
/// Historical / future partitioning of forecast results.
pub mod partition;
/// Shared helpers for record grouping and invariants.
pub mod util;
