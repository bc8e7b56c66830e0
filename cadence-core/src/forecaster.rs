use async_trait::async_trait;

use crate::{CadenceError, ForecastTable, Frequency, IntervalSpec, SeriesTable};

/// Everything a forecasting backend needs for one call.
///
/// The series has already been regularized and imputed; `frequency` is the
/// cadence of its grid.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastInput {
    /// Prepared series.
    pub series: SeriesTable,
    /// Grid frequency of `series`.
    pub frequency: Frequency,
    /// Number of future steps per group.
    pub horizon: usize,
    /// Model identifier.
    pub model: String,
    /// Interval or quantile columns to produce (at most one kind).
    pub intervals: IntervalSpec,
    /// Also return fitted values over the training range.
    pub add_history: bool,
    /// Opaque model parameters.
    pub model_parameters: Option<serde_json::Value>,
}

/// A forecasting backend.
///
/// Implementations return a [`ForecastTable`] whose point column carries the
/// forecast and whose interval or quantile columns follow the
/// `<point>-lo-<level>`, `<point>-hi-<level>`, and `<point>-q-<percent>`
/// naming scheme.
#[async_trait]
pub trait Forecaster: Send + Sync {
    /// Human-readable backend name used in errors and logs.
    fn name(&self) -> &'static str;

    /// Produce a forecast for every group in `input.series`.
    async fn forecast(&self, input: ForecastInput) -> Result<ForecastTable, CadenceError>;
}
