use chrono::{DateTime, Utc};

use cadence_core::{
    CadenceError, ColumnResolution, DisplaySegments, DisplayWindow, ForecastInput,
    ForecastRequest, ForecastTable, IntervalColumns, IntervalSpec, QuantileColumn, Record,
    SeriesTable, partition_within, resolve_interval_columns, resolve_quantile_columns,
    train_cutoff,
};

use super::PreparedSeries;
use super::prepare::distinct_timestamps;
use crate::Cadence;
use crate::core::tag_err;

/// Outcome of one forecast run, cached for redraws.
///
/// Changing the display window only re-partitions the cached result via
/// [`ForecastReport::segments`]; it never re-requests a forecast.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastReport {
    /// The series that was sent to the forecaster.
    pub prepared: PreparedSeries,
    /// Forecaster output.
    pub result: ForecastTable,
    /// Latest timestamp of the prepared series; rows at or before it are
    /// historical.
    pub train_end: DateTime<Utc>,
    /// Interval spec actually sent, after any downgrade.
    pub intervals: IntervalSpec,
    /// Resolved interval columns and unresolved levels.
    pub interval_columns: ColumnResolution<IntervalColumns>,
    /// Resolved quantile columns and unresolved quantiles.
    pub quantile_columns: ColumnResolution<QuantileColumn>,
}

impl ForecastReport {
    /// Historical and future rows of the cached result inside `window`.
    #[must_use]
    pub fn segments(&self, window: &DisplayWindow) -> DisplaySegments<'_> {
        partition_within(&self.result, self.train_end, window)
    }

    /// Selected records (before regularization) up to the last forecast
    /// instant, clipped to `window`, for plotting against the forecast.
    #[must_use]
    pub fn actuals(&self, window: &DisplayWindow) -> Vec<&Record> {
        let end = self.forecast_end();
        self.prepared
            .selected()
            .iter()
            .filter(|r| end.is_none_or(|e| r.ts <= e) && window.contains(r.ts))
            .collect()
    }

    /// Latest instant in the forecast result.
    #[must_use]
    pub fn forecast_end(&self) -> Option<DateTime<Utc>> {
        self.result.max_ts()
    }

    /// All column-resolution failures, levels first.
    pub fn unresolved(&self) -> impl Iterator<Item = &CadenceError> {
        self.interval_columns
            .unresolved
            .iter()
            .chain(&self.quantile_columns.unresolved)
    }
}

impl Cadence {
    /// Levels are dropped when the shortest prepared group is too short for
    /// reliable intervals.
    fn effective_intervals(
        &self,
        requested: &IntervalSpec,
        prepared: &mut PreparedSeries,
    ) -> IntervalSpec {
        let min = self.cfg.min_interval_history;
        if let IntervalSpec::Levels(levels) = requested
            && !levels.is_empty()
        {
            let shortest = prepared.shortest_group_len();
            if shortest < min {
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    shortest,
                    min,
                    "series too short for prediction intervals; forecasting point values only"
                );
                prepared.report.warnings.push(format!(
                    "prediction intervals dropped: shortest series has {shortest} rows, \
                     at least {min} required"
                ));
                return IntervalSpec::None;
            }
        }
        requested.clone()
    }

    /// Prepare the series, call the forecaster, and shape the result.
    ///
    /// Behavior:
    /// - Preparation errors abort before the forecaster is contacted.
    /// - A frequency is required: explicit, or inferred from the selection.
    /// - The forecaster call is bounded by the configured timeout; other
    ///   failures are attributed to the forecaster by name.
    /// - Unresolvable interval or quantile columns are reported in the
    ///   returned report, not raised.
    ///
    /// # Errors
    /// Any error from [`Cadence::prepare`], `AmbiguousFrequency` when no
    /// frequency is known, `Forecaster` / `ForecasterTimeout` from the call,
    /// and `Data` if the result lacks its point column.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "cadence::pipeline::forecast",
            skip(self, table, req),
            fields(
                forecaster = self.forecaster.name(),
                model = %req.model,
                horizon = req.horizon,
            ),
        )
    )]
    pub async fn forecast(
        &self,
        table: &SeriesTable,
        req: &ForecastRequest,
    ) -> Result<ForecastReport, CadenceError> {
        let mut prepared = self.prepare(table, req)?;
        let frequency = prepared
            .frequency
            .ok_or_else(|| CadenceError::AmbiguousFrequency {
                observations: distinct_timestamps(&prepared.series.records),
            })?;
        let train_end = train_cutoff(&prepared.series.records)
            .ok_or_else(|| CadenceError::Data("prepared series is empty".into()))?;
        let intervals = self.effective_intervals(&req.intervals, &mut prepared);

        let input = ForecastInput {
            series: prepared.series.clone(),
            frequency,
            horizon: req.horizon,
            model: req.model.clone(),
            intervals: intervals.clone(),
            add_history: req.add_history,
            model_parameters: req.model_parameters.clone(),
        };
        let name = self.forecaster.name();
        let result = Self::forecaster_call_with_timeout(
            name,
            self.cfg.forecaster_timeout,
            self.forecaster.forecast(input),
        )
        .await
        .map_err(|e| tag_err(name, e))?;
        result.ensure_point_column()?;

        let point = result.point_column().to_string();
        let interval_columns = resolve_interval_columns(&result, &point, intervals.levels());
        let quantile_columns = resolve_quantile_columns(&result, &point, intervals.quantiles());

        #[cfg(feature = "tracing")]
        for e in interval_columns
            .unresolved
            .iter()
            .chain(&quantile_columns.unresolved)
        {
            tracing::warn!(error = %e, "forecast column unresolved");
        }

        Ok(ForecastReport {
            prepared,
            result,
            train_end,
            intervals,
            interval_columns,
            quantile_columns,
        })
    }
}
