//! Configuration and request types shared by the pipeline and orchestrator.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CadenceError, Frequency, ImputationPolicy, IntervalSpec};

/// Caller-supplied column names of the tabular series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnBindings {
    /// Group identifier column; `None` means the whole table is one series.
    pub id_col: Option<String>,
    /// Timestamp column.
    pub time_col: String,
    /// Numeric target column.
    pub target_col: String,
}

impl Default for ColumnBindings {
    fn default() -> Self {
        Self {
            id_col: Some("unique_id".to_string()),
            time_col: "ds".to_string(),
            target_col: "y".to_string(),
        }
    }
}

impl ColumnBindings {
    /// Bindings for a table without a group identifier column.
    pub fn ungrouped(time_col: impl Into<String>, target_col: impl Into<String>) -> Self {
        Self {
            id_col: None,
            time_col: time_col.into(),
            target_col: target_col.into(),
        }
    }

    /// Bindings for a grouped table.
    pub fn grouped(
        id_col: impl Into<String>,
        time_col: impl Into<String>,
        target_col: impl Into<String>,
    ) -> Self {
        Self {
            id_col: Some(id_col.into()),
            time_col: time_col.into(),
            target_col: target_col.into(),
        }
    }

    /// Identifier column name handed to the forecaster, which always expects one.
    #[must_use]
    pub fn id_col_or_default(&self) -> &str {
        self.id_col.as_deref().unwrap_or("unique_id")
    }

    /// Ensure the bound names are non-empty and distinct.
    ///
    /// # Errors
    /// Returns `InvalidArg` on an empty or repeated column name.
    pub fn validate(&self) -> Result<(), CadenceError> {
        let mut names: Vec<&str> = vec![self.time_col.as_str(), self.target_col.as_str()];
        if let Some(id) = self.id_col.as_deref() {
            names.push(id);
        }
        if names.iter().any(|n| n.trim().is_empty()) {
            return Err(CadenceError::InvalidArg("column names must not be empty".into()));
        }
        for (i, n) in names.iter().enumerate() {
            if names[i + 1..].contains(n) {
                return Err(CadenceError::InvalidArg(format!(
                    "column '{n}' is bound more than once"
                )));
            }
        }
        Ok(())
    }
}

/// One immutable description of a forecast run.
///
/// Every pipeline run is a pure function of this request and the loaded
/// table; nothing is read from UI state while the run is in flight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRequest {
    /// Column bindings of the input table.
    pub columns: ColumnBindings,
    /// Restrict the run to one series id (only meaningful with an id column).
    pub series_id: Option<String>,
    /// Inclusive lower bound of the training range.
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound of the training range.
    pub end: Option<DateTime<Utc>>,
    /// Explicit frequency; `None` requests inference.
    pub frequency: Option<Frequency>,
    /// Deduplicate and re-grid each group before imputation.
    pub regularize: bool,
    /// Imputation policy; `None` skips imputation.
    pub imputation: Option<ImputationPolicy>,
    /// Number of future steps to forecast.
    pub horizon: usize,
    /// Model identifier passed through to the forecaster.
    pub model: String,
    /// Requested interval or quantile output.
    pub intervals: IntervalSpec,
    /// Ask the forecaster for fitted values over the training range as well.
    pub add_history: bool,
    /// Opaque model parameters passed through to the forecaster.
    pub model_parameters: Option<serde_json::Value>,
}

impl Default for ForecastRequest {
    fn default() -> Self {
        Self {
            columns: ColumnBindings::default(),
            series_id: None,
            start: None,
            end: None,
            frequency: None,
            regularize: true,
            imputation: Some(ImputationPolicy::ForwardBackward),
            horizon: 24,
            model: "timegpt-1".to_string(),
            intervals: IntervalSpec::Levels(vec![80.0, 90.0]),
            add_history: false,
            model_parameters: None,
        }
    }
}

impl ForecastRequest {
    /// Start from defaults with the given column bindings.
    #[must_use]
    pub fn new(columns: ColumnBindings) -> Self {
        Self {
            columns,
            ..Self::default()
        }
    }

    /// Select a single series by id.
    #[must_use]
    pub fn with_series_id(mut self, id: impl Into<String>) -> Self {
        self.series_id = Some(id.into());
        self
    }

    /// Restrict training data to the inclusive range `[start, end]`.
    #[must_use]
    pub const fn with_range(
        mut self,
        start: Option<DateTime<Utc>>,
        end: Option<DateTime<Utc>>,
    ) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Use an explicit frequency instead of inference.
    #[must_use]
    pub const fn with_frequency(mut self, frequency: Frequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Toggle deduplication and re-gridding.
    #[must_use]
    pub const fn with_regularize(mut self, yes: bool) -> Self {
        self.regularize = yes;
        self
    }

    /// Select an imputation policy, or `None` to skip imputation.
    #[must_use]
    pub const fn with_imputation(mut self, policy: Option<ImputationPolicy>) -> Self {
        self.imputation = policy;
        self
    }

    /// Set the forecast horizon.
    #[must_use]
    pub const fn with_horizon(mut self, horizon: usize) -> Self {
        self.horizon = horizon;
        self
    }

    /// Set the model identifier.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the requested interval output.
    #[must_use]
    pub fn with_intervals(mut self, intervals: IntervalSpec) -> Self {
        self.intervals = intervals;
        self
    }

    /// Toggle fitted values over the training range.
    #[must_use]
    pub const fn with_add_history(mut self, yes: bool) -> Self {
        self.add_history = yes;
        self
    }

    /// Attach opaque model parameters.
    #[must_use]
    pub fn with_model_parameters(mut self, params: serde_json::Value) -> Self {
        self.model_parameters = Some(params);
        self
    }

    /// Check the request before any data is touched.
    ///
    /// # Errors
    /// - `InvalidArg` for bad column bindings, a zero horizon, an empty model
    ///   name, a reversed training range, or a series id without an id column.
    /// - `ConflictingIntervalSpec` / `InvalidArg` from the interval spec.
    /// - `InvalidFrequency` for an explicit frequency with a non-positive step.
    pub fn validate(&self) -> Result<(), CadenceError> {
        self.columns.validate()?;
        if self.horizon == 0 {
            return Err(CadenceError::InvalidArg("horizon must be at least 1".into()));
        }
        if self.model.trim().is_empty() {
            return Err(CadenceError::InvalidArg("model must not be empty".into()));
        }
        if let (Some(s), Some(e)) = (self.start, self.end)
            && s > e
        {
            return Err(CadenceError::InvalidArg(format!(
                "training range start {s} is after end {e}"
            )));
        }
        if self.series_id.is_some() && self.columns.id_col.is_none() {
            return Err(CadenceError::InvalidArg(
                "series_id requires an id column binding".into(),
            ));
        }
        if let Some(Frequency::Every { seconds }) = self.frequency
            && seconds <= 0
        {
            return Err(CadenceError::invalid_frequency(
                format!("{seconds}s"),
                "step must be positive",
            ));
        }
        self.intervals.validate()
    }
}

/// Time window applied when redrawing a cached forecast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayWindow {
    /// Inclusive lower bound; `None` is unbounded.
    pub start: Option<DateTime<Utc>>,
    /// Inclusive upper bound; `None` is unbounded.
    pub end: Option<DateTime<Utc>>,
}

impl DisplayWindow {
    /// Window with both bounds open.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Returns `true` if `ts` lies inside the window.
    #[must_use]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start.is_none_or(|s| ts >= s) && self.end.is_none_or(|e| ts <= e)
    }
}

/// Global configuration for the `Cadence` orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CadenceConfig {
    /// Upper bound on a single forecaster call.
    pub forecaster_timeout: Duration,
    /// Shortest prepared group that still receives prediction intervals.
    /// Shorter runs drop the requested levels and proceed point-only.
    pub min_interval_history: usize,
    /// Policy used by callers that build requests from bare selector state.
    pub default_policy: ImputationPolicy,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            forecaster_timeout: Duration::from_secs(30),
            min_interval_history: 25,
            default_policy: ImputationPolicy::ForwardBackward,
        }
    }
}
