use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the cadence workspace.
///
/// Frequency and imputation failures abort a pipeline run before the
/// forecaster is contacted. `UnresolvableColumn` is reported per requested
/// level or quantile and never aborts a run on its own.
#[derive(Debug, Error, Serialize, Deserialize, Clone, PartialEq)]
#[non_exhaustive]
pub enum CadenceError {
    /// Inference found no stable modal step; supply a frequency explicitly or
    /// proceed ungridded.
    #[error("ambiguous frequency: no stable step across {observations} distinct timestamps")]
    AmbiguousFrequency {
        /// Number of distinct timestamps that were inspected.
        observations: usize,
    },

    /// A frequency token does not parse or yields a non-positive step.
    #[error("invalid frequency '{token}': {reason}")]
    InvalidFrequency {
        /// The offending token (or rendered frequency).
        token: String,
        /// Why the token was rejected.
        reason: String,
    },

    /// Target values are still missing after the requested imputation policy.
    #[error("unfillable series{}: {missing} missing value(s) after imputation", group_label(.group))]
    UnfillableSeries {
        /// Group identifier of the first failing group (`None` for the implicit group).
        group: Option<String>,
        /// Number of missing values left in that group.
        missing: usize,
    },

    /// Confidence levels and quantiles were requested at the same time.
    #[error("conflicting interval spec: use levels or quantiles, not both")]
    ConflictingIntervalSpec,

    /// A requested level or quantile has no matching column in a forecast result.
    #[error("no result column for {what} (tried {tried:?})")]
    UnresolvableColumn {
        /// Human-readable description of the request, e.g. "level 80".
        what: String,
        /// Column names that were looked up, in order.
        tried: Vec<String>,
    },

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// Issues with supplied or returned data (mismatched lengths, missing keys).
    #[error("data issue: {0}")]
    Data(String),

    /// The forecaster returned an error.
    #[error("{forecaster} failed: {msg}")]
    Forecaster {
        /// Forecaster name that failed.
        forecaster: String,
        /// Human-readable error message.
        msg: String,
    },

    /// The forecaster call exceeded the configured timeout.
    #[error("forecaster timed out: {forecaster}")]
    ForecasterTimeout {
        /// Forecaster name that timed out.
        forecaster: String,
    },

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

fn group_label(group: &Option<String>) -> String {
    group
        .as_deref()
        .map(|g| format!(" for group '{g}'"))
        .unwrap_or_default()
}

impl CadenceError {
    /// Helper: build an `InvalidFrequency` error.
    pub fn invalid_frequency(token: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFrequency {
            token: token.into(),
            reason: reason.into(),
        }
    }

    /// Helper: build an `UnfillableSeries` error.
    #[must_use]
    pub const fn unfillable(group: Option<String>, missing: usize) -> Self {
        Self::UnfillableSeries { group, missing }
    }

    /// Helper: build an `UnresolvableColumn` error.
    pub fn unresolvable(what: impl Into<String>, tried: Vec<String>) -> Self {
        Self::UnresolvableColumn {
            what: what.into(),
            tried,
        }
    }

    /// Helper: build a `Forecaster` error with the forecaster name and message.
    pub fn forecaster(forecaster: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Forecaster {
            forecaster: forecaster.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `ForecasterTimeout` error.
    pub fn forecaster_timeout(forecaster: impl Into<String>) -> Self {
        Self::ForecasterTimeout {
            forecaster: forecaster.into(),
        }
    }

    /// Returns true if this error must abort a pipeline run.
    ///
    /// Only column-resolution failures are non-fatal: callers may still use
    /// whatever did resolve.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::UnresolvableColumn { .. })
    }

    /// Returns true for errors raised before the forecaster is contacted.
    #[must_use]
    pub const fn is_preparation_error(&self) -> bool {
        matches!(
            self,
            Self::AmbiguousFrequency { .. }
                | Self::InvalidFrequency { .. }
                | Self::UnfillableSeries { .. }
                | Self::ConflictingIntervalSpec
        )
    }
}
