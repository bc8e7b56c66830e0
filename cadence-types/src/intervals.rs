use serde::{Deserialize, Serialize};

use crate::CadenceError;

/// Uncertainty output requested from the forecaster.
///
/// Confidence levels and quantiles are mutually exclusive; construct through
/// [`IntervalSpec::from_parts`] or [`IntervalSpec::parse`] to have that
/// enforced together with range checks.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "values")]
pub enum IntervalSpec {
    /// Point forecast only.
    #[default]
    None,
    /// Prediction intervals at the given confidence levels, in percent (0, 100).
    Levels(Vec<f64>),
    /// Quantile forecasts at the given probabilities in (0, 1).
    Quantiles(Vec<f64>),
}

impl IntervalSpec {
    /// Build a spec from optional level and quantile lists.
    ///
    /// Empty lists count as absent. Values are sorted ascending and
    /// de-duplicated.
    ///
    /// # Errors
    /// - `ConflictingIntervalSpec` if both lists are non-empty.
    /// - `InvalidArg` if a level lies outside (0, 100) or a quantile outside (0, 1).
    pub fn from_parts(
        levels: Option<Vec<f64>>,
        quantiles: Option<Vec<f64>>,
    ) -> Result<Self, CadenceError> {
        let levels = levels.filter(|v| !v.is_empty());
        let quantiles = quantiles.filter(|v| !v.is_empty());
        match (levels, quantiles) {
            (Some(_), Some(_)) => Err(CadenceError::ConflictingIntervalSpec),
            (Some(levels), None) => {
                check_open_range(&levels, 100.0, "level")?;
                Ok(Self::Levels(normalized(levels)))
            }
            (None, Some(quantiles)) => {
                check_open_range(&quantiles, 1.0, "quantile")?;
                Ok(Self::Quantiles(normalized(quantiles)))
            }
            (None, None) => Ok(Self::None),
        }
    }

    /// Parse comma-separated level and quantile lists, e.g. `"80, 90"` and `""`.
    ///
    /// # Errors
    /// Returns `InvalidArg` for entries that are not numbers, plus every error
    /// of [`IntervalSpec::from_parts`].
    pub fn parse(levels: &str, quantiles: &str) -> Result<Self, CadenceError> {
        Self::from_parts(parse_list(levels, "level")?, parse_list(quantiles, "quantile")?)
    }

    /// Requested confidence levels (empty unless `Levels`).
    #[must_use]
    pub fn levels(&self) -> &[f64] {
        match self {
            Self::Levels(v) => v,
            _ => &[],
        }
    }

    /// Requested quantiles (empty unless `Quantiles`).
    #[must_use]
    pub fn quantiles(&self) -> &[f64] {
        match self {
            Self::Quantiles(v) => v,
            _ => &[],
        }
    }

    /// Returns `true` when only a point forecast is requested.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Re-check the invariants of a spec that may have been built directly
    /// or deserialized.
    ///
    /// # Errors
    /// Same as [`IntervalSpec::from_parts`].
    pub fn validate(&self) -> Result<(), CadenceError> {
        match self {
            Self::None => Ok(()),
            Self::Levels(v) => check_open_range(v, 100.0, "level"),
            Self::Quantiles(v) => check_open_range(v, 1.0, "quantile"),
        }
    }
}

fn parse_list(text: &str, what: &str) -> Result<Option<Vec<f64>>, CadenceError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f64>()
                .map_err(|_| CadenceError::InvalidArg(format!("{what} '{s}' is not a number")))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn check_open_range(values: &[f64], upper: f64, what: &str) -> Result<(), CadenceError> {
    match values.iter().find(|v| !(v.is_finite() && **v > 0.0 && **v < upper)) {
        Some(bad) => Err(CadenceError::InvalidArg(format!(
            "{what} {bad} outside the open interval (0, {upper})"
        ))),
        None => Ok(()),
    }
}

fn normalized(mut values: Vec<f64>) -> Vec<f64> {
    values.sort_by(f64::total_cmp);
    values.dedup();
    values
}
