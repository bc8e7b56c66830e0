//! cadence-mock
//!
//! Deterministic forecasters for tests and examples.
//!
//! - `MockForecaster`: naive last-value forecast with fixed interval and
//!   quantile bands, plus `FAIL` / `TIMEOUT` series ids that force a failure
//!   or a short delay.
//! - `DynamicMockForecaster`: behavior scripted per model through a
//!   `DynamicMockController`, which also records every input received.
#![warn(missing_docs)]

use std::time::Duration;

use async_trait::async_trait;
use cadence_core::timeseries::calendar::nth_step;
use cadence_core::timeseries::util::split_groups;
use cadence_core::{
    CadenceError, ForecastInput, ForecastTable, Forecaster, IntervalSpec, Record, RowKey,
    interval_column_names, quantile_column_name,
};
use chrono::{DateTime, Utc};

mod dynamic;

pub use dynamic::{DynamicMockController, DynamicMockForecaster, MockBehavior};

/// Point column emitted by the mock forecasters.
pub const POINT_COLUMN: &str = "TimeGPT";

/// Mock forecaster for CI-safe examples. Produces a naive last-value forecast
/// with deterministic interval and quantile bands.
///
/// Series ids `FAIL` and `TIMEOUT` force a failure or a short delay.
pub struct MockForecaster;

impl Default for MockForecaster {
    fn default() -> Self {
        Self::new()
    }
}

impl MockForecaster {
    /// Create the mock forecaster.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    async fn maybe_fail_or_timeout(input: &ForecastInput) -> Result<(), CadenceError> {
        for r in &input.series.records {
            match r.group.as_deref() {
                Some("FAIL") => {
                    return Err(CadenceError::forecaster(
                        "cadence-mock",
                        format!("forced failure: model {}", input.model),
                    ));
                }
                Some("TIMEOUT") => {
                    // Short enough to keep tests quick; the orchestrator may
                    // still time out depending on config
                    tokio::time::sleep(Duration::from_millis(200)).await;
                    return Ok(());
                }
                _ => {}
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Forecaster for MockForecaster {
    fn name(&self) -> &'static str {
        "cadence-mock"
    }

    async fn forecast(&self, input: ForecastInput) -> Result<ForecastTable, CadenceError> {
        Self::maybe_fail_or_timeout(&input).await?;
        naive_forecast(&input)
    }
}

/// Band half-width for a value at `steps` ahead and coverage `level` in `(0, 1)`.
fn half_width(anchor: f64, level: f64, steps: usize) -> f64 {
    let scale = anchor.abs().mul_add(0.05, 1.0);
    #[allow(clippy::cast_precision_loss)]
    let horizon = (steps as f64).sqrt();
    scale * level * horizon
}

struct Row {
    key: RowKey,
    point: f64,
    steps: usize,
}

/// Naive last-value forecast over every group in `input.series`.
///
/// Fitted history (when requested) repeats the previous observation; future
/// rows repeat the last observation. Bands widen with the square root of the
/// step count.
///
/// # Errors
/// Returns `Data` for an empty series or a group without observations, and a
/// forecaster error if the horizon runs off the calendar.
pub fn naive_forecast(input: &ForecastInput) -> Result<ForecastTable, CadenceError> {
    if input.series.is_empty() {
        return Err(CadenceError::Data("cannot forecast an empty series".into()));
    }

    let mut rows: Vec<Row> = Vec::new();
    for (group, mut records) in split_groups(input.series.records.clone()) {
        records.sort_by_key(|r| r.ts);
        let (last_ts, last_value) = last_observation(&records).ok_or_else(|| {
            CadenceError::Data(format!("group {group:?} has no observed values"))
        })?;

        if input.add_history {
            let mut prev: Option<f64> = None;
            for r in &records {
                let current = r.observed();
                rows.push(Row {
                    key: RowKey::new(group.clone(), r.ts),
                    point: prev.or(current).unwrap_or(last_value),
                    steps: 1,
                });
                prev = current.or(prev);
            }
        }

        for k in 1..=input.horizon {
            let ts = future_instant(input, last_ts, k)?;
            rows.push(Row {
                key: RowKey::new(group.clone(), ts),
                point: last_value,
                steps: k,
            });
        }
    }

    let keys: Vec<RowKey> = rows.iter().map(|r| r.key.clone()).collect();
    let mut table = ForecastTable::new(POINT_COLUMN, keys)
        .with_column(POINT_COLUMN, rows.iter().map(|r| Some(r.point)).collect())?;

    match &input.intervals {
        IntervalSpec::None => {}
        IntervalSpec::Levels(levels) => {
            for &level in levels {
                let (lo, hi) = interval_column_names(POINT_COLUMN, level);
                let band = |sign: f64| -> Vec<Option<f64>> {
                    rows.iter()
                        .map(|r| {
                            Some(sign.mul_add(half_width(r.point, level / 100.0, r.steps), r.point))
                        })
                        .collect()
                };
                table = table.with_column(lo, band(-1.0))?.with_column(hi, band(1.0))?;
            }
        }
        IntervalSpec::Quantiles(quantiles) => {
            for &q in quantiles {
                let values = rows
                    .iter()
                    .map(|r| Some(r.point + half_width(r.point, 2.0 * (q - 0.5), r.steps)))
                    .collect();
                table = table.with_column(quantile_column_name(POINT_COLUMN, q), values)?;
            }
        }
    }
    Ok(table)
}

fn last_observation(records: &[Record]) -> Option<(DateTime<Utc>, f64)> {
    let last_ts = records.last()?.ts;
    let value = records.iter().rev().find_map(Record::observed)?;
    Some((last_ts, value))
}

fn future_instant(
    input: &ForecastInput,
    last: DateTime<Utc>,
    k: usize,
) -> Result<DateTime<Utc>, CadenceError> {
    i64::try_from(k)
        .ok()
        .and_then(|k| nth_step(input.frequency, last, k))
        .ok_or_else(|| {
            CadenceError::forecaster(
                "cadence-mock",
                format!("horizon step {k} runs past the calendar"),
            )
        })
}
