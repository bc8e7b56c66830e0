use chrono::{DateTime, Utc};

use super::util::split_groups;
use crate::{CadenceError, ImputationPolicy, Record};

/// Fill missing target values per group according to `policy`.
///
/// Groups are processed independently and never borrow values from each
/// other. Within a group records are ordered by timestamp before filling.
/// Observed values are never changed. Output is sorted by `(group, ts)`.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "cadence_core::timeseries::impute",
        skip(records),
        fields(rows = records.len(), policy = %policy),
    )
)]
#[must_use]
pub fn impute(records: Vec<Record>, policy: ImputationPolicy) -> Vec<Record> {
    let mut out: Vec<Record> = Vec::with_capacity(records.len());
    for (_, mut rows) in split_groups(records) {
        rows.sort_by_key(|r| r.ts);
        let ts: Vec<DateTime<Utc>> = rows.iter().map(|r| r.ts).collect();
        let mut values: Vec<Option<f64>> = rows.iter().map(Record::observed).collect();
        fill_values(&ts, &mut values, policy);
        for (r, v) in rows.iter_mut().zip(values) {
            r.value = v;
        }
        out.extend(rows);
    }
    out
}

/// Apply `policy` to one group's values, aligned with `ts`.
pub fn fill_values(ts: &[DateTime<Utc>], values: &mut [Option<f64>], policy: ImputationPolicy) {
    match policy {
        ImputationPolicy::ForwardFill => forward_fill(values),
        ImputationPolicy::BackwardFill => backward_fill(values),
        ImputationPolicy::ForwardBackward => {
            forward_fill(values);
            backward_fill(values);
        }
        ImputationPolicy::Interpolate => interpolate_time(ts, values),
        ImputationPolicy::InterpolateForwardBackward => {
            interpolate_time(ts, values);
            forward_fill(values);
            backward_fill(values);
        }
    }
}

/// Carry each observed value forward over the following gap.
pub fn forward_fill(values: &mut [Option<f64>]) {
    let mut last: Option<f64> = None;
    for v in values.iter_mut() {
        match *v {
            Some(x) => last = Some(x),
            None => *v = last,
        }
    }
}

/// Carry each observed value backward over the preceding gap.
pub fn backward_fill(values: &mut [Option<f64>]) {
    let mut next: Option<f64> = None;
    for v in values.iter_mut().rev() {
        match *v {
            Some(x) => next = Some(x),
            None => *v = next,
        }
    }
}

/// Linear interpolation weighted by elapsed time between the nearest observed
/// neighbours. Leading and trailing gaps are left missing.
#[allow(clippy::cast_precision_loss)]
pub fn interpolate_time(ts: &[DateTime<Utc>], values: &mut [Option<f64>]) {
    debug_assert_eq!(ts.len(), values.len());
    let mut prev: Option<usize> = None;
    for i in 0..values.len().min(ts.len()) {
        let Some(v1) = values[i] else {
            continue;
        };
        if let Some(p) = prev
            && i > p + 1
            && let Some(v0) = values[p]
        {
            let span = (ts[i] - ts[p]).num_milliseconds() as f64;
            for j in p + 1..i {
                let frac = if span > 0.0 {
                    (ts[j] - ts[p]).num_milliseconds() as f64 / span
                } else {
                    0.0
                };
                values[j] = Some((v1 - v0).mul_add(frac, v0));
            }
        }
        prev = Some(i);
    }
}

/// Ensure no target value is missing.
///
/// # Errors
/// Returns `UnfillableSeries` naming the first group (in `(group, ts)` order)
/// that still has gaps, with that group's count of missing values.
pub fn ensure_complete(records: &[Record]) -> Result<(), CadenceError> {
    let Some(first) = records
        .iter()
        .filter(|r| r.is_missing())
        .min_by(|a, b| a.group.cmp(&b.group))
    else {
        return Ok(());
    };
    let missing = records
        .iter()
        .filter(|r| r.group == first.group && r.is_missing())
        .count();
    Err(CadenceError::unfillable(first.group.clone(), missing))
}
