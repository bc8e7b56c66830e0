use chrono::{DateTime, Utc};

use super::calendar::{is_weekend, month_offset};
use crate::{CadenceError, Frequency, Record};

const DAY: i64 = 86_400;

/// Infer the sampling frequency of a timestamp column.
///
/// The input order does not matter and duplicates are ignored. Resolution
/// proceeds in order:
///
/// 1. Fewer than two distinct timestamps yields `None`.
/// 2. Exact periodicity: consecutive instants exactly one calendar month apart
///    yield `Month`; a constant step yields its canonical frequency.
/// 3. Otherwise the unique most frequent step is used. Ties yield `None`.
/// 4. A one-day step is reported as `BusinessDay` when no observation falls on
///    a weekend, else `Day`.
///
/// Examples
///
/// ```
/// use cadence_core::{Frequency, infer_frequency};
/// use chrono::{TimeZone, Utc};
///
/// // Hourly with one missing reading: the mode still resolves the cadence.
/// let ts: Vec<_> = [0, 1, 2, 4, 5]
///     .iter()
///     .map(|h| Utc.with_ymd_and_hms(2024, 3, 1, *h, 0, 0).unwrap())
///     .collect();
/// assert_eq!(infer_frequency(&ts), Some(Frequency::Hour));
/// ```
///
/// Ambiguous spacing:
///
/// ```
/// use cadence_core::infer_frequency;
/// use chrono::{TimeZone, Utc};
///
/// // Deltas of one and two days occur equally often.
/// let ts: Vec<_> = [1, 2, 4, 5, 7]
///     .iter()
///     .map(|d| Utc.with_ymd_and_hms(2024, 3, *d, 0, 0, 0).unwrap())
///     .collect();
/// assert_eq!(infer_frequency(&ts), None);
/// ```
#[must_use]
pub fn infer_frequency(timestamps: &[DateTime<Utc>]) -> Option<Frequency> {
    infer_from_runs(&[distinct_sorted(timestamps.to_vec())])
}

/// Infer one frequency for a grouped table.
///
/// Steps are measured within each group and pooled, so interleaved groups on
/// the same calendar do not produce spurious short steps.
#[must_use]
pub fn infer_frequency_grouped(records: &[Record]) -> Option<Frequency> {
    let runs: Vec<Vec<DateTime<Utc>>> = super::util::split_groups(records.to_vec())
        .into_values()
        .map(|group| distinct_sorted(group.into_iter().map(|r| r.ts).collect()))
        .collect();
    infer_from_runs(&runs)
}

/// Like [`infer_frequency`] but reports an undeterminable cadence as an error.
///
/// # Errors
/// Returns `AmbiguousFrequency` carrying the number of distinct timestamps.
pub fn infer_frequency_strict(timestamps: &[DateTime<Utc>]) -> Result<Frequency, CadenceError> {
    infer_frequency(timestamps).ok_or_else(|| CadenceError::AmbiguousFrequency {
        observations: distinct_sorted(timestamps.to_vec()).len(),
    })
}

fn distinct_sorted(mut ts: Vec<DateTime<Utc>>) -> Vec<DateTime<Utc>> {
    ts.sort_unstable();
    ts.dedup();
    ts
}

fn infer_from_runs(runs: &[Vec<DateTime<Utc>>]) -> Option<Frequency> {
    let pairs: Vec<(DateTime<Utc>, DateTime<Utc>)> = runs
        .iter()
        .flat_map(|run| run.windows(2).map(|w| (w[0], w[1])))
        .collect();
    if pairs.is_empty() {
        return None;
    }
    let any_weekend = runs.iter().flatten().any(|&t| is_weekend(t));

    let months: Option<Vec<i64>> = pairs
        .iter()
        .map(|&(a, b)| month_offset(a, b).map(i64::from))
        .collect();
    if let Some(months) = &months
        && months.iter().all(|&k| k == 1)
    {
        return Some(Frequency::Month);
    }

    let deltas: Vec<i64> = pairs
        .iter()
        .map(|&(a, b)| (b - a).num_seconds())
        .filter(|&d| d > 0)
        .collect();
    let first = *deltas.first()?;
    let step = if deltas.len() == pairs.len() && deltas.iter().all(|&d| d == first) {
        first
    } else {
        if let Some(months) = months
            && unique_mode(months) == Some(1)
        {
            return Some(Frequency::Month);
        }
        unique_mode(deltas)?
    };

    if step == DAY {
        return Some(if any_weekend {
            Frequency::Day
        } else {
            Frequency::BusinessDay
        });
    }
    Some(Frequency::from_step_seconds(step))
}

/// Most frequent value, or `None` when several values tie for the top count.
fn unique_mode(mut values: Vec<i64>) -> Option<i64> {
    if values.is_empty() {
        return None;
    }
    values.sort_unstable();

    let mut best_value: i64 = values[0];
    let mut best_count: usize = 0;
    let mut num_best_candidates: usize = 0;

    let mut cur_value: i64 = values[0];
    let mut cur_count: usize = 1;
    for &v in values.iter().skip(1) {
        if v == cur_value {
            cur_count += 1;
            continue;
        }
        if cur_count > best_count {
            best_count = cur_count;
            best_value = cur_value;
            num_best_candidates = 1;
        } else if cur_count == best_count {
            num_best_candidates = num_best_candidates.saturating_add(1);
        }
        cur_value = v;
        cur_count = 1;
    }
    if cur_count > best_count {
        best_value = cur_value;
        num_best_candidates = 1;
    } else if cur_count == best_count {
        num_best_candidates = num_best_candidates.saturating_add(1);
    }

    (num_best_candidates == 1).then_some(best_value)
}
