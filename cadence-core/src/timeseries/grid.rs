use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use super::calendar::{nth_step, roll_to_business_day};
use super::util::split_groups;
use crate::{CadenceError, Frequency, Record};

/// Upper bound on the number of grid instants generated for a single group.
pub const MAX_GRID_POINTS: usize = 5_000_000;

/// Counters describing what reconciliation did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Groups processed.
    pub groups: usize,
    /// Repeated `(group, ts)` records removed; the last occurrence wins.
    pub duplicates_dropped: usize,
    /// Observations whose instant is not on the group's grid.
    pub off_grid_dropped: usize,
    /// Grid instants with no observation, added with a missing value.
    pub synthesized: usize,
}

/// Deduplicate and reindex each group onto its regular grid.
///
/// Within every group the last record for a timestamp wins. With a frequency,
/// each group is reindexed onto the grid from its earliest to its latest
/// timestamp: missing instants are added with no value and off-grid
/// observations are dropped. Without a frequency only deduplication and
/// sorting happen. Output is sorted by `(group, ts)`.
///
/// # Errors
/// Returns `InvalidFrequency` if a group's grid cannot be built, e.g. it would
/// exceed [`MAX_GRID_POINTS`] instants or overflow the calendar, or if it holds
/// no instant at all (a business-day grid over a weekend-only group).
pub fn reconcile(
    records: Vec<Record>,
    frequency: Option<Frequency>,
) -> Result<Vec<Record>, CadenceError> {
    reconcile_detailed(records, frequency).map(|(out, _)| out)
}

/// [`reconcile`] that also reports what was dropped and synthesized.
///
/// # Errors
/// See [`reconcile`].
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        name = "cadence_core::timeseries::reconcile",
        skip(records),
        fields(rows = records.len(), frequency = ?frequency),
    )
)]
pub fn reconcile_detailed(
    records: Vec<Record>,
    frequency: Option<Frequency>,
) -> Result<(Vec<Record>, ReconcileStats), CadenceError> {
    let mut stats = ReconcileStats::default();
    let mut out: Vec<Record> = Vec::with_capacity(records.len());

    for (group, rows) in split_groups(records) {
        stats.groups += 1;
        let total = rows.len();
        let mut by_ts: BTreeMap<DateTime<Utc>, Record> = BTreeMap::new();
        for r in rows {
            by_ts.insert(r.ts, r);
        }
        stats.duplicates_dropped += total - by_ts.len();

        let Some(freq) = frequency else {
            out.extend(by_ts.into_values());
            continue;
        };
        let (Some(&first), Some(&last)) = (by_ts.keys().next(), by_ts.keys().next_back()) else {
            continue;
        };

        let instants = grid(freq, first, last)?;
        if instants.is_empty() {
            return Err(CadenceError::invalid_frequency(
                freq.to_string(),
                format!(
                    "group {} has no {freq} instant between {first} and {last}",
                    group.as_deref().unwrap_or("<implicit>")
                ),
            ));
        }
        for instant in instants {
            match by_ts.remove(&instant) {
                Some(r) => out.push(r),
                None => {
                    stats.synthesized += 1;
                    out.push(Record {
                        group: group.clone(),
                        ts: instant,
                        value: None,
                    });
                }
            }
        }
        if !by_ts.is_empty() {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                group = ?group,
                dropped = by_ts.len(),
                "observations off the grid"
            );
            stats.off_grid_dropped += by_ts.len();
        }
    }

    Ok((out, stats))
}

/// Regular grid of `freq` covering `[start, end]`.
///
/// The grid is anchored at `start` (rolled forward to Monday for business
/// days) and ends at the last instant not after `end`.
///
/// # Errors
/// Returns `InvalidFrequency` on a non-positive fixed step, calendar overflow,
/// or a grid longer than [`MAX_GRID_POINTS`].
pub fn grid(
    freq: Frequency,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<DateTime<Utc>>, CadenceError> {
    if let Some(step) = freq.fixed_seconds() {
        if step <= 0 {
            return Err(CadenceError::invalid_frequency(
                freq.to_string(),
                "step must be positive",
            ));
        }
        let span = (end - start).num_seconds().max(0);
        if usize::try_from(span / step).unwrap_or(usize::MAX) >= MAX_GRID_POINTS {
            return Err(too_many_points(freq));
        }
    }

    let anchor = if freq == Frequency::BusinessDay {
        roll_to_business_day(start)
    } else {
        start
    };

    let mut out: Vec<DateTime<Utc>> = Vec::new();
    let mut k: i64 = 0;
    loop {
        let t = nth_step(freq, anchor, k).ok_or_else(|| {
            CadenceError::invalid_frequency(freq.to_string(), "grid overflows the calendar")
        })?;
        if t > end {
            break;
        }
        if out.len() >= MAX_GRID_POINTS {
            return Err(too_many_points(freq));
        }
        out.push(t);
        k += 1;
    }
    Ok(out)
}

fn too_many_points(freq: Frequency) -> CadenceError {
    CadenceError::invalid_frequency(
        freq.to_string(),
        format!("grid would exceed {MAX_GRID_POINTS} points"),
    )
}
