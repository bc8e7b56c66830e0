//! Shared helpers for record grouping and invariants.

use std::collections::BTreeMap;

use crate::{CadenceError, GroupKey, Record};

/// Split records into groups, keeping source order within each group.
///
/// Groups come back in ascending id order with the implicit `None` group first.
#[must_use]
pub fn split_groups(records: Vec<Record>) -> BTreeMap<GroupKey, Vec<Record>> {
    let mut groups: BTreeMap<GroupKey, Vec<Record>> = BTreeMap::new();
    for r in records {
        groups.entry(r.group.clone()).or_default().push(r);
    }
    groups
}

/// Count records whose target value is missing.
#[must_use]
pub fn count_missing(records: &[Record]) -> usize {
    records.iter().filter(|r| r.is_missing()).count()
}

/// Ensure records are sorted by `(group, ts)` with no duplicate keys.
///
/// # Errors
/// Returns `Err(CadenceError::Data)` at the first out-of-order or repeated key.
pub fn ensure_sorted_unique(records: &[Record]) -> Result<(), CadenceError> {
    for w in records.windows(2) {
        let a = (&w[0].group, w[0].ts);
        let b = (&w[1].group, w[1].ts);
        if a >= b {
            return Err(CadenceError::Data(format!(
                "records not strictly ordered at {} (group {:?})",
                w[1].ts, w[1].group
            )));
        }
    }
    Ok(())
}
