use chrono::{DateTime, Utc};

use crate::{DisplayWindow, ForecastTable, Record, RowKey};

/// Latest training timestamp across all groups; the single cut-off used to
/// split a forecast result.
#[must_use]
pub fn train_cutoff(records: &[Record]) -> Option<DateTime<Utc>> {
    records.iter().map(|r| r.ts).max()
}

/// A subset of rows of a forecast table, in table order.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment<'a> {
    table: &'a ForecastTable,
    rows: Vec<usize>,
}

impl<'a> Segment<'a> {
    /// Row indices into the underlying table.
    #[must_use]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    /// Number of rows in the segment.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the segment holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row keys of the segment.
    pub fn keys(&self) -> impl Iterator<Item = &'a RowKey> + '_ {
        let keys = self.table.keys();
        self.rows.iter().map(move |&i| &keys[i])
    }

    /// `(ts, value)` pairs of one column restricted to the segment.
    ///
    /// Returns `None` if the column does not exist.
    #[must_use]
    pub fn series(&self, column: &str) -> Option<Vec<(DateTime<Utc>, Option<f64>)>> {
        let values = self.table.column(column)?;
        let keys = self.table.keys();
        Some(self.rows.iter().map(|&i| (keys[i].ts, values[i])).collect())
    }

    /// Narrow the segment to one group.
    #[must_use]
    pub fn for_group(&self, group: Option<&str>) -> Self {
        let keys = self.table.keys();
        Self {
            table: self.table,
            rows: self
                .rows
                .iter()
                .copied()
                .filter(|&i| keys[i].group.as_deref() == group)
                .collect(),
        }
    }
}

/// Forecast result split at the training cut-off.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySegments<'a> {
    /// Rows with `ts <= train_end` (fitted values, present only with history).
    pub historical: Segment<'a>,
    /// Rows with `ts > train_end`.
    pub future: Segment<'a>,
    /// The cut-off used for the split.
    pub train_end: DateTime<Utc>,
}

/// Split a forecast result into historical and future rows.
///
/// Every row lands in exactly one segment; the cut-off row itself is
/// historical. Row order within each segment matches the table.
#[must_use]
pub fn partition(table: &ForecastTable, train_end: DateTime<Utc>) -> DisplaySegments<'_> {
    partition_within(table, train_end, &DisplayWindow::all())
}

/// [`partition`] restricted to rows inside a display window.
///
/// Rows outside the window are left out of both segments. The cut-off is not
/// moved by the window.
#[must_use]
pub fn partition_within<'a>(
    table: &'a ForecastTable,
    train_end: DateTime<Utc>,
    window: &DisplayWindow,
) -> DisplaySegments<'a> {
    let mut historical: Vec<usize> = Vec::new();
    let mut future: Vec<usize> = Vec::new();
    for (i, key) in table.keys().iter().enumerate() {
        if !window.contains(key.ts) {
            continue;
        }
        if key.ts <= train_end {
            historical.push(i);
        } else {
            future.push(i);
        }
    }
    DisplaySegments {
        historical: Segment {
            table,
            rows: historical,
        },
        future: Segment {
            table,
            rows: future,
        },
        train_end,
    }
}
