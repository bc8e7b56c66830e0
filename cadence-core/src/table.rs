//! In-memory tabular shapes exchanged between pipeline stages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CadenceError, ColumnBindings};

/// Group identifier of a record; `None` is the single implicit group.
pub type GroupKey = Option<String>;

/// One observation of the target column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Series identifier.
    pub group: GroupKey,
    /// Observation instant.
    pub ts: DateTime<Utc>,
    /// Target value; `None` (or a non-finite number) is missing.
    pub value: Option<f64>,
}

impl Record {
    /// Record of the implicit single group.
    #[must_use]
    pub const fn ungrouped(ts: DateTime<Utc>, value: Option<f64>) -> Self {
        Self {
            group: None,
            ts,
            value,
        }
    }

    /// Record tagged with a group identifier.
    pub fn grouped(group: impl Into<String>, ts: DateTime<Utc>, value: Option<f64>) -> Self {
        Self {
            group: Some(group.into()),
            ts,
            value,
        }
    }

    /// Returns `true` if the target value is absent or not finite.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.value.is_none_or(|v| !v.is_finite())
    }

    /// The target value if present and finite.
    #[must_use]
    pub fn observed(&self) -> Option<f64> {
        self.value.filter(|v| v.is_finite())
    }
}

/// A series table: column bindings plus the records read from the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesTable {
    /// Column names the caller bound for id, time, and target.
    pub columns: ColumnBindings,
    /// Records in source order.
    pub records: Vec<Record>,
}

impl SeriesTable {
    /// Wrap records with their column bindings.
    #[must_use]
    pub const fn new(columns: ColumnBindings, records: Vec<Record>) -> Self {
        Self { columns, records }
    }

    /// Check that group tagging agrees with the bindings.
    ///
    /// # Errors
    /// Returns `Data` if records carry a group id while no id column is bound,
    /// or lack one while an id column is bound.
    pub fn validate(&self) -> Result<(), CadenceError> {
        let grouped = self.columns.id_col.is_some();
        if let Some(r) = self.records.iter().find(|r| r.group.is_some() != grouped) {
            return Err(CadenceError::Data(if grouped {
                format!("record at {} has no value in the id column", r.ts)
            } else {
                format!("record at {} carries a group id but no id column is bound", r.ts)
            }));
        }
        Ok(())
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the table holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Latest timestamp in the table.
    #[must_use]
    pub fn max_ts(&self) -> Option<DateTime<Utc>> {
        self.records.iter().map(|r| r.ts).max()
    }
}

/// Key of one forecast result row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RowKey {
    /// Series identifier.
    pub group: GroupKey,
    /// Row instant.
    pub ts: DateTime<Utc>,
}

impl RowKey {
    /// Build a row key.
    #[must_use]
    pub const fn new(group: GroupKey, ts: DateTime<Utc>) -> Self {
        Self { group, ts }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ValueColumn {
    name: String,
    values: Vec<Option<f64>>,
}

/// Forecast result keyed by `(group, ts)`.
///
/// Holds a designated point-forecast column plus any interval or quantile
/// columns the forecaster produced, all aligned with `keys`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastTable {
    point_column: String,
    keys: Vec<RowKey>,
    columns: Vec<ValueColumn>,
}

impl ForecastTable {
    /// Start a table with the given point column name and row keys; columns
    /// are attached with [`ForecastTable::with_column`].
    pub fn new(point_column: impl Into<String>, keys: Vec<RowKey>) -> Self {
        Self {
            point_column: point_column.into(),
            keys,
            columns: Vec::new(),
        }
    }

    /// Attach a value column.
    ///
    /// # Errors
    /// Returns `Data` if the column length differs from the number of rows or
    /// a column with the same name already exists.
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: Vec<Option<f64>>,
    ) -> Result<Self, CadenceError> {
        let name = name.into();
        if values.len() != self.keys.len() {
            return Err(CadenceError::Data(format!(
                "column '{name}' has {} values for {} rows",
                values.len(),
                self.keys.len()
            )));
        }
        if self.has_column(&name) {
            return Err(CadenceError::Data(format!("duplicate column '{name}'")));
        }
        self.columns.push(ValueColumn { name, values });
        Ok(self)
    }

    /// Ensure the designated point column is present.
    ///
    /// # Errors
    /// Returns `Data` if the point column is missing.
    pub fn ensure_point_column(&self) -> Result<(), CadenceError> {
        if self.has_column(&self.point_column) {
            Ok(())
        } else {
            Err(CadenceError::Data(format!(
                "forecast result lacks point column '{}'",
                self.point_column
            )))
        }
    }

    /// Name of the point-forecast column.
    #[must_use]
    pub fn point_column(&self) -> &str {
        &self.point_column
    }

    /// Row keys in table order.
    #[must_use]
    pub fn keys(&self) -> &[RowKey] {
        &self.keys
    }

    /// Values of the named column.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[Option<f64>]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Returns `true` if a column with this name exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Latest row timestamp.
    #[must_use]
    pub fn max_ts(&self) -> Option<DateTime<Utc>> {
        self.keys.iter().map(|k| k.ts).max()
    }
}
