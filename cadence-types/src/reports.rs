use serde::{Deserialize, Serialize};

use crate::{Frequency, ImputationPolicy};

/// Summary of what preparation did to the selected series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparationReport {
    /// Records left after series selection and range filtering.
    pub rows_in: usize,
    /// Records handed on after reconciliation and imputation.
    pub rows_out: usize,
    /// Number of groups in the prepared series.
    pub groups: usize,
    /// Duplicate timestamps removed (last observation kept).
    pub duplicates_dropped: usize,
    /// Observations that did not land on the grid.
    pub off_grid_dropped: usize,
    /// Grid rows synthesized with a missing value.
    pub synthesized: usize,
    /// Missing values filled by imputation.
    pub imputed: usize,
    /// Frequency used for the grid and handed to the forecaster.
    pub frequency: Option<Frequency>,
    /// Whether `frequency` came from inference rather than the request.
    pub frequency_inferred: bool,
    /// Imputation policy that was applied.
    pub policy: Option<ImputationPolicy>,
    /// Non-fatal notes, e.g. dropped prediction intervals.
    pub warnings: Vec<String>,
}
