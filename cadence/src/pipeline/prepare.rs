use std::collections::BTreeSet;

use cadence_core::timeseries::util::{count_missing, split_groups};
use cadence_core::{
    CadenceError, ForecastRequest, Frequency, PreparationReport, Record, SeriesTable,
    ensure_complete, impute, infer_frequency_grouped, reconcile_detailed,
};

use crate::Cadence;

/// A series ready for the forecaster, plus what preparation did to it.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedSeries {
    /// Reconciled and imputed series.
    pub series: SeriesTable,
    /// Frequency of the grid, if one was applied or supplied.
    pub frequency: Option<Frequency>,
    /// Counters and warnings from preparation.
    pub report: PreparationReport,
    /// Selected records before regularization, sorted by `(group, ts)`.
    pub(crate) selected: Vec<Record>,
}

impl PreparedSeries {
    /// Records of the selected series and range before regularization.
    #[must_use]
    pub fn selected(&self) -> &[Record] {
        &self.selected
    }

    /// Row count of the shortest prepared group.
    #[must_use]
    pub fn shortest_group_len(&self) -> usize {
        split_groups(self.series.records.clone())
            .values()
            .map(Vec::len)
            .min()
            .unwrap_or(0)
    }
}

fn select(table: &SeriesTable, req: &ForecastRequest) -> Vec<Record> {
    let mut selected: Vec<Record> = table
        .records
        .iter()
        .filter(|r| {
            req.series_id
                .as_deref()
                .is_none_or(|id| r.group.as_deref() == Some(id))
        })
        .filter(|r| req.start.is_none_or(|s| r.ts >= s) && req.end.is_none_or(|e| r.ts <= e))
        .cloned()
        .collect();
    // Stable: duplicates keep their source order so the last one still wins.
    selected.sort_by(|a, b| (&a.group, a.ts).cmp(&(&b.group, b.ts)));
    selected
}

pub(super) fn distinct_timestamps(records: &[Record]) -> usize {
    records.iter().map(|r| r.ts).collect::<BTreeSet<_>>().len()
}

impl Cadence {
    /// Select, regularize, and impute a series according to `req`.
    ///
    /// Steps:
    /// - validate the request and the table's group tagging
    /// - keep the selected series id and the inclusive training range, sorted
    ///   by `(group, ts)`
    /// - resolve the frequency: the request's, else inferred per group
    /// - deduplicate every group (last wins); when `regularize` is set and a
    ///   frequency resolved, also reindex every group onto its grid
    /// - without a frequency the series passes through ungridded, with a
    ///   warning; the forecast step then reports `AmbiguousFrequency`
    /// - apply the imputation policy, if any, and require a complete series
    ///
    /// Nothing here contacts the forecaster.
    ///
    /// # Errors
    /// - `InvalidArg` / `ConflictingIntervalSpec` for an invalid request.
    /// - `Data` if bindings disagree with the table or nothing is selected.
    /// - `InvalidFrequency` when a group's grid cannot be built or is empty.
    /// - `UnfillableSeries` when values are still missing after imputation.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "cadence::pipeline::prepare",
            skip(self, table, req),
            fields(rows = table.len(), series = ?req.series_id),
        )
    )]
    pub fn prepare(
        &self,
        table: &SeriesTable,
        req: &ForecastRequest,
    ) -> Result<PreparedSeries, CadenceError> {
        req.validate()?;
        if table.columns != req.columns {
            return Err(CadenceError::Data(
                "request column bindings do not match the table".into(),
            ));
        }
        table.validate()?;

        let selected = select(table, req);
        if selected.is_empty() {
            return Err(CadenceError::Data(match &req.series_id {
                Some(id) => format!("no records for series '{id}' in the training range"),
                None => "no records in the training range".into(),
            }));
        }

        let mut report = PreparationReport {
            rows_in: selected.len(),
            ..PreparationReport::default()
        };

        let frequency = match req.frequency {
            Some(f) => Some(f),
            None => {
                let inferred = infer_frequency_grouped(&selected);
                report.frequency_inferred = inferred.is_some();
                inferred
            }
        };
        report.frequency = frequency;

        // Duplicates never reach the forecaster; the grid needs a frequency.
        let grid_frequency = if req.regularize { frequency } else { None };
        if req.regularize && frequency.is_none() {
            #[cfg(feature = "tracing")]
            tracing::warn!("no stable sampling frequency; deduplicating without a grid");
            report.warnings.push(format!(
                "no stable sampling frequency across {} distinct timestamps; \
                 series deduplicated but not regridded",
                distinct_timestamps(&selected)
            ));
        }
        let (mut records, stats) = reconcile_detailed(selected.clone(), grid_frequency)?;
        report.duplicates_dropped = stats.duplicates_dropped;
        report.off_grid_dropped = stats.off_grid_dropped;
        report.synthesized = stats.synthesized;
        if stats.off_grid_dropped > 0 {
            report.warnings.push(format!(
                "{} observation(s) off the {} grid were dropped",
                stats.off_grid_dropped,
                grid_frequency.map(|f| f.to_string()).unwrap_or_default()
            ));
        }

        if let Some(policy) = req.imputation {
            let before = count_missing(&records);
            records = impute(records, policy);
            report.imputed = before - count_missing(&records);
            report.policy = Some(policy);
        }
        ensure_complete(&records)?;

        report.rows_out = records.len();
        report.groups = records
            .iter()
            .map(|r| &r.group)
            .collect::<BTreeSet<_>>()
            .len();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            rows_in = report.rows_in,
            rows_out = report.rows_out,
            synthesized = report.synthesized,
            imputed = report.imputed,
            "series prepared"
        );

        Ok(PreparedSeries {
            series: SeriesTable::new(table.columns.clone(), records),
            frequency,
            report,
            selected,
        })
    }
}
