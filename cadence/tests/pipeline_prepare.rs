mod helpers;

use cadence::{
    CadenceError, ColumnBindings, ForecastRequest, Frequency, ImputationPolicy, Record,
    SeriesTable,
};
use cadence_mock::DynamicMockForecaster;
use helpers::*;

#[test]
fn dedups_regrids_and_fills() {
    let table = SeriesTable::new(
        ColumnBindings::ungrouped("ds", "y"),
        vec![
            Record::ungrouped(d(2024, 1, 1), Some(10.0)),
            Record::ungrouped(d(2024, 1, 2), Some(20.0)),
            Record::ungrouped(d(2024, 1, 2), Some(21.0)),
            Record::ungrouped(d(2024, 1, 4), Some(40.0)),
        ],
    );
    let req = ForecastRequest::new(table.columns.clone()).with_frequency(Frequency::Day);
    let prepared = mock_cadence().prepare(&table, &req).unwrap();

    let values: Vec<_> = prepared
        .series
        .records
        .iter()
        .map(|r| (r.ts, r.value))
        .collect();
    assert_eq!(
        values,
        vec![
            (d(2024, 1, 1), Some(10.0)),
            (d(2024, 1, 2), Some(21.0)),
            (d(2024, 1, 3), Some(21.0)),
            (d(2024, 1, 4), Some(40.0)),
        ]
    );
    let report = &prepared.report;
    assert_eq!(report.rows_in, 4);
    assert_eq!(report.rows_out, 4);
    assert_eq!(report.duplicates_dropped, 1);
    assert_eq!(report.synthesized, 1);
    assert_eq!(report.imputed, 1);
    assert_eq!(report.groups, 1);
    assert!(!report.frequency_inferred);
    assert_eq!(report.policy, Some(ImputationPolicy::ForwardBackward));
    assert_eq!(prepared.selected().len(), 4);
}

#[test]
fn infers_frequency_when_not_supplied() {
    let table = grouped_table(daily("a", d(2024, 1, 1), 30));
    let req = ForecastRequest::default();
    let prepared = mock_cadence().prepare(&table, &req).unwrap();
    assert_eq!(prepared.frequency, Some(Frequency::Day));
    assert!(prepared.report.frequency_inferred);
}

#[test]
fn selects_series_and_training_range() {
    let mut records = daily("a", d(2024, 1, 1), 20);
    records.extend(daily("b", d(2024, 1, 1), 20));
    let table = grouped_table(records);
    let req = ForecastRequest::default()
        .with_series_id("b")
        .with_range(Some(d(2024, 1, 5)), Some(d(2024, 1, 10)));
    let prepared = mock_cadence().prepare(&table, &req).unwrap();
    assert_eq!(prepared.series.len(), 6);
    assert!(
        prepared
            .series
            .records
            .iter()
            .all(|r| r.group.as_deref() == Some("b"))
    );
    assert_eq!(prepared.series.records[0].ts, d(2024, 1, 5));
    assert_eq!(prepared.series.max_ts(), Some(d(2024, 1, 10)));
}

#[test]
fn empty_selection_is_a_data_error() {
    let table = grouped_table(daily("a", d(2024, 1, 1), 5));
    let req = ForecastRequest::default().with_series_id("zzz");
    let err = mock_cadence().prepare(&table, &req).unwrap_err();
    assert!(matches!(err, CadenceError::Data(_)));
}

fn irregular_with_duplicate() -> SeriesTable {
    // 2024-03-02 appears twice; the spacing has no stable step.
    let records = [(1, 1.0), (2, 2.0), (2, 2.5), (4, 4.0), (5, 5.0), (7, 7.0)]
        .iter()
        .map(|&(x, v)| Record::ungrouped(d(2024, 3, x), Some(v)))
        .collect();
    SeriesTable::new(ColumnBindings::ungrouped("ds", "y"), records)
}

#[test]
fn ambiguous_spacing_is_deduplicated_without_a_grid() {
    let table = irregular_with_duplicate();
    let req = ForecastRequest::new(table.columns.clone());
    let prepared = mock_cadence().prepare(&table, &req).unwrap();

    assert_eq!(prepared.frequency, None);
    let values: Vec<_> = prepared
        .series
        .records
        .iter()
        .map(|r| (r.ts, r.value))
        .collect();
    assert_eq!(
        values,
        vec![
            (d(2024, 3, 1), Some(1.0)),
            (d(2024, 3, 2), Some(2.5)),
            (d(2024, 3, 4), Some(4.0)),
            (d(2024, 3, 5), Some(5.0)),
            (d(2024, 3, 7), Some(7.0)),
        ]
    );
    assert_eq!(prepared.report.duplicates_dropped, 1);
    assert_eq!(prepared.report.synthesized, 0);
    assert_eq!(prepared.report.warnings.len(), 1);
    assert!(prepared.report.warnings[0].contains("5 distinct timestamps"));
}

#[test]
fn ungridded_run_still_drops_duplicates() {
    let table = irregular_with_duplicate();
    let req = ForecastRequest::new(table.columns.clone())
        .with_frequency(Frequency::Day)
        .with_regularize(false);
    let prepared = mock_cadence().prepare(&table, &req).unwrap();

    assert_eq!(prepared.frequency, Some(Frequency::Day));
    assert_eq!(prepared.series.len(), 5);
    assert_eq!(prepared.report.duplicates_dropped, 1);
    assert_eq!(prepared.report.synthesized, 0);
    assert!(prepared.report.warnings.is_empty());
    assert_eq!(prepared.selected().len(), 6);
}

#[tokio::test]
async fn forecasting_without_a_frequency_aborts_before_the_call() {
    let (mock, controller) = DynamicMockForecaster::new_with_controller("counting");
    let table = irregular_with_duplicate();
    let req = ForecastRequest::new(table.columns.clone());
    let err = cadence_with(mock).forecast(&table, &req).await.unwrap_err();

    assert_eq!(err, CadenceError::AmbiguousFrequency { observations: 5 });
    assert!(err.is_preparation_error());
    assert_eq!(controller.call_count().await, 0);
}

#[test]
fn weekend_only_series_is_rejected_under_business_days() {
    let mut records = daily("a", d(2024, 1, 8), 5);
    records.push(Record::grouped("w", d(2024, 1, 6), Some(1.0)));
    records.push(Record::grouped("w", d(2024, 1, 7), Some(2.0)));
    let table = grouped_table(records);
    let req = ForecastRequest::default().with_frequency(Frequency::BusinessDay);
    let err = mock_cadence().prepare(&table, &req).unwrap_err();
    assert!(matches!(err, CadenceError::InvalidFrequency { .. }));
}

#[test]
fn missing_values_without_imputation_are_unfillable() {
    let mut records = daily("a", d(2024, 1, 1), 5);
    records[2].value = None;
    let table = grouped_table(records);
    let req = ForecastRequest::default().with_imputation(None);
    let err = mock_cadence().prepare(&table, &req).unwrap_err();
    assert_eq!(err, CadenceError::unfillable(Some("a".into()), 1));
}

#[test]
fn explicit_frequency_off_the_data_grid_drops_rows_with_a_warning() {
    let table = grouped_table(daily("a", d(2024, 1, 1), 15));
    let req = ForecastRequest::default().with_frequency(Frequency::Week);
    let prepared = mock_cadence().prepare(&table, &req).unwrap();
    assert_eq!(prepared.series.len(), 3);
    assert_eq!(prepared.report.off_grid_dropped, 12);
    assert_eq!(prepared.report.warnings.len(), 1);
}

#[test]
fn bindings_must_match_the_table() {
    let table = grouped_table(daily("a", d(2024, 1, 1), 5));
    let req = ForecastRequest::new(ColumnBindings::grouped("id", "ds", "y"));
    let err = mock_cadence().prepare(&table, &req).unwrap_err();
    assert!(matches!(err, CadenceError::Data(_)));
}

#[tokio::test]
async fn preparation_errors_never_reach_the_forecaster() {
    let (mock, controller) = DynamicMockForecaster::new_with_controller("counting");
    let cadence = cadence_with(mock);

    let mut records = daily("a", d(2024, 1, 1), 5);
    for r in &mut records {
        r.value = None;
    }
    let table = grouped_table(records);
    let err = cadence
        .forecast(&table, &ForecastRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CadenceError::UnfillableSeries { .. }));

    let zero_horizon = ForecastRequest::default().with_horizon(0);
    let err = cadence.forecast(&table, &zero_horizon).await.unwrap_err();
    assert!(matches!(err, CadenceError::InvalidArg(_)));

    assert_eq!(controller.call_count().await, 0);
}
