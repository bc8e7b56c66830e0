// Shared fixtures so tests can `mod helpers; use helpers::*;`
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cadence::{
    Cadence, CadenceError, ColumnBindings, ForecastInput, ForecastTable, Forecaster, Record,
    SeriesTable,
};
use chrono::{DateTime, TimeDelta, Utc};

/// Construct a UTC `DateTime` at midnight for readability in tests.
pub fn d(y: i32, m: u32, day: u32) -> DateTime<Utc> {
    let date = chrono::NaiveDate::from_ymd_opt(y, m, day).expect("invalid date");
    let naive = date.and_hms_opt(0, 0, 0).expect("invalid time");
    DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc)
}

/// Daily records for one group starting at `start`, values `0, 1, 2, ...`.
pub fn daily(group: &str, start: DateTime<Utc>, n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| {
            let i = i64::try_from(i).unwrap();
            #[allow(clippy::cast_precision_loss)]
            let v = i as f64;
            Record::grouped(group, start + TimeDelta::days(i), Some(v))
        })
        .collect()
}

/// Grouped table with the default `unique_id` / `ds` / `y` bindings.
pub fn grouped_table(records: Vec<Record>) -> SeriesTable {
    SeriesTable::new(ColumnBindings::default(), records)
}

pub fn cadence_with(f: Arc<dyn Forecaster>) -> Cadence {
    Cadence::builder().with_forecaster(f).build().unwrap()
}

pub fn mock_cadence() -> Cadence {
    cadence_with(Arc::new(cadence_mock::MockForecaster::new()))
}

/// Forecaster that sleeps before answering with the naive forecast.
pub struct SlowForecaster {
    pub delay: Duration,
}

#[async_trait]
impl Forecaster for SlowForecaster {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn forecast(&self, input: ForecastInput) -> Result<ForecastTable, CadenceError> {
        tokio::time::sleep(self.delay).await;
        cadence_mock::naive_forecast(&input)
    }
}

/// Forecaster that rejects every call with a plain data error.
pub struct RejectingForecaster;

#[async_trait]
impl Forecaster for RejectingForecaster {
    fn name(&self) -> &'static str {
        "rejecting"
    }

    async fn forecast(&self, _input: ForecastInput) -> Result<ForecastTable, CadenceError> {
        Err(CadenceError::Data("model refused the series".into()))
    }
}
