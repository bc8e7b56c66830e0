use std::sync::Arc;

use cadence::{Cadence, ColumnBindings, Record, SeriesTable};
use chrono::{TimeDelta, TimeZone, Utc};
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=info,cadence=trace,cadence_core=trace
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
        .try_init();

    let cadence = Cadence::builder()
        .with_forecaster(Arc::new(cadence_mock::MockForecaster::new()))
        .build()?;

    // Hourly readings with a duplicate and a gap; too short for intervals,
    // so the run logs a downgrade warning.
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).single().ok_or("bad start")?;
    let mut records: Vec<Record> = (0..12_i32)
        .filter(|h| *h != 5)
        .map(|h| Record::ungrouped(start + TimeDelta::hours(i64::from(h)), Some(20.0 + f64::from(h))))
        .collect();
    records.push(Record::ungrouped(start + TimeDelta::hours(3), Some(99.0)));
    let table = SeriesTable::new(ColumnBindings::ungrouped("ds", "y"), records);

    let req = cadence
        .new_request(table.columns.clone())
        .with_horizon(6);
    let _ = cadence.forecast(&table, &req).await?;

    Ok(())
}
