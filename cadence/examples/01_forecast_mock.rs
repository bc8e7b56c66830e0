use std::sync::Arc;

use cadence::{Cadence, ColumnBindings, DisplayWindow, ImputationPolicy, Record, SeriesTable};
use chrono::{TimeDelta, TimeZone, Utc};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Build the orchestrator around the mock forecaster.
    let cadence = Cadence::builder()
        .with_forecaster(Arc::new(cadence_mock::MockForecaster::new()))
        .default_policy(ImputationPolicy::InterpolateForwardBackward)
        .build()?;

    // 2. Two stores with daily sales; store-2 skips a few days.
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().ok_or("bad start")?;
    let mut records = Vec::new();
    for day in 0..60_i32 {
        let ts = start + TimeDelta::days(i64::from(day));
        records.push(Record::grouped("store-1", ts, Some(100.0 + f64::from(day % 7))));
        if day % 11 != 4 {
            records.push(Record::grouped("store-2", ts, Some(40.0 + f64::from(day % 5))));
        }
    }
    let table = SeriesTable::new(ColumnBindings::default(), records);

    // 3. Forecast two weeks for store-2, with fitted history.
    let req = cadence
        .new_request(ColumnBindings::default())
        .with_series_id("store-2")
        .with_horizon(14)
        .with_add_history(true);
    let report = cadence.forecast(&table, &req).await?;

    println!("frequency: {:?}", report.prepared.frequency);
    println!("preparation: {:#?}", report.prepared.report);
    for e in report.unresolved() {
        println!("warning: {e}");
    }

    // 4. Redraw only the last week of history plus the forecast.
    let window = DisplayWindow {
        start: Some(report.train_end - TimeDelta::days(7)),
        end: None,
    };
    let segments = report.segments(&window);
    let point = report.result.point_column();
    println!("history ({} rows):", segments.historical.len());
    for (ts, y) in segments.historical.series(point).unwrap_or_default() {
        println!("  {ts} {y:?}");
    }
    println!("forecast ({} rows):", segments.future.len());
    for band in &report.interval_columns.resolved {
        let lo = segments.future.series(&band.lower).unwrap_or_default();
        let hi = segments.future.series(&band.upper).unwrap_or_default();
        for ((ts, l), (_, h)) in lo.iter().zip(&hi) {
            println!("  {ts} level {} [{l:?}, {h:?}]", band.level);
        }
    }

    Ok(())
}
