use cadence_core::timeseries::impute::{backward_fill, forward_fill, interpolate_time};
use cadence_core::{
    CadenceError, Frequency, ImputationPolicy, Record, ensure_complete, impute, reconcile,
};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use proptest::prelude::*;

fn day(d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap()
}

fn series(values: &[Option<f64>]) -> Vec<Record> {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let offset = TimeDelta::days(i64::try_from(i).unwrap());
            Record::ungrouped(day(1) + offset, *v)
        })
        .collect()
}

fn values(records: &[Record]) -> Vec<Option<f64>> {
    records.iter().map(|r| r.value).collect()
}

#[test]
fn reconcile_then_forward_backward_fill() {
    let raw = vec![
        Record::ungrouped(day(1), Some(10.0)),
        Record::ungrouped(day(2), Some(20.0)),
        Record::ungrouped(day(2), Some(21.0)),
        Record::ungrouped(day(4), Some(40.0)),
    ];
    let grid = reconcile(raw, Some(Frequency::Day)).unwrap();
    let out = impute(grid, ImputationPolicy::ForwardBackward);
    assert_eq!(
        values(&out),
        vec![Some(10.0), Some(21.0), Some(21.0), Some(40.0)]
    );
    assert!(ensure_complete(&out).is_ok());
}

#[test]
fn one_sided_fills_leave_edges() {
    let input = series(&[None, Some(1.0), None, Some(3.0), None]);
    assert_eq!(
        values(&impute(input.clone(), ImputationPolicy::ForwardFill)),
        vec![None, Some(1.0), Some(1.0), Some(3.0), Some(3.0)]
    );
    assert_eq!(
        values(&impute(input.clone(), ImputationPolicy::BackwardFill)),
        vec![Some(1.0), Some(1.0), Some(3.0), Some(3.0), None]
    );
    assert_eq!(
        values(&impute(input.clone(), ImputationPolicy::Interpolate)),
        vec![None, Some(1.0), Some(2.0), Some(3.0), None]
    );
    assert_eq!(
        values(&impute(input, ImputationPolicy::InterpolateForwardBackward)),
        vec![Some(1.0), Some(1.0), Some(2.0), Some(3.0), Some(3.0)]
    );
}

#[test]
fn interpolation_is_weighted_by_elapsed_time() {
    let ts = vec![day(1), day(2), day(5)];
    let mut v = vec![Some(0.0), None, Some(8.0)];
    interpolate_time(&ts, &mut v);
    assert_eq!(v, vec![Some(0.0), Some(2.0), Some(8.0)]);
}

#[test]
fn non_finite_values_count_as_missing() {
    let input = series(&[Some(1.0), Some(f64::NAN), Some(3.0)]);
    let out = impute(input, ImputationPolicy::ForwardFill);
    assert_eq!(values(&out), vec![Some(1.0), Some(1.0), Some(3.0)]);
}

#[test]
fn groups_never_borrow_from_each_other() {
    let input = vec![
        Record::grouped("a", day(1), Some(1.0)),
        Record::grouped("a", day(2), None),
        Record::grouped("b", day(1), None),
        Record::grouped("b", day(2), None),
    ];
    let out = impute(input, ImputationPolicy::ForwardBackward);
    assert_eq!(values(&out), vec![Some(1.0), Some(1.0), None, None]);
    assert_eq!(
        ensure_complete(&out),
        Err(CadenceError::unfillable(Some("b".into()), 2))
    );
}

#[test]
fn interpolation_without_interior_points_is_unfillable() {
    let out = impute(series(&[None, Some(5.0), None]), ImputationPolicy::Interpolate);
    assert_eq!(
        ensure_complete(&out),
        Err(CadenceError::unfillable(None, 2))
    );
}

proptest! {
    #[test]
    fn forward_backward_leaves_nothing_missing(
        raw in proptest::collection::vec(proptest::option::of(-1e6f64..1e6), 1..80)
    ) {
        prop_assume!(raw.iter().any(Option::is_some));
        let out = impute(series(&raw), ImputationPolicy::ForwardBackward);
        prop_assert!(ensure_complete(&out).is_ok());
        for (before, after) in raw.iter().zip(values(&out)) {
            if before.is_some() {
                prop_assert_eq!(*before, after);
            }
        }
    }

    #[test]
    fn fills_are_idempotent(
        raw in proptest::collection::vec(proptest::option::of(-1e3f64..1e3), 0..50)
    ) {
        let mut once = raw.clone();
        forward_fill(&mut once);
        backward_fill(&mut once);
        let mut twice = once.clone();
        forward_fill(&mut twice);
        backward_fill(&mut twice);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn interpolation_hits_endpoints_and_stays_monotone(
        v0 in -1e6f64..1e6,
        v1 in -1e6f64..1e6,
        gaps in proptest::collection::vec(1i64..10_000, 1..30),
    ) {
        let mut ts = vec![DateTime::from_timestamp(0, 0).unwrap()];
        for g in &gaps {
            let last = *ts.last().unwrap();
            ts.push(last + TimeDelta::seconds(*g));
        }
        let n = ts.len();
        let mut v = vec![None; n];
        v[0] = Some(v0);
        v[n - 1] = Some(v1);
        interpolate_time(&ts, &mut v);

        prop_assert_eq!(v[0], Some(v0));
        prop_assert_eq!(v[n - 1], Some(v1));
        let filled: Vec<f64> = v.iter().map(|x| x.unwrap()).collect();
        let (lo, hi) = (v0.min(v1), v0.max(v1));
        for w in filled.windows(2) {
            if v1 >= v0 {
                prop_assert!(w[1] >= w[0]);
            } else {
                prop_assert!(w[1] <= w[0]);
            }
        }
        prop_assert!(filled.iter().all(|x| *x >= lo && *x <= hi));
    }
}
