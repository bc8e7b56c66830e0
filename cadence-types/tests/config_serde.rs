use cadence_types::{
    CadenceConfig, ColumnBindings, DisplayWindow, ForecastRequest, Frequency, ImputationPolicy,
    IntervalSpec,
};
use chrono::{DateTime, Utc};

fn t(sec: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(sec, 0).unwrap()
}

#[test]
fn cadence_config_roundtrip() {
    let cfg = CadenceConfig {
        forecaster_timeout: std::time::Duration::from_millis(2500),
        min_interval_history: 10,
        default_policy: ImputationPolicy::Interpolate,
    };

    let json = serde_json::to_string(&cfg).expect("serialize config");
    let de: CadenceConfig = serde_json::from_str(&json).expect("deserialize config");

    assert_eq!(de.forecaster_timeout.as_millis(), 2500);
    assert_eq!(de.min_interval_history, 10);
    assert_eq!(de.default_policy, ImputationPolicy::Interpolate);
}

#[test]
fn forecast_request_roundtrip_keeps_tokens() {
    let req = ForecastRequest::new(ColumnBindings::grouped("ticker", "date", "close"))
        .with_series_id("QQQ")
        .with_range(Some(t(0)), Some(t(86_400 * 30)))
        .with_frequency(Frequency::BusinessDay)
        .with_imputation(Some(ImputationPolicy::InterpolateForwardBackward))
        .with_horizon(5)
        .with_intervals(IntervalSpec::Quantiles(vec![0.1, 0.9]))
        .with_model_parameters(serde_json::json!({"finetune_steps": 0}));

    let json = serde_json::to_value(&req).expect("serialize request");
    assert_eq!(json["frequency"], "B");
    assert_eq!(json["imputation"], "interpolate_ffill_bfill");
    assert_eq!(json["intervals"]["kind"], "quantiles");

    let de: ForecastRequest = serde_json::from_value(json).expect("deserialize request");
    assert_eq!(de, req);
}

#[test]
fn frequency_tokens_deserialize_through_grammar() {
    let f: Frequency = serde_json::from_str("\"15min\"").unwrap();
    assert_eq!(f, Frequency::Every { seconds: 900 });
    assert!(serde_json::from_str::<Frequency>("\"fortnightly\"").is_err());
}

#[test]
fn imputation_policy_serde_uses_selector_tokens() {
    for p in ImputationPolicy::ALL {
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, format!("\"{}\"", p.as_str()));
        let back: ImputationPolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}

#[test]
fn request_defaults_match_interactive_defaults() {
    let req = ForecastRequest::default();
    assert_eq!(req.columns.id_col.as_deref(), Some("unique_id"));
    assert_eq!(req.columns.time_col, "ds");
    assert_eq!(req.columns.target_col, "y");
    assert_eq!(req.horizon, 24);
    assert!(req.regularize);
    assert_eq!(req.imputation, Some(ImputationPolicy::ForwardBackward));
    assert_eq!(req.intervals.levels(), &[80.0, 90.0]);
    assert!(req.validate().is_ok());
}

#[test]
fn display_window_bounds_are_inclusive() {
    let w = DisplayWindow {
        start: Some(t(100)),
        end: Some(t(200)),
    };
    assert!(w.contains(t(100)));
    assert!(w.contains(t(200)));
    assert!(!w.contains(t(99)));
    assert!(!w.contains(t(201)));
    assert!(DisplayWindow::all().contains(t(-5)));
}
