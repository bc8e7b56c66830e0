use cadence_types::{CadenceError, Frequency, ImputationPolicy};

#[test]
fn calendar_unit_symbols() {
    assert_eq!("D".parse::<Frequency>().unwrap(), Frequency::Day);
    assert_eq!("B".parse::<Frequency>().unwrap(), Frequency::BusinessDay);
    assert_eq!("W".parse::<Frequency>().unwrap(), Frequency::Week);
    assert_eq!("M".parse::<Frequency>().unwrap(), Frequency::Month);
    assert_eq!("MS".parse::<Frequency>().unwrap(), Frequency::Month);
    assert_eq!("H".parse::<Frequency>().unwrap(), Frequency::Hour);
    assert_eq!("h".parse::<Frequency>().unwrap(), Frequency::Hour);
    assert_eq!("business-day".parse::<Frequency>().unwrap(), Frequency::BusinessDay);
    assert_eq!(" Week ".parse::<Frequency>().unwrap(), Frequency::Week);
}

#[test]
fn explicit_durations() {
    assert_eq!("15T".parse::<Frequency>().unwrap(), Frequency::Every { seconds: 900 });
    assert_eq!("15min".parse::<Frequency>().unwrap(), Frequency::Every { seconds: 900 });
    assert_eq!("30s".parse::<Frequency>().unwrap(), Frequency::Every { seconds: 30 });
    assert_eq!("2D".parse::<Frequency>().unwrap(), Frequency::Every { seconds: 172_800 });
    assert_eq!("1D".parse::<Frequency>().unwrap(), Frequency::Day);
    assert_eq!("1h".parse::<Frequency>().unwrap(), Frequency::Hour);
}

#[test]
fn invalid_tokens() {
    for tok in ["", "0D", "-1D", "3M", "2B", "15", "fortnight", "99999999999999999999D"] {
        let res = tok.parse::<Frequency>();
        assert!(
            matches!(res, Err(CadenceError::InvalidFrequency { .. })),
            "token {tok:?} should be rejected, got {res:?}"
        );
    }
    assert!(matches!(
        Frequency::every(0),
        Err(CadenceError::InvalidFrequency { .. })
    ));
}

#[test]
fn blank_token_requests_inference() {
    assert_eq!(Frequency::parse_optional("  ").unwrap(), None);
    assert_eq!(Frequency::parse_optional("B").unwrap(), Some(Frequency::BusinessDay));
    assert!(Frequency::parse_optional("x").is_err());
}

#[test]
fn display_parses_back() {
    let all = [
        Frequency::Day,
        Frequency::BusinessDay,
        Frequency::Week,
        Frequency::Month,
        Frequency::Hour,
        Frequency::Every { seconds: 1 },
        Frequency::Every { seconds: 60 },
        Frequency::Every { seconds: 900 },
        Frequency::Every { seconds: 3_600 },
        Frequency::Every { seconds: 7_200 },
        Frequency::Every { seconds: 86_400 },
        Frequency::Every { seconds: 1_209_600 },
    ];
    for f in all {
        let back: Frequency = f.to_string().parse().unwrap();
        assert_eq!(back, f, "display token {} did not parse back", f);
    }
}

#[test]
fn fixed_steps() {
    assert_eq!(Frequency::Day.fixed_seconds(), Some(86_400));
    assert_eq!(Frequency::Month.fixed_seconds(), None);
    assert_eq!(Frequency::BusinessDay.fixed_seconds(), None);
    assert!(Frequency::Hour.is_subdaily());
    assert!(!Frequency::BusinessDay.is_subdaily());
    assert_eq!(Frequency::from_step_seconds(604_800), Frequency::Week);
}

#[test]
fn policy_selectors() {
    assert_eq!("ffill".parse::<ImputationPolicy>().unwrap(), ImputationPolicy::ForwardFill);
    assert_eq!(
        "interpolate_ffill_bfill".parse::<ImputationPolicy>().unwrap(),
        ImputationPolicy::InterpolateForwardBackward
    );
    assert!("linear".parse::<ImputationPolicy>().is_err());
    assert_eq!(ImputationPolicy::default(), ImputationPolicy::ForwardBackward);
}
