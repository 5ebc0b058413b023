use midi_timing::arithmetic::{
    add, add_length_length, add_same_type, divide, multiply, ratio, subtract, subtract_same_type,
};
use midi_timing::{
    MetricSpan, Tempo, TempoMap, TempoMapBuilder, TimeSpan, TimeSpanKind, TimeSpanMode,
    TimingError, TimingSettings,
};

fn span(text: &str) -> TimeSpan {
    TimeSpan::parse(text).unwrap()
}

fn metric(h: i64, m: i64, s: i64, ms: i64) -> TimeSpan {
    TimeSpan::Metric(MetricSpan::new(h, m, s, ms).unwrap())
}

#[test]
fn test_identities_for_every_unit() {
    for text in ["480", "1h2m3s4ms", "3/8", "2.1.100"] {
        let a = span(text);
        let zero = TimeSpan::zero(a.kind());
        assert_eq!(add_same_type(&a, &zero).unwrap(), a, "{}", text);
        assert_eq!(subtract_same_type(&a, &a).unwrap(), zero, "{}", text);
        assert_eq!(multiply(&a, 1.0).unwrap(), a, "{}", text);
        assert_eq!(divide(&a, 1.0).unwrap(), a, "{}", text);
    }
}

#[test]
fn test_metric_multiply() {
    assert_eq!(multiply(&metric(0, 2, 0, 5), 2.0).unwrap(), metric(0, 4, 0, 10));
    assert_eq!(multiply(&metric(0, 2, 0, 8), 1.5).unwrap(), metric(0, 3, 0, 12));
    assert_eq!(multiply(&metric(0, 0, 5, 0), 0.0).unwrap(), metric(0, 0, 0, 0));
    assert!(matches!(
        multiply(&metric(0, 0, 5, 0), -5.0),
        Err(TimingError::OutOfRange(_))
    ));
}

#[test]
fn test_metric_divide() {
    assert_eq!(divide(&metric(0, 2, 0, 0), 2.0).unwrap(), metric(0, 1, 0, 0));
    assert_eq!(divide(&metric(0, 0, 0, 1234), 1.0).unwrap(), metric(0, 0, 0, 1234));
}

#[test]
fn test_span_ratios() {
    let map = TempoMap::default();
    assert_eq!(ratio(&metric(0, 0, 3, 0), &metric(0, 0, 2, 0), &map, 0).unwrap(), 1.5);
    assert_eq!(ratio(&metric(0, 0, 2, 0), &metric(0, 0, 4, 0), &map, 0).unwrap(), 0.5);

    let zero = metric(0, 0, 0, 0);
    assert_eq!(ratio(&zero, &zero, &map, 0), Err(TimingError::DivideByZero));
}

#[test]
fn test_mixed_units_follow_first_operand() {
    let map = TempoMap::new(480).unwrap();
    let sum = add(&span("1s"), &span("q"), TimeSpanMode::TimeLength, &map, 0).unwrap();
    assert_eq!(sum, metric(0, 0, 1, 500));

    let diff = subtract(&span("2.0.0"), &span("1s"), TimeSpanMode::TimeLength, &map, 0).unwrap();
    assert_eq!(diff, span("1.2.0"));
}

#[test]
fn test_length_anchor_from_settings() {
    let settings: TimingSettings =
        TimingSettings::from_json_str(r#"{ "length_anchor": 960 }"#).unwrap();
    let map = TempoMapBuilder::with_settings(&settings)
        .set_tempo(960, Tempo::new(1_000_000))
        .build()
        .unwrap();

    let a = span("480");
    let b = span("1s");
    let default_anchor = add_length_length(&a, &b, &map, 0).unwrap();
    let configured = add_length_length(&a, &b, &map, settings.length_anchor).unwrap();
    assert_eq!(default_anchor, span("1440"));
    assert_eq!(configured, span("960"));
}

#[test]
fn test_incompatible_without_mode() {
    let err = add_same_type(&span("1s"), &span("3/8")).unwrap_err();
    assert_eq!(
        err,
        TimingError::IncompatibleTypes {
            left: TimeSpanKind::Metric,
            right: TimeSpanKind::Musical,
        }
    );
}

#[test]
fn test_subtract_underflow() {
    let map = TempoMap::default();
    assert_eq!(
        subtract(&span("1s"), &span("2s"), TimeSpanMode::TimeTime, &map, 0),
        Err(TimingError::NegativeResult)
    );
    assert_eq!(
        subtract(&span("1/8"), &span("1s"), TimeSpanMode::LengthLength, &map, 0),
        Err(TimingError::NegativeResult)
    );
}
