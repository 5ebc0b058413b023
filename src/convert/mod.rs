//! Conversion between time span units through ticks
//!
//! Every conversion goes unit -> ticks -> unit against a [`TempoMap`]. A
//! span is read as a length starting at an anchor tick; a point in time is
//! just a length from anchor 0.
//!
//! | unit            | depends on                                  |
//! |-----------------|---------------------------------------------|
//! | ticks           | nothing                                     |
//! | metric          | tempo changes between anchor and end        |
//! | musical         | resolution only                             |
//! | bar-beat-ticks  | time signatures at each bar line from anchor |

pub mod bar_beat;
pub mod metric;
pub mod musical;

pub use bar_beat::{bar_beat_ticks_to_ticks, ticks_to_bar_beat_ticks};
pub use metric::{metric_to_ticks, ticks_to_metric};
pub use musical::{musical_to_ticks, ticks_to_musical};

use std::cmp::Ordering;

use crate::error::{Result, TimingError};
use crate::tempo_map::TempoMap;
use crate::time_span::{TickSpan, TimeSpan, TimeSpanKind};

/// Length of `span` in ticks when it starts at `anchor`
///
/// # Arguments
/// * `span` - Any time span
/// * `anchor` - Tick where the span starts (0 for absolute times)
/// * `map` - Tempo map supplying resolution, tempos and signatures
///
/// # Errors
/// `OutOfRange` for a negative anchor, `EmptyTempoMap` for a map without
/// resolution, `FractionOverflow` for musical spans beyond 64-bit ticks.
pub fn to_ticks(span: &TimeSpan, anchor: i64, map: &TempoMap) -> Result<i64> {
    map.tpqn()?;
    check_non_negative("anchor", anchor)?;

    match span {
        TimeSpan::Ticks(span) => Ok(span.ticks()),
        TimeSpan::Metric(span) => metric::ticks_for_metric_length(*span, anchor, map),
        TimeSpan::Musical(span) => musical_to_ticks(*span, map),
        TimeSpan::BarBeatTicks(span) => bar_beat_ticks_to_ticks(*span, anchor, map),
    }
}

/// Express a length of `ticks` starting at `anchor` in the unit `kind`
pub fn from_ticks(kind: TimeSpanKind, ticks: i64, anchor: i64, map: &TempoMap) -> Result<TimeSpan> {
    map.tpqn()?;
    check_non_negative("ticks", ticks)?;
    check_non_negative("anchor", anchor)?;

    Ok(match kind {
        TimeSpanKind::Ticks => TimeSpan::Ticks(TickSpan::new(ticks)?),
        TimeSpanKind::Metric => TimeSpan::Metric(metric::metric_length_at(ticks, anchor, map)?),
        TimeSpanKind::Musical => TimeSpan::Musical(ticks_to_musical(ticks, map)?),
        TimeSpanKind::BarBeatTicks => {
            TimeSpan::BarBeatTicks(ticks_to_bar_beat_ticks(ticks, anchor, map)?)
        }
    })
}

/// Re-express `span` in the unit `kind`, both read as lengths from `anchor`
///
/// # Example
/// ```
/// use midi_timing::{convert, TempoMap, TimeSpan, TimeSpanKind};
///
/// let map = TempoMap::new(192).unwrap();
/// let five_seconds = TimeSpan::parse("5s").unwrap();
/// let ticks = convert::convert(&five_seconds, TimeSpanKind::Ticks, 0, &map).unwrap();
/// assert_eq!(ticks.to_string(), "1920");
/// ```
pub fn convert(span: &TimeSpan, kind: TimeSpanKind, anchor: i64, map: &TempoMap) -> Result<TimeSpan> {
    if span.kind() == kind {
        map.tpqn()?;
        return Ok(*span);
    }
    let ticks = to_ticks(span, anchor, map)?;
    log::trace!("convert: {} ({}) -> {} ticks -> {}", span, span.kind(), ticks, kind);
    from_ticks(kind, ticks, anchor, map)
}

/// Order two spans of any units by their tick lengths from `anchor`
///
/// Spans of the same unit compare natively, which agrees with the tick
/// order but keeps sub-tick differences. Bar/beat/tick spans always go
/// through ticks, since their component order ignores overfull bars.
pub fn compare_with_map(a: &TimeSpan, b: &TimeSpan, map: &TempoMap, anchor: i64) -> Result<Ordering> {
    if a.kind() == b.kind() && a.kind() != TimeSpanKind::BarBeatTicks {
        return a.try_cmp(b);
    }
    Ok(to_ticks(a, anchor, map)?.cmp(&to_ticks(b, anchor, map)?))
}

pub(crate) fn check_non_negative(what: &str, value: i64) -> Result<()> {
    if value < 0 {
        return Err(TimingError::out_of_range(format!(
            "{} must not be negative, got {}",
            what, value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tempo_map::{Tempo, TempoMapBuilder};
    use crate::time_span::{BarBeatTicksSpan, MetricSpan, MusicalSpan};

    #[test]
    fn test_to_ticks_each_unit() {
        let map = TempoMap::new(480).unwrap();
        let cases = [
            (TimeSpan::Ticks(TickSpan::new(42).unwrap()), 42),
            (TimeSpan::Metric(MetricSpan::hms(0, 0, 1).unwrap()), 960),
            (TimeSpan::Musical(MusicalSpan::HALF), 960),
            (TimeSpan::BarBeatTicks(BarBeatTicksSpan::new(1, 1, 1).unwrap()), 2401),
        ];
        for (span, expected) in cases {
            assert_eq!(to_ticks(&span, 0, &map).unwrap(), expected, "span {}", span);
        }
    }

    #[test]
    fn test_convert_metric_depends_on_anchor() {
        let map = TempoMapBuilder::new(480)
            .set_tempo(960, Tempo::new(1_000_000))
            .build()
            .unwrap();
        let quarter = TimeSpan::Musical(MusicalSpan::QUARTER);

        let early = convert(&quarter, TimeSpanKind::Metric, 0, &map).unwrap();
        let late = convert(&quarter, TimeSpanKind::Metric, 960, &map).unwrap();
        assert_eq!(early, TimeSpan::Metric(MetricSpan::from_microseconds(500_000).unwrap()));
        assert_eq!(late, TimeSpan::Metric(MetricSpan::from_microseconds(1_000_000).unwrap()));
    }

    #[test]
    fn test_same_kind_is_identity() {
        let map = TempoMap::default();
        let span = TimeSpan::parse("3/8").unwrap();
        assert_eq!(convert(&span, TimeSpanKind::Musical, 77, &map).unwrap(), span);
    }

    #[test]
    fn test_compare_with_map_across_units() {
        let map = TempoMap::new(480).unwrap();
        let metric = TimeSpan::parse("1s").unwrap();
        let bars = TimeSpan::parse("1.0.0").unwrap();
        assert_eq!(compare_with_map(&metric, &bars, &map, 0).unwrap(), Ordering::Less);
        assert_eq!(
            compare_with_map(&TimeSpan::parse("960").unwrap(), &metric, &map, 0).unwrap(),
            Ordering::Equal
        );
    }

    #[test]
    fn test_errors() {
        let map = TempoMap::default();
        let span = TimeSpan::Ticks(TickSpan::ZERO);
        assert!(matches!(to_ticks(&span, -1, &map), Err(TimingError::OutOfRange(_))));
        assert!(matches!(
            from_ticks(TimeSpanKind::Metric, -1, 0, &map),
            Err(TimingError::OutOfRange(_))
        ));
        assert_eq!(
            to_ticks(&span, 0, &TempoMap::without_resolution()),
            Err(TimingError::EmptyTempoMap)
        );
    }
}
