//! Tick <-> microsecond integration over the tempo timeline

use crate::error::{Result, TimingError};
use crate::tempo_map::TempoMap;
use crate::time_span::MetricSpan;

use super::check_non_negative;

/// Absolute time of `ticks` measured from tick 0
///
/// Each tempo segment contributes `(t1 - t0) * μ / tpqn` microseconds,
/// truncated per segment. The last tempo extends indefinitely.
///
/// # Example
/// ```
/// use midi_timing::{convert, TempoMap};
///
/// let map = TempoMap::new(192).unwrap();
/// assert_eq!(convert::ticks_to_metric(1920, &map).unwrap().total_seconds(), 5.0);
/// ```
pub fn ticks_to_metric(ticks: i64, map: &TempoMap) -> Result<MetricSpan> {
    let tpqn = map.tpqn()?;
    check_non_negative("ticks", ticks)?;
    MetricSpan::from_microseconds(microseconds_at(ticks, tpqn, map)?)
}

/// Tick position reached after `metric` of real time from tick 0
///
/// The final partial segment is rounded half up to the nearest tick. A time
/// that lands exactly on a tempo change resolves to that change's tick.
pub fn metric_to_ticks(metric: MetricSpan, map: &TempoMap) -> Result<i64> {
    let tpqn = i128::from(map.tpqn()?);
    let mut remaining = i128::from(metric.total_microseconds());

    let mut segment_start = 0i64;
    let mut tempo = map.get_tempo_at(0);
    for (next, next_tempo) in map.tempo_points().skip(1) {
        let segment = i128::from(next - segment_start)
            * i128::from(tempo.microseconds_per_quarter_note)
            / tpqn;
        if remaining < segment {
            break;
        }
        remaining -= segment;
        segment_start = next;
        tempo = next_tempo;
    }

    let mu = i128::from(tempo.microseconds_per_quarter_note);
    let partial = (2 * remaining * tpqn + mu) / (2 * mu);
    log::trace!(
        "metric_to_ticks: {} -> segment at {} + {} ticks",
        metric,
        segment_start,
        partial
    );

    i64::try_from(i128::from(segment_start) + partial).map_err(|_| tick_overflow())
}

/// Metric length of `ticks` starting at `anchor`
pub(crate) fn metric_length_at(ticks: i64, anchor: i64, map: &TempoMap) -> Result<MetricSpan> {
    let tpqn = map.tpqn()?;
    let end = anchor.checked_add(ticks).ok_or_else(tick_overflow)?;
    let start_us = microseconds_at(anchor, tpqn, map)?;
    let end_us = microseconds_at(end, tpqn, map)?;
    MetricSpan::from_microseconds(end_us - start_us)
}

/// Tick length of `metric` starting at `anchor`
pub(crate) fn ticks_for_metric_length(
    metric: MetricSpan,
    anchor: i64,
    map: &TempoMap,
) -> Result<i64> {
    let tpqn = map.tpqn()?;
    let start_us = microseconds_at(anchor, tpqn, map)?;
    let end_us = start_us
        .checked_add(metric.total_microseconds())
        .ok_or_else(|| TimingError::out_of_range("metric position exceeds 64-bit microseconds"))?;
    let end = metric_to_ticks(MetricSpan::from_microseconds(end_us)?, map)?;
    Ok((end - anchor).max(0))
}

fn microseconds_at(ticks: i64, tpqn: i64, map: &TempoMap) -> Result<i64> {
    let tpqn = i128::from(tpqn);
    let mut total = 0i128;

    let mut segment_start = 0i64;
    let mut tempo = map.get_tempo_at(0);
    for (next, next_tempo) in map.tempo_points().skip(1) {
        if next >= ticks {
            break;
        }
        total += i128::from(next - segment_start)
            * i128::from(tempo.microseconds_per_quarter_note)
            / tpqn;
        segment_start = next;
        tempo = next_tempo;
    }
    total += i128::from(ticks - segment_start) * i128::from(tempo.microseconds_per_quarter_note)
        / tpqn;

    i64::try_from(total)
        .map_err(|_| TimingError::out_of_range("metric position exceeds 64-bit microseconds"))
}

fn tick_overflow() -> TimingError {
    TimingError::out_of_range("tick position exceeds 64 bits")
}
