//! Bar/beat/tick addresses <-> ticks
//!
//! Both directions walk forward from the anchor one bar at a time, taking
//! the signature in effect at each bar line. Runs of bars under one
//! signature are stepped over in a single multiplication, so the cost is
//! proportional to the number of signature changes crossed.

use crate::error::{Result, TimingError};
use crate::tempo_map::TempoMap;
use crate::time_span::BarBeatTicksSpan;

use super::check_non_negative;

/// Length in ticks of `span` when its first bar starts at `anchor`
pub fn bar_beat_ticks_to_ticks(span: BarBeatTicksSpan, anchor: i64, map: &TempoMap) -> Result<i64> {
    let tpqn = map.tpqn()?;
    check_non_negative("anchor", anchor)?;

    let mut position = anchor;
    let mut bars_left = span.bars();
    while bars_left > 0 {
        let bar_length = bar_length_at(map, position, tpqn)?;
        let run = bars_before_change(map, position, bar_length).unwrap_or(bars_left);
        let step = run.min(bars_left);
        position = advance(position, step, bar_length)?;
        bars_left -= step;
    }

    let beat_length = beat_length_at(map, position, tpqn)?;
    position = advance(position, span.beats(), beat_length)?;
    position = advance(position, span.ticks(), 1)?;

    log::trace!(
        "bar_beat_ticks_to_ticks: {} at {} -> {} ticks",
        span,
        anchor,
        position - anchor
    );
    Ok(position - anchor)
}

/// Split `ticks` starting at `anchor` into whole bars, whole beats and a
/// tick remainder
pub fn ticks_to_bar_beat_ticks(ticks: i64, anchor: i64, map: &TempoMap) -> Result<BarBeatTicksSpan> {
    let tpqn = map.tpqn()?;
    check_non_negative("ticks", ticks)?;
    check_non_negative("anchor", anchor)?;
    let end = anchor
        .checked_add(ticks)
        .ok_or_else(|| TimingError::out_of_range("tick position exceeds 64 bits"))?;

    let mut position = anchor;
    let mut bars = 0i64;
    loop {
        let bar_length = bar_length_at(map, position, tpqn)?;
        let fitting = (end - position) / bar_length;
        if fitting == 0 {
            break;
        }
        let step = bars_before_change(map, position, bar_length)
            .map_or(fitting, |run| run.min(fitting));
        bars += step;
        position += step * bar_length;
    }

    let beat_length = beat_length_at(map, position, tpqn)?;
    let rest = end - position;
    BarBeatTicksSpan::new(bars, rest / beat_length, rest % beat_length)
}

/// Bars from `position` up to the first bar line at or after the next
/// signature change, `None` when no change follows
fn bars_before_change(map: &TempoMap, position: i64, bar_length: i64) -> Option<i64> {
    map.next_time_signature_change(position)
        .map(|next| (next - position - 1) / bar_length + 1)
}

fn bar_length_at(map: &TempoMap, position: i64, tpqn: i64) -> Result<i64> {
    let signature = map.get_time_signature_at(position);
    signature.bar_length(tpqn).ok_or_else(|| {
        TimingError::out_of_range(format!("a {} bar does not fit in 64 bits of ticks", signature))
    })
}

fn beat_length_at(map: &TempoMap, position: i64, tpqn: i64) -> Result<i64> {
    let signature = map.get_time_signature_at(position);
    signature.beat_length(tpqn).ok_or_else(|| {
        TimingError::out_of_range(format!("a {} beat does not fit in 64 bits of ticks", signature))
    })
}

fn advance(position: i64, count: i64, length: i64) -> Result<i64> {
    count
        .checked_mul(length)
        .and_then(|delta| position.checked_add(delta))
        .ok_or_else(|| TimingError::out_of_range("tick position exceeds 64 bits"))
}
