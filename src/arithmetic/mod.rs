//! Addition and subtraction across span units
//!
//! Spans of the same unit combine natively (see [`same_type`]). Mixed units
//! go through ticks and need to know what each operand means:
//!
//! - **time + time**: both are positions; the second is read as a length
//!   from tick 0 and added to the first.
//! - **time + length**: the length starts at the time's tick.
//! - **length + length**: both lengths start at the same anchor tick.
//!
//! The result is always in the first operand's unit. Under a variable tempo
//! map the anchor matters for metric and bar/beat/tick lengths; passing 0
//! for a length that really starts elsewhere gives a different (but not an
//! erroneous) answer.

pub mod same_type;
pub mod scale;

pub use scale::{divide, multiply, ratio};

use serde::{Deserialize, Serialize};

use crate::convert::{from_ticks, to_ticks};
use crate::error::{Result, TimingError};
use crate::tempo_map::TempoMap;
use crate::time_span::TimeSpan;

/// How the operands of a mixed-unit operation are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeSpanMode {
    TimeTime,
    TimeLength,
    LengthLength,
}

/// `a + b` for two spans of the same unit
///
/// # Errors
/// `IncompatibleTypes` if the units differ.
pub fn add_same_type(a: &TimeSpan, b: &TimeSpan) -> Result<TimeSpan> {
    Ok(match (a, b) {
        (TimeSpan::Ticks(a), TimeSpan::Ticks(b)) => a.checked_add(*b)?.into(),
        (TimeSpan::Metric(a), TimeSpan::Metric(b)) => a.checked_add(*b)?.into(),
        (TimeSpan::Musical(a), TimeSpan::Musical(b)) => a.checked_add(*b)?.into(),
        (TimeSpan::BarBeatTicks(a), TimeSpan::BarBeatTicks(b)) => a.checked_add(*b)?.into(),
        _ => return Err(incompatible(a, b)),
    })
}

/// `a - b` for two spans of the same unit
///
/// # Errors
/// `IncompatibleTypes` if the units differ, `NegativeResult` if `b` exceeds
/// `a` (for bar/beat/tick spans, if any component of `b` does).
pub fn subtract_same_type(a: &TimeSpan, b: &TimeSpan) -> Result<TimeSpan> {
    Ok(match (a, b) {
        (TimeSpan::Ticks(a), TimeSpan::Ticks(b)) => a.checked_sub(*b)?.into(),
        (TimeSpan::Metric(a), TimeSpan::Metric(b)) => a.checked_sub(*b)?.into(),
        (TimeSpan::Musical(a), TimeSpan::Musical(b)) => a.checked_sub(*b)?.into(),
        (TimeSpan::BarBeatTicks(a), TimeSpan::BarBeatTicks(b)) => a.checked_sub(*b)?.into(),
        _ => return Err(incompatible(a, b)),
    })
}

/// Position `a` moved later by `b`, with `b` measured from tick 0
pub fn add_time_time(a: &TimeSpan, b: &TimeSpan, map: &TempoMap) -> Result<TimeSpan> {
    let a_ticks = to_ticks(a, 0, map)?;
    let b_ticks = to_ticks(b, 0, map)?;
    from_ticks(a.kind(), checked_sum(a_ticks, b_ticks)?, 0, map)
}

/// Position `time` moved later by `length`, with `length` starting at `time`
pub fn add_time_length(time: &TimeSpan, length: &TimeSpan, map: &TempoMap) -> Result<TimeSpan> {
    let time_ticks = to_ticks(time, 0, map)?;
    let length_ticks = to_ticks(length, time_ticks, map)?;
    from_ticks(time.kind(), checked_sum(time_ticks, length_ticks)?, 0, map)
}

/// Combined length of `a` and `b`, both starting at `anchor`
///
/// The result is a length in `a`'s unit, also read from `anchor`.
pub fn add_length_length(
    a: &TimeSpan,
    b: &TimeSpan,
    map: &TempoMap,
    anchor: i64,
) -> Result<TimeSpan> {
    let a_ticks = to_ticks(a, anchor, map)?;
    let b_ticks = to_ticks(b, anchor, map)?;
    from_ticks(a.kind(), checked_sum(a_ticks, b_ticks)?, anchor, map)
}

/// Position `a` moved earlier by `b`, with `b` measured from tick 0
pub fn subtract_time_time(a: &TimeSpan, b: &TimeSpan, map: &TempoMap) -> Result<TimeSpan> {
    let a_ticks = to_ticks(a, 0, map)?;
    let b_ticks = to_ticks(b, 0, map)?;
    from_ticks(a.kind(), checked_difference(a_ticks, b_ticks)?, 0, map)
}

/// Position `time` moved earlier by `length`, with `length` starting at `time`
pub fn subtract_time_length(
    time: &TimeSpan,
    length: &TimeSpan,
    map: &TempoMap,
) -> Result<TimeSpan> {
    let time_ticks = to_ticks(time, 0, map)?;
    let length_ticks = to_ticks(length, time_ticks, map)?;
    from_ticks(time.kind(), checked_difference(time_ticks, length_ticks)?, 0, map)
}

/// Length `a` shortened by `b`, both starting at `anchor`
pub fn subtract_length_length(
    a: &TimeSpan,
    b: &TimeSpan,
    map: &TempoMap,
    anchor: i64,
) -> Result<TimeSpan> {
    let a_ticks = to_ticks(a, anchor, map)?;
    let b_ticks = to_ticks(b, anchor, map)?;
    from_ticks(a.kind(), checked_difference(a_ticks, b_ticks)?, anchor, map)
}

/// `a + b` in `a`'s unit
///
/// Operands of the same unit always add natively, whatever the mode.
///
/// # Arguments
/// * `mode` - How mixed-unit operands are interpreted
/// * `anchor` - Start tick for `LengthLength`; ignored otherwise
///
/// # Example
/// ```
/// use midi_timing::arithmetic::{add, TimeSpanMode};
/// use midi_timing::{TempoMap, TimeSpan};
///
/// let map = TempoMap::new(480).unwrap();
/// let a = TimeSpan::parse("1.0.0").unwrap();
/// let b = TimeSpan::parse("q").unwrap();
/// let sum = add(&a, &b, TimeSpanMode::TimeLength, &map, 0).unwrap();
/// assert_eq!(sum.to_string(), "1.1.0");
/// ```
pub fn add(
    a: &TimeSpan,
    b: &TimeSpan,
    mode: TimeSpanMode,
    map: &TempoMap,
    anchor: i64,
) -> Result<TimeSpan> {
    if a.kind() == b.kind() {
        return add_same_type(a, b);
    }
    match mode {
        TimeSpanMode::TimeTime => add_time_time(a, b, map),
        TimeSpanMode::TimeLength => add_time_length(a, b, map),
        TimeSpanMode::LengthLength => add_length_length(a, b, map, anchor),
    }
}

/// `a - b` in `a`'s unit; see [`add`]
pub fn subtract(
    a: &TimeSpan,
    b: &TimeSpan,
    mode: TimeSpanMode,
    map: &TempoMap,
    anchor: i64,
) -> Result<TimeSpan> {
    if a.kind() == b.kind() {
        return subtract_same_type(a, b);
    }
    match mode {
        TimeSpanMode::TimeTime => subtract_time_time(a, b, map),
        TimeSpanMode::TimeLength => subtract_time_length(a, b, map),
        TimeSpanMode::LengthLength => subtract_length_length(a, b, map, anchor),
    }
}

fn incompatible(a: &TimeSpan, b: &TimeSpan) -> TimingError {
    TimingError::IncompatibleTypes {
        left: a.kind(),
        right: b.kind(),
    }
}

fn checked_sum(a: i64, b: i64) -> Result<i64> {
    a.checked_add(b)
        .ok_or_else(|| TimingError::out_of_range("tick sum exceeds 64 bits"))
}

fn checked_difference(a: i64, b: i64) -> Result<i64> {
    if b > a {
        return Err(TimingError::NegativeResult);
    }
    Ok(a - b)
}
