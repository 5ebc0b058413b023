//! Time-span variant model
//!
//! A time span is a position ("time", measured from tick 0) or a duration
//! ("length", measured from an anchor tick) in one of four units. Values of
//! different units only compare after an explicit conversion through a
//! tempo map; see [`crate::convert`].

pub mod bar_beat;
pub mod metric;
pub mod musical;
pub mod ticks;

pub use bar_beat::BarBeatTicksSpan;
pub use metric::MetricSpan;
pub use musical::MusicalSpan;
pub use ticks::TickSpan;

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimingError};

/// Discriminant of [`TimeSpan`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeSpanKind {
    Ticks,
    Metric,
    Musical,
    BarBeatTicks,
}

impl std::fmt::Display for TimeSpanKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TimeSpanKind::Ticks => "ticks",
            TimeSpanKind::Metric => "metric",
            TimeSpanKind::Musical => "musical",
            TimeSpanKind::BarBeatTicks => "bar-beat-ticks",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum TimeSpan {
    Ticks(TickSpan),
    Metric(MetricSpan),
    Musical(MusicalSpan),
    BarBeatTicks(BarBeatTicksSpan),
}

impl TimeSpan {
    pub fn kind(&self) -> TimeSpanKind {
        match self {
            TimeSpan::Ticks(_) => TimeSpanKind::Ticks,
            TimeSpan::Metric(_) => TimeSpanKind::Metric,
            TimeSpan::Musical(_) => TimeSpanKind::Musical,
            TimeSpan::BarBeatTicks(_) => TimeSpanKind::BarBeatTicks,
        }
    }

    /// Zero value of the given unit
    pub fn zero(kind: TimeSpanKind) -> Self {
        match kind {
            TimeSpanKind::Ticks => TimeSpan::Ticks(TickSpan::ZERO),
            TimeSpanKind::Metric => TimeSpan::Metric(MetricSpan::ZERO),
            TimeSpanKind::Musical => TimeSpan::Musical(MusicalSpan::ZERO),
            TimeSpanKind::BarBeatTicks => TimeSpan::BarBeatTicks(BarBeatTicksSpan::ZERO),
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            TimeSpan::Ticks(span) => span.is_zero(),
            TimeSpan::Metric(span) => span.is_zero(),
            TimeSpan::Musical(span) => span.is_zero(),
            TimeSpan::BarBeatTicks(span) => span.is_zero(),
        }
    }

    /// Compare two spans of the same unit
    ///
    /// # Errors
    /// `IncompatibleTypes` when the units differ. Convert one side first
    /// (or use [`crate::convert::compare_with_map`]).
    pub fn try_cmp(&self, other: &TimeSpan) -> Result<Ordering> {
        match (self, other) {
            (TimeSpan::Ticks(a), TimeSpan::Ticks(b)) => Ok(a.cmp(b)),
            (TimeSpan::Metric(a), TimeSpan::Metric(b)) => Ok(a.cmp(b)),
            (TimeSpan::Musical(a), TimeSpan::Musical(b)) => Ok(a.cmp(b)),
            (TimeSpan::BarBeatTicks(a), TimeSpan::BarBeatTicks(b)) => Ok(a.cmp(b)),
            _ => Err(TimingError::IncompatibleTypes {
                left: self.kind(),
                right: other.kind(),
            }),
        }
    }
}

/// `None` across units, so `<` between different units is always false
impl PartialOrd for TimeSpan {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other).ok()
    }
}

impl std::fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeSpan::Ticks(span) => span.fmt(f),
            TimeSpan::Metric(span) => span.fmt(f),
            TimeSpan::Musical(span) => span.fmt(f),
            TimeSpan::BarBeatTicks(span) => span.fmt(f),
        }
    }
}

impl From<TickSpan> for TimeSpan {
    fn from(span: TickSpan) -> Self {
        TimeSpan::Ticks(span)
    }
}

impl From<MetricSpan> for TimeSpan {
    fn from(span: MetricSpan) -> Self {
        TimeSpan::Metric(span)
    }
}

impl From<MusicalSpan> for TimeSpan {
    fn from(span: MusicalSpan) -> Self {
        TimeSpan::Musical(span)
    }
}

impl From<BarBeatTicksSpan> for TimeSpan {
    fn from(span: BarBeatTicksSpan) -> Self {
        TimeSpan::BarBeatTicks(span)
    }
}
