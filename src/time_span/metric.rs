//! Real-time spans stored as whole microseconds

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimingError};

pub(crate) const MICROSECONDS_PER_MILLISECOND: i64 = 1_000;
pub(crate) const MICROSECONDS_PER_SECOND: i64 = 1_000_000;
pub(crate) const MICROSECONDS_PER_MINUTE: i64 = 60 * MICROSECONDS_PER_SECOND;
pub(crate) const MICROSECONDS_PER_HOUR: i64 = 60 * MICROSECONDS_PER_MINUTE;
pub(crate) const MICROSECONDS_PER_DAY: i64 = 24 * MICROSECONDS_PER_HOUR;

/// Exact real-time duration
///
/// The `total_*` accessors are floating views of the stored microseconds and
/// never feed back into it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MetricSpan {
    microseconds: i64,
}

impl MetricSpan {
    pub const ZERO: MetricSpan = MetricSpan { microseconds: 0 };

    /// Build from hours, minutes, seconds and milliseconds
    ///
    /// Components are not bounded by their clock range: `new(0, 0, 90, 0)`
    /// is a minute and a half.
    pub fn new(hours: i64, minutes: i64, seconds: i64, milliseconds: i64) -> Result<Self> {
        let components = [
            (hours, MICROSECONDS_PER_HOUR),
            (minutes, MICROSECONDS_PER_MINUTE),
            (seconds, MICROSECONDS_PER_SECOND),
            (milliseconds, MICROSECONDS_PER_MILLISECOND),
        ];

        let mut total = 0i64;
        for (value, factor) in components {
            if value < 0 {
                return Err(TimingError::out_of_range(format!(
                    "metric component must not be negative, got {}",
                    value
                )));
            }
            total = value
                .checked_mul(factor)
                .and_then(|us| total.checked_add(us))
                .ok_or_else(|| TimingError::out_of_range("metric span exceeds 64-bit microseconds"))?;
        }

        Ok(Self {
            microseconds: total,
        })
    }

    pub fn hms(hours: i64, minutes: i64, seconds: i64) -> Result<Self> {
        Self::new(hours, minutes, seconds, 0)
    }

    pub fn from_microseconds(microseconds: i64) -> Result<Self> {
        if microseconds < 0 {
            return Err(TimingError::out_of_range(format!(
                "microseconds must not be negative, got {}",
                microseconds
            )));
        }
        Ok(Self { microseconds })
    }

    pub fn total_microseconds(&self) -> i64 {
        self.microseconds
    }

    pub fn total_milliseconds(&self) -> f64 {
        self.microseconds as f64 / MICROSECONDS_PER_MILLISECOND as f64
    }

    pub fn total_seconds(&self) -> f64 {
        self.microseconds as f64 / MICROSECONDS_PER_SECOND as f64
    }

    pub fn total_minutes(&self) -> f64 {
        self.microseconds as f64 / MICROSECONDS_PER_MINUTE as f64
    }

    pub fn total_hours(&self) -> f64 {
        self.microseconds as f64 / MICROSECONDS_PER_HOUR as f64
    }

    pub fn total_days(&self) -> f64 {
        self.microseconds as f64 / MICROSECONDS_PER_DAY as f64
    }

    /// Whole hours (unbounded, days are folded in)
    pub fn hours(&self) -> i64 {
        self.microseconds / MICROSECONDS_PER_HOUR
    }

    pub fn minutes(&self) -> i64 {
        self.microseconds % MICROSECONDS_PER_HOUR / MICROSECONDS_PER_MINUTE
    }

    pub fn seconds(&self) -> i64 {
        self.microseconds % MICROSECONDS_PER_MINUTE / MICROSECONDS_PER_SECOND
    }

    pub fn milliseconds(&self) -> i64 {
        self.microseconds % MICROSECONDS_PER_SECOND / MICROSECONDS_PER_MILLISECOND
    }

    /// Sub-millisecond remainder
    pub fn microseconds_part(&self) -> i64 {
        self.microseconds % MICROSECONDS_PER_MILLISECOND
    }

    pub fn is_zero(&self) -> bool {
        self.microseconds == 0
    }
}

/// Canonical form `{h}h{m}m{s}s{ms}ms`, with `{us}us` appended only when the
/// span has a sub-millisecond part.
impl std::fmt::Display for MetricSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}h{}m{}s{}ms",
            self.hours(),
            self.minutes(),
            self.seconds(),
            self.milliseconds()
        )?;
        if self.microseconds_part() != 0 {
            write!(f, "{}us", self.microseconds_part())?;
        }
        Ok(())
    }
}

impl From<MetricSpan> for std::time::Duration {
    fn from(span: MetricSpan) -> Self {
        std::time::Duration::from_micros(span.microseconds as u64)
    }
}

impl TryFrom<std::time::Duration> for MetricSpan {
    type Error = TimingError;

    /// Sub-microsecond precision is truncated
    fn try_from(duration: std::time::Duration) -> Result<Self> {
        let micros = i64::try_from(duration.as_micros())
            .map_err(|_| TimingError::out_of_range("duration exceeds 64-bit microseconds"))?;
        Ok(Self {
            microseconds: micros,
        })
    }
}

impl From<MetricSpan> for String {
    fn from(span: MetricSpan) -> Self {
        span.to_string()
    }
}

impl TryFrom<String> for MetricSpan {
    type Error = TimingError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}
