//! Native arithmetic on each span type
//!
//! No tempo map is involved: ticks and microseconds add as integers,
//! musical spans as reduced fractions, bar/beat/tick spans component by
//! component. Bars are never carried into beats (or beats into ticks)
//! because that needs a time signature.

use num_rational::Ratio;

use crate::error::{Result, TimingError};
use crate::time_span::{BarBeatTicksSpan, MetricSpan, MusicalSpan, TickSpan};

impl TickSpan {
    pub fn checked_add(self, other: TickSpan) -> Result<TickSpan> {
        TickSpan::new(sum(self.ticks(), other.ticks())?)
    }

    /// # Errors
    /// `NegativeResult` when `other` is longer than `self`
    pub fn checked_sub(self, other: TickSpan) -> Result<TickSpan> {
        TickSpan::new(difference(self.ticks(), other.ticks())?)
    }
}

impl MetricSpan {
    pub fn checked_add(self, other: MetricSpan) -> Result<MetricSpan> {
        MetricSpan::from_microseconds(sum(self.total_microseconds(), other.total_microseconds())?)
    }

    pub fn checked_sub(self, other: MetricSpan) -> Result<MetricSpan> {
        MetricSpan::from_microseconds(difference(
            self.total_microseconds(),
            other.total_microseconds(),
        )?)
    }
}

impl MusicalSpan {
    /// Exact fraction sum, reduced
    ///
    /// # Example
    /// ```
    /// use midi_timing::MusicalSpan;
    ///
    /// let sum = MusicalSpan::QUARTER.checked_add(MusicalSpan::EIGHTH).unwrap();
    /// assert_eq!(sum.to_string(), "3/8");
    /// ```
    pub fn checked_add(self, other: MusicalSpan) -> Result<MusicalSpan> {
        MusicalSpan::from_wide(combine(self, other, i128::checked_add)?)
    }

    pub fn checked_sub(self, other: MusicalSpan) -> Result<MusicalSpan> {
        if other > self {
            return Err(TimingError::NegativeResult);
        }
        MusicalSpan::from_wide(combine(self, other, i128::checked_sub)?)
    }
}

impl BarBeatTicksSpan {
    pub fn checked_add(self, other: BarBeatTicksSpan) -> Result<BarBeatTicksSpan> {
        BarBeatTicksSpan::new(
            sum(self.bars(), other.bars())?,
            sum(self.beats(), other.beats())?,
            sum(self.ticks(), other.ticks())?,
        )
    }

    /// Component-wise difference
    ///
    /// # Errors
    /// `NegativeResult` if any component of `other` exceeds the matching one
    /// in `self`, even when the whole span is shorter (`2.0.0 - 1.1.0`).
    pub fn checked_sub(self, other: BarBeatTicksSpan) -> Result<BarBeatTicksSpan> {
        BarBeatTicksSpan::new(
            difference(self.bars(), other.bars())?,
            difference(self.beats(), other.beats())?,
            difference(self.ticks(), other.ticks())?,
        )
    }
}

fn sum(a: i64, b: i64) -> Result<i64> {
    a.checked_add(b)
        .ok_or_else(|| TimingError::out_of_range("sum exceeds 64 bits"))
}

fn difference(a: i64, b: i64) -> Result<i64> {
    if b > a {
        return Err(TimingError::NegativeResult);
    }
    Ok(a - b)
}

/// `a.n * b.d (op) b.n * a.d` over `a.d * b.d`, checked in 128 bits
fn combine(
    a: MusicalSpan,
    b: MusicalSpan,
    op: fn(i128, i128) -> Option<i128>,
) -> Result<Ratio<i128>> {
    let (a, b) = (a.to_wide(), b.to_wide());
    let left = a.numer().checked_mul(*b.denom());
    let right = b.numer().checked_mul(*a.denom());
    let numer = match (left, right) {
        (Some(left), Some(right)) => op(left, right),
        _ => None,
    }
    .ok_or(TimingError::FractionOverflow)?;
    let denom = a
        .denom()
        .checked_mul(*b.denom())
        .ok_or(TimingError::FractionOverflow)?;
    Ok(Ratio::new(numer, denom))
}
