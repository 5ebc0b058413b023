//! Scaling a span by a float factor, and ratios between spans

use num_rational::Ratio;

use crate::convert::to_ticks;
use crate::error::{Result, TimingError};
use crate::tempo_map::TempoMap;
use crate::time_span::musical::checked_scale;
use crate::time_span::{BarBeatTicksSpan, MetricSpan, MusicalSpan, TickSpan, TimeSpan};

/// Scale the span's native value by `factor`
///
/// `factor` is first turned into the closest small fraction, so
/// `q * 1.5` is exactly `3/8`. Integer values are then scaled exactly in
/// 128 bits and round half away from zero.
///
/// # Errors
/// `OutOfRange` if `factor` is negative, NaN or infinite, or the result
/// does not fit 64 bits.
///
/// # Example
/// ```
/// use midi_timing::{arithmetic, TimeSpan};
///
/// let span = TimeSpan::parse("2m0s8ms").unwrap();
/// let scaled = arithmetic::multiply(&span, 1.5).unwrap();
/// assert_eq!(scaled.to_string(), "0h3m0s12ms");
/// ```
pub fn multiply(span: &TimeSpan, factor: f64) -> Result<TimeSpan> {
    if !factor.is_finite() || factor < 0.0 {
        return Err(TimingError::out_of_range(format!(
            "multiplier must be a non-negative number, got {}",
            factor
        )));
    }
    if factor == 0.0 || span.is_zero() {
        return Ok(TimeSpan::zero(span.kind()));
    }
    scale(span, approximate(factor)?)
}

/// Scale the span's native value by `1 / factor`
///
/// The reciprocal is taken on the fraction, not the float, so
/// `1236us / 1.5` is exactly `824us`.
///
/// # Errors
/// `OutOfRange` if `factor` is zero, negative, NaN or infinite.
pub fn divide(span: &TimeSpan, factor: f64) -> Result<TimeSpan> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(TimingError::out_of_range(format!(
            "divisor must be a positive number, got {}",
            factor
        )));
    }
    let divisor = approximate(factor)?;
    if *divisor.numer() == 0 {
        return Err(TimingError::out_of_range(format!(
            "divisor {} is too small to represent",
            factor
        )));
    }
    scale(span, divisor.recip())
}

fn scale(span: &TimeSpan, factor: Ratio<i128>) -> Result<TimeSpan> {
    Ok(match span {
        TimeSpan::Ticks(span) => {
            TimeSpan::Ticks(TickSpan::new(scale_integer(span.ticks(), factor)?)?)
        }
        TimeSpan::Metric(span) => TimeSpan::Metric(MetricSpan::from_microseconds(
            scale_integer(span.total_microseconds(), factor)?,
        )?),
        TimeSpan::Musical(span) => TimeSpan::Musical(scale_musical(*span, factor)?),
        TimeSpan::BarBeatTicks(span) => TimeSpan::BarBeatTicks(BarBeatTicksSpan::new(
            scale_integer(span.bars(), factor)?,
            scale_integer(span.beats(), factor)?,
            scale_integer(span.ticks(), factor)?,
        )?),
    })
}

/// Ratio `a / b` of two spans
///
/// Spans of the same unit divide their native values (bar/beat/tick spans
/// have no single native value and always go through ticks). Mixed units
/// are both read as lengths from `anchor`.
///
/// # Errors
/// `DivideByZero` when `b` is zero.
pub fn ratio(a: &TimeSpan, b: &TimeSpan, map: &TempoMap, anchor: i64) -> Result<f64> {
    match (a, b) {
        (TimeSpan::Ticks(a), TimeSpan::Ticks(b)) => {
            native_ratio(a.ticks() as f64, b.ticks() as f64)
        }
        (TimeSpan::Metric(a), TimeSpan::Metric(b)) => native_ratio(
            a.total_microseconds() as f64,
            b.total_microseconds() as f64,
        ),
        (TimeSpan::Musical(a), TimeSpan::Musical(b)) => {
            if b.is_zero() {
                return Err(TimingError::DivideByZero);
            }
            let quotient = a.to_wide() / b.to_wide();
            Ok(*quotient.numer() as f64 / *quotient.denom() as f64)
        }
        _ => {
            let a_ticks = to_ticks(a, anchor, map)?;
            let b_ticks = to_ticks(b, anchor, map)?;
            log::trace!("ratio via ticks: {} / {}", a_ticks, b_ticks);
            native_ratio(a_ticks as f64, b_ticks as f64)
        }
    }
}

fn native_ratio(a: f64, b: f64) -> Result<f64> {
    if b == 0.0 {
        return Err(TimingError::DivideByZero);
    }
    Ok(a / b)
}

/// `value * factor` rounded half away from zero, for non-negative `value`
///
/// Both terms of `factor` fit 64 bits, so the products cannot leave i128.
fn scale_integer(value: i64, factor: Ratio<i128>) -> Result<i64> {
    let (numer, denom) = (*factor.numer(), *factor.denom());
    let scaled = (2 * i128::from(value) * numer + denom) / (2 * denom);
    i64::try_from(scaled).map_err(|_| {
        TimingError::out_of_range(format!("{} scaled by {} does not fit 64 bits", value, factor))
    })
}

fn approximate(factor: f64) -> Result<Ratio<i128>> {
    let ratio = Ratio::<i64>::approximate_float(factor).ok_or_else(|| {
        TimingError::out_of_range(format!("factor {} has no fractional approximation", factor))
    })?;
    Ok(Ratio::new(i128::from(*ratio.numer()), i128::from(*ratio.denom())))
}

fn scale_musical(span: MusicalSpan, factor: Ratio<i128>) -> Result<MusicalSpan> {
    MusicalSpan::from_wide(checked_scale(span.to_wide(), factor)?)
}
