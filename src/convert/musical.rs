//! Whole-note fractions <-> ticks
//!
//! A whole note is four quarters, so `n/d` is `n * 4 * tpqn / d` ticks under
//! any tempo. Musical lengths therefore never depend on the anchor.

use num_rational::Ratio;

use crate::error::{Result, TimingError};
use crate::tempo_map::TempoMap;
use crate::time_span::MusicalSpan;

use super::check_non_negative;

/// Ticks covered by `span`, truncated toward zero when not exact
pub fn musical_to_ticks(span: MusicalSpan, map: &TempoMap) -> Result<i64> {
    let tpqn = i128::from(map.tpqn()?);
    let ticks = i128::from(span.numerator()) * 4 * tpqn / i128::from(span.denominator());
    i64::try_from(ticks).map_err(|_| TimingError::FractionOverflow)
}

/// Reduced fraction `ticks / (4 * tpqn)`
pub fn ticks_to_musical(ticks: i64, map: &TempoMap) -> Result<MusicalSpan> {
    let tpqn = map.tpqn()?;
    check_non_negative("ticks", ticks)?;
    MusicalSpan::from_wide(Ratio::new(i128::from(ticks), 4 * i128::from(tpqn)))
}
