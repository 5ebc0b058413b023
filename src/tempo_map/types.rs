//! Tempo and time signature values stored in a tempo map

use serde::{Deserialize, Serialize};

use crate::defaults::{
    bpm_to_microseconds, DEFAULT_DENOMINATOR, DEFAULT_MICROSECONDS_PER_QUARTER, DEFAULT_NUMERATOR,
    MICROSECONDS_PER_MINUTE,
};

/// Tempo expressed as microseconds per quarter note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tempo {
    pub microseconds_per_quarter_note: i64,
}

impl Tempo {
    pub const fn new(microseconds_per_quarter_note: i64) -> Self {
        Self {
            microseconds_per_quarter_note,
        }
    }

    /// Create a tempo from beats (quarter notes) per minute
    ///
    /// # Example
    /// ```
    /// use midi_timing::Tempo;
    ///
    /// assert_eq!(Tempo::from_bpm(120.0).microseconds_per_quarter_note, 500_000);
    /// ```
    pub fn from_bpm(bpm: f64) -> Self {
        Self::new(bpm_to_microseconds(bpm))
    }

    pub fn bpm(&self) -> f64 {
        MICROSECONDS_PER_MINUTE as f64 / self.microseconds_per_quarter_note as f64
    }
}

impl Default for Tempo {
    fn default() -> Self {
        Self::new(DEFAULT_MICROSECONDS_PER_QUARTER)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSignature {
    pub numerator: i64,
    pub denominator: i64,
}

impl TimeSignature {
    pub const fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Length of one beat in ticks: a whole note (4 quarters) split by the denominator.
    /// `None` when the length does not fit in 64 bits or the denominator is zero.
    pub fn beat_length(&self, tpqn: i64) -> Option<i64> {
        tpqn.checked_mul(4)?.checked_div(self.denominator)
    }

    /// Length of one bar in ticks, `None` on overflow
    pub fn bar_length(&self, tpqn: i64) -> Option<i64> {
        self.numerator.checked_mul(self.beat_length(tpqn)?)
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::new(DEFAULT_NUMERATOR, DEFAULT_DENOMINATOR)
    }
}

impl std::fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}
