//! Musical spans: fractions of a whole note

use std::cmp::Ordering;

use num_rational::Ratio;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimingError};

/// Fraction of a whole note, always held in lowest terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MusicalSpan {
    numerator: i64,
    denominator: i64,
}

impl MusicalSpan {
    pub const ZERO: MusicalSpan = MusicalSpan {
        numerator: 0,
        denominator: 1,
    };
    pub const WHOLE: MusicalSpan = MusicalSpan::unit(1);
    pub const HALF: MusicalSpan = MusicalSpan::unit(2);
    pub const QUARTER: MusicalSpan = MusicalSpan::unit(4);
    pub const EIGHTH: MusicalSpan = MusicalSpan::unit(8);
    pub const SIXTEENTH: MusicalSpan = MusicalSpan::unit(16);
    pub const THIRTY_SECOND: MusicalSpan = MusicalSpan::unit(32);
    pub const SIXTY_FOURTH: MusicalSpan = MusicalSpan::unit(64);

    const fn unit(denominator: i64) -> Self {
        Self {
            numerator: 1,
            denominator,
        }
    }

    /// Create a reduced fraction
    ///
    /// # Example
    /// ```
    /// use midi_timing::MusicalSpan;
    ///
    /// let span = MusicalSpan::new(2, 8).unwrap();
    /// assert_eq!((span.numerator(), span.denominator()), (1, 4));
    /// ```
    pub fn new(numerator: i64, denominator: i64) -> Result<Self> {
        if numerator < 0 {
            return Err(TimingError::out_of_range(format!(
                "musical numerator must not be negative, got {}",
                numerator
            )));
        }
        if denominator <= 0 {
            return Err(TimingError::out_of_range(format!(
                "musical denominator must be positive, got {}",
                denominator
            )));
        }
        Self::from_wide(Ratio::new(i128::from(numerator), i128::from(denominator)))
    }

    /// Narrow a reduced 128-bit ratio back into 64-bit storage
    pub(crate) fn from_wide(ratio: Ratio<i128>) -> Result<Self> {
        if *ratio.numer() < 0 {
            return Err(TimingError::NegativeResult);
        }
        let numerator = i64::try_from(*ratio.numer()).map_err(|_| TimingError::FractionOverflow)?;
        let denominator =
            i64::try_from(*ratio.denom()).map_err(|_| TimingError::FractionOverflow)?;
        Ok(Self {
            numerator,
            denominator,
        })
    }

    pub(crate) fn to_wide(self) -> Ratio<i128> {
        Ratio::new_raw(i128::from(self.numerator), i128::from(self.denominator))
    }

    pub fn numerator(&self) -> i64 {
        self.numerator
    }

    pub fn denominator(&self) -> i64 {
        self.denominator
    }

    pub fn is_zero(&self) -> bool {
        self.numerator == 0
    }

    /// Apply `dots` augmentation dots, each scaling by 3/2
    pub fn dotted(self, dots: u32) -> Result<Self> {
        let mut ratio = self.to_wide();
        for _ in 0..dots {
            ratio = checked_scale(ratio, Ratio::new(3, 2))?;
        }
        Self::from_wide(ratio)
    }

    /// Scale for a tuplet of `notes` played in the time of `space`
    pub fn tuplet(self, notes: i64, space: i64) -> Result<Self> {
        if notes <= 0 || space <= 0 {
            return Err(TimingError::out_of_range(format!(
                "tuplet {}:{} must have positive components",
                notes, space
            )));
        }
        let ratio = checked_scale(
            self.to_wide(),
            Ratio::new(i128::from(space), i128::from(notes)),
        )?;
        Self::from_wide(ratio)
    }

    pub fn triplet(self) -> Result<Self> {
        self.tuplet(3, 2)
    }

    /// Scale by a whole multiplier (`3 * quarter`)
    pub fn times(self, multiplier: i64) -> Result<Self> {
        if multiplier < 0 {
            return Err(TimingError::out_of_range(format!(
                "multiplier must not be negative, got {}",
                multiplier
            )));
        }
        Self::from_wide(checked_scale(
            self.to_wide(),
            Ratio::from_integer(i128::from(multiplier)),
        )?)
    }
}

/// Multiply two ratios, failing instead of wrapping on overflow
pub(crate) fn checked_scale(a: Ratio<i128>, b: Ratio<i128>) -> Result<Ratio<i128>> {
    let numer = a
        .numer()
        .checked_mul(*b.numer())
        .ok_or(TimingError::FractionOverflow)?;
    let denom = a
        .denom()
        .checked_mul(*b.denom())
        .ok_or(TimingError::FractionOverflow)?;
    if denom == 0 {
        return Err(TimingError::DivideByZero);
    }
    Ok(Ratio::new(numer, denom))
}

impl Default for MusicalSpan {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialOrd for MusicalSpan {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Cross-multiplied in 128 bits, so no precision is lost
impl Ord for MusicalSpan {
    fn cmp(&self, other: &Self) -> Ordering {
        let left = i128::from(self.numerator) * i128::from(other.denominator);
        let right = i128::from(other.numerator) * i128::from(self.denominator);
        left.cmp(&right)
    }
}

impl std::fmt::Display for MusicalSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl From<MusicalSpan> for String {
    fn from(span: MusicalSpan) -> Self {
        span.to_string()
    }
}

impl TryFrom<String> for MusicalSpan {
    type Error = TimingError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}
