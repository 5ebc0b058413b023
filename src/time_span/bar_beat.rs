use serde::{Deserialize, Serialize};

use crate::error::{Result, TimingError};

/// Bars, beats and ticks counted against the time signature at the span's anchor
///
/// Components are stored as given; `1.7.0` in 4/4 is not folded into
/// `2.3.0` because folding needs a tempo map.
///
/// `Ord` compares bars, then beats, then ticks. That matches tick order only
/// for spans whose beats and ticks fit inside one bar: `1.7.0 < 2.0.0` here,
/// although `1.7.0` is longer in 4/4. Use `convert::compare_with_map` to
/// order by length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BarBeatTicksSpan {
    bars: i64,
    beats: i64,
    ticks: i64,
}

impl BarBeatTicksSpan {
    pub const ZERO: BarBeatTicksSpan = BarBeatTicksSpan {
        bars: 0,
        beats: 0,
        ticks: 0,
    };

    pub fn new(bars: i64, beats: i64, ticks: i64) -> Result<Self> {
        if bars < 0 || beats < 0 || ticks < 0 {
            return Err(TimingError::out_of_range(format!(
                "bar/beat/tick components must not be negative, got {}.{}.{}",
                bars, beats, ticks
            )));
        }
        Ok(Self { bars, beats, ticks })
    }

    pub fn bars(&self) -> i64 {
        self.bars
    }

    pub fn beats(&self) -> i64 {
        self.beats
    }

    pub fn ticks(&self) -> i64 {
        self.ticks
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl std::fmt::Display for BarBeatTicksSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.bars, self.beats, self.ticks)
    }
}

impl From<BarBeatTicksSpan> for String {
    fn from(span: BarBeatTicksSpan) -> Self {
        span.to_string()
    }
}

impl TryFrom<String> for BarBeatTicksSpan {
    type Error = TimingError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicographic_order() {
        let a = BarBeatTicksSpan::new(1, 3, 100).unwrap();
        let b = BarBeatTicksSpan::new(2, 0, 0).unwrap();
        let c = BarBeatTicksSpan::new(2, 0, 1).unwrap();
        assert!(a < b);
        assert!(b < c);
        assert!(BarBeatTicksSpan::ZERO < a);
    }

    #[test]
    fn test_negative_rejected() {
        assert!(matches!(
            BarBeatTicksSpan::new(1, -2, 0),
            Err(TimingError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(BarBeatTicksSpan::new(4, 2, 17).unwrap().to_string(), "4.2.17");
        assert_eq!(BarBeatTicksSpan::ZERO.to_string(), "0.0.0");
    }
}
