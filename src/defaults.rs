//! Default values for tempo maps
//!
//! Named constants only. Nothing here is mutable; callers pass overrides
//! explicitly through [`crate::settings::TimingSettings`].

/// Default tempo in microseconds per quarter note (120 BPM)
pub const DEFAULT_MICROSECONDS_PER_QUARTER: i64 = 500_000;

/// Default time signature numerator
pub const DEFAULT_NUMERATOR: i64 = 4;

/// Default time signature denominator
pub const DEFAULT_DENOMINATOR: i64 = 4;

/// Default ticks per quarter note (MIDI resolution)
/// 480 is standard and provides good resolution
pub const DEFAULT_TPQN: i64 = 480;

pub const MICROSECONDS_PER_MINUTE: i64 = 60_000_000;

/// Convert beats per minute to microseconds per quarter note, rounded half up
pub fn bpm_to_microseconds(bpm: f64) -> i64 {
    (MICROSECONDS_PER_MINUTE as f64 / bpm + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(DEFAULT_MICROSECONDS_PER_QUARTER, 500_000);
        assert_eq!((DEFAULT_NUMERATOR, DEFAULT_DENOMINATOR), (4, 4));
        assert_eq!(DEFAULT_TPQN, 480);
    }

    #[test]
    fn test_bpm_to_microseconds() {
        assert_eq!(bpm_to_microseconds(120.0), 500_000);
        assert_eq!(bpm_to_microseconds(60.0), 1_000_000);
        assert_eq!(bpm_to_microseconds(90.0), 666_667);
    }
}
