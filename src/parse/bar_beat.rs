use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use super::parse_number;
use crate::error::{Result, TimingError};
use crate::time_span::BarBeatTicksSpan;

/// `bars.beats.ticks` or `bars.beats`
static BAR_BEAT_TICKS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+)\s*\.\s*(\d+)\s*(?:\.\s*(\d+)\s*)?$").expect("bar/beat grammar is valid")
});

impl FromStr for BarBeatTicksSpan {
    type Err = TimingError;

    fn from_str(input: &str) -> Result<Self> {
        let caps = BAR_BEAT_TICKS.captures(input).ok_or_else(|| {
            TimingError::invalid_format(input, "expected bars.beats or bars.beats.ticks")
        })?;

        let bars = parse_number(&caps[1])?;
        let beats = parse_number(&caps[2])?;
        let ticks = match caps.get(3) {
            Some(m) => parse_number(m.as_str())?,
            None => 0,
        };

        BarBeatTicksSpan::new(bars, beats, ticks)
    }
}
