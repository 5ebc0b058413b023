use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use super::parse_number;
use crate::error::{Result, TimingError};
use crate::time_span::TickSpan;

static TICKS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*(\d+)\s*(?:ticks|t)?\s*$").expect("tick grammar is valid")
});

impl FromStr for TickSpan {
    type Err = TimingError;

    fn from_str(input: &str) -> Result<Self> {
        let caps = TICKS
            .captures(input)
            .ok_or_else(|| TimingError::invalid_format(input, "expected a tick count"))?;
        TickSpan::new(parse_number(&caps[1])?)
    }
}
