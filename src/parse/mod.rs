//! Text grammars for time spans
//!
//! Each unit has a canonical grammar (the exact inverse of its `Display`)
//! and a friendlier alternate one. All grammars are case-insensitive and
//! accept whitespace around tokens. Failures carry the offending substring.
//!
//! | unit            | canonical        | alternate                         |
//! |-----------------|------------------|-----------------------------------|
//! | ticks           | `480`            | `480t`, `480 ticks`               |
//! | metric          | `1h2m3s4ms`      | `1:2:3:4`, `2m 3s`, `1:30`        |
//! | musical         | `3/8`            | `q.`, `2 e`, `qt`, `s t5:4`       |
//! | bar-beat-ticks  | `2.1.0`          | `2.1`                             |

pub mod bar_beat;
pub mod metric;
pub mod musical;
pub mod ticks;

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, TimingError};
use crate::time_span::{
    BarBeatTicksSpan, MetricSpan, MusicalSpan, TickSpan, TimeSpan, TimeSpanKind,
};

/// Text opening like a metric span: a number then a colon or a metric unit
static METRIC_LEAD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\s*[0-9]+\s*(?::|(?:h|min|ms|us|m|s)(?:[^a-z]|$))")
        .expect("metric lead grammar is valid")
});

impl TimeSpan {
    /// Parse text in any unit's grammar
    ///
    /// Grammars are tried in the order ticks, bar-beat-ticks, metric,
    /// musical, so `"2h"` is two hours and `"h"` is a half note.
    /// When nothing matches and the text opens like a metric span, the
    /// metric error is returned so it names the offending token.
    pub fn parse(input: &str) -> Result<Self> {
        input.parse()
    }

    /// Parse text with one unit's grammar only
    pub fn parse_as(kind: TimeSpanKind, input: &str) -> Result<Self> {
        Ok(match kind {
            TimeSpanKind::Ticks => TimeSpan::Ticks(input.parse()?),
            TimeSpanKind::Metric => TimeSpan::Metric(input.parse()?),
            TimeSpanKind::Musical => TimeSpan::Musical(input.parse()?),
            TimeSpanKind::BarBeatTicks => TimeSpan::BarBeatTicks(input.parse()?),
        })
    }
}

impl FromStr for TimeSpan {
    type Err = TimingError;

    fn from_str(input: &str) -> Result<Self> {
        if let Ok(span) = input.parse::<TickSpan>() {
            return Ok(span.into());
        }
        if let Ok(span) = input.parse::<BarBeatTicksSpan>() {
            return Ok(span.into());
        }
        let metric = input.parse::<MetricSpan>();
        if let Ok(span) = metric {
            return Ok(span.into());
        }
        if let Ok(span) = input.parse::<MusicalSpan>() {
            return Ok(span.into());
        }
        if METRIC_LEAD.is_match(input) {
            return metric.map(TimeSpan::from);
        }

        log::trace!("'{}' matched no time span grammar", input);
        Err(TimingError::invalid_format(
            input,
            "matches no time span grammar",
        ))
    }
}

/// Parse a run of ASCII digits captured by a grammar
pub(crate) fn parse_number(digits: &str) -> Result<i64> {
    digits
        .trim()
        .parse::<i64>()
        .map_err(|_| TimingError::invalid_format(digits, "number does not fit 64 bits"))
}
