//! Musical grammars
//!
//! Canonical: `n/d`, a fraction of a whole note.
//!
//! Alternate: `[multiplier] (n/d | name) modifiers*` where a name is one of
//! `w`/`whole`, `h`/`half`, `q`/`quarter`, `e`/`eighth`, `s`/`sixteenth`,
//! `thirtysecond`, `sixtyfourth`, and a modifier is a dot (`.` or `dotted`,
//! x3/2 each) or a tuplet (`t`/`triplet` for 3:2, `tN:M` for N notes in the
//! time of M, xM/N).

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use super::parse_number;
use crate::error::{Result, TimingError};
use crate::time_span::MusicalSpan;

static FRACTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+)\s*/\s*(\d+)\s*$").expect("musical fraction grammar is valid")
});

static NAMED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(?:(?:(\d+)\s+)?(\d+)\s*/\s*(\d+)|(?:(\d+)\s*)?(thirty-second|thirtysecond|sixty-fourth|sixtyfourth|sixteenth|quarter|eighth|whole|half|w|h|q|e|s))(.*)$",
    )
    .expect("musical named grammar is valid")
});

static TUPLET_RATIO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)\s*:\s*(\d+)").expect("tuplet ratio grammar is valid")
});

impl FromStr for MusicalSpan {
    type Err = TimingError;

    fn from_str(input: &str) -> Result<Self> {
        if let Some(caps) = FRACTION.captures(input) {
            return fraction(input, &caps[1], &caps[2]);
        }

        let caps = NAMED.captures(input).ok_or_else(|| {
            TimingError::invalid_format(input, "expected n/d or a note name such as q, e. or qt")
        })?;

        let mut span = match (caps.get(2), caps.get(3), caps.get(5)) {
            (Some(n), Some(d), _) => fraction(input, n.as_str(), d.as_str())?,
            (_, _, Some(name)) => named(name.as_str()),
            _ => return Err(TimingError::invalid_format(input, "missing note value")),
        };

        // A multiplier before a fraction needs whitespace so `23/8` stays one number
        if let Some(multiplier) = caps.get(1).or_else(|| caps.get(4)) {
            span = span.times(parse_number(multiplier.as_str())?)?;
        }

        let modifiers = caps.get(6).map(|m| m.as_str()).unwrap_or("");
        apply_modifiers(span, modifiers)
    }
}

fn fraction(input: &str, numerator: &str, denominator: &str) -> Result<MusicalSpan> {
    let numerator = parse_number(numerator)?;
    let denominator = parse_number(denominator)?;
    if denominator == 0 {
        return Err(TimingError::invalid_format(input, "zero denominator"));
    }
    MusicalSpan::new(numerator, denominator)
}

fn named(name: &str) -> MusicalSpan {
    match name.to_ascii_lowercase().as_str() {
        "w" | "whole" => MusicalSpan::WHOLE,
        "h" | "half" => MusicalSpan::HALF,
        "q" | "quarter" => MusicalSpan::QUARTER,
        "e" | "eighth" => MusicalSpan::EIGHTH,
        "s" | "sixteenth" => MusicalSpan::SIXTEENTH,
        "thirtysecond" | "thirty-second" => MusicalSpan::THIRTY_SECOND,
        _ => MusicalSpan::SIXTY_FOURTH,
    }
}

fn apply_modifiers(mut span: MusicalSpan, modifiers: &str) -> Result<MusicalSpan> {
    let lowered = modifiers.to_ascii_lowercase();
    let mut rest = lowered.as_str();

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            return Ok(span);
        }

        if let Some(after) = rest.strip_prefix('.') {
            span = span.dotted(1)?;
            rest = after;
        } else if let Some(after) = rest.strip_prefix("dotted") {
            span = span.dotted(1)?;
            rest = after;
        } else if let Some(after) = rest.strip_prefix("triplet") {
            span = span.triplet()?;
            rest = after;
        } else if let Some(after) = rest.strip_prefix('t') {
            match TUPLET_RATIO.captures(after) {
                Some(caps) => {
                    let notes = parse_number(&caps[1])?;
                    let space = parse_number(&caps[2])?;
                    if notes == 0 || space == 0 {
                        return Err(TimingError::invalid_format(rest, "tuplet ratio must be positive"));
                    }
                    span = span.tuplet(notes, space)?;
                    rest = &after[caps[0].len()..];
                }
                None => {
                    span = span.triplet()?;
                    rest = after;
                }
            }
        } else {
            let token = rest.split_whitespace().next().unwrap_or(rest);
            return Err(TimingError::invalid_format(token, "unknown musical modifier"));
        }
    }
}
