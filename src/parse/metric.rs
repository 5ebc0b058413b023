//! Metric grammars
//!
//! Colon form: `m:s`, `h:m:s` or `h:m:s:ms`. The number of components picks
//! the fields, right-aligned to seconds (or milliseconds for four).
//!
//! Unit form: `<number><unit>` tokens with units `h`, `m` (or `min`), `s`,
//! `ms`, `us`, each at most once and in that order. Omitted units are zero.

use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use super::parse_number;
use crate::error::{Result, TimingError};
use crate::time_span::metric::{
    MICROSECONDS_PER_HOUR, MICROSECONDS_PER_MILLISECOND, MICROSECONDS_PER_MINUTE,
    MICROSECONDS_PER_SECOND,
};
use crate::time_span::MetricSpan;

static COLON_FORM: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+)\s*:\s*(\d+)\s*(?::\s*(\d+)\s*)?(?::\s*(\d+)\s*)?$")
        .expect("metric colon grammar is valid")
});

/// One `<number><unit>` token at the start of the remaining text
static UNIT_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([0-9]+)\s*([A-Za-z]*)").expect("metric unit grammar is valid")
});

/// Units in the only order they may appear
const UNITS: [(&str, i64); 5] = [
    ("h", MICROSECONDS_PER_HOUR),
    ("m", MICROSECONDS_PER_MINUTE),
    ("s", MICROSECONDS_PER_SECOND),
    ("ms", MICROSECONDS_PER_MILLISECOND),
    ("us", 1),
];

impl FromStr for MetricSpan {
    type Err = TimingError;

    fn from_str(input: &str) -> Result<Self> {
        if input.trim().is_empty() {
            return Err(TimingError::invalid_format(input, "empty metric span"));
        }
        if input.contains(':') {
            parse_colon_form(input)
        } else {
            parse_unit_form(input)
        }
    }
}

fn parse_colon_form(input: &str) -> Result<MetricSpan> {
    let caps = COLON_FORM
        .captures(input)
        .ok_or_else(|| TimingError::invalid_format(input, "expected m:s, h:m:s or h:m:s:ms"))?;

    let mut fields = Vec::with_capacity(4);
    for group in caps.iter().skip(1).flatten() {
        fields.push(parse_number(group.as_str())?);
    }

    let (hours, minutes, seconds, milliseconds) = match fields.as_slice() {
        [m, s] => (0, *m, *s, 0),
        [h, m, s] => (*h, *m, *s, 0),
        [h, m, s, ms] => (*h, *m, *s, *ms),
        _ => return Err(TimingError::invalid_format(input, "unexpected component count")),
    };

    MetricSpan::new(hours, minutes, seconds, milliseconds)
        .map_err(|_| TimingError::invalid_format(input, "value exceeds 64-bit microseconds"))
}

fn parse_unit_form(input: &str) -> Result<MetricSpan> {
    let mut rest = input;
    let mut last_unit: Option<usize> = None;
    let mut total = 0i64;

    while !rest.trim().is_empty() {
        let caps = UNIT_TOKEN.captures(rest).ok_or_else(|| {
            let token = rest.split_whitespace().next().unwrap_or(rest);
            TimingError::invalid_format(token, "expected a number before the unit")
        })?;
        let whole = &caps[0];
        let token = whole.trim_start();
        rest = &rest[whole.len()..];

        let mut unit = caps[2].to_ascii_lowercase();
        if unit.is_empty() {
            return Err(TimingError::invalid_format(token, "number without a unit"));
        }
        if unit == "min" {
            unit.truncate(1);
        }
        let index = UNITS
            .iter()
            .position(|(name, _)| *name == unit)
            .ok_or_else(|| TimingError::invalid_format(token, format!("unknown unit '{}'", unit)))?;

        if let Some(last) = last_unit {
            if index == last {
                return Err(TimingError::invalid_format(token, "duplicate unit"));
            }
            if index < last {
                return Err(TimingError::invalid_format(token, "unit out of order"));
            }
        }
        last_unit = Some(index);

        let value = parse_number(&caps[1])?;
        total = value
            .checked_mul(UNITS[index].1)
            .and_then(|us| total.checked_add(us))
            .ok_or_else(|| TimingError::invalid_format(input, "value exceeds 64-bit microseconds"))?;
    }

    if last_unit.is_none() {
        return Err(TimingError::invalid_format(input, "empty metric span"));
    }

    MetricSpan::from_microseconds(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metric(h: i64, m: i64, s: i64, ms: i64) -> MetricSpan {
        MetricSpan::new(h, m, s, ms).unwrap()
    }

    #[test]
    fn test_colon_form() {
        let cases = [
            ("0:0:0:0", metric(0, 0, 0, 0)),
            ("0:0:0", metric(0, 0, 0, 0)),
            ("0:0", metric(0, 0, 0, 0)),
            ("0:0:0:156", metric(0, 0, 0, 156)),
            ("2:0:156", metric(2, 0, 156, 0)),
            ("1:156", metric(0, 1, 156, 0)),
            (" 1 : 2 : 3 ", metric(1, 2, 3, 0)),
        ];
        for (input, expected) in cases {
            assert_eq!(input.parse::<MetricSpan>().unwrap(), expected, "input '{}'", input);
        }
    }

    #[test]
    fn test_unit_form() {
        let cases = [
            ("1h2m3s4ms", metric(1, 2, 3, 4)),
            ("1h 2m3s", metric(1, 2, 3, 0)),
            ("1h2M 4ms", metric(1, 2, 0, 4)),
            ("1 h3s4ms", metric(1, 0, 3, 4)),
            ("2M3 S 4 MS", metric(0, 2, 3, 4)),
            ("1h2m", metric(1, 2, 0, 0)),
            ("1h 3s", metric(1, 0, 3, 0)),
            ("1h4MS", metric(1, 0, 0, 4)),
            ("2M3s", metric(0, 2, 3, 0)),
            ("2 m 4 Ms", metric(0, 2, 0, 4)),
            ("3 s 4 mS", metric(0, 0, 3, 4)),
        ];
        for (input, expected) in cases {
            assert_eq!(input.parse::<MetricSpan>().unwrap(), expected, "input '{}'", input);
        }
    }

    #[test]
    fn test_min_alias() {
        assert_eq!("2min 3s".parse::<MetricSpan>().unwrap(), metric(0, 2, 3, 0));
    }

    #[test]
    fn test_microsecond_unit() {
        let span: MetricSpan = "1s 500ms 250us".parse().unwrap();
        assert_eq!(span.total_microseconds(), 1_500_250);
    }

    #[test]
    fn test_units_without_numbers() {
        let err = "m s".parse::<MetricSpan>().unwrap_err();
        assert_eq!(
            err,
            TimingError::InvalidFormat {
                input: "m".to_string(),
                reason: "expected a number before the unit".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_unit() {
        match "3x".parse::<MetricSpan>() {
            Err(TimingError::InvalidFormat { input, .. }) => assert_eq!(input, "3x"),
            other => panic!("expected InvalidFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_order_and_duplicate_units() {
        match "3s2m".parse::<MetricSpan>() {
            Err(TimingError::InvalidFormat { input, reason }) => {
                assert_eq!(input, "2m");
                assert_eq!(reason, "unit out of order");
            }
            other => panic!("expected InvalidFormat, got {:?}", other),
        }
        match "1h 2h".parse::<MetricSpan>() {
            Err(TimingError::InvalidFormat { input, reason }) => {
                assert_eq!(input, "2h");
                assert_eq!(reason, "duplicate unit");
            }
            other => panic!("expected InvalidFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_error_tokens() {
        let cases = [
            ("5", "5", "number without a unit"),
            ("1.5s", "1", "number without a unit"),
            ("-1s", "-1s", "expected a number before the unit"),
            ("1h 2m x", "x", "expected a number before the unit"),
            ("1h 2 sec", "2 sec", "unknown unit 'sec'"),
        ];
        for (text, token, why) in cases {
            assert_eq!(
                text.parse::<MetricSpan>().unwrap_err(),
                TimingError::invalid_format(token, why),
                "input '{}'",
                text
            );
        }
    }

    #[test]
    fn test_rejected_inputs() {
        for input in ["", "   ", "5", "1:2:3:4:5", ":5", "1.5s", "-1s"] {
            assert!(
                matches!(input.parse::<MetricSpan>(), Err(TimingError::InvalidFormat { .. })),
                "'{}' should not parse",
                input
            );
        }
    }

    #[test]
    fn test_round_trip() {
        for span in [
            metric(0, 0, 0, 0),
            metric(1, 2, 3, 4),
            metric(100, 59, 59, 999),
            MetricSpan::from_microseconds(7).unwrap(),
        ] {
            let text = span.to_string();
            assert_eq!(text.parse::<MetricSpan>().unwrap(), span);
        }
        assert_eq!("1h2m3s4ms".parse::<MetricSpan>().unwrap().to_string(), "1h2m3s4ms");
    }
}
