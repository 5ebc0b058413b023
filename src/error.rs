//! Error types for time-span conversion and arithmetic
//!
//! Every operation in this crate is pure and deterministic, so a failure
//! always points at an invalid argument or an invalid tempo map.

use thiserror::Error;

use crate::time_span::TimeSpanKind;

/// Top-level error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimingError {
    /// Tempo map rejected at construction (bad TPQN, tempo or signature)
    #[error("invalid tempo map: {0}")]
    InvalidTempoMap(String),

    /// Negative or otherwise illegal scalar argument
    #[error("value out of range: {0}")]
    OutOfRange(String),

    /// The tempo map has no ticks-per-quarter-note resolution
    #[error("tempo map defines no ticks per quarter note")]
    EmptyTempoMap,

    /// A fraction or its tick equivalent left the 64-bit range
    #[error("fraction overflow")]
    FractionOverflow,

    /// Subtraction would produce a negative span
    #[error("subtraction result would be negative")]
    NegativeResult,

    #[error("division by zero")]
    DivideByZero,

    /// Cross-variant comparison or arithmetic without an explicit conversion
    #[error("incompatible time span types: {left} and {right}")]
    IncompatibleTypes {
        left: TimeSpanKind,
        right: TimeSpanKind,
    },

    /// Text did not match any grammar; `input` is the offending substring
    #[error("invalid time span format '{input}': {reason}")]
    InvalidFormat { input: String, reason: String },

    /// Standard MIDI File could not be read or written
    #[error("midi error: {0}")]
    Midi(String),

    /// Settings file could not be read or deserialized
    #[error("settings error: {0}")]
    Settings(String),
}

impl TimingError {
    pub(crate) fn invalid_format(input: &str, reason: impl Into<String>) -> Self {
        TimingError::InvalidFormat {
            input: input.trim().to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn out_of_range(what: impl Into<String>) -> Self {
        TimingError::OutOfRange(what.into())
    }
}

pub type Result<T> = std::result::Result<T, TimingError>;
