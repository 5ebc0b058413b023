use serde::{Deserialize, Serialize};

use crate::error::{Result, TimingError};

/// Exact count of MIDI ticks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TickSpan {
    ticks: i64,
}

impl TickSpan {
    pub const ZERO: TickSpan = TickSpan { ticks: 0 };

    pub fn new(ticks: i64) -> Result<Self> {
        if ticks < 0 {
            return Err(TimingError::out_of_range(format!(
                "tick count must not be negative, got {}",
                ticks
            )));
        }
        Ok(Self { ticks })
    }

    pub fn ticks(&self) -> i64 {
        self.ticks
    }

    pub fn is_zero(&self) -> bool {
        self.ticks == 0
    }
}

impl std::fmt::Display for TickSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.ticks)
    }
}

impl From<TickSpan> for String {
    fn from(span: TickSpan) -> Self {
        span.to_string()
    }
}

impl TryFrom<String> for TickSpan {
    type Error = TimingError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}
