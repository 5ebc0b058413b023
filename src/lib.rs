//! MIDI Timing
//!
//! Tempo-mapped time spans for symbolic music. A span is a tick count,
//! real (metric) time, a fraction of a whole note, or a bar/beat/tick
//! address. Spans convert into each other through a [`TempoMap`] and
//! combine with the [`arithmetic`] functions.
//!
//! ```
//! use midi_timing::{convert, Tempo, TempoMapBuilder, TimeSpan, TimeSpanKind};
//!
//! let map = TempoMapBuilder::new(192)
//!     .set_tempo(0, Tempo::from_bpm(120.0))
//!     .build()
//!     .unwrap();
//!
//! let five_seconds = TimeSpan::parse("5s").unwrap();
//! let ticks = convert::convert(&five_seconds, TimeSpanKind::Ticks, 0, &map).unwrap();
//! assert_eq!(ticks, TimeSpan::parse("1920").unwrap());
//! ```

pub mod arithmetic;
pub mod convert;
pub mod defaults;
pub mod error;
pub mod parse;
pub mod settings;
pub mod tempo_map;
pub mod time_span;

// Re-export commonly used types
pub use arithmetic::TimeSpanMode;
pub use error::{Result, TimingError};
pub use settings::TimingSettings;
pub use tempo_map::{Tempo, TempoMap, TempoMapBuilder, TimeSignature};
pub use time_span::{
    BarBeatTicksSpan, MetricSpan, MusicalSpan, TickSpan, TimeSpan, TimeSpanKind,
};
