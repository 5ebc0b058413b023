//! Standard MIDI File adapter for tempo maps
//!
//! Reads tempo and time signature meta events out of an SMF and writes a
//! tempo map back as a single conductor track. Everything else in the file
//! is ignored.

use midly::{Format, Header, MetaMessage, Smf, Timing, Track, TrackEvent, TrackEventKind};

use super::{Tempo, TempoMap, TempoMapBuilder, TimeSignature};
use crate::error::{Result, TimingError};

const MAX_TPQN: i64 = 0x7FFF;
const MAX_TEMPO: i64 = 0xFF_FFFF;
const MAX_TICK: i64 = 0x0FFF_FFFF;

impl TempoMap {
    /// Build a tempo map from the meta events of every track
    ///
    /// Files with SMPTE timing have no ticks-per-quarter resolution; the
    /// returned map then fails every conversion with `EmptyTempoMap`.
    pub fn from_smf(smf: &Smf) -> Result<Self> {
        let tpqn = match smf.header.timing {
            Timing::Metrical(tpq) => i64::from(tpq.as_int()),
            Timing::Timecode(fps, subframes) => {
                log::warn!(
                    "SMF uses timecode timing ({:?}, {} subframes); tempo map has no resolution",
                    fps,
                    subframes
                );
                return Ok(TempoMap::without_resolution());
            }
        };

        let mut builder = TempoMapBuilder::new(tpqn);
        for (track_index, track) in smf.tracks.iter().enumerate() {
            let mut tick = 0i64;
            for event in track {
                tick += i64::from(event.delta.as_int());
                match event.kind {
                    TrackEventKind::Meta(MetaMessage::Tempo(us)) => {
                        builder = builder.set_tempo(tick, Tempo::new(i64::from(us.as_int())));
                    }
                    TrackEventKind::Meta(MetaMessage::TimeSignature(num, den_pow, _, _)) => {
                        if den_pow > 30 {
                            log::warn!(
                                "Ignoring time signature with denominator 2^{} at tick {} (track {})",
                                den_pow,
                                tick,
                                track_index
                            );
                            continue;
                        }
                        builder = builder.set_time_signature(
                            tick,
                            TimeSignature::new(i64::from(num), 1i64 << den_pow),
                        );
                    }
                    _ => {}
                }
            }
        }

        let map = builder.build()?;
        log::debug!(
            "Imported tempo map from {} track(s) at {} ticks per quarter note",
            smf.tracks.len(),
            tpqn
        );
        Ok(map)
    }

    /// Parse SMF bytes and build a tempo map from them
    pub fn from_smf_bytes(bytes: &[u8]) -> Result<Self> {
        let smf = Smf::parse(bytes)
            .map_err(|e| TimingError::Midi(format!("Failed to parse MIDI: {}", e)))?;
        Self::from_smf(&smf)
    }
}

/// Write a tempo map as a single-track SMF (format 0)
pub fn write_conductor_smf(map: &TempoMap, out: &mut Vec<u8>) -> Result<()> {
    let tpqn = map.tpqn()?;
    if tpqn > MAX_TPQN {
        return Err(TimingError::Midi(format!(
            "{} ticks per quarter note does not fit an SMF header",
            tpqn
        )));
    }

    let header = Header {
        format: Format::SingleTrack,
        timing: Timing::Metrical((tpqn as u16).into()),
    };

    let smf = Smf {
        header,
        tracks: vec![build_conductor_track(map)?],
    };

    smf.write(out)
        .map_err(|e| TimingError::Midi(format!("Failed to write MIDI: {}", e)))?;

    Ok(())
}

fn build_conductor_track<'a>(map: &TempoMap) -> Result<Track<'a>> {
    let mut events = Vec::new();

    for (tick, tempo) in map.tempo_points() {
        let us = tempo.microseconds_per_quarter_note;
        if us > MAX_TEMPO {
            return Err(TimingError::Midi(format!(
                "tempo {} at tick {} does not fit 24 bits",
                us, tick
            )));
        }
        events.push(TrackEvent {
            delta: checked_tick(tick)?.into(),
            kind: TrackEventKind::Meta(MetaMessage::Tempo((us as u32).into())),
        });
    }

    for (tick, signature) in map.time_signature_points() {
        let den = signature.denominator;
        if den.count_ones() != 1 || signature.numerator > i64::from(u8::MAX) {
            return Err(TimingError::Midi(format!(
                "time signature {} at tick {} cannot be encoded",
                signature, tick
            )));
        }
        events.push(TrackEvent {
            delta: checked_tick(tick)?.into(),
            kind: TrackEventKind::Meta(MetaMessage::TimeSignature(
                signature.numerator as u8,
                den.trailing_zeros() as u8,
                24, // MIDI clocks per metronome click
                8,  // 32nd notes per quarter note
            )),
        });
    }

    // Absolute ticks are parked in `delta` until sorted
    events.sort_by_key(|e| e.delta.as_int());
    convert_to_delta_times(&mut events);

    events.push(TrackEvent {
        delta: 0.into(),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    Ok(events)
}

fn checked_tick(tick: i64) -> Result<u32> {
    if tick > MAX_TICK {
        return Err(TimingError::Midi(format!(
            "tick {} does not fit a variable-length delta",
            tick
        )));
    }
    Ok(tick as u32)
}

/// Convert absolute tick times to delta times (time since previous event)
fn convert_to_delta_times(events: &mut [TrackEvent]) {
    let mut prev_tick = 0u32;
    for event in events.iter_mut() {
        let current_tick = event.delta.as_int();
        let delta = current_tick.saturating_sub(prev_tick);
        event.delta = delta.into();
        prev_tick = current_tick;
    }
}
