//! Tempo map: ordered tempo and time signature changes over tick time
//!
//! A [`TempoMap`] is an immutable snapshot. Collaborators that need to edit
//! the timeline work on a [`TempoMapBuilder`] and build a fresh map, so a map
//! handed to the converter never changes underneath a conversion.
//!
//! # Usage
//! ```
//! use midi_timing::{Tempo, TempoMapBuilder, TimeSignature};
//!
//! let map = TempoMapBuilder::new(480)
//!     .set_tempo(1920, Tempo::from_bpm(90.0))
//!     .set_time_signature(1920, TimeSignature::new(3, 4))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(map.get_tempo_at(0), Tempo::default());
//! assert_eq!(map.get_time_signature_at(5000), TimeSignature::new(3, 4));
//! ```

pub mod smf;
pub mod types;

pub use smf::write_conductor_smf;
pub use types::{Tempo, TimeSignature};

use std::collections::BTreeMap;

use crate::defaults::DEFAULT_TPQN;
use crate::error::{Result, TimingError};
use crate::settings::TimingSettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempoMap {
    /// `None` only for maps imported from SMPTE-timed files
    tpqn: Option<i64>,
    tempos: Vec<(i64, Tempo)>,
    signatures: Vec<(i64, TimeSignature)>,
    default_tempo: Tempo,
    default_signature: TimeSignature,
}

impl TempoMap {
    /// Constant 120 BPM, 4/4 map at the given resolution
    pub fn new(tpqn: i64) -> Result<Self> {
        TempoMapBuilder::new(tpqn).build()
    }

    /// Build a map from explicit change lists
    ///
    /// Unlike the builder, duplicated ticks are rejected rather than
    /// overwritten.
    ///
    /// # Errors
    /// `InvalidTempoMap` if `tpqn <= 0`, any tick is negative or repeated,
    /// or any tempo / signature component is not positive.
    pub fn from_changes(
        tpqn: i64,
        tempos: impl IntoIterator<Item = (i64, Tempo)>,
        signatures: impl IntoIterator<Item = (i64, TimeSignature)>,
    ) -> Result<Self> {
        let mut builder = TempoMapBuilder::new(tpqn);
        for (tick, tempo) in tempos {
            if builder.tempos.insert(tick, tempo).is_some() {
                return Err(TimingError::InvalidTempoMap(format!(
                    "duplicate tempo change at tick {}",
                    tick
                )));
            }
        }
        for (tick, signature) in signatures {
            if builder.signatures.insert(tick, signature).is_some() {
                return Err(TimingError::InvalidTempoMap(format!(
                    "duplicate time signature change at tick {}",
                    tick
                )));
            }
        }
        builder.build()
    }

    /// A map without resolution; every conversion against it fails with
    /// `EmptyTempoMap`.
    pub(crate) fn without_resolution() -> Self {
        Self {
            tpqn: None,
            tempos: Vec::new(),
            signatures: Vec::new(),
            default_tempo: Tempo::default(),
            default_signature: TimeSignature::default(),
        }
    }

    /// Ticks per quarter note
    pub fn tpqn(&self) -> Result<i64> {
        self.tpqn.ok_or(TimingError::EmptyTempoMap)
    }

    pub fn ticks_per_quarter_note(&self) -> Option<i64> {
        self.tpqn
    }

    /// Tempo in effect at `tick` (greatest change at or before it)
    pub fn get_tempo_at(&self, tick: i64) -> Tempo {
        lookup(&self.tempos, tick).unwrap_or(self.default_tempo)
    }

    /// Time signature in effect at `tick`
    pub fn get_time_signature_at(&self, tick: i64) -> TimeSignature {
        lookup(&self.signatures, tick).unwrap_or(self.default_signature)
    }

    /// Explicit tempo changes, ascending by tick
    pub fn tempo_changes(&self) -> impl Iterator<Item = (i64, Tempo)> + '_ {
        self.tempos.iter().copied()
    }

    /// Explicit time signature changes, ascending by tick
    pub fn time_signature_changes(&self) -> impl Iterator<Item = (i64, TimeSignature)> + '_ {
        self.signatures.iter().copied()
    }

    pub fn has_constant_tempo(&self) -> bool {
        self.tempo_points()
            .all(|(_, tempo)| tempo == self.get_tempo_at(0))
    }

    /// Tempo segment starts beginning at tick 0, with the implicit default
    /// filled in when no explicit change sits at 0.
    pub(crate) fn tempo_points(&self) -> impl Iterator<Item = (i64, Tempo)> + '_ {
        let implicit = match self.tempos.first() {
            Some((0, _)) => None,
            _ => Some((0, self.default_tempo)),
        };
        implicit.into_iter().chain(self.tempo_changes())
    }

    /// Time signature segment starts beginning at tick 0, like `tempo_points`
    pub(crate) fn time_signature_points(&self) -> impl Iterator<Item = (i64, TimeSignature)> + '_ {
        let implicit = match self.signatures.first() {
            Some((0, _)) => None,
            _ => Some((0, self.default_signature)),
        };
        implicit.into_iter().chain(self.time_signature_changes())
    }

    /// First time signature change strictly after `tick`
    pub(crate) fn next_time_signature_change(&self, tick: i64) -> Option<i64> {
        let idx = self.signatures.partition_point(|(t, _)| *t <= tick);
        self.signatures.get(idx).map(|(t, _)| *t)
    }

    /// Start a new edit seeded with this map's contents
    pub fn to_builder(&self) -> TempoMapBuilder {
        TempoMapBuilder {
            tpqn: self.tpqn.unwrap_or(DEFAULT_TPQN),
            tempos: self.tempos.iter().copied().collect(),
            signatures: self.signatures.iter().copied().collect(),
            default_tempo: self.default_tempo,
            default_signature: self.default_signature,
        }
    }
}

impl Default for TempoMap {
    fn default() -> Self {
        Self {
            tpqn: Some(DEFAULT_TPQN),
            tempos: Vec::new(),
            signatures: Vec::new(),
            default_tempo: Tempo::default(),
            default_signature: TimeSignature::default(),
        }
    }
}

/// Binary search for the greatest key <= tick
fn lookup<T: Copy>(changes: &[(i64, T)], tick: i64) -> Option<T> {
    let idx = changes.partition_point(|(t, _)| *t <= tick);
    if idx == 0 {
        None
    } else {
        Some(changes[idx - 1].1)
    }
}

/// Mutable staging area for a [`TempoMap`]
///
/// Setting a change at a tick that already has one replaces it.
#[derive(Debug, Clone)]
pub struct TempoMapBuilder {
    tpqn: i64,
    tempos: BTreeMap<i64, Tempo>,
    signatures: BTreeMap<i64, TimeSignature>,
    default_tempo: Tempo,
    default_signature: TimeSignature,
}

impl TempoMapBuilder {
    pub fn new(tpqn: i64) -> Self {
        Self {
            tpqn,
            tempos: BTreeMap::new(),
            signatures: BTreeMap::new(),
            default_tempo: Tempo::default(),
            default_signature: TimeSignature::default(),
        }
    }

    /// Seed resolution and implicit defaults from settings
    pub fn with_settings(settings: &TimingSettings) -> Self {
        Self {
            tpqn: settings.ticks_per_quarter_note,
            tempos: BTreeMap::new(),
            signatures: BTreeMap::new(),
            default_tempo: settings.default_tempo(),
            default_signature: settings.default_time_signature(),
        }
    }

    pub fn set_tempo(mut self, tick: i64, tempo: Tempo) -> Self {
        self.tempos.insert(tick, tempo);
        self
    }

    pub fn set_time_signature(mut self, tick: i64, signature: TimeSignature) -> Self {
        self.signatures.insert(tick, signature);
        self
    }

    pub fn remove_tempo(mut self, tick: i64) -> Self {
        self.tempos.remove(&tick);
        self
    }

    pub fn remove_time_signature(mut self, tick: i64) -> Self {
        self.signatures.remove(&tick);
        self
    }

    pub fn clear_tempo_changes(mut self) -> Self {
        self.tempos.clear();
        self
    }

    pub fn clear_time_signature_changes(mut self) -> Self {
        self.signatures.clear();
        self
    }

    /// Validate and freeze
    pub fn build(self) -> Result<TempoMap> {
        if self.tpqn <= 0 {
            return Err(TimingError::InvalidTempoMap(format!(
                "ticks per quarter note must be positive, got {}",
                self.tpqn
            )));
        }

        validate_tempo(self.default_tempo, 0)?;
        validate_signature(self.default_signature, self.tpqn, 0)?;

        for (&tick, &tempo) in &self.tempos {
            validate_tick(tick)?;
            validate_tempo(tempo, tick)?;
        }
        for (&tick, &signature) in &self.signatures {
            validate_tick(tick)?;
            validate_signature(signature, self.tpqn, tick)?;
        }

        log::debug!(
            "Built tempo map: tpqn={}, {} tempo change(s), {} time signature change(s)",
            self.tpqn,
            self.tempos.len(),
            self.signatures.len()
        );

        Ok(TempoMap {
            tpqn: Some(self.tpqn),
            tempos: self.tempos.into_iter().collect(),
            signatures: self.signatures.into_iter().collect(),
            default_tempo: self.default_tempo,
            default_signature: self.default_signature,
        })
    }
}

fn validate_tick(tick: i64) -> Result<()> {
    if tick < 0 {
        return Err(TimingError::InvalidTempoMap(format!(
            "change at negative tick {}",
            tick
        )));
    }
    Ok(())
}

fn validate_tempo(tempo: Tempo, tick: i64) -> Result<()> {
    if tempo.microseconds_per_quarter_note <= 0 {
        return Err(TimingError::InvalidTempoMap(format!(
            "tempo at tick {} must be positive, got {}",
            tick, tempo.microseconds_per_quarter_note
        )));
    }
    Ok(())
}

fn validate_signature(signature: TimeSignature, tpqn: i64, tick: i64) -> Result<()> {
    if signature.numerator <= 0 || signature.denominator <= 0 {
        return Err(TimingError::InvalidTempoMap(format!(
            "time signature {} at tick {} must have positive components",
            signature, tick
        )));
    }
    let (Some(beat_length), Some(_)) = (signature.beat_length(tpqn), signature.bar_length(tpqn))
    else {
        return Err(TimingError::InvalidTempoMap(format!(
            "time signature {} at tick {} has a bar longer than 64 bits of ticks",
            signature, tick
        )));
    };
    // A beat shorter than one tick would make bar walks stall
    if beat_length == 0 {
        return Err(TimingError::InvalidTempoMap(format!(
            "time signature {} at tick {} is finer than the map resolution",
            signature, tick
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variable_map() -> TempoMap {
        TempoMapBuilder::new(96)
            .set_tempo(100, Tempo::new(400_000))
            .set_tempo(500, Tempo::new(1_000_000))
            .set_time_signature(384, TimeSignature::new(3, 8))
            .build()
            .unwrap()
    }

    #[test]
    fn test_defaults_before_first_change() {
        let map = variable_map();
        assert_eq!(map.get_tempo_at(0), Tempo::default());
        assert_eq!(map.get_tempo_at(99), Tempo::default());
        assert_eq!(map.get_time_signature_at(383), TimeSignature::default());
    }

    #[test]
    fn test_lookup_inherits_preceding_change() {
        let map = variable_map();
        assert_eq!(map.get_tempo_at(100), Tempo::new(400_000));
        assert_eq!(map.get_tempo_at(499), Tempo::new(400_000));
        assert_eq!(map.get_tempo_at(500), Tempo::new(1_000_000));
        assert_eq!(map.get_tempo_at(i64::MAX), Tempo::new(1_000_000));
        assert_eq!(map.get_time_signature_at(384), TimeSignature::new(3, 8));
    }

    #[test]
    fn test_tempo_points_include_implicit_start() {
        let map = variable_map();
        let points: Vec<_> = map.tempo_points().collect();
        assert_eq!(
            points,
            vec![
                (0, Tempo::default()),
                (100, Tempo::new(400_000)),
                (500, Tempo::new(1_000_000)),
            ]
        );

        let explicit_start = TempoMapBuilder::new(96)
            .set_tempo(0, Tempo::new(600_000))
            .build()
            .unwrap();
        assert_eq!(explicit_start.tempo_points().count(), 1);
    }

    #[test]
    fn test_signature_points_include_implicit_start() {
        let map = TempoMapBuilder::new(96)
            .set_time_signature(384, TimeSignature::new(3, 8))
            .build()
            .unwrap();
        let points: Vec<_> = map.time_signature_points().collect();
        assert_eq!(
            points,
            vec![(0, TimeSignature::default()), (384, TimeSignature::new(3, 8))]
        );

        let explicit_start = TempoMapBuilder::new(96)
            .set_time_signature(0, TimeSignature::new(5, 4))
            .build()
            .unwrap();
        assert_eq!(explicit_start.time_signature_points().count(), 1);
    }

    #[test]
    fn test_invalid_tpqn() {
        assert!(matches!(
            TempoMap::new(0),
            Err(TimingError::InvalidTempoMap(_))
        ));
        assert!(matches!(
            TempoMap::new(-96),
            Err(TimingError::InvalidTempoMap(_))
        ));
    }

    #[test]
    fn test_invalid_tempo_and_signature() {
        let zero_tempo = TempoMapBuilder::new(96).set_tempo(10, Tempo::new(0)).build();
        assert!(matches!(zero_tempo, Err(TimingError::InvalidTempoMap(_))));

        let zero_denominator = TempoMapBuilder::new(96)
            .set_time_signature(0, TimeSignature::new(4, 0))
            .build();
        assert!(matches!(zero_denominator, Err(TimingError::InvalidTempoMap(_))));

        let negative_tick = TempoMapBuilder::new(96)
            .set_tempo(-1, Tempo::default())
            .build();
        assert!(matches!(negative_tick, Err(TimingError::InvalidTempoMap(_))));
    }

    #[test]
    fn test_oversized_lengths_rejected() {
        let huge_resolution = TempoMapBuilder::new(i64::MAX / 2).build();
        assert!(matches!(huge_resolution, Err(TimingError::InvalidTempoMap(_))));

        let huge_bar = TempoMapBuilder::new(480)
            .set_time_signature(0, TimeSignature::new(i64::MAX / 100, 4))
            .build();
        assert!(matches!(huge_bar, Err(TimingError::InvalidTempoMap(_))));
    }

    #[test]
    fn test_from_changes_rejects_duplicates() {
        let result = TempoMap::from_changes(
            96,
            vec![(10, Tempo::new(400_000)), (10, Tempo::new(300_000))],
            vec![],
        );
        assert!(matches!(result, Err(TimingError::InvalidTempoMap(_))));
    }

    #[test]
    fn test_from_changes_sorts() {
        let map = TempoMap::from_changes(
            96,
            vec![(500, Tempo::new(300_000)), (10, Tempo::new(400_000))],
            vec![(0, TimeSignature::new(6, 8))],
        )
        .unwrap();
        let ticks: Vec<i64> = map.tempo_changes().map(|(t, _)| t).collect();
        assert_eq!(ticks, vec![10, 500]);
        assert_eq!(map.get_time_signature_at(0), TimeSignature::new(6, 8));
    }

    #[test]
    fn test_builder_round_trip() {
        let map = variable_map();
        let edited = map
            .to_builder()
            .remove_tempo(500)
            .build()
            .unwrap();
        assert_eq!(edited.get_tempo_at(10_000), Tempo::new(400_000));
        assert_eq!(map.get_tempo_at(10_000), Tempo::new(1_000_000));
    }

    #[test]
    fn test_next_time_signature_change() {
        let map = variable_map();
        assert_eq!(map.next_time_signature_change(0), Some(384));
        assert_eq!(map.next_time_signature_change(384), None);
    }

    #[test]
    fn test_empty_resolution() {
        let map = TempoMap::without_resolution();
        assert_eq!(map.tpqn(), Err(TimingError::EmptyTempoMap));
        assert_eq!(map.ticks_per_quarter_note(), None);
    }

    #[test]
    fn test_constant_tempo() {
        assert!(TempoMap::default().has_constant_tempo());
        assert!(!variable_map().has_constant_tempo());
    }
}
