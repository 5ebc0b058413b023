use std::io::Write;

use midi_timing::tempo_map::write_conductor_smf;
use midi_timing::{Tempo, TempoMap, TempoMapBuilder, TimeSignature, TimingError, TimingSettings};

#[test]
fn test_lookup_between_changes() {
    let map = TempoMap::from_changes(
        96,
        [(0, Tempo::new(600_000)), (384, Tempo::new(400_000))],
        [(192, TimeSignature::new(3, 4))],
    )
    .unwrap();

    assert_eq!(map.get_tempo_at(383), Tempo::new(600_000));
    assert_eq!(map.get_tempo_at(384), Tempo::new(400_000));
    assert_eq!(map.get_tempo_at(i64::MAX), Tempo::new(400_000));
    assert_eq!(map.get_time_signature_at(191), TimeSignature::default());
    assert_eq!(map.get_time_signature_at(192), TimeSignature::new(3, 4));
    assert!(!map.has_constant_tempo());
}

#[test]
fn test_invalid_change_lists() {
    let cases = [
        TempoMap::from_changes(0, [], []),
        TempoMap::from_changes(96, [(-1, Tempo::new(500_000))], []),
        TempoMap::from_changes(96, [(0, Tempo::new(0))], []),
        TempoMap::from_changes(96, [(5, Tempo::new(1)), (5, Tempo::new(2))], []),
        TempoMap::from_changes(96, [], [(0, TimeSignature::new(0, 4))]),
    ];
    for result in cases {
        assert!(matches!(result, Err(TimingError::InvalidTempoMap(_))));
    }
}

#[test]
fn test_builder_edits_produce_new_snapshot() {
    let original = TempoMapBuilder::new(480)
        .set_tempo(960, Tempo::from_bpm(60.0))
        .build()
        .unwrap();
    let edited = original
        .to_builder()
        .remove_tempo(960)
        .set_time_signature(0, TimeSignature::new(6, 8))
        .build()
        .unwrap();

    assert_eq!(original.get_tempo_at(1000), Tempo::from_bpm(60.0));
    assert_eq!(edited.get_tempo_at(1000), Tempo::default());
    assert_eq!(edited.get_time_signature_at(0), TimeSignature::new(6, 8));
    assert!(edited.has_constant_tempo());
}

#[test]
fn test_smf_round_trip_keeps_changes() {
    let map = TempoMapBuilder::new(960)
        .set_tempo(0, Tempo::from_bpm(100.0))
        .set_tempo(3840, Tempo::from_bpm(140.0))
        .set_time_signature(0, TimeSignature::new(4, 4))
        .set_time_signature(3840, TimeSignature::new(7, 8))
        .build()
        .unwrap();

    let mut bytes = Vec::new();
    write_conductor_smf(&map, &mut bytes).unwrap();
    let imported = TempoMap::from_smf_bytes(&bytes).unwrap();

    assert_eq!(imported.ticks_per_quarter_note(), Some(960));
    assert_eq!(
        imported.tempo_changes().collect::<Vec<_>>(),
        map.tempo_changes().collect::<Vec<_>>()
    );
    assert_eq!(
        imported.time_signature_changes().collect::<Vec<_>>(),
        map.time_signature_changes().collect::<Vec<_>>()
    );
}

#[test]
fn test_settings_file_seeds_builder() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(file, "ticks_per_quarter_note: 192").unwrap();
    writeln!(file, "default_tempo: 600000").unwrap();
    writeln!(file, "default_time_signature: [3, 4]").unwrap();

    let settings = TimingSettings::load(file.path()).unwrap();
    let map = TempoMapBuilder::with_settings(&settings).build().unwrap();

    assert_eq!(map.tpqn().unwrap(), 192);
    assert_eq!(map.get_tempo_at(0), Tempo::new(600_000));
    assert_eq!(map.get_time_signature_at(0), TimeSignature::new(3, 4));
}

#[test]
fn test_settings_json_file() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, r#"{{ "ticks_per_quarter_note": 240 }}"#).unwrap();

    let settings = TimingSettings::load(file.path()).unwrap();
    assert_eq!(settings.ticks_per_quarter_note, 240);
    assert_eq!(settings.length_anchor, 0);
}

#[test]
fn test_settings_unknown_extension() {
    let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    assert!(matches!(
        TimingSettings::load(file.path()),
        Err(TimingError::Settings(_))
    ));
}
