//! Configuration for tempo map defaults and length arithmetic
//!
//! Settings are plain data: nothing global reads them. Callers load a
//! [`TimingSettings`] and pass it to [`crate::TempoMapBuilder::with_settings`]
//! or use [`TimingSettings::length_anchor`] when adding lengths.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::defaults::{
    DEFAULT_DENOMINATOR, DEFAULT_MICROSECONDS_PER_QUARTER, DEFAULT_NUMERATOR, DEFAULT_TPQN,
};
use crate::error::{Result, TimingError};
use crate::tempo_map::{Tempo, TimeSignature};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSettings {
    /// Resolution for newly built tempo maps
    pub ticks_per_quarter_note: i64,

    /// Implicit tempo at tick 0, in microseconds per quarter note
    pub default_tempo: i64,

    /// Implicit time signature at tick 0 as `[numerator, denominator]`
    pub default_time_signature: [i64; 2],

    /// Anchor tick used by length + length arithmetic when none is given
    pub length_anchor: i64,
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            ticks_per_quarter_note: DEFAULT_TPQN,
            default_tempo: DEFAULT_MICROSECONDS_PER_QUARTER,
            default_time_signature: [DEFAULT_NUMERATOR, DEFAULT_DENOMINATOR],
            length_anchor: 0,
        }
    }
}

impl TimingSettings {
    pub fn default_tempo(&self) -> Tempo {
        Tempo::new(self.default_tempo)
    }

    pub fn default_time_signature(&self) -> TimeSignature {
        let [numerator, denominator] = self.default_time_signature;
        TimeSignature::new(numerator, denominator)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)
            .map_err(|e| TimingError::Settings(format!("invalid JSON settings: {}", e)))?;
        settings.validate()
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let settings: Self = serde_yaml::from_str(yaml)
            .map_err(|e| TimingError::Settings(format!("invalid YAML settings: {}", e)))?;
        settings.validate()
    }

    /// Load settings from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            TimingError::Settings(format!("failed to read {}: {}", path.display(), e))
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        log::debug!("Loading timing settings from {}", path.display());

        match extension.as_deref() {
            Some("json") => Self::from_json_str(&contents),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&contents),
            other => Err(TimingError::Settings(format!(
                "unsupported settings extension: {:?}",
                other
            ))),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| TimingError::Settings(format!("failed to serialize settings: {}", e)))
    }

    fn validate(self) -> Result<Self> {
        if self.length_anchor < 0 {
            return Err(TimingError::Settings(format!(
                "length_anchor must not be negative, got {}",
                self.length_anchor
            )));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = TimingSettings::default();
        assert_eq!(settings.ticks_per_quarter_note, 480);
        assert_eq!(settings.default_tempo(), Tempo::new(500_000));
        assert_eq!(settings.default_time_signature(), TimeSignature::new(4, 4));
        assert_eq!(settings.length_anchor, 0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = TimingSettings::from_json_str(r#"{ "ticks_per_quarter_note": 96 }"#).unwrap();
        assert_eq!(settings.ticks_per_quarter_note, 96);
        assert_eq!(settings.default_tempo, 500_000);
    }

    #[test]
    fn test_yaml() {
        let yaml = "default_tempo: 400000\ndefault_time_signature: [3, 4]\nlength_anchor: 960\n";
        let settings = TimingSettings::from_yaml_str(yaml).unwrap();
        assert_eq!(settings.default_tempo(), Tempo::new(400_000));
        assert_eq!(settings.default_time_signature(), TimeSignature::new(3, 4));
        assert_eq!(settings.length_anchor, 960);
    }

    #[test]
    fn test_negative_anchor_rejected() {
        let result = TimingSettings::from_json_str(r#"{ "length_anchor": -1 }"#);
        assert!(matches!(result, Err(TimingError::Settings(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let settings = TimingSettings {
            ticks_per_quarter_note: 192,
            ..TimingSettings::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(TimingSettings::from_json_str(&json).unwrap(), settings);
    }
}
