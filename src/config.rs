// Engine configuration - Loaded from RON
//
// Every field has a default, so a config file only needs the values it
// overrides:
//
//     (undo_history: 250, tempo_bpm: 90.0)

use crate::sequencer::timeline::{Tempo, TimeSignature};
use crate::sequencer::transport::DEFAULT_TOTAL_BARS;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Editor settings remembered between gestures
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Length in ticks of the last object created on the timeline
    pub timeline_last_object_length: f64,
    /// Length in ticks of the last object created in an editor
    pub editor_last_object_length: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            timeline_last_object_length: 1920.0,
            editor_last_object_length: 480.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of undoable actions kept
    pub undo_history: usize,
    /// Capacity of the UI event queue
    pub event_queue_capacity: usize,
    /// Skip UI events (offline rendering)
    pub export_mode: bool,
    pub sample_rate: f64,
    pub tempo_bpm: f64,
    pub time_signature: TimeSignature,
    pub total_bars: u32,
    pub settings: Settings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            undo_history: 100,
            event_queue_capacity: 4000,
            export_mode: false,
            sample_rate: 48000.0,
            tempo_bpm: 120.0,
            time_signature: TimeSignature::four_four(),
            total_bars: DEFAULT_TOTAL_BARS,
            settings: Settings::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_ron_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_ron_str(&contents)?;
        log::debug!("loaded engine config from {}", path.display());
        Ok(config)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.undo_history == 0 {
            return Err(ConfigError::Invalid("undo_history must be > 0".into()));
        }
        if self.event_queue_capacity == 0 {
            return Err(ConfigError::Invalid(
                "event_queue_capacity must be > 0".into(),
            ));
        }
        if self.sample_rate.is_nan() || self.sample_rate <= 0.0 {
            return Err(ConfigError::Invalid("sample_rate must be > 0".into()));
        }
        if !(Tempo::MIN_BPM..=Tempo::MAX_BPM).contains(&self.tempo_bpm) {
            return Err(ConfigError::Invalid(format!(
                "tempo_bpm must be between {} and {}",
                Tempo::MIN_BPM,
                Tempo::MAX_BPM
            )));
        }
        let ts = self.time_signature;
        if ts.numerator == 0 || !ts.denominator.is_power_of_two() {
            return Err(ConfigError::Invalid(format!(
                "invalid time signature {}",
                ts
            )));
        }
        Ok(())
    }

    pub fn tempo(&self) -> Tempo {
        Tempo::new(self.tempo_bpm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = EngineConfig::from_ron_str("(undo_history: 250, tempo_bpm: 90.0)").unwrap();
        assert_eq!(config.undo_history, 250);
        assert_eq!(config.tempo_bpm, 90.0);
        assert_eq!(config.event_queue_capacity, 4000);
        assert_eq!(config.time_signature, TimeSignature::four_four());
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            EngineConfig::from_ron_str("(undo_history: 0)"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_ron_str("(tempo_bpm: 5.0)"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_ron_str("(undo_history: "),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.ron");
        let config = EngineConfig {
            export_mode: true,
            time_signature: TimeSignature::three_four(),
            ..EngineConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(EngineConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_from_handwritten_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "(sample_rate: 44100.0, total_bars: 64)").unwrap();
        let config = EngineConfig::load(file.path()).unwrap();
        assert_eq!(config.sample_rate, 44100.0);
        assert_eq!(config.total_bars, 64);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            EngineConfig::load("/nonexistent/engine.ron"),
            Err(ConfigError::Io(_))
        ));
    }
}
