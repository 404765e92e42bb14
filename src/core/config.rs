//=========================================================================
// Runtime Configuration
//=========================================================================
//
// Startup settings for the service runtime, read once from TOML.
//
// Example:
// ```toml
// channel_capacity = 64
// save_path = "saves/PlayerInfo.dat"
// corrupt_save = "keep_current"
//
// [volumes]
// background = 0.4
// effects = 0.8
// ui = 0.5
//
// [tracks]
// menu = [0, 5]
// in_game = [5, 9]
// ```
//
// Every key is optional; missing keys take their defaults.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};

//=== Internal Dependencies ===============================================

use crate::core::audio::{TrackPool, DEFAULT_CHANNEL_VOLUME};
use crate::core::error::ConfigError;
use crate::core::persistence::{CorruptSavePolicy, DEFAULT_SAVE_FILE};

/// Default capacity of the host → runtime event channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 128;

//=== ChannelVolumes ======================================================

/// Initial volume of each audio channel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChannelVolumes {
    pub background: f32,
    pub effects: f32,
    pub ui: f32,
}

impl Default for ChannelVolumes {
    fn default() -> Self {
        Self {
            background: DEFAULT_CHANNEL_VOLUME,
            effects: DEFAULT_CHANNEL_VOLUME,
            ui: DEFAULT_CHANNEL_VOLUME,
        }
    }
}

//=== TrackPools ==========================================================

/// Background track ranges, each written as `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TrackPools {
    pub menu: TrackPool,
    pub in_game: TrackPool,
}

impl Default for TrackPools {
    fn default() -> Self {
        Self {
            menu: TrackPool::MENU,
            in_game: TrackPool::IN_GAME,
        }
    }
}

//=== RuntimeConfig =======================================================

/// Settings consumed by [`crate::RuntimeBuilder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeConfig {
    /// Capacity of the bounded host event channel.
    pub channel_capacity: usize,

    /// Location of the progress blob.
    pub save_path: PathBuf,

    /// Handling of unreadable save blobs.
    pub corrupt_save: CorruptSavePolicy,

    pub volumes: ChannelVolumes,

    pub tracks: TrackPools,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            save_path: PathBuf::from("save").join(DEFAULT_SAVE_FILE),
            corrupt_save: CorruptSavePolicy::default(),
            volumes: ChannelVolumes::default(),
            tracks: TrackPools::default(),
        }
    }
}

impl RuntimeConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML, unknown keys or a
    /// track pool with fewer than two tracks, and [`ConfigError::Invalid`]
    /// for out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise
    /// as [`from_toml_str`](Self::from_toml_str).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml_str(&text)?;
        info!("Loaded runtime config from {}", path.display());
        Ok(config)
    }

    /// Checks value ranges the type system does not.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.channel_capacity == 0 {
            return Err(ConfigError::Invalid(
                "channel_capacity must be positive".to_string(),
            ));
        }

        let volumes = [
            ("volumes.background", self.volumes.background),
            ("volumes.effects", self.volumes.effects),
            ("volumes.ui", self.volumes.ui),
        ];
        for (key, volume) in volumes {
            if !(0.0..=1.0).contains(&volume) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be within [0, 1], got {}",
                    key, volume
                )));
            }
        }

        if self.save_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("save_path must not be empty".to_string()));
        }

        Ok(())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = RuntimeConfig::from_toml_str("").unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.channel_capacity, 128);
        assert_eq!(config.volumes.background, 0.5);
        assert_eq!(config.tracks.menu, TrackPool::MENU);
    }

    #[test]
    fn full_document_parses() {
        let text = r#"
            channel_capacity = 64
            save_path = "saves/slot.dat"
            corrupt_save = "keep_current"

            [volumes]
            background = 0.25
            effects = 1.0
            ui = 0.0

            [tracks]
            menu = [0, 3]
            in_game = [3, 9]
        "#;

        let config = RuntimeConfig::from_toml_str(text).unwrap();

        assert_eq!(config.channel_capacity, 64);
        assert_eq!(config.save_path, PathBuf::from("saves/slot.dat"));
        assert_eq!(config.corrupt_save, CorruptSavePolicy::KeepCurrent);
        assert_eq!(config.volumes.background, 0.25);
        assert_eq!(config.volumes.ui, 0.0);
        assert_eq!(config.tracks.menu, TrackPool::new(0, 3).unwrap());
        assert_eq!(config.tracks.in_game, TrackPool::new(3, 9).unwrap());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config = RuntimeConfig::from_toml_str("[volumes]\neffects = 0.9\n").unwrap();

        assert_eq!(config.volumes.effects, 0.9);
        assert_eq!(config.volumes.background, DEFAULT_CHANNEL_VOLUME);
        assert_eq!(config.tracks, TrackPools::default());
    }

    #[test]
    fn out_of_range_volume_is_invalid() {
        let err = RuntimeConfig::from_toml_str("[volumes]\nui = 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(msg) if msg.contains("volumes.ui")));
    }

    #[test]
    fn zero_capacity_is_invalid() {
        let err = RuntimeConfig::from_toml_str("channel_capacity = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn single_track_pool_is_rejected() {
        let err = RuntimeConfig::from_toml_str("[tracks]\nmenu = [4, 5]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = RuntimeConfig::from_toml_str("tick_rate = 60").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = RuntimeConfig::load(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runtime.toml");
        fs::write(&path, "corrupt_save = \"propagate\"\n").unwrap();

        let config = RuntimeConfig::load(&path).unwrap();
        assert_eq!(config.corrupt_save, CorruptSavePolicy::Propagate);
    }
}
