use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::environment::{DayNight, Mode};
use crate::error::WorldError;
use crate::presets::DEFAULT_PRESET_NAME;

/// World configuration, normally read from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    pub world: WorldSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSection {
    /// Active quality preset name. Unknown names resolve to the default
    /// preset at lookup time rather than failing here.
    pub preset: String,
    pub mode: Mode,
    pub day_night: DayNight,
    /// Fixed RNG seed for reproducible worlds; omit for per-session entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            world: WorldSection {
                preset: DEFAULT_PRESET_NAME.to_string(),
                mode: Mode::Natural,
                day_night: DayNight::Day,
                seed: None,
            },
        }
    }
}

impl WorldConfig {
    /// Load configuration from `path`, failing on I/O or parse errors.
    pub fn load(path: &str) -> Result<Self, WorldError> {
        let content = fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from file or fall back to defaults.
    ///
    /// Any failure is logged and answered with the default config; a broken
    /// settings file should not keep the session from starting.
    pub fn load_or_default(path: &str) -> Self {
        if Path::new(path).exists() {
            match Self::load(path) {
                Ok(config) => {
                    tracing::info!("loaded configuration from {}", path);
                    return config;
                }
                Err(e) => {
                    tracing::warn!("failed to load {}: {}, using defaults", path, e);
                }
            }
        } else {
            tracing::info!("no config at {}, using defaults", path);
        }

        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_uses_default_preset() {
        let config = WorldConfig::default();
        assert_eq!(config.world.preset, DEFAULT_PRESET_NAME);
        assert_eq!(config.world.mode, Mode::Natural);
        assert!(config.world.seed.is_none());
    }

    #[test]
    fn config_round_trips_through_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[world]\npreset = \"ultra\"\nmode = \"winter\"\nday_night = \"night\"\nseed = 12\n"
        )
        .unwrap();

        let config = WorldConfig::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.world.preset, "ultra");
        assert_eq!(config.world.mode, Mode::Winter);
        assert_eq!(config.world.day_night, DayNight::Night);
        assert_eq!(config.world.seed, Some(12));
    }

    #[test]
    fn garbage_file_falls_back_to_default() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "this is not toml {{{{").unwrap();

        let config = WorldConfig::load_or_default(file.path().to_str().unwrap());
        assert_eq!(config.world.preset, DEFAULT_PRESET_NAME);
    }

    #[test]
    fn missing_file_falls_back_to_default() {
        let config = WorldConfig::load_or_default("/nonexistent/world.toml");
        assert_eq!(config.world.preset, DEFAULT_PRESET_NAME);
    }

    #[test]
    fn strict_load_reports_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[world]\npreset = 3\n").unwrap();

        let err = WorldConfig::load(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, WorldError::Parse(_)));
    }
}
