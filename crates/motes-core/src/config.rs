//! Scene presets and run-level configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Hardcoded per-scene constants that matter to the driver and the clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenePreset {
    pub name: String,
    pub frame_count: u64,
    pub max_particles: usize,
    pub interval_ms: u64,
}

impl Default for ScenePreset {
    fn default() -> Self {
        Self {
            name: "Default".into(),
            frame_count: 300,
            max_particles: 512,
            interval_ms: 40,
        }
    }
}

/// Optional overrides, read from TOML and/or the command line.
///
/// ```toml
/// frame_count = 120
/// max_particles = 64
/// seed = 7
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub frame_count: Option<u64>,
    pub max_particles: Option<usize>,
    pub interval_ms: Option<u64>,
    pub seed: Option<u64>,
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Values set in `other` win.
    pub fn merge(self, other: EngineConfig) -> Self {
        Self {
            frame_count: other.frame_count.or(self.frame_count),
            max_particles: other.max_particles.or(self.max_particles),
            interval_ms: other.interval_ms.or(self.interval_ms),
            seed: other.seed.or(self.seed),
        }
    }

    pub fn apply(&self, preset: ScenePreset) -> Result<ScenePreset> {
        let preset = ScenePreset {
            frame_count: self.frame_count.unwrap_or(preset.frame_count),
            max_particles: self.max_particles.unwrap_or(preset.max_particles),
            interval_ms: self.interval_ms.unwrap_or(preset.interval_ms),
            ..preset
        };
        if preset.frame_count == 0 {
            return Err(Error::InvalidConfig("frame_count must be at least 1".into()));
        }
        Ok(preset)
    }
}
