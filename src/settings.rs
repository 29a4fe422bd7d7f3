//! Game settings
//!
//! Persisted as JSON next to the game data.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_ENTRY, DEFAULT_ENTRY_DIRECTION, LEVEL_COUNT};
use crate::error::SettingsError;
use crate::sim::Beam;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Beam ===
    /// Where the laser enters the board and which way it heads
    pub entry: Beam,

    // === Data locations ===
    /// Directory holding `palya<id>.txt` level files
    pub levels_dir: PathBuf,
    /// Directory holding one file per player profile
    pub profiles_dir: PathBuf,
    /// Leaderboard output file
    pub leaderboard_file: PathBuf,

    // === Progression ===
    /// Number of levels in the campaign
    pub level_count: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            entry: Beam {
                position: DEFAULT_ENTRY,
                heading: DEFAULT_ENTRY_DIRECTION,
            },

            levels_dir: PathBuf::from("levels"),
            profiles_dir: PathBuf::from("profiles"),
            leaderboard_file: PathBuf::from("leaderboard.txt"),

            level_count: LEVEL_COUNT,
        }
    }
}

impl Settings {
    /// Path of a level file
    pub fn level_path(&self, id: u32) -> PathBuf {
        self.levels_dir.join(format!("palya{id}.txt"))
    }

    /// Check values that serde cannot
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !self.entry.position.in_bounds() {
            return Err(SettingsError::Validation(format!(
                "entry position {} is outside the board",
                self.entry.position
            )));
        }
        if self.level_count == 0 {
            return Err(SettingsError::Validation(
                "level_count must be > 0".into(),
            ));
        }
        Ok(())
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path).map_err(|e| SettingsError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let settings: Settings = serde_json::from_str(&json)?;
        settings.validate()?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults if the file is missing or bad
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::info!("Using default settings");
            return Self::default();
        }
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring settings file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| SettingsError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        log::info!("Settings saved");
        Ok(())
    }
}
