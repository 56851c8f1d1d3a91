use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};
use crate::history::MAX_OPEN_GROUPS;

/// User-configurable history behaviour, persisted to JSON.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct HistorySettings {
    /// How many groups may be open at once. Never more than [`MAX_OPEN_GROUPS`].
    pub max_open_groups: usize,
    /// Group levels a single undo/redo step descends into.
    pub fine_step_depth: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_open_groups: MAX_OPEN_GROUPS,
            fine_step_depth: 1,
        }
    }
}

impl HistorySettings {
    /// Load settings from the config file. Falls back to defaults on error.
    pub fn load() -> Self {
        Self::load_from(&config_path()).unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Result<Self, String> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| format!("Read failed: {e}"))?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self, String> {
        let settings: HistorySettings = serde_json::from_str(data)
            .map_err(|e| format!("Invalid history settings: {e}"))?;
        Ok(settings.clamped())
    }

    /// Save settings to the config file.
    pub fn save(&self) -> Result<(), String> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), String> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Create dir failed: {e}"))?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Serialization failed: {e}"))?;
        std::fs::write(path, data).map_err(|e| format!("Write failed: {e}"))
    }

    /// Pull out-of-range values back into what the engine supports.
    pub fn clamped(mut self) -> Self {
        if self.max_open_groups > MAX_OPEN_GROUPS {
            log::warn!(
                "max_open_groups {} exceeds the supported {MAX_OPEN_GROUPS}, clamping",
                self.max_open_groups
            );
            self.max_open_groups = MAX_OPEN_GROUPS;
        }
        if self.max_open_groups == 0 {
            log::warn!("max_open_groups of 0 would forbid every group, using 1");
            self.max_open_groups = 1;
        }
        self
    }
}

fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".config/terrain-history/history.json")
}
