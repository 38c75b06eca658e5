use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Settings for the live driver, persisted as settings.json
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Seconds between simulation ticks
    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: u64,
    /// Whether ticks run at all; skipped ticks are not replayed
    #[serde(default = "default_live_updates")]
    pub live_updates: bool,
    /// Days of synthetic history generated at startup
    #[serde(default = "default_history_days")]
    pub history_days: u32,
    /// Fixed RNG seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
    /// JSON location catalog; the built-in catalog is used when unset
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

/// Longest backfill accepted from settings.json
pub const MAX_HISTORY_DAYS: u32 = 90;

fn default_tick_interval() -> u64 {
    3
}

fn default_live_updates() -> bool {
    true
}

fn default_history_days() -> u32 {
    7
}

impl Settings {
    /// Clamp values that would make startup unreasonably expensive.
    fn clamped(mut self) -> Self {
        if self.history_days > MAX_HISTORY_DAYS {
            log::warn!(
                "history_days {} exceeds {}; using {}",
                self.history_days,
                MAX_HISTORY_DAYS,
                MAX_HISTORY_DAYS
            );
            self.history_days = MAX_HISTORY_DAYS;
        }
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            tick_interval_secs: default_tick_interval(),
            live_updates: default_live_updates(),
            history_days: default_history_days(),
            seed: None,
            catalog_path: None,
        }
    }
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(app_config_dir: PathBuf) -> Self {
        Self {
            config_path: app_config_dir.join("settings.json"),
        }
    }

    /// Read settings, falling back to defaults when the file is missing or unreadable.
    pub fn load(&self) -> Settings {
        if !self.config_path.exists() {
            return Settings::default();
        }
        match fs::read_to_string(&self.config_path) {
            Ok(content) => match serde_json::from_str::<Settings>(&content) {
                Ok(settings) => settings.clamped(),
                Err(e) => {
                    log::warn!(
                        "Ignoring invalid settings in {}: {}",
                        self.config_path.display(),
                        e
                    );
                    Settings::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}", self.config_path.display(), e);
                Settings::default()
            }
        }
    }

    pub fn save(&self, settings: &Settings) -> io::Result<()> {
        // Ensure directory exists
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.config_path, content)
    }
}
