// SPDX-License-Identifier: MPL-2.0
//! This module handles the player's configuration, including loading and saving
//! tuning values to a `settings.toml` file.
//!
//! # Examples
//!
//! ```no_run
//! use clip_player::config::{self, Config};
//! use std::path::PathBuf;
//!
//! // Load existing configuration
//! let mut config = config::load().unwrap_or_default();
//!
//! // Modify a setting
//! config.playback.lag_grace_ms = 20;
//!
//! // Save the modified configuration
//! config::save(&config).expect("Failed to save config");
//!
//! // To load/save from a specific path (e.g., for testing)
//! let temp_dir = PathBuf::from("./temp_config_dir");
//! std::fs::create_dir_all(&temp_dir).unwrap();
//! let temp_file = temp_dir.join("test_settings.toml");
//! config::save_to_path(&config, &temp_file).expect("Failed to save to path");
//! let loaded_config = config::load_from_path(&temp_file).expect("Failed to load from path");
//! assert_eq!(loaded_config.playback.lag_grace_ms, 20);
//! std::fs::remove_dir_all(&temp_dir).unwrap();
//! ```

pub mod defaults;

use crate::domain::geometry::Extent;
use crate::domain::video::{ClipBudget, LagGrace, SeekStep};
use crate::error::Result;
use defaults::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_FILE: &str = "settings.toml";
const APP_NAME: &str = "ClipPlayer";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub screen: ScreenConfig,
    #[serde(default)]
    pub playback: PlaybackConfig,
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    pub width: i32,
    pub height: i32,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SCREEN_WIDTH,
            height: DEFAULT_SCREEN_HEIGHT,
        }
    }
}

impl ScreenConfig {
    #[must_use]
    pub fn extent(&self) -> Extent {
        Extent::new(self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub lag_grace_ms: u64,
    pub max_active_clips: usize,
    pub fade_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            lag_grace_ms: DEFAULT_LAG_GRACE_MS,
            max_active_clips: DEFAULT_MAX_ACTIVE_CLIPS,
            fade_ms: DEFAULT_FADE_MS,
        }
    }
}

impl PlaybackConfig {
    #[must_use]
    pub fn lag_grace(&self) -> LagGrace {
        LagGrace::new(self.lag_grace_ms)
    }

    #[must_use]
    pub fn clip_budget(&self) -> ClipBudget {
        ClipBudget::new(self.max_active_clips)
    }

    /// Fade duration, clamped to [`MAX_FADE_MS`].
    #[must_use]
    pub fn fade(&self) -> Duration {
        Duration::from_millis(self.fade_ms.min(MAX_FADE_MS))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub seek_back_secs: f64,
    pub seek_forward_secs: f64,
    pub poll_interval_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            seek_back_secs: DEFAULT_SEEK_BACK_SECS,
            seek_forward_secs: DEFAULT_SEEK_FORWARD_SECS,
            poll_interval_ms: DEFAULT_INPUT_POLL_MS,
        }
    }
}

impl InputConfig {
    #[must_use]
    pub fn seek_back(&self) -> SeekStep {
        SeekStep::new_or(self.seek_back_secs, SeekStep::back())
    }

    #[must_use]
    pub fn seek_forward(&self) -> SeekStep {
        SeekStep::new(self.seek_forward_secs)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(MIN_INPUT_POLL_MS))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

fn get_default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|mut path| {
        path.push(APP_NAME);
        path.push(CONFIG_FILE);
        path
    })
}

pub fn load() -> Result<Config> {
    if let Some(path) = get_default_config_path() {
        if path.exists() {
            return load_from_path(&path);
        }
    }
    Ok(Config::default())
}

pub fn save(config: &Config) -> Result<()> {
    if let Some(path) = get_default_config_path() {
        return save_to_path(config, &path);
    }
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content).unwrap_or_default())
}

pub fn save_to_path(config: &Config, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}
