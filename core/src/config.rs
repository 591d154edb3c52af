//! Configuration management (config.toml)
//!
//! Settings are stored in TOML format in the platform-specific config
//! directory. A missing or unreadable file means defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::audio::{AudioError, SoundOutput};
use crate::memory::megabytes;

const CONFIG_FILE: &str = "config.toml";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Window settings
    #[serde(default)]
    pub window: WindowConfig,
    /// Sound output settings
    #[serde(default)]
    pub audio: AudioConfig,
    /// Game memory sizes
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Controller settings
    #[serde(default)]
    pub input: InputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Window title (default: "Everyday Hero")
    #[serde(default = "default_title")]
    pub title: String,
    /// Initial client width in logical pixels (default: 640)
    #[serde(default = "default_width")]
    pub width: u32,
    /// Initial client height in logical pixels (default: 480)
    #[serde(default = "default_height")]
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Output sample rate (default: 48000)
    #[serde(default = "default_samples_per_second")]
    pub samples_per_second: u32,
    /// Samples to stay ahead of the play cursor (default: 1/15 s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency_sample_count: Option<usize>,
    /// Master volume level (default: 0.8, range: 0.0-1.0)
    #[serde(default = "default_volume")]
    pub master_volume: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryConfig {
    /// Permanent storage in MiB (default: 64)
    #[serde(default = "default_permanent_storage_mb")]
    pub permanent_storage_mb: usize,
    /// Transient storage in MiB (default: 512)
    #[serde(default = "default_transient_storage_mb")]
    pub transient_storage_mb: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    /// Deadzone for analog sticks (0.0-1.0)
    #[serde(default = "default_deadzone")]
    pub stick_deadzone: f32,
}

fn default_title() -> String {
    "Everyday Hero".to_string()
}
fn default_width() -> u32 {
    640
}
fn default_height() -> u32 {
    480
}

fn default_samples_per_second() -> u32 {
    48_000
}
fn default_volume() -> f32 {
    0.8
}

fn default_permanent_storage_mb() -> usize {
    64
}
fn default_transient_storage_mb() -> usize {
    512
}

fn default_deadzone() -> f32 {
    0.15
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            width: default_width(),
            height: default_height(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            samples_per_second: default_samples_per_second(),
            latency_sample_count: None,
            master_volume: default_volume(),
        }
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            permanent_storage_mb: default_permanent_storage_mb(),
            transient_storage_mb: default_transient_storage_mb(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            stick_deadzone: default_deadzone(),
        }
    }
}

impl AudioConfig {
    /// Configured latency, or 1/15 s of samples
    pub fn latency_sample_count(&self) -> usize {
        self.latency_sample_count
            .unwrap_or(self.samples_per_second as usize / 15)
    }

    /// 16-bit stereo sound output for these settings
    pub fn sound_output(&self) -> Result<SoundOutput, AudioError> {
        SoundOutput::new(self.samples_per_second, 2, self.latency_sample_count())
    }
}

impl MemoryConfig {
    /// Permanent storage in bytes, `None` if it cannot be addressed
    pub fn permanent_storage_size(&self) -> Option<usize> {
        storage_bytes(self.permanent_storage_mb)
    }

    /// Transient storage in bytes, `None` if it cannot be addressed
    pub fn transient_storage_size(&self) -> Option<usize> {
        storage_bytes(self.transient_storage_mb)
    }

    /// Both blocks together in bytes, `None` if they cannot be addressed
    pub fn total_storage_size(&self) -> Option<usize> {
        self.permanent_storage_size()?
            .checked_add(self.transient_storage_size()?)
            .filter(|&total| total <= isize::MAX as usize)
    }
}

fn storage_bytes(mb: usize) -> Option<usize> {
    mb.checked_mul(megabytes(1)).filter(|&bytes| bytes <= isize::MAX as usize)
}

/// Problems found by [`Config::validate`]
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("audio settings: {0}")]
    Audio(#[from] AudioError),

    #[error("master volume {0} is outside 0.0-1.0")]
    Volume(f32),

    #[error("stick deadzone {0} is outside 0.0-1.0")]
    Deadzone(f32),

    #[error("game memory of {permanent_mb} MiB + {transient_mb} MiB cannot be addressed")]
    MemorySize {
        permanent_mb: usize,
        transient_mb: usize,
    },
}

impl Config {
    /// Parse a TOML document, filling missing fields with defaults
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Check settings that cannot be expressed in the types.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.audio.sound_output()?;
        if !(0.0..=1.0).contains(&self.audio.master_volume) {
            return Err(ConfigError::Volume(self.audio.master_volume));
        }
        if !(0.0..1.0).contains(&self.input.stick_deadzone) {
            return Err(ConfigError::Deadzone(self.input.stick_deadzone));
        }
        if self.memory.total_storage_size().is_none() {
            return Err(ConfigError::MemorySize {
                permanent_mb: self.memory.permanent_storage_mb,
                transient_mb: self.memory.transient_storage_mb,
            });
        }
        Ok(())
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Windows: `%APPDATA%\Everyday\config`
/// On macOS: `~/Library/Application Support/io.everyday.Everyday`
/// On Linux: `~/.config/Everyday`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io.everyday", "", "Everyday")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Loads the configuration from disk.
///
/// Returns default values if the file doesn't exist or cannot be parsed.
pub fn load() -> Config {
    match config_dir() {
        Some(dir) => load_from(&dir.join(CONFIG_FILE)),
        None => Config::default(),
    }
}

/// Loads the configuration from `path`, falling back to defaults.
pub fn load_from(path: &Path) -> Config {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Config::default();
    };

    match Config::from_toml_str(&content) {
        Ok(config) => config,
        Err(e) => {
            warn!("Ignoring unparseable {}: {}", path.display(), e);
            Config::default()
        }
    }
}

/// Saves the configuration to disk.
///
/// Creates the config directory if it doesn't exist.
pub fn save(config: &Config) -> std::io::Result<()> {
    if let Some(dir) = config_dir() {
        save_to(config, &dir.join(CONFIG_FILE))?;
    }
    Ok(())
}

/// Writes the configuration to `path` as pretty TOML.
pub fn save_to(config: &Config, path: &Path) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let content = toml::to_string_pretty(config).map_err(std::io::Error::other)?;
    std::fs::write(path, content)
}
