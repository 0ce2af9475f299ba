//! Configuration management for Pollmeter
//!
//! Provides persistent configuration that is automatically saved to and loaded
//! from a platform-specific config file.
//!
//! ## Config File Locations
//!
//! | Platform | Path |
//! |----------|------|
//! | Linux | `~/.config/pollmeter/config.toml` |
//! | macOS | `~/Library/Application Support/pollmeter/config.toml` |
//! | Windows | `%APPDATA%\pollmeter\config.toml` |

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Error type for configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to determine config directory
    #[error("could not determine config directory")]
    NoConfigDir,
    /// IO error reading or writing config file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// Failed to parse config file
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Failed to serialize config
    #[error("serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Returns the path to the config file.
///
/// Creates the config directory if it doesn't exist.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
    let app_dir = config_dir.join("pollmeter");

    if !app_dir.exists() {
        fs::create_dir_all(&app_dir)?;
    }

    Ok(app_dir.join("config.toml"))
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Measurement window and device read settings
    pub sampling: SamplingConfig,
    /// UI settings
    pub ui: UiConfig,
}

/// Measurement window and device read configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Target measurement window length in milliseconds
    pub window_ms: u64,
    /// Upper bound on a single blocking device read, in milliseconds.
    /// Also bounds shutdown latency for event-counting sources.
    pub read_timeout_ms: u64,
    /// Sleep between state re-reads for poll-iteration sources, in microseconds
    pub poll_sleep_us: u64,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            window_ms: 1000,
            read_timeout_ms: 250,
            poll_sleep_us: 1000,
        }
    }
}

impl SamplingConfig {
    /// Measurement window length as a Duration
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    /// Per-read timeout as a Duration
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }

    /// Poll-iteration sleep as a Duration
    pub fn poll_sleep(&self) -> Duration {
        Duration::from_micros(self.poll_sleep_us)
    }
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Refresh rate for UI updates (in Hz)
    pub refresh_rate_hz: u32,
    /// Show the polling rate guidance panel
    pub show_guide: bool,
    /// Color theme (dark/light)
    pub theme: Theme,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_hz: 10,
            show_guide: true,
            theme: Theme::Dark,
        }
    }
}

/// Color theme options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

impl Config {
    /// Load configuration from the default config file.
    ///
    /// Returns the default configuration if the file doesn't exist.
    /// Returns an error if the file exists but cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path()?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to the default config file.
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Get UI refresh interval as Duration
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.ui.refresh_rate_hz as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_config_path() -> PathBuf {
        env::temp_dir().join(format!("pollmeter-test-{}.toml", std::process::id()))
    }

    #[test]
    fn config_default_values() {
        let config = Config::default();
        assert_eq!(config.sampling.window_ms, 1000);
        assert_eq!(config.sampling.read_timeout_ms, 250);
        assert_eq!(config.sampling.poll_sleep_us, 1000);
        assert_eq!(config.ui.refresh_rate_hz, 10);
        assert!(config.ui.show_guide);
        assert_eq!(config.ui.theme, Theme::Dark);
    }

    #[test]
    fn sampling_durations() {
        let sampling = SamplingConfig::default();
        assert_eq!(sampling.window(), Duration::from_secs(1));
        assert_eq!(sampling.read_timeout(), Duration::from_millis(250));
        assert_eq!(sampling.poll_sleep(), Duration::from_millis(1));
    }

    #[test]
    fn config_refresh_interval() {
        let config = Config::default();
        // 10 Hz = 100ms per tick
        assert_eq!(config.refresh_interval().as_millis(), 100);
    }

    #[test]
    fn config_save_and_load_roundtrip() {
        let path = temp_config_path();

        let mut config = Config::default();
        config.sampling.window_ms = 500;
        config.ui.theme = Theme::Light;
        config.ui.show_guide = false;

        config.save_to(&path).expect("Failed to save config");
        let loaded = Config::load_from(&path).expect("Failed to load config");

        assert_eq!(loaded.sampling.window_ms, 500);
        assert_eq!(loaded.ui.theme, Theme::Light);
        assert!(!loaded.ui.show_guide);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn config_load_missing_file_fails() {
        let path = PathBuf::from("/nonexistent/path/config.toml");
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn config_serializes_to_toml() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).expect("Failed to serialize");

        assert!(toml_str.contains("[sampling]"));
        assert!(toml_str.contains("[ui]"));
        assert!(toml_str.contains("window_ms = 1000"));
    }

    #[test]
    fn config_deserializes_from_toml() {
        let toml_str = r#"
[sampling]
window_ms = 2000
read_timeout_ms = 100
poll_sleep_us = 500

[ui]
refresh_rate_hz = 30
show_guide = false
theme = "Light"
"#;

        let config: Config = toml::from_str(toml_str).expect("Failed to deserialize");

        assert_eq!(config.sampling.window_ms, 2000);
        assert_eq!(config.sampling.read_timeout_ms, 100);
        assert_eq!(config.sampling.poll_sleep_us, 500);
        assert_eq!(config.ui.refresh_rate_hz, 30);
        assert!(!config.ui.show_guide);
        assert_eq!(config.ui.theme, Theme::Light);
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::NoConfigDir;
        assert_eq!(err.to_string(), "could not determine config directory");

        let io_err = ConfigError::Io(io::Error::new(io::ErrorKind::NotFound, "file not found"));
        assert!(io_err.to_string().contains("IO error"));
    }
}
