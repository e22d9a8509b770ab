//! mixctl configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use mixctl_core::{DEFAULT_CONTROL, DEFAULT_DEVICE};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// mixctl configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Mixer selection
    #[serde(default)]
    pub mixer: MixerConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Which mixer to open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixerConfig {
    /// ALSA mixer device (e.g. "default", "hw:1")
    #[serde(default = "default_device")]
    pub device: String,
    /// Simple mixer control (e.g. "Master", "PCM")
    #[serde(default = "default_control")]
    pub control: String,
    /// Use the in-memory mock mixer instead of ALSA
    #[serde(default)]
    pub mock: bool,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self { device: default_device(), control: default_control(), mock: false }
    }
}

fn default_device() -> String {
    DEFAULT_DEVICE.to_string()
}

fn default_control() -> String {
    DEFAULT_CONTROL.to_string()
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level for mixctl crates
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level() }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct OutputConfig {
    /// Print replies as JSON
    #[serde(default)]
    pub json: bool,
}

/// Load configuration from an explicit file, or the default location.
///
/// A missing file at the default location yields defaults; a missing
/// explicit file is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => load_config_from(path),
        None => {
            let path = config_path()?;
            if path.exists() {
                load_config_from(&path)
            } else {
                debug!(?path, "Config file not found, using defaults");
                Ok(Config::default())
            }
        }
    }
}

/// Load configuration from a TOML file.
pub fn load_config_from(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {path:?}"))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {path:?}"))?;
    Ok(config)
}

/// Get the default configuration file path.
fn config_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("org", "mixctl", "mixctl")
        .context("Could not determine config directory")?;
    Ok(dirs.config_dir().join("config.toml"))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.mixer.device, "default");
        assert_eq!(config.mixer.control, "Master");
        assert!(!config.mixer.mock);
        assert_eq!(config.logging.level, "warn");
        assert!(!config.output.json);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let file = write_config("[mixer]\ndevice = \"hw:1\"\n");
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.mixer.device, "hw:1");
        assert_eq!(config.mixer.control, "Master");
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_full_file() {
        let file = write_config(
            "[mixer]\ndevice = \"hw:0\"\ncontrol = \"PCM\"\nmock = true\n\n\
             [logging]\nlevel = \"debug\"\n\n[output]\njson = true\n",
        );
        let config = load_config_from(file.path()).unwrap();
        assert_eq!(config.mixer.control, "PCM");
        assert!(config.mixer.mock);
        assert_eq!(config.logging.level, "debug");
        assert!(config.output.json);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        assert!(load_config(Some(Path::new("/nonexistent/mixctl.toml"))).is_err());
    }

    #[test]
    fn test_invalid_file_is_error() {
        let file = write_config("[mixer\ndevice = ");
        let err = load_config_from(file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
