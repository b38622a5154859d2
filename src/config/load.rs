//! Loading of `bfm.toml`.
//!
//! The file is deserialized into a [RawConfig] and converted into the [Config] used by
//! bfm. A missing file means defaults. A broken file is reported on stderr before the
//! terminal is taken over, then defaults are used as well.

use crate::config::{Commands, General, InternalGeneral};
use crate::core::{BfmError, Result};

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration as read from the toml file.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct RawConfig {
    general: General,
    commands: Commands,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    general: InternalGeneral,
    commands: Commands,
}

impl From<RawConfig> for Config {
    fn from(raw: RawConfig) -> Self {
        Self {
            general: InternalGeneral::from(raw.general),
            commands: raw.commands,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        RawConfig::default().into()
    }
}

impl Config {
    /// Loads the configuration from [Config::default_path].
    ///
    /// Never fails: problems are printed and the defaults are used.
    pub fn load() -> Self {
        let path = Self::default_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config");
                config
            }
            Err(err) => {
                eprintln!("[bfm] {err}. Using defaults.");
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content).map_err(|message| BfmError::Config {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parses toml text, returning the parser message on failure.
    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        toml::from_str::<RawConfig>(content)
            .map(Config::from)
            .map_err(|e| e.message().to_string())
    }

    // Getters

    #[inline]
    pub fn general(&self) -> &InternalGeneral {
        &self.general
    }

    #[inline]
    pub fn commands(&self) -> &Commands {
        &self.commands
    }

    /// Determine the configuration file path.
    /// Checks the BFM_CONFIG environment variable first,
    /// then XDG_CONFIG_HOME,
    /// then defaults to ~/.config/bfm/bfm.toml.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = std::env::var("BFM_CONFIG") {
            return PathBuf::from(path);
        }

        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg_config).join("bfm/bfm.toml");
        }

        if let Some(home) = dirs::home_dir() {
            return home.join(".config/bfm/bfm.toml");
        }
        PathBuf::from("bfm.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn empty_file_gives_defaults() -> std::result::Result<(), Box<dyn error::Error>> {
        let config = Config::parse("")?;
        assert_eq!(config, Config::default());
        assert_eq!(config.general().key_timeout(), Duration::from_millis(1000));
        assert_eq!(config.general().status_timeout(), Duration::from_millis(5000));
        assert_eq!(config.general().preview_max_bytes(), 1024 * 1024);
        assert_eq!(config.commands().file_preview(), "cat -- {path}");
        Ok(())
    }

    #[test]
    fn partial_tables_keep_other_defaults() -> std::result::Result<(), Box<dyn error::Error>> {
        let config = Config::parse(
            r#"
            [general]
            key_timeout_ms = 250

            [commands]
            editor = "nvim {path}"
            "#,
        )?;
        assert_eq!(config.general().key_timeout(), Duration::from_millis(250));
        assert_eq!(config.general().status_timeout(), Duration::from_millis(5000));
        assert_eq!(config.commands().editor(), "nvim {path}");
        assert_eq!(config.commands().folder_preview(), "ls -la -- {path}");
        Ok(())
    }

    #[test]
    fn broken_file_is_a_config_error() -> std::result::Result<(), Box<dyn error::Error>> {
        let dir = tempdir()?;
        let path = dir.path().join("bfm.toml");
        fs::write(&path, "[general]\nkey_timeout_ms = \"soon\"\n")?;

        let err = Config::load_from(&path).err().ok_or("expected an error")?;
        assert!(matches!(err, BfmError::Config { .. }));
        assert!(err.to_string().contains("bfm.toml"));
        Ok(())
    }
}
