//! Configuration loading for linkq.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Get the linkq home directory (~/.linkq).
pub fn get_home_dir() -> Result<PathBuf> {
    let home = directories::UserDirs::new()
        .ok_or_else(|| Error::Config("Could not determine home directory".to_string()))?;

    Ok(home.home_dir().join(".linkq"))
}

/// Get the default settings file path.
pub fn get_settings_path() -> Result<PathBuf> {
    Ok(get_home_dir()?.join("settings.json"))
}

/// Load settings from `path`.
pub fn load_settings(path: &Path) -> Result<Settings> {
    if !path.exists() {
        return Err(Error::Config(format!(
            "Settings file not found at {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)?;
    let settings: Settings = serde_json::from_str(&content)?;
    validate_settings(&settings)?;

    tracing::debug!("Loaded settings from {}", path.display());
    Ok(settings)
}

fn validate_settings(settings: &Settings) -> Result<()> {
    if settings.interpreter.bufsize == 0 {
        return Err(Error::Config(
            "interpreter.bufsize must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Load settings from `path` (or the default location), falling back to defaults
/// when the file does not exist.
///
/// A file that exists but fails to parse or validate is still an error.
pub fn load_settings_or_default(path: Option<&Path>) -> Result<Settings> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => match get_settings_path() {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!("{}, using default settings", e);
                return Ok(Settings::default());
            }
        },
    };

    if !path.exists() {
        tracing::debug!("No settings at {}, using defaults", path.display());
        return Ok(Settings::default());
    }

    load_settings(&path)
}

/// Command interpreter configuration.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Interpreter {
    /// Capacity of the buffer `rh` removes into, terminator included.
    #[serde(default = "default_bufsize")]
    pub bufsize: usize,

    /// Echo every command line before running it.
    #[serde(default)]
    pub echo: bool,
}

fn default_bufsize() -> usize {
    1024
}

impl Default for Interpreter {
    fn default() -> Self {
        Self {
            bufsize: default_bufsize(),
            echo: false,
        }
    }
}

/// Logging configuration.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Logging {
    /// Default filter directive; `RUST_LOG` takes precedence.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Also write a daily rolling log file.
    #[serde(default)]
    pub file: bool,

    /// Log directory; defaults to the platform data directory.
    pub dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: false,
            dir: None,
        }
    }
}

/// linkq settings.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub interpreter: Interpreter,

    #[serde(default)]
    pub logging: Logging,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.interpreter.bufsize, 1024);
        assert!(!settings.interpreter.echo);
        assert_eq!(settings.logging.level, "info");
        assert!(!settings.logging.file);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "interpreter": { "echo": true } }"#).unwrap();

        let settings = load_settings(&path).unwrap();
        assert!(settings.interpreter.echo);
        assert_eq!(settings.interpreter.bufsize, 1024);
        assert_eq!(settings.logging, Logging::default());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        assert!(load_settings(&path).is_err());
        assert_eq!(
            load_settings_or_default(Some(&path)).unwrap(),
            Settings::default()
        );
    }

    #[test]
    fn test_zero_bufsize_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "interpreter": { "bufsize": 0 } }"#).unwrap();

        assert!(matches!(load_settings(&path), Err(Error::Config(_))));
        assert!(load_settings_or_default(Some(&path)).is_err());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load_settings(&path), Err(Error::Json(_))));
    }
}
