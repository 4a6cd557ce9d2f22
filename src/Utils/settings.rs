//! Application settings read from `rusted_roots.toml` in the working directory. Every key
//! is optional; a missing file gives the defaults.
//!
//! ```toml
//! loglevel = "info"      # debug | info | warn | error | off
//! log_to_file = false
//! plot = true
//! plot_dir = "plots"
//! show_trace = false
//! save_trace = false
//! ```
use crate::Utils::logger::parse_loglevel;
use simplelog::LevelFilter;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use toml::{Table, Value};

pub const SETTINGS_FILE: &str = "rusted_roots.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("settings file is not valid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid setting {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppSettings {
    pub loglevel: LevelFilter,
    /// also write the log to a timestamped file
    pub log_to_file: bool,
    pub plot: bool,
    pub plot_dir: PathBuf,
    /// print the per-iteration table after each solve
    pub show_trace: bool,
    /// save the per-iteration table as CSV into `plot_dir`
    pub save_trace: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            loglevel: LevelFilter::Info,
            log_to_file: false,
            plot: true,
            plot_dir: PathBuf::from("plots"),
            show_trace: false,
            save_trace: false,
        }
    }
}

fn get_bool(table: &Table, key: &str, default: bool) -> Result<bool, SettingsError> {
    match table.get(key) {
        None => Ok(default),
        Some(Value::Boolean(b)) => Ok(*b),
        Some(other) => Err(SettingsError::InvalidValue {
            key: key.to_string(),
            reason: format!("expected true or false, got {}", other),
        }),
    }
}

fn get_str<'a>(table: &'a Table, key: &str) -> Result<Option<&'a str>, SettingsError> {
    match table.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(SettingsError::InvalidValue {
            key: key.to_string(),
            reason: format!("expected a string, got {}", other),
        }),
    }
}

impl AppSettings {
    pub fn from_toml_str(text: &str) -> Result<Self, SettingsError> {
        let table: Table = text.parse()?;
        let defaults = AppSettings::default();
        let loglevel = match get_str(&table, "loglevel")? {
            None => defaults.loglevel,
            Some(level) => parse_loglevel(level).ok_or(SettingsError::InvalidValue {
                key: "loglevel".to_string(),
                reason: format!("unknown level '{}'", level),
            })?,
        };
        let plot_dir = get_str(&table, "plot_dir")?
            .map(PathBuf::from)
            .unwrap_or(defaults.plot_dir);
        Ok(Self {
            loglevel,
            log_to_file: get_bool(&table, "log_to_file", defaults.log_to_file)?,
            plot: get_bool(&table, "plot", defaults.plot)?,
            plot_dir,
            show_trace: get_bool(&table, "show_trace", defaults.show_trace)?,
            save_trace: get_bool(&table, "save_trace", defaults.save_trace)?,
        })
    }

    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            return Ok(AppSettings::default());
        }
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(AppSettings::from_toml_str("").unwrap(), AppSettings::default());
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join(SETTINGS_FILE);
        assert_eq!(AppSettings::load(&missing).unwrap(), AppSettings::default());
    }

    #[test]
    fn test_full_settings() {
        let text = r#"
            loglevel = "debug"
            log_to_file = true
            plot = false
            plot_dir = "out/pictures"
            show_trace = true
            save_trace = true
        "#;
        let settings = AppSettings::from_toml_str(text).unwrap();
        assert_eq!(settings.loglevel, LevelFilter::Debug);
        assert!(settings.log_to_file);
        assert!(!settings.plot);
        assert_eq!(settings.plot_dir, PathBuf::from("out/pictures"));
        assert!(settings.show_trace);
        assert!(settings.save_trace);
    }

    #[test]
    fn test_invalid_settings() {
        assert!(matches!(
            AppSettings::from_toml_str("loglevel = \"loud\""),
            Err(SettingsError::InvalidValue { .. })
        ));
        assert!(matches!(
            AppSettings::from_toml_str("plot = \"yes\""),
            Err(SettingsError::InvalidValue { .. })
        ));
        assert!(matches!(
            AppSettings::from_toml_str("plot = "),
            Err(SettingsError::Toml(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, "loglevel = \"off\"\nshow_trace = true\n").unwrap();
        let settings = AppSettings::load(&path).unwrap();
        assert_eq!(settings.loglevel, LevelFilter::Off);
        assert!(settings.show_trace);
        assert!(settings.plot);
    }
}
