//! # Configuration
//!
//! Settings come from an optional JSON file (`config.json` by default) and are
//! overridden by environment variables, which may themselves come from `.env`.
//!
//! | Variable             | File key             | Default          |
//! |----------------------|----------------------|------------------|
//! | `ASSISTANT_CONFIG`   | -                    | `config.json`    |
//! | `WAKE_WORD`          | `wake_word`          | `jarvis`         |
//! | `REMINDERS_FILE`     | `reminders_file`     | `reminders.json` |
//! | `POLL_INTERVAL_SECS` | `poll_interval_secs` | `2`              |
//! | `LOG_LEVEL`          | -                    | `info`           |
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.5.0

use anyhow::{anyhow, Context, Result};
use log::{debug, warn};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const DEFAULT_WAKE_WORD: &str = "jarvis";
pub const DEFAULT_REMINDERS_FILE: &str = "reminders.json";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Settings file contents; every key is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    pub wake_word: Option<String>,
    pub reminders_file: Option<PathBuf>,
    pub poll_interval_secs: Option<u64>,
    /// Speech locale of the voice front end, carried through for it
    pub language: Option<String>,
}

impl FileConfig {
    /// Read the settings file. A missing or unreadable file yields defaults.
    pub fn load(path: &Path) -> Self {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!("No settings file at {}: {e}", path.display());
                return Self::default();
            }
        };

        match serde_json::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Ignoring malformed settings file {}: {e}",
                    path.display()
                );
                Self::default()
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub wake_word: String,
    pub reminders_file: PathBuf,
    pub poll_interval_secs: u64,
    pub log_level: String,
    pub language: Option<String>,
}

impl Config {
    /// Build configuration from the process environment and settings file
    pub fn from_env() -> Result<Self> {
        let path = std::env::var("ASSISTANT_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let file = FileConfig::load(Path::new(&path));
        Self::resolve(file, |key| std::env::var(key).ok())
    }

    /// Merge a settings file with variables from `lookup`, variables winning
    pub fn resolve<F>(file: FileConfig, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let wake_word = lookup("WAKE_WORD")
            .or(file.wake_word)
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .unwrap_or_else(|| DEFAULT_WAKE_WORD.to_string());

        let reminders_file = lookup("REMINDERS_FILE")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .or(file.reminders_file)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REMINDERS_FILE));

        let poll_interval_secs = match lookup("POLL_INTERVAL_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid POLL_INTERVAL_SECS: {raw}"))?,
            None => file
                .poll_interval_secs
                .unwrap_or(DEFAULT_POLL_INTERVAL_SECS),
        };
        if poll_interval_secs == 0 {
            return Err(anyhow!("Poll interval must be at least one second"));
        }

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Config {
            wake_word,
            reminders_file,
            poll_interval_secs,
            log_level,
            language: file.language,
        })
    }
}
