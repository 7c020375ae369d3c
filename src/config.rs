//! Persistent reading position, stored as JSON.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Used when `SCRIPTURE_TUI_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "etc/conf.json";

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "SCRIPTURE_TUI_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot access config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("config {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Translation and position the reader opens at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub translation: String,
    pub book: String,
    pub chapter: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            translation: "web".to_owned(),
            book: "JHN".to_owned(),
            chapter: 1,
        }
    }
}

impl Config {
    /// `$SCRIPTURE_TUI_CONFIG`, or [`DEFAULT_CONFIG_PATH`].
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Read `path`. A missing file yields the defaults; missing keys are
    /// filled from the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::info!("no config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io { path: path.to_owned(), source });
            }
        };
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })
    }

    /// Write to `path`, creating its parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io { path: path.to_owned(), source };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = serde_json::to_string_pretty(self).map_err(|source| ConfigError::Parse {
            path: path.to_owned(),
            source,
        })?;
        fs::write(path, text).map_err(io_err)
    }

    /// Move the position, e.g. after a successful navigation.
    pub fn set_position(&mut self, book: &str, chapter: u32) {
        self.book = book.to_owned();
        self.chapter = chapter;
    }
}
