//! Startup configuration.
//!
//! Resolved once in `main` and passed down explicitly; nothing below the CLI
//! layer reads the environment.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{QuicknotesError, Result};
use crate::render::DEFAULT_UNTITLED_LABEL;
use crate::storage::DEFAULT_STORAGE_KEY;

pub const DATA_DIR_ENV: &str = "QUICKNOTES_DIR";
pub const DEFAULT_DATA_DIR: &str = ".quicknotes";
pub const CONFIG_FILE: &str = "config.json";
const CONFIG_STEM: &str = "config";

/// Settings read from `<data_dir>/config.json`. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub storage_key: String,
    pub untitled_label: String,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            untitled_label: DEFAULT_UNTITLED_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    data_dir: PathBuf,
    storage_key: String,
    untitled_label: String,
}

impl Config {
    pub fn new(data_dir: PathBuf, file: FileConfig) -> Result<Self> {
        validate_storage_key(&file.storage_key)?;
        Ok(Self {
            data_dir,
            storage_key: file.storage_key,
            untitled_label: file.untitled_label,
        })
    }

    /// Pick the data directory (flag, then environment value, then default)
    /// and apply its `config.json` if present.
    pub fn resolve(dir_flag: Option<PathBuf>, dir_env: Option<PathBuf>) -> Result<Self> {
        let data_dir = dir_flag
            .or(dir_env)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let file = read_file_config(&data_dir)?;
        Self::new(data_dir, file)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn untitled_label(&self) -> &str {
        &self.untitled_label
    }
}

fn read_file_config(data_dir: &Path) -> Result<FileConfig> {
    let path = data_dir.join(CONFIG_FILE);
    let raw = match fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(FileConfig::default()),
        Err(e) => return Err(e.into()),
    };
    serde_json::from_str(&raw)
        .map_err(|e| QuicknotesError::Config(format!("{}: {}", path.display(), e)))
}

fn validate_storage_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(QuicknotesError::Config("storage_key cannot be empty".into()));
    }
    if key.eq_ignore_ascii_case(CONFIG_STEM) {
        return Err(QuicknotesError::Config(format!(
            "storage_key '{}' would overwrite {}",
            key, CONFIG_FILE
        )));
    }
    if key.contains(['/', '\\']) || key == "." || key == ".." {
        return Err(QuicknotesError::Config(format!(
            "storage_key '{}' must not contain path separators",
            key
        )));
    }
    Ok(())
}
