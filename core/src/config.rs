use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

pub const DATA_DIR_ENV: &str = "FITLOG_HOME";
pub const DEFAULT_DIR_NAME: &str = ".fitlog";
pub const ENTRIES_FILE_NAME: &str = "daily_entries.json";
pub const PREFS_FILE_NAME: &str = "prefs.json";

/// Where the stores live on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
}

impl Config {
    /// Explicit directory, else `$FITLOG_HOME`, else `~/.fitlog`. The
    /// directory is created if missing.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self> {
        let data_dir = match explicit {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn entries_path(&self) -> PathBuf {
        self.data_dir.join(ENTRIES_FILE_NAME)
    }

    pub fn prefs_path(&self) -> PathBuf {
        self.data_dir.join(PREFS_FILE_NAME)
    }
}

pub fn default_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(home_dir.join(DEFAULT_DIR_NAME))
}
