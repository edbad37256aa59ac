use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde_json::{Map, Value};
use tracing::debug;

use crate::config::Config;
use crate::error::StoreError;
use crate::repository::entry_file::write_json;
use crate::repository::traits::PrefsRepository;

#[derive(Clone, Debug)]
pub struct FilePrefsRepository {
    file_path: PathBuf,
}

impl FilePrefsRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let config = Config::resolve(base_dir)?;
        Ok(Self::at(config.prefs_path()))
    }

    /// The file is only created on the first write.
    pub fn at(path: PathBuf) -> Self {
        Self { file_path: path }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read_all(&self) -> Result<Map<String, Value>, StoreError> {
        if !self.file_path.exists() {
            return Ok(Map::new());
        }
        let content =
            fs::read_to_string(&self.file_path).map_err(|e| StoreError::io(&self.file_path, e))?;
        serde_json::from_str(&content).map_err(|e| StoreError::corrupt(&self.file_path, e))
    }
}

impl PrefsRepository for FilePrefsRepository {
    fn get_raw(&self, key: &str) -> Result<Option<Value>> {
        let mut all = self.read_all()?;
        Ok(all.remove(key))
    }

    fn put_raw(&self, key: &str, value: Value) -> Result<()> {
        let mut all = self.read_all()?;
        all.insert(key.to_string(), value);
        write_json(&self.file_path, &all)?;
        debug!(key, "preference saved");
        Ok(())
    }
}
