use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use tracing::{debug, info};

use crate::config::Config;
use crate::error::StoreError;
use crate::model::entry::{DailyEntry, EntryPatch};
use crate::repository::traits::EntryRepository;

/// Daily entries kept as one JSON array, sorted by date.
#[derive(Clone, Debug)]
pub struct FileEntryRepository {
    file_path: PathBuf,
}

impl FileEntryRepository {
    pub fn new(base_dir: Option<PathBuf>) -> Result<Self> {
        let config = Config::resolve(base_dir)?;
        Self::at(config.entries_path())
    }

    pub fn at(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            write_json(&path, &Vec::<DailyEntry>::new())?;
        }
        Ok(FileEntryRepository { file_path: path })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn read_entries(&self) -> Result<BTreeMap<NaiveDate, DailyEntry>, StoreError> {
        let file = File::open(&self.file_path).map_err(|e| StoreError::io(&self.file_path, e))?;
        let entries: Vec<DailyEntry> = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| StoreError::corrupt(&self.file_path, e))?;
        // Last record wins if a hand-edited file repeats a date.
        Ok(entries.into_iter().map(|e| (e.date, e)).collect())
    }

    fn write_entries(&self, entries: &BTreeMap<NaiveDate, DailyEntry>) -> Result<(), StoreError> {
        let list: Vec<&DailyEntry> = entries.values().collect();
        write_json(&self.file_path, &list)
    }
}

/// Writes through a sibling temp file so a failed write leaves the old
/// contents in place.
pub(crate) fn write_json<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let tmp = path.with_extension("json.tmp");
    let file = File::create(&tmp).map_err(|e| StoreError::io(&tmp, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|e| StoreError::corrupt(&tmp, e))?;
    writer.flush().map_err(|e| StoreError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| StoreError::io(path, e))?;
    Ok(())
}

impl EntryRepository for FileEntryRepository {
    fn put_daily(&self, date: NaiveDate, patch: &EntryPatch) -> Result<DailyEntry> {
        let mut entries = self.read_entries()?;
        let entry = entries.entry(date).or_insert_with(|| DailyEntry::new(date));
        patch.apply(entry);
        entry.updated_at = Some(Utc::now());
        let stored = entry.clone();

        self.write_entries(&entries)?;
        debug!(date = %date, "daily entry saved");
        Ok(stored)
    }

    fn get_daily(&self, date: NaiveDate) -> Result<Option<DailyEntry>> {
        let mut entries = self.read_entries()?;
        Ok(entries.remove(&date))
    }

    fn get_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DailyEntry>> {
        if end < start {
            return Ok(Vec::new());
        }
        let entries = self.read_entries()?;
        let range: Vec<DailyEntry> = entries.range(start..=end).map(|(_, e)| e.clone()).collect();
        debug!(%start, %end, count = range.len(), "loaded entry range");
        Ok(range)
    }

    fn clear_all(&self) -> Result<usize> {
        let count = self.read_entries()?.len();
        self.write_entries(&BTreeMap::new())?;
        info!(count, "cleared all daily entries");
        Ok(count)
    }
}
