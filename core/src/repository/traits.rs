use anyhow::Result;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::model::entry::{DailyEntry, EntryPatch};

/// Date-keyed store of daily entries. At most one entry per date.
pub trait EntryRepository {
    /// Merges `patch` onto the stored entry for `date` (creating it if
    /// absent), stamps `updated_at`, and returns the stored record.
    fn put_daily(&self, date: NaiveDate, patch: &EntryPatch) -> Result<DailyEntry>;
    fn get_daily(&self, date: NaiveDate) -> Result<Option<DailyEntry>>;
    /// Inclusive on both ends, ordered by date.
    fn get_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DailyEntry>>;
    /// Removes every entry; returns how many were removed.
    fn clear_all(&self) -> Result<usize>;
}

/// Key/value store for user-wide settings.
pub trait PrefsRepository {
    fn get_raw(&self, key: &str) -> Result<Option<Value>>;
    fn put_raw(&self, key: &str, value: Value) -> Result<()>;

    fn get_pref<T: DeserializeOwned>(&self, key: &str, fallback: T) -> Result<T> {
        match self.get_raw(key)? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(fallback),
        }
    }

    fn put_pref<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        self.put_raw(key, serde_json::to_value(value)?)
    }
}
