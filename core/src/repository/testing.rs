//! In-memory stores for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};

use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use serde_json::Value;

use crate::model::entry::{DailyEntry, EntryPatch};
use crate::repository::traits::{EntryRepository, PrefsRepository};

#[derive(Default)]
pub struct MemoryEntryRepo {
    pub entries: RefCell<BTreeMap<NaiveDate, DailyEntry>>,
    /// When set, every write fails.
    pub fail_writes: Cell<bool>,
    pub reads: Cell<usize>,
}

impl MemoryEntryRepo {
    pub fn with(entries: Vec<DailyEntry>) -> Self {
        let repo = Self::default();
        for e in entries {
            repo.entries.borrow_mut().insert(e.date, e);
        }
        repo
    }
}

impl EntryRepository for MemoryEntryRepo {
    fn put_daily(&self, date: NaiveDate, patch: &EntryPatch) -> Result<DailyEntry> {
        if self.fail_writes.get() {
            return Err(anyhow!("disk full"));
        }
        let mut entries = self.entries.borrow_mut();
        let entry = entries.entry(date).or_insert_with(|| DailyEntry::new(date));
        patch.apply(entry);
        Ok(entry.clone())
    }

    fn get_daily(&self, date: NaiveDate) -> Result<Option<DailyEntry>> {
        self.reads.set(self.reads.get() + 1);
        Ok(self.entries.borrow().get(&date).cloned())
    }

    fn get_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DailyEntry>> {
        self.reads.set(self.reads.get() + 1);
        if end < start {
            return Ok(Vec::new());
        }
        Ok(self
            .entries
            .borrow()
            .range(start..=end)
            .map(|(_, e)| e.clone())
            .collect())
    }

    fn clear_all(&self) -> Result<usize> {
        let mut entries = self.entries.borrow_mut();
        let count = entries.len();
        entries.clear();
        Ok(count)
    }
}

#[derive(Default)]
pub struct MemoryPrefsRepo {
    pub values: RefCell<HashMap<String, Value>>,
}

impl PrefsRepository for MemoryPrefsRepo {
    fn get_raw(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn put_raw(&self, key: &str, value: Value) -> Result<()> {
        self.values.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }
}
