use crate::model::entry::{DailyEntry, EntryPatch};
use crate::model::prefs::Preferences;
use crate::model::totals::DayTotals;
use crate::repository::EntryRepository;
use crate::service::aggregator::{totals_by_date, TotalsByDate};
use crate::service::estimator::estimate;
use anyhow::Result;
use chrono::NaiveDate;
use tracing::debug;

pub struct EntryService<R: EntryRepository> {
    repo: R,
}

impl<R: EntryRepository> EntryService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// The stored entry, or an empty one for a date never logged.
    pub fn get_entry(&self, date: NaiveDate) -> Result<DailyEntry> {
        Ok(self.repo.get_daily(date)?.unwrap_or_else(|| DailyEntry::new(date)))
    }

    pub fn has_entry(&self, date: NaiveDate) -> Result<bool> {
        Ok(self.repo.get_daily(date)?.is_some())
    }

    /// Writes every field of `entry`, replacing what is stored for its date.
    pub fn persist(&self, entry: &DailyEntry) -> Result<DailyEntry> {
        debug!(date = %entry.date, "persisting merged entry");
        self.repo.put_daily(entry.date, &EntryPatch::from_entry(entry))
    }

    pub fn load_range(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<DailyEntry>> {
        self.repo.get_range(start, end)
    }

    pub fn totals_for(&self, date: NaiveDate, prefs: &Preferences) -> Result<DayTotals> {
        Ok(estimate(&self.get_entry(date)?, prefs))
    }

    pub fn totals_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        prefs: &Preferences,
    ) -> Result<TotalsByDate> {
        Ok(totals_by_date(&self.load_range(start, end)?, prefs))
    }

    pub fn clear_all(&self) -> Result<usize> {
        self.repo.clear_all()
    }
}
