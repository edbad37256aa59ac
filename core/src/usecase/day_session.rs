use crate::model::entry::{validate_save, DailyEntry, EntryPatch, ResistanceSet};
use crate::model::preset::{preset_for, PresetOption};
use crate::model::prefs::Preferences;
use crate::model::totals::DayTotals;
use crate::repository::EntryRepository;
use crate::service::entry_service::EntryService;
use crate::service::estimator::estimate;
use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

/// The loaded copy of one date's entry. Saves merge onto this copy and only
/// replace it once the store accepted the write.
///
/// Two sessions on the same date do not see each other: whichever saves last
/// wins for every field.
pub struct DaySession<'a, R: EntryRepository> {
    service: &'a EntryService<R>,
    entry: DailyEntry,
}

impl<'a, R: EntryRepository> DaySession<'a, R> {
    pub fn open(service: &'a EntryService<R>, date: NaiveDate) -> Result<Self> {
        let entry = service.get_entry(date)?;
        debug!(date = %date, "day session opened");
        Ok(Self { service, entry })
    }

    pub fn date(&self) -> NaiveDate {
        self.entry.date
    }

    pub fn entry(&self) -> &DailyEntry {
        &self.entry
    }

    pub fn totals(&self, prefs: &Preferences) -> DayTotals {
        estimate(&self.entry, prefs)
    }

    pub fn save(&mut self, patch: &EntryPatch) -> Result<&DailyEntry> {
        let mut merged = self.entry.clone();
        patch.apply(&mut merged);
        validate_save(&merged)?;

        match self.service.persist(&merged) {
            Ok(stored) => {
                self.entry = stored;
                Ok(&self.entry)
            }
            Err(err) => {
                warn!(date = %self.entry.date, error = %err, "save failed, keeping previous copy");
                Err(err)
            }
        }
    }

    pub fn add_set(&mut self, set: ResistanceSet) -> Result<&DailyEntry> {
        let mut sessions = self.entry.weight_sessions.clone();
        sessions.push(set);
        self.save(&EntryPatch {
            weight_sessions: Some(sessions),
            ..Default::default()
        })
    }

    /// Removes the resistance set at `index` (display order).
    pub fn remove_set(&mut self, index: usize) -> Result<&DailyEntry> {
        let mut sessions = self.entry.weight_sessions.clone();
        if index >= sessions.len() {
            return Err(anyhow::anyhow!(
                "No resistance set #{} on {}",
                index + 1,
                self.entry.date
            ));
        }
        sessions.remove(index);
        self.save(&EntryPatch {
            weight_sessions: Some(sessions),
            ..Default::default()
        })
    }

    pub fn apply_preset(&mut self, option: PresetOption) -> Result<&DailyEntry> {
        let patch = preset_for(self.entry.date.weekday()).patch(option, &self.entry);
        self.save(&patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entry::EveningMode;
    use crate::repository::testing::MemoryEntryRepo;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 11).unwrap() // Tuesday
    }

    #[test]
    fn test_save_merges_onto_existing_entry() {
        let mut existing = DailyEntry::new(date());
        existing.morning_steps = 3000;
        let service = EntryService::new(MemoryEntryRepo::with(vec![existing]));

        let mut session = DaySession::open(&service, date()).unwrap();
        session
            .save(&EntryPatch {
                bike_km: Some(5.0),
                ..Default::default()
            })
            .unwrap();

        let reloaded = service.get_entry(date()).unwrap();
        assert_eq!(reloaded.morning_steps, 3000);
        assert_eq!(reloaded.bike_km, 5.0);
    }

    #[test]
    fn test_failed_save_keeps_local_copy() {
        let service = EntryService::new(MemoryEntryRepo::default());
        let mut session = DaySession::open(&service, date()).unwrap();
        session
            .save(&EntryPatch {
                morning_steps: Some(1200),
                ..Default::default()
            })
            .unwrap();

        service.repo().fail_writes.set(true);
        let result = session.save(&EntryPatch {
            morning_steps: Some(9999),
            ..Default::default()
        });

        assert!(result.is_err());
        assert_eq!(session.entry().morning_steps, 1200);
        assert_eq!(service.get_entry(date()).unwrap().morning_steps, 1200);
    }

    #[test]
    fn test_last_writer_wins_from_stale_base() {
        let service = EntryService::new(MemoryEntryRepo::default());
        let mut first = DaySession::open(&service, date()).unwrap();
        let mut second = DaySession::open(&service, date()).unwrap();

        first
            .save(&EntryPatch {
                morning_steps: Some(4000),
                ..Default::default()
            })
            .unwrap();
        second
            .save(&EntryPatch {
                bike_km: Some(7.0),
                ..Default::default()
            })
            .unwrap();

        let stored = service.get_entry(date()).unwrap();
        assert_eq!(stored.bike_km, 7.0);
        assert_eq!(stored.morning_steps, 0);
    }

    #[test]
    fn test_bike_mode_without_sets_is_rejected() {
        let service = EntryService::new(MemoryEntryRepo::default());
        let mut session = DaySession::open(&service, date()).unwrap();

        let result = session.save(&EntryPatch {
            evening_mode: Some(EveningMode::Bike),
            bike_km: Some(5.0),
            ..Default::default()
        });

        assert!(result.is_err());
        assert!(!service.has_entry(date()).unwrap());
    }

    #[test]
    fn test_bike_day_keeps_its_last_set() {
        let service = EntryService::new(MemoryEntryRepo::default());
        let mut session = DaySession::open(&service, date()).unwrap();
        session.apply_preset(PresetOption::BikeAndWeights).unwrap();

        while session.entry().weight_sessions.len() > 1 {
            session.remove_set(0).unwrap();
        }
        assert!(session.remove_set(0).is_err());

        let stored = service.get_entry(date()).unwrap();
        assert_eq!(stored.evening_mode, EveningMode::Bike);
        assert_eq!(stored.weight_sessions.len(), 1);
        assert_eq!(session.entry().weight_sessions.len(), 1);
    }

    #[test]
    fn test_add_and_remove_sets() {
        let service = EntryService::new(MemoryEntryRepo::default());
        let mut session = DaySession::open(&service, date()).unwrap();

        session.add_set(ResistanceSet::new("Squat", 4, 8)).unwrap();
        session.add_set(ResistanceSet::new("Row", 3, 10)).unwrap();
        assert_eq!(session.entry().weight_sessions.len(), 2);

        session.remove_set(0).unwrap();
        assert_eq!(session.entry().weight_sessions[0].name, "Row");
        assert!(session.remove_set(5).is_err());
    }

    #[test]
    fn test_apply_preset_uses_weekday() {
        let service = EntryService::new(MemoryEntryRepo::default());
        let mut session = DaySession::open(&service, date()).unwrap();

        session.apply_preset(PresetOption::BikeAndWeights).unwrap();

        let entry = session.entry();
        assert_eq!(entry.evening_mode, EveningMode::Bike);
        assert_eq!(entry.weight_sessions[0].name, "Barbell Squat");
        assert!(session.totals(&Preferences::default()).evening_kcal > 0);
    }
}
