pub mod config;
pub mod error;
pub mod input;
pub mod model;
pub mod repository;
pub mod service;
pub mod time;
pub mod usecase;

pub use config::Config;
pub use error::StoreError;
pub use input::{parse_entry_patch, parse_prefs_patch, parse_resistance_set};
pub use model::entry::{DailyEntry, EntryPatch, EveningMode, ResistanceSet};
pub use model::preset::{preset_for, PresetOption, PRESET_EXERCISES};
pub use model::prefs::{Preferences, PreferencesPatch, WeightsMetPolicy};
pub use model::totals::{DayTotals, TotalsDetail};
pub use repository::{EntryRepository, FileEntryRepository, FilePrefsRepository, PrefsRepository};
pub use service::aggregator::{calendar_matrix, month_summary, totals_by_date, week_view};
pub use service::calibration::{calibrate, Calibration, CalibrationInput};
pub use service::dto::{CalendarCell, CalendarMonth, DayBar, MonthSummary, MonthView, WeekView};
pub use service::entry_service::EntryService;
pub use service::estimator::estimate;
pub use service::prefs_service::PrefsService;
pub use time::{parse_human_date, parse_month};
pub use usecase::dashboard::{Dashboard, DashboardUseCase, LoadGeneration, LoadTicket, MonthCursor};
pub use usecase::day_session::DaySession;
