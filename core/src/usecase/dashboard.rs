use crate::model::prefs::Preferences;
use crate::model::totals::DayTotals;
use crate::repository::EntryRepository;
use crate::service::aggregator::{calendar_matrix, month_summary, week_view};
use crate::service::dto::{MonthView, WeekView};
use crate::service::entry_service::EntryService;
use crate::time::{add_months, calendar_end, calendar_start, week_dates};
use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Today, the week around it and the month cursor, computed together.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub date: NaiveDate,
    pub today: DayTotals,
    pub device_kcal: Option<u32>,
    pub week: WeekView,
    pub month: MonthView,
}

impl Dashboard {
    /// Share of the daily target reached today, 0..=100.
    pub fn target_percent(&self) -> f64 {
        if self.week.target_steps == 0 {
            return 100.0;
        }
        (self.today.step_equivalent as f64 / self.week.target_steps as f64 * 100.0).min(100.0)
    }
}

pub struct DashboardUseCase<'a, R: EntryRepository> {
    entry_service: &'a EntryService<R>,
    prefs: &'a Preferences,
}

impl<'a, R: EntryRepository> DashboardUseCase<'a, R> {
    pub fn new(entry_service: &'a EntryService<R>, prefs: &'a Preferences) -> Self {
        Self {
            entry_service,
            prefs,
        }
    }

    pub fn today(&self, date: NaiveDate) -> Result<DayTotals> {
        self.entry_service.totals_for(date, self.prefs)
    }

    pub fn week(&self, anchor: NaiveDate) -> Result<WeekView> {
        let dates = week_dates(anchor);
        let (start, end) = (dates[0], dates[6]);
        let totals = self.entry_service.totals_in_range(start, end, self.prefs)?;
        Ok(week_view(anchor, &totals, self.prefs.effective_daily_target_steps()))
    }

    /// Sums cover the calendar month only; the grid also shows the leading
    /// and trailing days of the neighbouring months.
    pub fn month(&self, year: i32, month: u32) -> Result<MonthView> {
        let target = self.prefs.effective_daily_target_steps();
        let totals = self.entry_service.totals_in_range(
            calendar_start(year, month)?,
            calendar_end(year, month)?,
            self.prefs,
        )?;

        Ok(MonthView {
            summary: month_summary(year, month, &totals, target),
            calendar: calendar_matrix(year, month, &totals, target)?,
        })
    }

    pub fn dashboard(&self, date: NaiveDate, cursor: (i32, u32)) -> Result<Dashboard> {
        let today = self.today(date)?;
        Ok(Dashboard {
            date,
            device_kcal: today.device_kcal(self.prefs),
            today,
            week: self.week(date)?,
            month: self.month(cursor.0, cursor.1)?,
        })
    }
}

/// Year/month shown by a month view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCursor {
    pub year: i32,
    pub month: u32,
}

impl MonthCursor {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn shift(self, delta: i32) -> Self {
        let (year, month) = add_months(self.year, self.month, delta);
        Self { year, month }
    }

    pub fn as_tuple(self) -> (i32, u32) {
        (self.year, self.month)
    }
}

/// Identifies one in-flight load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Hands out tickets for view loads. Only the most recent ticket is current;
/// results carrying an older ticket belong to a view that has since changed
/// or been torn down and must be dropped.
#[derive(Debug, Default)]
pub struct LoadGeneration {
    current: u64,
}

impl LoadGeneration {
    pub fn begin(&mut self) -> LoadTicket {
        self.current += 1;
        LoadTicket(self.current)
    }

    /// Marks every outstanding load stale.
    pub fn invalidate(&mut self) {
        self.current += 1;
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.current
    }

    pub fn accept<T>(&self, ticket: LoadTicket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            tracing::debug!(ticket = ticket.0, current = self.current, "discarding stale load");
            None
        }
    }
}
