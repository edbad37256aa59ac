use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayBar {
    pub date: NaiveDate,
    pub label: String, // Sun, Mon...
    pub step_equivalent: u32,
    pub kcal: u32,
    pub logged: bool,
}

/// Sunday through Saturday.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeekView {
    pub start: NaiveDate,
    pub days: Vec<DayBar>,
    pub target_steps: u32,
    pub days_hit_target: usize,
}

impl WeekView {
    pub fn end(&self) -> NaiveDate {
        self.days.last().map(|d| d.date).unwrap_or(self.start)
    }

    pub fn total_kcal(&self) -> u64 {
        self.days.iter().map(|d| d.kcal as u64).sum()
    }

    pub fn total_step_equivalent(&self) -> u64 {
        self.days.iter().map(|d| d.step_equivalent as u64).sum()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MonthSummary {
    pub year: i32,
    pub month: u32,
    pub step_equivalent: u64,
    pub kcal: u64,
    pub steps: u64,
    pub bike_km: f64,
    pub days_logged: usize,
    pub days_hit_target: usize,
    pub days_with_resistance: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// Display dimming only.
    pub in_month: bool,
    pub logged: bool,
    pub step_equivalent: u32,
    pub kcal: u32,
    pub hit_target: bool,
}

/// Six weeks of seven days, starting on the Sunday on or before the 1st.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMonth {
    pub year: i32,
    pub month: u32,
    pub weeks: Vec<Vec<CalendarCell>>,
}

impl CalendarMonth {
    pub fn cells(&self) -> impl Iterator<Item = &CalendarCell> {
        self.weeks.iter().flatten()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthView {
    pub summary: MonthSummary,
    pub calendar: CalendarMonth,
}
