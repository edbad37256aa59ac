//! Rolls per-day totals up into week, month and calendar views.
//!
//! Dates with no entry contribute nothing: they are zero in sums and never
//! count as hitting the target or as a resistance day.

use std::collections::BTreeMap;

use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate};

use crate::model::entry::DailyEntry;
use crate::model::prefs::Preferences;
use crate::model::totals::DayTotals;
use crate::service::dto::{CalendarCell, CalendarMonth, DayBar, MonthSummary, WeekView};
use crate::service::estimator::estimate;
use crate::time::{calendar_start, week_dates, CALENDAR_WEEKS};

pub type TotalsByDate = BTreeMap<NaiveDate, DayTotals>;

/// Estimates every entry independently.
pub fn totals_by_date(entries: &[DailyEntry], prefs: &Preferences) -> TotalsByDate {
    entries
        .iter()
        .map(|entry| (entry.date, estimate(entry, prefs)))
        .collect()
}

pub fn week_view(anchor: NaiveDate, totals: &TotalsByDate, target_steps: u32) -> WeekView {
    let days: Vec<DayBar> = week_dates(anchor)
        .into_iter()
        .map(|date| {
            let day = totals.get(&date);
            DayBar {
                date,
                label: date.format("%a").to_string(),
                step_equivalent: day.map_or(0, |t| t.step_equivalent),
                kcal: day.map_or(0, |t| t.total_kcal),
                logged: day.is_some(),
            }
        })
        .collect();

    let days_hit_target = days
        .iter()
        .filter(|d| d.logged && d.step_equivalent >= target_steps)
        .count();

    WeekView {
        start: days[0].date,
        days,
        target_steps,
        days_hit_target,
    }
}

/// Sums over the dates of `year`-`month` only; totals for adjacent months in
/// the map are ignored.
pub fn month_summary(year: i32, month: u32, totals: &TotalsByDate, target_steps: u32) -> MonthSummary {
    let mut summary = MonthSummary {
        year,
        month,
        ..Default::default()
    };

    for (_, day) in totals
        .iter()
        .filter(|(date, _)| date.year() == year && date.month() == month)
    {
        summary.step_equivalent += day.step_equivalent as u64;
        summary.kcal += day.total_kcal as u64;
        summary.steps += day.detail.steps as u64;
        summary.bike_km += day.detail.bike_km;
        summary.days_logged += 1;
        if day.hits_target(target_steps) {
            summary.days_hit_target += 1;
        }
        if day.detail.resistance_sets > 0 {
            summary.days_with_resistance += 1;
        }
    }

    summary
}

pub fn calendar_matrix(
    year: i32,
    month: u32,
    totals: &TotalsByDate,
    target_steps: u32,
) -> Result<CalendarMonth> {
    let mut cursor = calendar_start(year, month)?;
    let mut weeks = Vec::with_capacity(CALENDAR_WEEKS);

    for _ in 0..CALENDAR_WEEKS {
        let mut week = Vec::with_capacity(7);
        for _ in 0..7 {
            let day = totals.get(&cursor);
            week.push(CalendarCell {
                date: cursor,
                in_month: cursor.month() == month,
                logged: day.is_some(),
                step_equivalent: day.map_or(0, |t| t.step_equivalent),
                kcal: day.map_or(0, |t| t.total_kcal),
                hit_target: day.is_some_and(|t| t.hits_target(target_steps)),
            });
            cursor += Duration::days(1);
        }
        weeks.push(week);
    }

    Ok(CalendarMonth { year, month, weeks })
}
