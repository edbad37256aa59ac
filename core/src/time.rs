use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, Local, NaiveDate, TimeDelta, Weekday};

pub const CALENDAR_WEEKS: usize = 6;

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// The Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

pub fn week_dates(date: NaiveDate) -> Vec<NaiveDate> {
    let start = week_start(date);
    (0..7).map(|i| start + Duration::days(i)).collect()
}

pub fn month_start(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| anyhow!("Invalid month: {:04}-{:02}", year, month))
}

pub fn month_end(year: i32, month: u32) -> Result<NaiveDate> {
    let (next_year, next_month) = add_months(year, month, 1);
    month_start(next_year, next_month)?
        .pred_opt()
        .ok_or_else(|| anyhow!("Month out of range: {:04}-{:02}", year, month))
}

pub fn add_months(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let index = year * 12 + month as i32 - 1 + delta;
    (index.div_euclid(12), index.rem_euclid(12) as u32 + 1)
}

/// First cell of the month grid: the Sunday on or before the 1st.
pub fn calendar_start(year: i32, month: u32) -> Result<NaiveDate> {
    Ok(week_start(month_start(year, month)?))
}

pub fn calendar_end(year: i32, month: u32) -> Result<NaiveDate> {
    Ok(calendar_start(year, month)? + Duration::days(CALENDAR_WEEKS as i64 * 7 - 1))
}

/// Accepts `today`, `yesterday`, `-N` (days back), a weekday name (the most
/// recent one, today included) or `YYYY-MM-DD`.
pub fn parse_human_date(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let input = input.trim();

    // 1. Reserved keywords
    match input.to_lowercase().as_str() {
        "today" | "tod" => return Ok(today),
        "yesterday" | "yest" => {
            return today
                .pred_opt()
                .ok_or_else(|| anyhow!("No day before {}", today));
        }
        _ => {}
    }

    // 2. Relative format (-N)
    if let Some(num_str) = input.strip_prefix('-') {
        return num_str
            .parse::<i64>()
            .ok()
            .and_then(TimeDelta::try_days)
            .and_then(|back| today.checked_sub_signed(back))
            .ok_or_else(|| anyhow!("Invalid relative date: {}", input));
    }

    // 3. Weekday names
    if let Ok(weekday) = parse_weekday_str(input) {
        let back = (today.weekday().num_days_from_sunday() + 7
            - weekday.num_days_from_sunday())
            % 7;
        return Ok(today - Duration::days(back as i64));
    }

    // 4. Fallback to ISO format
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| anyhow!("Could not parse date: {}", input))
}

/// Accepts `this`, `last`/`prev`, `next` or `YYYY-MM`.
pub fn parse_month(input: &str, today: NaiveDate) -> Result<(i32, u32)> {
    let current = (today.year(), today.month());
    match input.trim().to_lowercase().as_str() {
        "" | "this" | "now" => return Ok(current),
        "last" | "prev" => return Ok(add_months(current.0, current.1, -1)),
        "next" => return Ok(add_months(current.0, current.1, 1)),
        _ => {}
    }

    let (year_str, month_str) = input
        .trim()
        .split_once('-')
        .ok_or_else(|| anyhow!("Could not parse month: {} (use YYYY-MM)", input))?;
    let year: i32 = year_str.parse().map_err(|_| anyhow!("Invalid year: {}", year_str))?;
    let month: u32 = month_str.parse().map_err(|_| anyhow!("Invalid month: {}", month_str))?;
    month_start(year, month)?;
    Ok((year, month))
}

fn parse_weekday_str(s: &str) -> Result<Weekday> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        "sun" | "sunday" => Ok(Weekday::Sun),
        _ => Err(anyhow!("Invalid weekday")),
    }
}
