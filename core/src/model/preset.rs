use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::Weekday;

use crate::model::entry::{DailyEntry, EntryPatch, EveningMode, ResistanceSet};

/// Exercise names offered by the entry editor. Free text is also accepted.
pub const PRESET_EXERCISES: &[&str] = &[
    "Dumbbell Curl",
    "Floor Press",
    "Barbell Squat",
    "Deadlift",
    "Plank",
    "Dumbbell Shoulder Press",
    "Barbell Row",
    "Bodyweight Squat",
    "Side Plank",
    "Side Raise",
    "Close-grip Push-up",
    "Barbell Deadlift",
    "Bent-over Row",
    "Light Circuit (Push-up, Squat, Plank)",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresetOption {
    /// Option A: evening walk.
    Walk,
    /// Option B: bike ride plus the day's resistance routine.
    BikeAndWeights,
}

impl fmt::Display for PresetOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresetOption::Walk => write!(f, "A (walk)"),
            PresetOption::BikeAndWeights => write!(f, "B (bike + weights)"),
        }
    }
}

impl FromStr for PresetOption {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "a" | "walk" => Ok(PresetOption::Walk),
            "b" | "bike" => Ok(PresetOption::BikeAndWeights),
            other => Err(anyhow!("Unknown preset option: '{}' (use A or B)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayPreset {
    pub morning_steps: u32,
    pub evening_steps: u32,
    pub bike_km: f64,
    pub weights: Vec<ResistanceSet>,
}

impl DayPreset {
    /// Patch that applies this preset onto `current`. Morning steps are only
    /// filled in when nothing was logged yet.
    pub fn patch(&self, option: PresetOption, current: &DailyEntry) -> EntryPatch {
        let morning_steps = (current.morning_steps == 0).then_some(self.morning_steps);
        match option {
            PresetOption::Walk => EntryPatch {
                morning_steps,
                evening_steps: Some(self.evening_steps),
                bike_km: Some(0.0),
                bike_min: Some(0.0),
                evening_mode: Some(EveningMode::Walk),
                weight_sessions: Some(Vec::new()),
                ..Default::default()
            },
            PresetOption::BikeAndWeights => EntryPatch {
                morning_steps,
                bike_km: Some(self.bike_km),
                evening_mode: Some(EveningMode::Bike),
                weight_sessions: Some(self.weights.clone()),
                ..Default::default()
            },
        }
    }
}

pub fn preset_for(weekday: Weekday) -> DayPreset {
    let (morning_steps, bike_km, weights) = match weekday {
        Weekday::Mon => (
            5000,
            8.0,
            vec![
                ResistanceSet::new("Dumbbell Curl", 3, 12),
                ResistanceSet::new("Floor Press", 3, 12),
            ],
        ),
        Weekday::Tue => (
            5000,
            5.0,
            vec![
                ResistanceSet::new("Barbell Squat", 4, 8).rest(90.0).met(6.5),
                ResistanceSet::new("Deadlift", 3, 10).rest(90.0).met(6.5),
                ResistanceSet::new("Plank", 3, 1).rest(45.0).met(3.5).tempo(60.0),
            ],
        ),
        Weekday::Wed => (
            5000,
            5.0,
            vec![
                ResistanceSet::new("Floor Press", 4, 10).rest(75.0).met(6.0),
                ResistanceSet::new("Dumbbell Shoulder Press", 3, 10).met(5.5),
                ResistanceSet::new("Barbell Row", 3, 10).rest(75.0).met(6.0),
            ],
        ),
        Weekday::Thu => (
            3500,
            7.0,
            vec![
                ResistanceSet::new("Bodyweight Squat", 3, 15).rest(45.0).met(4.0).tempo(2.0),
                ResistanceSet::new("Side Plank", 3, 1).rest(45.0).met(3.5).tempo(40.0),
            ],
        ),
        Weekday::Fri => (
            5000,
            5.0,
            vec![
                ResistanceSet::new("Floor Press", 4, 10).rest(75.0).met(6.0),
                ResistanceSet::new("Side Raise", 3, 12).met(4.5).tempo(2.0),
                ResistanceSet::new("Close-grip Push-up", 3, 10).met(4.5).tempo(2.0),
            ],
        ),
        Weekday::Sat => (
            5000,
            5.0,
            vec![
                ResistanceSet::new("Barbell Deadlift", 4, 8).rest(90.0).met(6.5),
                ResistanceSet::new("Bent-over Row", 3, 10).rest(75.0).met(6.0),
                ResistanceSet::new("Dumbbell Curl", 3, 12).tempo(2.5),
            ],
        ),
        Weekday::Sun => (
            5000,
            8.0,
            vec![
                ResistanceSet::new("Push-up", 3, 10).rest(45.0).met(4.5).tempo(2.0),
                ResistanceSet::new("Bodyweight Squat", 3, 15).rest(45.0).met(4.0).tempo(2.0),
                ResistanceSet::new("Plank", 3, 1).rest(45.0).met(3.5).tempo(60.0),
            ],
        ),
    };

    DayPreset {
        morning_steps,
        evening_steps: 5000,
        bike_km,
        weights,
    }
}
