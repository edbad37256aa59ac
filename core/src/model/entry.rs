use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::lenient;

pub const DEFAULT_TEMPO_SEC_PER_REP: f64 = 3.0;
pub const DEFAULT_INTENSITY_MET: f64 = 5.0;

fn default_tempo() -> f64 {
    DEFAULT_TEMPO_SEC_PER_REP
}

fn default_intensity() -> f64 {
    DEFAULT_INTENSITY_MET
}

/// Which evening preset the user picked. Informational only: totals are
/// computed from whatever fields are populated.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EveningMode {
    #[default]
    Walk,
    Bike,
}

impl FromStr for EveningMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "walk" | "w" | "a" => Ok(EveningMode::Walk),
            "bike" | "b" => Ok(EveningMode::Bike),
            other => Err(anyhow!("Unknown evening mode: '{}'", other)),
        }
    }
}

impl fmt::Display for EveningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EveningMode::Walk => write!(f, "walk"),
            EveningMode::Bike => write!(f, "bike"),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResistanceSet {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub sets: u32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub reps: u32,
    /// Recorded only; not used in the energy model.
    #[serde(default, deserialize_with = "lenient::number")]
    pub weight_kg: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub rest_sec: f64,
    #[serde(default = "default_intensity", deserialize_with = "lenient::number")]
    pub intensity_met: f64,
    #[serde(default = "default_tempo", deserialize_with = "lenient::number")]
    pub tempo_sec_per_rep: f64,
    /// Measured duration for this exercise; replaces the set/rep derivation.
    #[serde(
        default,
        deserialize_with = "lenient::positive_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub duration_min: Option<f64>,
}

impl ResistanceSet {
    pub fn new(name: &str, sets: u32, reps: u32) -> Self {
        Self {
            name: name.to_string(),
            sets,
            reps,
            weight_kg: 0.0,
            rest_sec: 60.0,
            intensity_met: DEFAULT_INTENSITY_MET,
            tempo_sec_per_rep: DEFAULT_TEMPO_SEC_PER_REP,
            duration_min: None,
        }
    }

    pub fn rest(mut self, rest_sec: f64) -> Self {
        self.rest_sec = rest_sec;
        self
    }

    pub fn met(mut self, intensity_met: f64) -> Self {
        self.intensity_met = intensity_met;
        self
    }

    pub fn tempo(mut self, tempo_sec_per_rep: f64) -> Self {
        self.tempo_sec_per_rep = tempo_sec_per_rep;
        self
    }
}

/// One calendar day of logged activity. The date is the primary key.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyEntry {
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "lenient::count")]
    pub morning_steps: u32,
    #[serde(default, deserialize_with = "lenient::count")]
    pub evening_steps: u32,
    #[serde(default, deserialize_with = "lenient::number")]
    pub walk_min_morning: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub walk_min_evening: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub bike_km: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub bike_min: f64,
    #[serde(default, deserialize_with = "lenient::evening_mode")]
    pub evening_mode: EveningMode,
    #[serde(default, deserialize_with = "lenient::sessions")]
    pub weight_sessions: Vec<ResistanceSet>,
    #[serde(
        default,
        deserialize_with = "lenient::timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl DailyEntry {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            morning_steps: 0,
            evening_steps: 0,
            walk_min_morning: 0.0,
            walk_min_evening: 0.0,
            bike_km: 0.0,
            bike_min: 0.0,
            evening_mode: EveningMode::default(),
            weight_sessions: Vec::new(),
            updated_at: None,
        }
    }

    pub fn total_steps(&self) -> u32 {
        self.morning_steps.saturating_add(self.evening_steps)
    }

    pub fn has_resistance(&self) -> bool {
        !self.weight_sessions.is_empty()
    }
}

/// A partial update to a [`DailyEntry`]. Present fields overwrite, absent
/// fields are left alone.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EntryPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub morning_steps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evening_steps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub walk_min_morning: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub walk_min_evening: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bike_km: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bike_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evening_mode: Option<EveningMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_sessions: Option<Vec<ResistanceSet>>,
}

impl EntryPatch {
    pub fn is_empty(&self) -> bool {
        *self == EntryPatch::default()
    }

    pub fn apply(&self, entry: &mut DailyEntry) {
        if let Some(v) = self.morning_steps {
            entry.morning_steps = v;
        }
        if let Some(v) = self.evening_steps {
            entry.evening_steps = v;
        }
        if let Some(v) = self.walk_min_morning {
            entry.walk_min_morning = v;
        }
        if let Some(v) = self.walk_min_evening {
            entry.walk_min_evening = v;
        }
        if let Some(v) = self.bike_km {
            entry.bike_km = v;
        }
        if let Some(v) = self.bike_min {
            entry.bike_min = v;
        }
        if let Some(v) = self.evening_mode {
            entry.evening_mode = v;
        }
        if let Some(v) = &self.weight_sessions {
            entry.weight_sessions = v.clone();
        }
    }

    /// Patch that reproduces every field of `entry`.
    pub fn from_entry(entry: &DailyEntry) -> Self {
        Self {
            morning_steps: Some(entry.morning_steps),
            evening_steps: Some(entry.evening_steps),
            walk_min_morning: Some(entry.walk_min_morning),
            walk_min_evening: Some(entry.walk_min_evening),
            bike_km: Some(entry.bike_km),
            bike_min: Some(entry.bike_min),
            evening_mode: Some(entry.evening_mode),
            weight_sessions: Some(entry.weight_sessions.clone()),
        }
    }
}

/// Rejects a merged entry the editor would not accept: bike mode needs at
/// least one resistance exercise.
pub fn validate_save(merged: &DailyEntry) -> Result<()> {
    if merged.evening_mode == EveningMode::Bike && merged.weight_sessions.is_empty() {
        return Err(anyhow!(
            "Evening mode 'bike' needs at least one resistance exercise for {}",
            merged.date
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    #[test]
    fn test_partial_record_defaults_to_zero() {
        let entry: DailyEntry = serde_json::from_value(json!({ "date": "2025-03-10" })).unwrap();
        assert_eq!(entry, DailyEntry::new(date()));
    }

    #[test]
    fn test_malformed_fields_are_coerced() {
        let entry: DailyEntry = serde_json::from_value(json!({
            "date": "2025-03-10",
            "morningSteps": "4200",
            "eveningSteps": -30,
            "bikeKm": "lots",
            "bikeMin": null,
            "eveningMode": "scooter",
            "weightSessions": [
                { "name": "Plank", "sets": "3", "reps": 1, "tempoSecPerRep": 60 },
                "garbage"
            ],
            "updatedAt": 1735689600000i64
        }))
        .unwrap();

        assert_eq!(entry.morning_steps, 4200);
        assert_eq!(entry.evening_steps, 0);
        assert_eq!(entry.bike_km, 0.0);
        assert_eq!(entry.bike_min, 0.0);
        assert_eq!(entry.evening_mode, EveningMode::Walk);
        assert_eq!(entry.weight_sessions.len(), 1);
        assert_eq!(entry.weight_sessions[0].sets, 3);
        assert_eq!(entry.weight_sessions[0].intensity_met, DEFAULT_INTENSITY_MET);
        assert_eq!(entry.weight_sessions[0].rest_sec, 0.0);
        assert!(entry.updated_at.is_some());
    }

    #[test]
    fn test_sessions_not_an_array() {
        let entry: DailyEntry = serde_json::from_value(json!({
            "date": "2025-03-10",
            "weightSessions": { "name": "Squat" }
        }))
        .unwrap();
        assert!(entry.weight_sessions.is_empty());
    }

    #[test]
    fn test_patch_merges_instead_of_replacing() {
        let mut entry = DailyEntry::new(date());
        entry.morning_steps = 3000;

        let patch = EntryPatch {
            bike_km: Some(5.0),
            ..Default::default()
        };
        patch.apply(&mut entry);

        assert_eq!(entry.morning_steps, 3000);
        assert_eq!(entry.bike_km, 5.0);
    }

    #[test]
    fn test_from_entry_round_trips() {
        let mut entry = DailyEntry::new(date());
        entry.evening_steps = 1234;
        entry.weight_sessions.push(ResistanceSet::new("Deadlift", 3, 10));

        let mut rebuilt = DailyEntry::new(date());
        EntryPatch::from_entry(&entry).apply(&mut rebuilt);
        assert_eq!(rebuilt, entry);
    }

    #[test]
    fn test_validate_bike_mode_requires_sets() {
        let mut merged = DailyEntry::new(date());
        assert!(validate_save(&merged).is_ok());

        merged.evening_mode = EveningMode::Bike;
        assert!(validate_save(&merged).is_err());

        merged.weight_sessions.push(ResistanceSet::new("Floor Press", 3, 12));
        assert!(validate_save(&merged).is_ok());
    }

    #[test]
    fn test_odd_set_names_are_kept() {
        let entry: DailyEntry = serde_json::from_value(json!({
            "date": "2025-03-10",
            "weightSessions": [
                { "name": null, "sets": 3, "reps": 10 },
                { "name": 5, "sets": 2, "reps": 8 },
                "garbage"
            ]
        }))
        .unwrap();

        assert_eq!(entry.weight_sessions.len(), 2);
        assert_eq!(entry.weight_sessions[0].name, "");
        assert_eq!(entry.weight_sessions[0].sets, 3);
        assert_eq!(entry.weight_sessions[1].name, "5");
    }

    #[test]
    fn test_evening_mode_parse() {
        assert_eq!("Bike".parse::<EveningMode>().unwrap(), EveningMode::Bike);
        assert_eq!("a".parse::<EveningMode>().unwrap(), EveningMode::Walk);
        assert!("car".parse::<EveningMode>().is_err());
    }
}
