use std::collections::HashMap;
use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;

use crate::model::entry::{EntryPatch, ResistanceSet};
use crate::model::prefs::PreferencesPatch;
use crate::time::parse_human_date;

pub const ENTRY_KEYS: &[&str] = &[
    "date",
    "morning",
    "evening",
    "walkmorning",
    "walkevening",
    "bikekm",
    "bikemin",
    "mode",
];

pub const SET_KEYS: &[&str] = &[
    "date", "name", "sets", "reps", "kg", "rest", "met", "tempo", "minutes",
];

pub const PREF_KEYS: &[&str] = &[
    "weight",
    "stepsperkm",
    "walkmet",
    "cyclemet",
    "cyclespeed",
    "weightsmet",
    "usebias",
    "bias",
    "target",
    "policy",
];

#[derive(Debug, PartialEq)]
pub struct ParsedInput {
    pub name: String,
    pub metadata: HashMap<String, String>,
}

/// Splits `key:value` tokens from free text.
pub fn parse_args(args: &[String]) -> ParsedInput {
    let mut name_parts = Vec::new();
    let mut metadata = HashMap::new();

    for arg in args {
        if let Some((key, value)) = arg.split_once(':') {
            if !key.is_empty() {
                metadata.insert(key.to_lowercase(), value.to_string());
                continue;
            }
        }
        name_parts.push(arg.as_str());
    }

    ParsedInput {
        name: name_parts.join(" "),
        metadata,
    }
}

/// Exact match first, then a unique prefix.
pub fn expand_key(key: &str, candidates: &[&str]) -> Result<String> {
    if candidates.contains(&key) {
        return Ok(key.to_string());
    }

    let matches: Vec<&str> = candidates
        .iter()
        .filter(|&&c| c.starts_with(key))
        .cloned()
        .collect();

    match matches.len() {
        1 => Ok(matches[0].to_string()),
        0 => Err(anyhow!("Unknown key: '{}'", key)),
        _ => Err(anyhow!("Ambiguous key: '{}' matches {:?}", key, matches)),
    }
}

fn normalize(parsed: ParsedInput, candidates: &[&str]) -> Result<(String, HashMap<String, String>)> {
    let mut normalized = HashMap::new();
    for (key, value) in parsed.metadata {
        normalized.insert(expand_key(&key, candidates)?, value);
    }
    Ok((parsed.name, normalized))
}

fn non_negative(key: &str, value: &str) -> Result<f64> {
    let n: f64 = value
        .trim()
        .parse()
        .with_context(|| format!("'{}' expects a number, got '{}'", key, value))?;
    if !n.is_finite() || n < 0.0 {
        return Err(anyhow!("'{}' must be a non-negative number, got '{}'", key, value));
    }
    Ok(n)
}

fn whole(key: &str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse()
        .with_context(|| format!("'{}' expects a whole number, got '{}'", key, value))
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(anyhow!("'{}' expects on/off, got '{}'", key, value)),
    }
}

fn parse_date(meta: &HashMap<String, String>, today: NaiveDate) -> Result<Option<NaiveDate>> {
    meta.get("date").map(|d| parse_human_date(d, today)).transpose()
}

/// `morning:5000 bikekm:7.5 mode:bike date:yesterday`
pub fn parse_entry_patch(args: &[String], today: NaiveDate) -> Result<(Option<NaiveDate>, EntryPatch)> {
    let (name, meta) = normalize(parse_args(args), ENTRY_KEYS)?;
    if !name.is_empty() {
        return Err(anyhow!("Unexpected text '{}': use key:value pairs", name));
    }

    let mut patch = EntryPatch::default();
    for (key, value) in &meta {
        match key.as_str() {
            "morning" => patch.morning_steps = Some(whole(key, value)?),
            "evening" => patch.evening_steps = Some(whole(key, value)?),
            "walkmorning" => patch.walk_min_morning = Some(non_negative(key, value)?),
            "walkevening" => patch.walk_min_evening = Some(non_negative(key, value)?),
            "bikekm" => patch.bike_km = Some(non_negative(key, value)?),
            "bikemin" => patch.bike_min = Some(non_negative(key, value)?),
            "mode" => patch.evening_mode = Some(value.parse()?),
            _ => {}
        }
    }
    Ok((parse_date(&meta, today)?, patch))
}

/// `Floor Press sets:3 reps:12 rest:60 met:5 tempo:3`
pub fn parse_resistance_set(args: &[String], today: NaiveDate) -> Result<(Option<NaiveDate>, ResistanceSet)> {
    let (free_text, meta) = normalize(parse_args(args), SET_KEYS)?;
    let name = meta.get("name").cloned().unwrap_or(free_text);
    if name.trim().is_empty() {
        return Err(anyhow!("Exercise name is required"));
    }

    let sets = meta.get("sets").map(|v| whole("sets", v)).transpose()?.unwrap_or(3);
    let reps = meta.get("reps").map(|v| whole("reps", v)).transpose()?.unwrap_or(10);
    if sets == 0 || reps == 0 {
        return Err(anyhow!("sets and reps must be positive"));
    }

    let mut set = ResistanceSet::new(name.trim(), sets, reps);
    for (key, value) in &meta {
        match key.as_str() {
            "kg" => set.weight_kg = non_negative(key, value)?,
            "rest" => set.rest_sec = non_negative(key, value)?,
            "met" => set.intensity_met = positive(key, value)?,
            "tempo" => set.tempo_sec_per_rep = positive(key, value)?,
            "minutes" => set.duration_min = Some(positive(key, value)?),
            _ => {}
        }
    }
    Ok((parse_date(&meta, today)?, set))
}

fn positive(key: &str, value: &str) -> Result<f64> {
    let n = non_negative(key, value)?;
    if n == 0.0 {
        return Err(anyhow!("'{}' must be greater than zero", key));
    }
    Ok(n)
}

/// `weight:82 target:12000 policy:adaptive`
pub fn parse_prefs_patch(args: &[String]) -> Result<PreferencesPatch> {
    let (name, meta) = normalize(parse_args(args), PREF_KEYS)?;
    if !name.is_empty() {
        return Err(anyhow!("Unexpected text '{}': use key:value pairs", name));
    }

    let mut patch = PreferencesPatch::default();
    for (key, value) in &meta {
        match key.as_str() {
            "weight" => patch.weight_kg = Some(positive(key, value)?),
            "stepsperkm" => patch.steps_per_km = Some(positive(key, value)?),
            "walkmet" => patch.walk_met = Some(positive(key, value)?),
            "cyclemet" => patch.cycle_met = Some(positive(key, value)?),
            "cyclespeed" => patch.cycle_speed = Some(positive(key, value)?),
            "weightsmet" => patch.weights_met = Some(positive(key, value)?),
            "usebias" => patch.use_device_bias = Some(parse_flag(key, value)?),
            "bias" => patch.device_bias = Some(positive(key, value)?),
            "target" => patch.daily_target_steps = Some(whole(key, value)?),
            "policy" => patch.weights_met_policy = Some(value.parse()?),
            _ => {}
        }
    }
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::entry::EveningMode;
    use crate::model::prefs::WeightsMetPolicy;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 12).unwrap()
    }

    #[test]
    fn test_parse_simple() {
        let parsed = parse_args(&args(&["Floor", "Press", "sets:3", "Reps:12"]));
        assert_eq!(parsed.name, "Floor Press");
        assert_eq!(parsed.metadata.get("sets"), Some(&"3".to_string()));
        assert_eq!(parsed.metadata.get("reps"), Some(&"12".to_string()));
    }

    #[test]
    fn test_expand_key() {
        assert_eq!(expand_key("m", &["morning", "date"]).unwrap(), "morning");
        assert_eq!(expand_key("bikek", ENTRY_KEYS).unwrap(), "bikekm");
        assert!(expand_key("bike", ENTRY_KEYS).is_err()); // bikekm, bikemin
        assert!(expand_key("walk", ENTRY_KEYS).is_err());
        assert!(expand_key("x", ENTRY_KEYS).is_err());
    }

    #[test]
    fn test_parse_entry_patch() {
        let (date, patch) = parse_entry_patch(
            &args(&["mor:5000", "bikekm:7.5", "mode:bike", "date:yesterday"]),
            today(),
        )
        .unwrap();

        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 11));
        assert_eq!(patch.morning_steps, Some(5000));
        assert_eq!(patch.bike_km, Some(7.5));
        assert_eq!(patch.evening_mode, Some(EveningMode::Bike));
        assert_eq!(patch.evening_steps, None);
    }

    #[test]
    fn test_entry_patch_rejects_bad_values() {
        assert!(parse_entry_patch(&args(&["morning:-5"]), today()).is_err());
        assert!(parse_entry_patch(&args(&["bikekm:far"]), today()).is_err());
        assert!(parse_entry_patch(&args(&["stray"]), today()).is_err());
    }

    #[test]
    fn test_parse_resistance_set() {
        let (date, set) = parse_resistance_set(
            &args(&["Barbell", "Row", "sets:3", "reps:10", "rest:75", "met:6", "kg:40"]),
            today(),
        )
        .unwrap();

        assert_eq!(date, None);
        assert_eq!(set.name, "Barbell Row");
        assert_eq!(set.sets, 3);
        assert_eq!(set.reps, 10);
        assert_eq!(set.rest_sec, 75.0);
        assert_eq!(set.intensity_met, 6.0);
        assert_eq!(set.weight_kg, 40.0);
        assert_eq!(set.tempo_sec_per_rep, 3.0);
    }

    #[test]
    fn test_resistance_set_needs_name() {
        assert!(parse_resistance_set(&args(&["sets:3"]), today()).is_err());
        assert!(parse_resistance_set(&args(&["Plank", "tempo:0"]), today()).is_err());
    }

    #[test]
    fn test_parse_prefs_patch() {
        let patch =
            parse_prefs_patch(&args(&["weight:82", "target:12000", "pol:adaptive", "usebias:on"]))
                .unwrap();
        assert_eq!(patch.weight_kg, Some(82.0));
        assert_eq!(patch.daily_target_steps, Some(12000));
        assert_eq!(patch.weights_met_policy, Some(WeightsMetPolicy::Adaptive));
        assert_eq!(patch.use_device_bias, Some(true));
        assert!(parse_prefs_patch(&args(&["weight:0"])).is_err());
    }
}
