//! Calorie and step-equivalent estimation for a single day.
//!
//! Everything here is a pure function of a [`DailyEntry`] and the caller's
//! [`Preferences`]. Nothing reads storage.

use crate::model::entry::{
    DailyEntry, ResistanceSet, DEFAULT_INTENSITY_MET, DEFAULT_TEMPO_SEC_PER_REP,
};
use crate::model::prefs::{Preferences, WeightsMetPolicy};
use crate::model::totals::{DayTotals, TotalsDetail};

// 1 MET ~ 1 kcal/kg/h, corrected.
const MET_CORRECTION: f64 = 1.05;
// Walking costs roughly half a kcal per kg per km.
const WALK_KCAL_PER_KG_KM: f64 = 0.5;

const ADAPTIVE_LONG_MINUTES: f64 = 20.0;
const ADAPTIVE_LONG_MET_FLOOR: f64 = 6.0;
const ADAPTIVE_SHORT_MINUTES: f64 = 10.0;
const ADAPTIVE_SHORT_MET_CAP: f64 = 4.5;

pub fn kcal_from_met(met: f64, weight_kg: f64, minutes: f64) -> f64 {
    met * MET_CORRECTION * weight_kg * (minutes.max(0.0) / 60.0)
}

pub fn walk_kcal_per_step(prefs: &Preferences) -> f64 {
    WALK_KCAL_PER_KG_KM * prefs.effective_weight_kg() / prefs.effective_steps_per_km()
}

pub fn bike_kcal_per_km(prefs: &Preferences) -> f64 {
    prefs.effective_cycle_met() * MET_CORRECTION * prefs.effective_weight_kg()
        / prefs.effective_cycle_speed()
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SetDuration {
    pub work_minutes: f64,
    pub rest_minutes: f64,
}

impl SetDuration {
    pub fn total(&self) -> f64 {
        self.work_minutes + self.rest_minutes
    }
}

pub fn set_duration(set: &ResistanceSet) -> SetDuration {
    if let Some(minutes) = set.duration_min.filter(|m| *m > 0.0) {
        return SetDuration {
            work_minutes: minutes,
            rest_minutes: 0.0,
        };
    }

    let sets = set.sets as f64;
    let tempo = if set.tempo_sec_per_rep > 0.0 {
        set.tempo_sec_per_rep
    } else {
        DEFAULT_TEMPO_SEC_PER_REP
    };
    SetDuration {
        work_minutes: sets * set.reps as f64 * tempo / 60.0,
        rest_minutes: (sets - 1.0).max(0.0) * set.rest_sec.max(0.0) / 60.0,
    }
}

fn set_intensity(set: &ResistanceSet) -> f64 {
    if set.intensity_met > 0.0 {
        set.intensity_met
    } else {
        DEFAULT_INTENSITY_MET
    }
}

pub fn weights_minutes(sessions: &[ResistanceSet]) -> f64 {
    sessions.iter().map(|s| set_duration(s).total()).sum()
}

/// MET applied to the whole day's resistance work.
pub fn effective_weights_met(sessions: &[ResistanceSet], prefs: &Preferences) -> f64 {
    let total = weights_minutes(sessions);
    let met = if total > 0.0 {
        sessions
            .iter()
            .map(|s| set_duration(s).total() * set_intensity(s))
            .sum::<f64>()
            / total
    } else {
        prefs.effective_weights_met()
    };

    match prefs.weights_met_policy {
        WeightsMetPolicy::DurationWeighted => met,
        WeightsMetPolicy::Adaptive => {
            if total >= ADAPTIVE_LONG_MINUTES {
                met.max(ADAPTIVE_LONG_MET_FLOOR)
            } else if total <= ADAPTIVE_SHORT_MINUTES {
                met.min(ADAPTIVE_SHORT_MET_CAP)
            } else {
                met
            }
        }
    }
}

/// Walking segment: a positive duration wins over the step count.
fn walk_segment_kcal(steps: u32, minutes: f64, prefs: &Preferences) -> f64 {
    if minutes > 0.0 {
        kcal_from_met(prefs.effective_walk_met(), prefs.effective_weight_kg(), minutes)
    } else {
        steps as f64 * walk_kcal_per_step(prefs)
    }
}

/// Returns `(kcal, minutes)`. Minutes are derived from distance when no
/// duration was logged.
fn bike_segment(entry: &DailyEntry, prefs: &Preferences) -> (f64, f64) {
    if entry.bike_min > 0.0 {
        let kcal = kcal_from_met(
            prefs.effective_cycle_met(),
            prefs.effective_weight_kg(),
            entry.bike_min,
        );
        (kcal, entry.bike_min)
    } else if entry.bike_km > 0.0 {
        let minutes = entry.bike_km / prefs.effective_cycle_speed() * 60.0;
        (entry.bike_km * bike_kcal_per_km(prefs), minutes)
    } else {
        (0.0, 0.0)
    }
}

fn round_kcal(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

pub fn estimate(entry: &DailyEntry, prefs: &Preferences) -> DayTotals {
    let weight = prefs.effective_weight_kg();
    let per_step = walk_kcal_per_step(prefs);

    let walk_morning = walk_segment_kcal(entry.morning_steps, entry.walk_min_morning, prefs);
    let walk_evening = walk_segment_kcal(entry.evening_steps, entry.walk_min_evening, prefs);
    let (bike, bike_minutes) = bike_segment(entry, prefs);

    let weights_min = weights_minutes(&entry.weight_sessions);
    let weights_met = effective_weights_met(&entry.weight_sessions, prefs);
    let weights = kcal_from_met(weights_met, weight, weights_min);

    // Cycling and resistance work always land in the evening bucket.
    let morning_kcal = round_kcal(walk_morning);
    let evening_kcal = round_kcal(walk_evening + bike + weights);

    let non_walk_steps = (bike + weights) / per_step;
    let step_equivalent =
        round_kcal(entry.morning_steps as f64 + entry.evening_steps as f64 + non_walk_steps);

    DayTotals {
        morning_kcal,
        evening_kcal,
        total_kcal: morning_kcal.saturating_add(evening_kcal),
        step_equivalent,
        detail: TotalsDetail {
            walk_morning_kcal: round_kcal(walk_morning),
            walk_evening_kcal: round_kcal(walk_evening),
            bike_kcal: round_kcal(bike),
            weights_kcal: round_kcal(weights),
            weights_minutes: weights_min,
            bike_minutes,
            weights_met,
            steps: entry.total_steps(),
            bike_km: entry.bike_km.max(0.0),
            resistance_sets: entry.weight_sessions.len(),
            evening_mode: entry.evening_mode,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry() -> DailyEntry {
        DailyEntry::new(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap())
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_entry_is_all_zero() {
        let totals = estimate(&entry(), &Preferences::default());
        assert_eq!(totals.morning_kcal, 0);
        assert_eq!(totals.evening_kcal, 0);
        assert_eq!(totals.total_kcal, 0);
        assert_eq!(totals.step_equivalent, 0);
    }

    #[test]
    fn test_steps_only_day() {
        let mut e = entry();
        e.morning_steps = 5000;
        e.evening_steps = 5000;
        let prefs = Preferences::default();

        let totals = estimate(&e, &prefs);

        let per_segment = (5000.0_f64 * 0.5 * 100.0 / 1300.0).round() as u32;
        assert_eq!(per_segment, 192);
        assert_eq!(totals.morning_kcal, per_segment);
        assert_eq!(totals.evening_kcal, per_segment);
        assert_eq!(totals.total_kcal, per_segment * 2);
        assert_eq!(totals.step_equivalent, 10_000);
    }

    #[test]
    fn test_duration_overrides_steps() {
        let prefs = Preferences::default();
        let mut with_steps = entry();
        with_steps.morning_steps = 5000;
        with_steps.walk_min_morning = 30.0;
        let mut without_steps = entry();
        without_steps.walk_min_morning = 30.0;

        let a = estimate(&with_steps, &prefs);
        let b = estimate(&without_steps, &prefs);

        assert_eq!(a.morning_kcal, b.morning_kcal);
        assert_eq!(a.evening_kcal, b.evening_kcal);
        assert_eq!(a.total_kcal, b.total_kcal);
        // 3.3 * 1.05 * 100 * 0.5 = 173.25
        assert_eq!(a.morning_kcal, 173);
        // Real steps still count toward the equivalent.
        assert_eq!(a.step_equivalent, 5000);
    }

    #[test]
    fn test_monotonic_in_morning_steps() {
        let prefs = Preferences::default();
        let mut e = entry();
        e.bike_km = 3.0;
        let mut last = estimate(&e, &prefs);
        for steps in (0..20_000).step_by(1500) {
            e.morning_steps = steps;
            let next = estimate(&e, &prefs);
            assert!(next.step_equivalent >= last.step_equivalent);
            assert!(next.morning_kcal >= last.morning_kcal);
            last = next;
        }
    }

    #[test]
    fn test_estimate_is_deterministic() {
        let mut e = entry();
        e.morning_steps = 4321;
        e.bike_min = 25.0;
        e.weight_sessions.push(ResistanceSet::new("Floor Press", 3, 12));
        let prefs = Preferences::default();
        assert_eq!(estimate(&e, &prefs), estimate(&e, &prefs));
    }

    #[test]
    fn test_set_duration_from_structure() {
        let set = ResistanceSet::new("Curl", 3, 12).rest(60.0).met(5.0).tempo(3.0);
        let d = set_duration(&set);
        assert!(approx(d.work_minutes, 1.8));
        assert!(approx(d.rest_minutes, 2.0));
        assert!(approx(d.total(), 3.8));
    }

    #[test]
    fn test_set_duration_explicit_minutes() {
        let mut set = ResistanceSet::new("Circuit", 3, 12);
        set.duration_min = Some(15.0);
        assert!(approx(set_duration(&set).total(), 15.0));
    }

    #[test]
    fn test_single_set_has_no_rest() {
        let set = ResistanceSet::new("Plank", 1, 1).rest(45.0).tempo(60.0);
        let d = set_duration(&set);
        assert!(approx(d.work_minutes, 1.0));
        assert_eq!(d.rest_minutes, 0.0);
    }

    #[test]
    fn test_weighted_met_average() {
        let sessions = vec![
            // 1.8 + 2.0 = 3.8 min
            ResistanceSet::new("A", 3, 12).rest(60.0).met(5.0),
            // 3 * 10 * 3 / 60 = 1.5, + 2 * 90 / 60 = 3.0 -> 4.5 min
            ResistanceSet::new("B", 3, 10).rest(90.0).met(8.0),
        ];
        let met = effective_weights_met(&sessions, &Preferences::default());
        let expected = (3.8 * 5.0 + 4.5 * 8.0) / (3.8 + 4.5);
        assert!(approx(met, expected));
    }

    #[test]
    fn test_met_falls_back_to_preferences() {
        let prefs = Preferences {
            weights_met: 5.0,
            ..Default::default()
        };
        assert_eq!(effective_weights_met(&[], &prefs), 5.0);
    }

    #[test]
    fn test_adaptive_policy() {
        let prefs = Preferences {
            weights_met_policy: WeightsMetPolicy::Adaptive,
            ..Default::default()
        };

        // 3.8 minutes at MET 5 -> capped to 4.5
        let short = vec![ResistanceSet::new("A", 3, 12).rest(60.0).met(5.0)];
        assert_eq!(effective_weights_met(&short, &prefs), 4.5);

        // 25 minutes at MET 5 -> floored to 6
        let mut long_set = ResistanceSet::new("Circuit", 1, 1).met(5.0);
        long_set.duration_min = Some(25.0);
        assert_eq!(effective_weights_met(&[long_set.clone()], &prefs), 6.0);

        // Between the thresholds the weighted mean stands.
        long_set.duration_min = Some(15.0);
        assert_eq!(effective_weights_met(&[long_set.clone()], &prefs), 5.0);

        // Weighted policy leaves it alone.
        assert_eq!(effective_weights_met(&short, &Preferences::default()), 5.0);
    }

    #[test]
    fn test_bike_distance_and_duration_agree() {
        let prefs = Preferences::default();
        let mut by_km = entry();
        by_km.bike_km = 8.5;
        let mut by_min = entry();
        by_min.bike_min = 8.5 / 17.0 * 60.0;

        let a = estimate(&by_km, &prefs);
        let b = estimate(&by_min, &prefs);
        assert_eq!(a.evening_kcal, b.evening_kcal);
        assert!(approx(a.detail.bike_minutes, 30.0));
    }

    #[test]
    fn test_bike_minutes_win_over_distance() {
        let prefs = Preferences::default();
        let mut e = entry();
        e.bike_km = 100.0;
        e.bike_min = 60.0;
        // 6 * 1.05 * 100 * 1 = 630
        assert_eq!(estimate(&e, &prefs).detail.bike_kcal, 630);
    }

    #[test]
    fn test_non_walk_work_is_evening_and_converts_to_steps() {
        let prefs = Preferences::default();
        let mut e = entry();
        e.bike_min = 60.0;

        let totals = estimate(&e, &prefs);
        assert_eq!(totals.morning_kcal, 0);
        assert_eq!(totals.evening_kcal, 630);
        // 630 / (50 / 1300) = 16380
        assert_eq!(totals.step_equivalent, 16_380);
    }

    #[test]
    fn test_bad_denominators_do_not_blow_up() {
        let prefs = Preferences {
            steps_per_km: 0.0,
            cycle_speed: -4.0,
            ..Default::default()
        };
        let mut e = entry();
        e.morning_steps = 1300;
        e.bike_km = 1.0;

        let totals = estimate(&e, &prefs);
        assert_eq!(totals.morning_kcal, 50);
        // cycle speed clamps to 1 km/h: 6 * 1.05 * 100 per km
        assert_eq!(totals.detail.bike_kcal, 630);
        assert!(approx(totals.detail.bike_minutes, 60.0));
    }

    #[test]
    fn test_negative_inputs_never_produce_negative_kcal() {
        let prefs = Preferences::default();
        let mut e = entry();
        e.walk_min_morning = -30.0;
        e.bike_km = -5.0;
        e.bike_min = -10.0;
        let mut set = ResistanceSet::new("X", 2, 5).rest(-100.0);
        set.intensity_met = -3.0;
        e.weight_sessions.push(set);

        let totals = estimate(&e, &prefs);
        assert_eq!(totals.morning_kcal, 0);
        assert_eq!(totals.detail.bike_kcal, 0);
        assert!(totals.evening_kcal > 0);
    }

    #[test]
    fn test_junk_stored_prefs_fall_back_to_defaults() {
        let prefs: Preferences = serde_json::from_value(serde_json::json!({
            "walkMET": null,
            "cycleMET": "abc",
            "dailyTargetSteps": null
        }))
        .unwrap();
        let mut e = entry();
        e.walk_min_morning = 30.0;
        e.bike_min = 60.0;

        let totals = estimate(&e, &prefs);

        assert_eq!(totals.morning_kcal, 173);
        assert_eq!(totals.evening_kcal, 630);
        assert_eq!(prefs.effective_daily_target_steps(), 10_000);
    }

    #[test]
    fn test_huge_durations_saturate() {
        let mut e = entry();
        e.walk_min_morning = 1e12;
        e.walk_min_evening = 1e12;

        let totals = estimate(&e, &Preferences::default());

        assert_eq!(totals.morning_kcal, u32::MAX);
        assert_eq!(totals.total_kcal, u32::MAX);
    }

    #[test]
    fn test_non_positive_body_weight_uses_default() {
        let mut e = entry();
        e.morning_steps = 5000;
        let baseline = estimate(&e, &Preferences::default());

        for weight_kg in [0.0, -70.0] {
            let prefs = Preferences {
                weight_kg,
                ..Default::default()
            };
            assert_eq!(estimate(&e, &prefs), baseline);
        }
        assert_eq!(baseline.morning_kcal, 192);
    }

    #[test]
    fn test_set_without_volume_contributes_nothing() {
        let mut e: DailyEntry = serde_json::from_value(serde_json::json!({
            "date": "2025-03-10",
            "weightSessions": [{ "name": "X" }]
        }))
        .unwrap();
        assert_eq!(e.weight_sessions.len(), 1);

        let totals = estimate(&e, &Preferences::default());
        assert_eq!(totals.detail.weights_minutes, 0.0);
        assert_eq!(totals.detail.weights_met, crate::model::prefs::DEFAULT_WEIGHTS_MET);
        assert_eq!(totals.total_kcal, 0);
        assert_eq!(totals.step_equivalent, 0);

        e.weight_sessions[0].duration_min = Some(-5.0);
        assert_eq!(estimate(&e, &Preferences::default()).detail.weights_minutes, 0.0);
    }

    #[test]
    fn test_negative_explicit_minutes_are_ignored() {
        let mut set = ResistanceSet::new("Row", 3, 10).rest(60.0);
        let derived = set_duration(&set).total();
        set.duration_min = Some(-5.0);
        assert!(approx(set_duration(&set).total(), derived));
    }
}
