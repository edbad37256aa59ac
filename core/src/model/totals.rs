use serde::{Deserialize, Serialize};

use crate::model::entry::EveningMode;
use crate::model::prefs::Preferences;

/// Per-source breakdown behind a [`DayTotals`]. Kcal figures are rounded
/// individually, so they need not add up exactly to the bucket totals.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TotalsDetail {
    pub walk_morning_kcal: u32,
    pub walk_evening_kcal: u32,
    pub bike_kcal: u32,
    pub weights_kcal: u32,
    pub weights_minutes: f64,
    pub bike_minutes: f64,
    pub weights_met: f64,
    /// Real pedometer steps, morning + evening.
    pub steps: u32,
    pub bike_km: f64,
    pub resistance_sets: usize,
    pub evening_mode: EveningMode,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DayTotals {
    pub morning_kcal: u32,
    pub evening_kcal: u32,
    pub total_kcal: u32,
    pub step_equivalent: u32,
    pub detail: TotalsDetail,
}

impl DayTotals {
    pub fn hits_target(&self, target_steps: u32) -> bool {
        self.step_equivalent >= target_steps
    }

    /// Calories scaled by the calibrated device bias, when the user enabled it.
    /// Display only: the unbiased totals stay authoritative.
    pub fn device_kcal(&self, prefs: &Preferences) -> Option<u32> {
        prefs
            .device_multiplier()
            .map(|bias| (self.total_kcal as f64 * bias).round() as u32)
    }
}
