//! Derives stride density and device bias from one measured walk.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::model::prefs::{Preferences, PreferencesPatch};
use crate::service::estimator::kcal_from_met;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationInput {
    pub distance_km: f64,
    pub steps: u32,
    pub duration_min: f64,
    /// Calories the user's tracker reported for the same walk.
    pub device_kcal: Option<f64>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Calibration {
    pub steps_per_km: u32,
    pub kcal_met: u32,
    pub device_bias: Option<f64>,
}

impl Calibration {
    pub fn patch(&self) -> PreferencesPatch {
        PreferencesPatch {
            steps_per_km: Some(self.steps_per_km as f64),
            device_bias: self.device_bias,
            ..Default::default()
        }
    }
}

pub fn calibrate(input: &CalibrationInput, prefs: &Preferences) -> Result<Calibration> {
    if input.distance_km <= 0.0 || input.steps == 0 || input.duration_min <= 0.0 {
        return Err(anyhow!(
            "Calibration needs a positive distance, step count and duration"
        ));
    }

    let steps_per_km = (input.steps as f64 / input.distance_km).round() as u32;
    let kcal_met = kcal_from_met(
        prefs.effective_walk_met(),
        prefs.effective_weight_kg(),
        input.duration_min,
    );

    let device_bias = match input.device_kcal {
        Some(device) if device > 0.0 && kcal_met > 0.0 => {
            Some((device / kcal_met * 1000.0).round() / 1000.0)
        }
        _ => None,
    };

    Ok(Calibration {
        steps_per_km,
        kcal_met: kcal_met.round() as u32,
        device_bias,
    })
}
