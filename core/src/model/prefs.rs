use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::model::lenient;

pub const DEFAULT_WEIGHT_KG: f64 = 100.0;
pub const DEFAULT_STEPS_PER_KM: f64 = 1300.0;
pub const DEFAULT_WALK_MET: f64 = 3.3;
pub const DEFAULT_CYCLE_MET: f64 = 6.0;
pub const DEFAULT_CYCLE_SPEED: f64 = 17.0;
pub const DEFAULT_WEIGHTS_MET: f64 = 4.5;
pub const DEFAULT_DAILY_TARGET_STEPS: u32 = 10_000;

/// How the day's resistance-training MET is chosen.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum WeightsMetPolicy {
    /// Duration-weighted mean of each exercise's intensity.
    #[default]
    DurationWeighted,
    /// Duration-weighted mean, then floored at 6 for sessions of 20+ minutes
    /// and capped at 4.5 for sessions of 10 minutes or less.
    Adaptive,
}

impl FromStr for WeightsMetPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "weighted" | "durationweighted" | "duration-weighted" => {
                Ok(WeightsMetPolicy::DurationWeighted)
            }
            "adaptive" => Ok(WeightsMetPolicy::Adaptive),
            other => Err(anyhow!("Unknown weights MET policy: '{}'", other)),
        }
    }
}

impl fmt::Display for WeightsMetPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeightsMetPolicy::DurationWeighted => write!(f, "weighted"),
            WeightsMetPolicy::Adaptive => write!(f, "adaptive"),
        }
    }
}

fn default_policy<'de, D>(deserializer: D) -> std::result::Result<WeightsMetPolicy, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default())
}

/// User-wide calculation settings. Stored values are merged over the
/// defaults, so a record missing a field reads as the default for it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    #[serde(deserialize_with = "lenient::number")]
    pub weight_kg: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub steps_per_km: f64,
    #[serde(rename = "walkMET", deserialize_with = "lenient::number")]
    pub walk_met: f64,
    #[serde(rename = "cycleMET", deserialize_with = "lenient::number")]
    pub cycle_met: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub cycle_speed: f64,
    #[serde(rename = "weightsMET", deserialize_with = "lenient::number")]
    pub weights_met: f64,
    #[serde(deserialize_with = "lenient::flag")]
    pub use_device_bias: bool,
    #[serde(deserialize_with = "lenient::number")]
    pub device_bias: f64,
    #[serde(deserialize_with = "lenient::count")]
    pub daily_target_steps: u32,
    #[serde(rename = "weightsMETPolicy", deserialize_with = "default_policy")]
    pub weights_met_policy: WeightsMetPolicy,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            weight_kg: DEFAULT_WEIGHT_KG,
            steps_per_km: DEFAULT_STEPS_PER_KM,
            walk_met: DEFAULT_WALK_MET,
            cycle_met: DEFAULT_CYCLE_MET,
            cycle_speed: DEFAULT_CYCLE_SPEED,
            weights_met: DEFAULT_WEIGHTS_MET,
            use_device_bias: false,
            device_bias: 1.0,
            daily_target_steps: DEFAULT_DAILY_TARGET_STEPS,
            weights_met_policy: WeightsMetPolicy::default(),
        }
    }
}

impl Preferences {
    // A stored value that is missing, unparseable or not positive reads as
    // the default, so one bad field can never zero out a calorie total.
    // Cycle speed is the exception: it only has a 1 km/h floor.

    pub fn effective_weight_kg(&self) -> f64 {
        positive_or(self.weight_kg, DEFAULT_WEIGHT_KG)
    }

    pub fn effective_steps_per_km(&self) -> f64 {
        positive_or(self.steps_per_km, DEFAULT_STEPS_PER_KM)
    }

    /// Never below 1 km/h.
    pub fn effective_cycle_speed(&self) -> f64 {
        if self.cycle_speed.is_finite() {
            self.cycle_speed.max(1.0)
        } else {
            DEFAULT_CYCLE_SPEED
        }
    }

    pub fn effective_walk_met(&self) -> f64 {
        positive_or(self.walk_met, DEFAULT_WALK_MET)
    }

    pub fn effective_cycle_met(&self) -> f64 {
        positive_or(self.cycle_met, DEFAULT_CYCLE_MET)
    }

    pub fn effective_weights_met(&self) -> f64 {
        positive_or(self.weights_met, DEFAULT_WEIGHTS_MET)
    }

    pub fn effective_daily_target_steps(&self) -> u32 {
        if self.daily_target_steps > 0 {
            self.daily_target_steps
        } else {
            DEFAULT_DAILY_TARGET_STEPS
        }
    }

    /// Multiplier for display-only device-aligned calories, if enabled.
    pub fn device_multiplier(&self) -> Option<f64> {
        if self.use_device_bias && self.device_bias > 0.0 {
            Some(self.device_bias)
        } else {
            None
        }
    }
}

fn positive_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps_per_km: Option<f64>,
    #[serde(rename = "walkMET", skip_serializing_if = "Option::is_none")]
    pub walk_met: Option<f64>,
    #[serde(rename = "cycleMET", skip_serializing_if = "Option::is_none")]
    pub cycle_met: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_speed: Option<f64>,
    #[serde(rename = "weightsMET", skip_serializing_if = "Option::is_none")]
    pub weights_met: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_device_bias: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_bias: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_target_steps: Option<u32>,
    #[serde(rename = "weightsMETPolicy", skip_serializing_if = "Option::is_none")]
    pub weights_met_policy: Option<WeightsMetPolicy>,
}

impl PreferencesPatch {
    pub fn is_empty(&self) -> bool {
        *self == PreferencesPatch::default()
    }

    pub fn apply(&self, prefs: &mut Preferences) {
        if let Some(v) = self.weight_kg {
            prefs.weight_kg = v;
        }
        if let Some(v) = self.steps_per_km {
            prefs.steps_per_km = v;
        }
        if let Some(v) = self.walk_met {
            prefs.walk_met = v;
        }
        if let Some(v) = self.cycle_met {
            prefs.cycle_met = v;
        }
        if let Some(v) = self.cycle_speed {
            prefs.cycle_speed = v;
        }
        if let Some(v) = self.weights_met {
            prefs.weights_met = v;
        }
        if let Some(v) = self.use_device_bias {
            prefs.use_device_bias = v;
        }
        if let Some(v) = self.device_bias {
            prefs.device_bias = v;
        }
        if let Some(v) = self.daily_target_steps {
            prefs.daily_target_steps = v;
        }
        if let Some(v) = self.weights_met_policy {
            prefs.weights_met_policy = v;
        }
    }
}
