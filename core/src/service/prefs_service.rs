use crate::model::prefs::{Preferences, PreferencesPatch};
use crate::repository::PrefsRepository;
use crate::service::calibration::Calibration;
use anyhow::Result;
use tracing::{debug, info};

pub const PREFS_KEY: &str = "calc_prefs";

pub struct PrefsService<R: PrefsRepository> {
    repo: R,
}

impl<R: PrefsRepository> PrefsService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Stored preferences merged over the defaults. Nothing is written.
    pub fn load(&self) -> Result<Preferences> {
        self.repo.get_pref(PREFS_KEY, Preferences::default())
    }

    pub fn save(&self, patch: &PreferencesPatch) -> Result<Preferences> {
        let mut prefs = self.load()?;
        patch.apply(&mut prefs);
        self.repo.put_pref(PREFS_KEY, &prefs)?;
        debug!(?patch, "preferences updated");
        Ok(prefs)
    }

    pub fn reset(&self) -> Result<Preferences> {
        let prefs = Preferences::default();
        self.repo.put_pref(PREFS_KEY, &prefs)?;
        Ok(prefs)
    }

    pub fn apply_calibration(&self, calibration: &Calibration) -> Result<Preferences> {
        let prefs = self.save(&calibration.patch())?;
        info!(
            steps_per_km = prefs.steps_per_km,
            device_bias = prefs.device_bias,
            "calibration applied"
        );
        Ok(prefs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::testing::MemoryPrefsRepo;
    use serde_json::json;

    #[test]
    fn test_load_defaults_without_writing() {
        let service = PrefsService::new(MemoryPrefsRepo::default());
        assert_eq!(service.load().unwrap(), Preferences::default());
        assert!(service.repo.values.borrow().is_empty());
    }

    #[test]
    fn test_partial_record_merges_with_defaults() {
        let repo = MemoryPrefsRepo::default();
        repo.values
            .borrow_mut()
            .insert(PREFS_KEY.to_string(), json!({ "weightKg": 72.5 }));
        let service = PrefsService::new(repo);

        let prefs = service.load().unwrap();
        assert_eq!(prefs.weight_kg, 72.5);
        assert_eq!(prefs.steps_per_km, 1300.0);
    }

    #[test]
    fn test_save_merges_patch() {
        let service = PrefsService::new(MemoryPrefsRepo::default());
        service
            .save(&PreferencesPatch {
                weight_kg: Some(90.0),
                ..Default::default()
            })
            .unwrap();
        let prefs = service
            .save(&PreferencesPatch {
                daily_target_steps: Some(12_000),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(prefs.weight_kg, 90.0);
        assert_eq!(prefs.daily_target_steps, 12_000);
        assert_eq!(service.load().unwrap(), prefs);
    }
}
