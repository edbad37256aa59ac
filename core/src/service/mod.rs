pub mod aggregator;
pub mod calibration;
pub mod dto;
pub mod entry_service;
pub mod estimator;
pub mod prefs_service;
