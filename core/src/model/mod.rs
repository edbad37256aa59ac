pub mod entry;
pub mod lenient;
pub mod preset;
pub mod prefs;
pub mod totals;
