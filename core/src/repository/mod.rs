pub mod entry_file;
pub mod prefs_file;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

// Re-export
pub use entry_file::FileEntryRepository;
pub use prefs_file::FilePrefsRepository;
pub use traits::{EntryRepository, PrefsRepository};
