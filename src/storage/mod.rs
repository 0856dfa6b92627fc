pub mod journal;
pub mod persistence;

pub use journal::{Journal, JournalEntry, MAX_JOURNAL_ENTRIES};
pub use persistence::{
    load_from_file, save_to_file, SandboxConfig, Snapshot, Storage, StorageError, StorageStats,
};
