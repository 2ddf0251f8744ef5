//! Persistence collaborator for the card store

mod file_storage;
mod memory;

pub use file_storage::{decode_records, JsonFileStorage, StorageError};
pub use memory::MemoryStorage;

use crate::vocab::{RawCard, VocabCard};

/// Loads and saves the whole card collection.
///
/// Loading never fails: absent or unreadable data comes back as an empty
/// collection. Records are returned raw and normalised by the caller.
pub trait CardPersistence {
    fn load_all(&self) -> Vec<RawCard>;

    fn save_all(&self, cards: &[VocabCard]) -> Result<(), StorageError>;
}
