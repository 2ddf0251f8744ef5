use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::file_storage::Result;
use super::{CardPersistence, StorageError};
use crate::vocab::{RawCard, VocabCard};

/// Keeps the last saved collection in memory.
///
/// Clones share state, so a caller can hand one clone to a store and inspect
/// what was saved through another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    initial: Rc<RefCell<Vec<RawCard>>>,
    saved: Rc<RefCell<Option<Vec<VocabCard>>>>,
    save_count: Rc<Cell<usize>>,
    fail_saves: Rc<Cell<bool>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose first load returns these records
    pub fn with_records(records: Vec<RawCard>) -> Self {
        let storage = Self::default();
        *storage.initial.borrow_mut() = records;
        storage
    }

    /// Cards from the most recent successful save
    pub fn saved(&self) -> Option<Vec<VocabCard>> {
        self.saved.borrow().clone()
    }

    pub fn save_count(&self) -> usize {
        self.save_count.get()
    }

    /// Make subsequent saves fail with an IO error
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.set(fail);
    }
}

impl CardPersistence for MemoryStorage {
    fn load_all(&self) -> Vec<RawCard> {
        match self.saved.borrow().as_ref() {
            Some(cards) => cards.iter().map(RawCard::from).collect(),
            None => self.initial.borrow().clone(),
        }
    }

    fn save_all(&self, cards: &[VocabCard]) -> Result<()> {
        if self.fail_saves.get() {
            return Err(StorageError::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "save disabled",
            )));
        }
        *self.saved.borrow_mut() = Some(cards.to_vec());
        self.save_count.set(self.save_count.get() + 1);
        Ok(())
    }
}
