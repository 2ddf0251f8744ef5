use std::fs;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use super::CardPersistence;
use crate::vocab::{RawCard, VocabCard};

const CARDS_FILE: &str = "cards.json";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data directory not found")]
    DataDirNotFound,
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// On-disk envelope of the card store
#[derive(Serialize)]
struct StoredCards<'a> {
    words: &'a [VocabCard],
}

/// Card store persisted as a single JSON file
///
/// ```text
/// {data_dir}/
/// └── cards.json   # {"words": [...]}
/// ```
pub struct JsonFileStorage {
    base_path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    /// Get the default data directory
    pub fn default_data_dir() -> Result<PathBuf> {
        dirs::data_local_dir()
            .map(|p| p.join("cidian"))
            .ok_or(StorageError::DataDirNotFound)
    }

    /// Initialize storage directories
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path)?;
        Ok(())
    }

    pub fn cards_path(&self) -> PathBuf {
        self.base_path.join(CARDS_FILE)
    }

    /// True once a store file has been written
    pub fn exists(&self) -> bool {
        self.cards_path().exists()
    }

    /// Read raw records, failing on IO or a malformed document
    pub fn read_records(&self) -> Result<Vec<RawCard>> {
        let path = self.cards_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&path)?;
        let value: serde_json::Value = serde_json::from_str(&content)?;
        Ok(decode_records(value).unwrap_or_else(|| {
            log::warn!("{:?} has no card list, treating as empty", path);
            Vec::new()
        }))
    }

    /// Write all cards, replacing the previous file
    pub fn write_cards(&self, cards: &[VocabCard]) -> Result<()> {
        self.init()?;

        let content = serde_json::to_string_pretty(&StoredCards { words: cards })?;
        let path = self.cards_path();
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &path)?;

        log::debug!("Saved {} cards to {:?}", cards.len(), path);
        Ok(())
    }
}

impl CardPersistence for JsonFileStorage {
    fn load_all(&self) -> Vec<RawCard> {
        match self.read_records() {
            Ok(records) => records,
            Err(e) => {
                log::warn!("Failed to load cards from {:?}: {}", self.cards_path(), e);
                Vec::new()
            }
        }
    }

    fn save_all(&self, cards: &[VocabCard]) -> Result<()> {
        self.write_cards(cards)
    }
}

/// Pull card records out of a JSON document.
///
/// Accepts `{"words": [...]}` or a bare array. Each element is decoded on its
/// own so one malformed record does not discard the rest. Returns `None` when
/// the document holds no record list at all.
pub fn decode_records(value: serde_json::Value) -> Option<Vec<RawCard>> {
    let items = match value {
        serde_json::Value::Array(items) => items,
        serde_json::Value::Object(mut map) => match map.remove("words") {
            Some(serde_json::Value::Array(items)) => items,
            _ => return None,
        },
        _ => return None,
    };

    let records = items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value::<RawCard>(item) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping malformed card record #{}: {}", i, e);
                None
            }
        })
        .collect();

    Some(records)
}
