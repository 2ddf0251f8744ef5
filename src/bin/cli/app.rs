use std::path::Path;

use anyhow::{bail, Context, Result};

use cidian_lib::config::AppConfig;
use cidian_lib::storage::JsonFileStorage;
use cidian_lib::vocab::{CardStore, DeckFilters, VocabCard};

/// Shared application state for CLI commands
pub struct App {
    pub config: AppConfig,
    pub store: CardStore,
}

impl App {
    /// Load the config and open the card store.
    ///
    /// The demo words are added only on first run, so a cleared store stays empty.
    pub fn new(data_dir: Option<&Path>) -> Result<Self> {
        let config = AppConfig::load();
        let data_dir = config
            .resolve_data_dir(data_dir)
            .context("Failed to get data directory")?;

        let storage = JsonFileStorage::new(data_dir);
        storage.init().context("Failed to initialize card storage")?;
        let first_run = !storage.exists();

        let mut store = CardStore::open_default(Box::new(storage));
        if first_run && config.seed_examples {
            store.seed_examples().context("Failed to add example cards")?;
        }

        Ok(Self { config, store })
    }

    /// Find a card by id (exact match, then unique prefix)
    pub fn find_card(&self, id: &str) -> Result<VocabCard> {
        let id = id.trim();
        if let Some(card) = self.store.get(id) {
            return Ok(card.clone());
        }

        let matches: Vec<&VocabCard> = self.store.cards().iter()
            .filter(|c| c.id.starts_with(id))
            .collect();

        match matches.len() {
            0 => bail!("No card with id '{}'", id),
            1 => Ok(matches[0].clone()),
            _ => bail!("Ambiguous card id '{}'. Matches:\n{}", id,
                matches.iter().map(|c| format!("  - {} {}", short_id(&c.id), c.hanzi)).collect::<Vec<_>>().join("\n")),
        }
    }

    pub fn filters(query: Option<String>, pos: Option<String>, chapter: Option<String>) -> DeckFilters {
        DeckFilters {
            query: query.unwrap_or_default(),
            part_of_speech: pos,
            chapter,
        }
    }
}

/// First eight characters of an id, for tables and prompts
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}
