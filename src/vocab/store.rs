//! The card store: single owner of the card collection
//!
//! Every mutation goes through a method here and is followed by a save
//! through the [`CardPersistence`] collaborator.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::algorithm::apply_grade;
use super::clock::{Clock, IdGenerator, SystemClock, UuidGenerator};
use super::deck::{build_deck, list_cards, DeckFilters, SortOrder};
use super::merge::{merge, merge_with_summary, MergeSummary};
use super::models::{normalize, CardDraft, Grade, RawCard, ReviewStats, VocabCard};
use crate::storage::{CardPersistence, StorageError};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Invalid card: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

pub struct CardStore {
    cards: Vec<VocabCard>,
    persistence: Box<dyn CardPersistence>,
    clock: Box<dyn Clock>,
    ids: Box<dyn IdGenerator>,
}

impl CardStore {
    /// Load the store through `persistence`, repairing records as needed
    pub fn open(
        persistence: Box<dyn CardPersistence>,
        clock: Box<dyn Clock>,
        ids: Box<dyn IdGenerator>,
    ) -> Self {
        let raw = persistence.load_all();
        let cards = ingest(raw, clock.as_ref(), ids.as_ref());
        log::info!("Loaded {} cards", cards.len());

        Self {
            cards,
            persistence,
            clock,
            ids,
        }
    }

    /// Open with the wall clock and random ids
    pub fn open_default(persistence: Box<dyn CardPersistence>) -> Self {
        Self::open(persistence, Box::new(SystemClock), Box::new(UuidGenerator))
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn cards(&self) -> &[VocabCard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&VocabCard> {
        self.cards.iter().find(|c| c.id == id)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.cards.iter().position(|c| c.id == id)
    }

    /// Save `next` and adopt it as the collection only if the save succeeds.
    ///
    /// Mutations build the new collection on a copy, so a failed save leaves
    /// the store exactly as it was.
    fn commit(&mut self, next: Vec<VocabCard>) -> Result<()> {
        self.persistence.save_all(&next).map_err(|e| {
            log::error!("Failed to save cards: {}", e);
            StoreError::from(e)
        })?;
        self.cards = next;
        Ok(())
    }

    // ==================== Card Operations ====================

    /// Create a card, or overwrite the content of the card with the draft's id.
    ///
    /// Scheduling state and `created_at` survive edits; `updated_at` moves to now.
    pub fn upsert(&mut self, draft: CardDraft) -> Result<VocabCard> {
        draft.validate().map_err(StoreError::Validation)?;
        let now = self.clock.now();

        let id = draft
            .id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string);

        let mut next = self.cards.clone();
        let card = match id.as_deref().and_then(|id| self.position(id)) {
            Some(i) => {
                let existing = &mut next[i];
                existing.apply_draft(&draft);
                existing.touch(now);
                existing.clone()
            }
            None => {
                let id = id.unwrap_or_else(|| self.ids.new_id());
                let mut card = VocabCard::new(id, String::new(), String::new(), now);
                card.apply_draft(&draft);
                next.push(card.clone());
                card
            }
        };

        self.commit(next)?;
        Ok(card)
    }

    /// Delete a card; returns whether it existed
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let Some(i) = self.position(id) else {
            return Ok(false);
        };
        let mut next = self.cards.clone();
        next.remove(i);
        self.commit(next)?;
        Ok(true)
    }

    /// Remove every card; returns how many were removed
    pub fn clear(&mut self) -> Result<usize> {
        let count = self.cards.len();
        self.commit(Vec::new())?;
        log::info!("Cleared {} cards", count);
        Ok(count)
    }

    /// Make a card due now without touching its interval or ease
    pub fn reset_due(&mut self, id: &str) -> Result<Option<VocabCard>> {
        let Some(i) = self.position(id) else {
            return Ok(None);
        };
        let now = self.clock.now();

        let mut next = self.cards.clone();
        let card = &mut next[i];
        card.srs.due = now;
        card.touch(now);
        let card = card.clone();

        self.commit(next)?;
        Ok(Some(card))
    }

    // ==================== Review Operations ====================

    /// Apply a grade to the card with `id`. Absent ids are a no-op.
    ///
    /// On a failed save the card keeps its previous schedule.
    pub fn grade(&mut self, id: &str, grade: Grade) -> Result<Option<VocabCard>> {
        let Some(i) = self.position(id) else {
            return Ok(None);
        };
        let now = self.clock.now();

        let mut next = self.cards.clone();
        apply_grade(&mut next[i], grade, now);
        let card = next[i].clone();

        self.commit(next)?;
        log::debug!(
            "Graded {} as {}: interval {}d, ease {:.2}",
            card.id,
            grade,
            card.srs.interval,
            card.srs.ease
        );
        Ok(Some(card))
    }

    /// Cards for a review session, most overdue first
    pub fn build_deck(&self, filters: &DeckFilters, due_only: bool) -> Vec<VocabCard> {
        build_deck(&self.cards, filters, due_only, self.clock.now())
    }

    /// Cards for a table view
    pub fn list(&self, filters: &DeckFilters, sort: SortOrder) -> Vec<VocabCard> {
        list_cards(&self.cards, filters, sort)
    }

    pub fn stats(&self) -> ReviewStats {
        ReviewStats::collect(&self.cards, self.clock.now())
    }

    // ==================== Bulk Operations ====================

    /// Normalise imported records and merge them into the store.
    ///
    /// Records missing `hanzi` or `meaning` are dropped first.
    pub fn merge_records(&mut self, records: Vec<RawCard>) -> Result<MergeSummary> {
        let incoming = ingest(records, self.clock.as_ref(), self.ids.as_ref());
        let (merged, summary) = merge_with_summary(self.cards.clone(), incoming);
        self.commit(merged)?;

        log::info!(
            "Merged cards: {} added, {} replaced, {} kept",
            summary.added,
            summary.replaced,
            summary.kept
        );
        Ok(summary)
    }

    /// Add the two starter words when the store is empty
    pub fn seed_examples(&mut self) -> Result<usize> {
        if !self.cards.is_empty() {
            return Ok(0);
        }

        let drafts = [
            CardDraft {
                pinyin: "xuéxí".into(),
                part_of_speech: "verb".into(),
                example: "我每天学习中文。".into(),
                ..CardDraft::new("学习", "to study")
            },
            CardDraft {
                pinyin: "kāfēi".into(),
                part_of_speech: "noun".into(),
                example: "咖啡很好喝。".into(),
                ..CardDraft::new("咖啡", "coffee")
            },
        ];

        let now = self.clock.now();
        let seeds: Vec<VocabCard> = drafts
            .iter()
            .map(|draft| {
                let mut card = VocabCard::new(self.ids.new_id(), String::new(), String::new(), now);
                card.apply_draft(draft);
                card
            })
            .collect();

        let count = seeds.len();
        self.commit(seeds)?;
        Ok(count)
    }
}

/// Drop records lacking required fields, then normalise the rest.
///
/// Duplicate ids collapse to the most recently updated version.
fn ingest(records: Vec<RawCard>, clock: &dyn Clock, ids: &dyn IdGenerator) -> Vec<VocabCard> {
    let total = records.len();
    let cards: Vec<VocabCard> = records
        .into_iter()
        .filter(RawCard::is_well_formed)
        .map(|raw| normalize(raw, clock, ids))
        .collect();

    let skipped = total - cards.len();
    if skipped > 0 {
        log::warn!("Skipped {} records missing hanzi or meaning", skipped);
    }

    merge(Vec::new(), cards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::vocab::clock::{ManualClock, SequentialIds};
    use crate::vocab::models::{parse_timestamp, RawSchedulingState, DEFAULT_EASE};
    use chrono::Duration;

    fn start() -> DateTime<Utc> {
        parse_timestamp("2024-01-15T09:00:00Z").unwrap()
    }

    fn create_test_store(records: Vec<RawCard>) -> (CardStore, MemoryStorage, ManualClock) {
        let storage = MemoryStorage::with_records(records);
        let clock = ManualClock::new(start());
        let store = CardStore::open(
            Box::new(storage.clone()),
            Box::new(clock.clone()),
            Box::new(SequentialIds::new("card")),
        );
        (store, storage, clock)
    }

    fn raw(id: &str, hanzi: &str, meaning: &str) -> RawCard {
        RawCard {
            id: Some(id.into()),
            hanzi: Some(hanzi.into()),
            meaning: Some(meaning.into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_upsert_new_card_gets_default_state() {
        let (mut store, storage, _clock) = create_test_store(Vec::new());

        let card = store.upsert(CardDraft::new("学习", "to study")).unwrap();

        assert_eq!(card.id, "card-1");
        assert_eq!(card.srs.interval, 0);
        assert_eq!(card.srs.ease, DEFAULT_EASE);
        assert_eq!(card.srs.reps, 0);
        assert_eq!(card.srs.due, start());
        assert_eq!(card.created_at, start());
        assert_eq!(card.updated_at, start());
        assert_eq!(storage.saved().unwrap().len(), 1);
    }

    #[test]
    fn test_upsert_trims_and_validates() {
        let (mut store, storage, _clock) = create_test_store(Vec::new());

        let card = store
            .upsert(CardDraft {
                pinyin: " chá ".into(),
                ..CardDraft::new(" 茶 ", " tea ")
            })
            .unwrap();
        assert_eq!(card.hanzi, "茶");
        assert_eq!(card.pinyin, "chá");
        assert_eq!(card.meaning, "tea");

        let err = store.upsert(CardDraft::new("", "tea")).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.len(), 1);
        assert_eq!(storage.save_count(), 1);
    }

    #[test]
    fn test_upsert_existing_keeps_schedule_and_creation() {
        let (mut store, _storage, clock) = create_test_store(Vec::new());
        let card = store.upsert(CardDraft::new("学习", "to study")).unwrap();
        store.grade(&card.id, Grade::Easy).unwrap();

        clock.advance(Duration::hours(5));
        let mut draft = CardDraft::from_card(store.get(&card.id).unwrap());
        draft.meaning = "to learn".into();
        draft.chapter = "Lesson 2".into();
        let edited = store.upsert(draft).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(edited.meaning, "to learn");
        assert_eq!(edited.chapter, "Lesson 2");
        assert_eq!(edited.srs.interval, 3);
        assert_eq!(edited.created_at, start());
        assert_eq!(edited.updated_at, start() + Duration::hours(5));
    }

    #[test]
    fn test_upsert_with_unknown_id_creates_it() {
        let (mut store, _storage, _clock) = create_test_store(Vec::new());

        let card = store
            .upsert(CardDraft {
                id: Some("custom".into()),
                ..CardDraft::new("水", "water")
            })
            .unwrap();

        assert_eq!(card.id, "custom");
        assert!(store.get("custom").is_some());
    }

    #[test]
    fn test_grade_twice_good() {
        let (mut store, storage, _clock) = create_test_store(Vec::new());
        let card = store.upsert(CardDraft::new("学习", "to study")).unwrap();

        let first = store.grade(&card.id, Grade::Good).unwrap().unwrap();
        let second = store.grade(&card.id, Grade::Good).unwrap().unwrap();

        assert_eq!(first.srs.interval, 1);
        assert_eq!(second.srs.interval, 3);
        assert_eq!(second.srs.reps, 2);
        assert_eq!(second.srs.due, start() + Duration::days(3));
        assert_eq!(storage.saved().unwrap()[0].srs.interval, 3);
    }

    #[test]
    fn test_grade_absent_card_is_noop() {
        let (mut store, storage, _clock) = create_test_store(Vec::new());

        assert!(store.grade("missing", Grade::Easy).unwrap().is_none());
        assert_eq!(storage.save_count(), 0);
    }

    #[test]
    fn test_reset_due() {
        let (mut store, _storage, clock) = create_test_store(Vec::new());
        let card = store.upsert(CardDraft::new("学习", "to study")).unwrap();
        store.grade(&card.id, Grade::Easy).unwrap();

        clock.advance(Duration::hours(1));
        let reset = store.reset_due(&card.id).unwrap().unwrap();

        assert_eq!(reset.srs.due, start() + Duration::hours(1));
        assert_eq!(reset.srs.interval, 3);
        assert_eq!(reset.updated_at, start() + Duration::hours(1));
        assert!(store.reset_due("missing").unwrap().is_none());
    }

    #[test]
    fn test_delete_and_clear() {
        let (mut store, storage, _clock) = create_test_store(vec![
            raw("a", "一", "one"),
            raw("b", "二", "two"),
            raw("c", "三", "three"),
        ]);

        assert!(store.delete("b").unwrap());
        assert!(!store.delete("b").unwrap());
        assert_eq!(store.len(), 2);

        assert_eq!(store.clear().unwrap(), 2);
        assert!(store.is_empty());
        assert_eq!(storage.saved().unwrap().len(), 0);
    }

    #[test]
    fn test_open_repairs_and_skips_records() {
        let mut missing_state = raw("a", "一", "one");
        missing_state.srs = None;
        let mut partial_state = raw("b", "二", "two");
        partial_state.srs = Some(RawSchedulingState {
            interval: Some(4.0),
            ..Default::default()
        });
        let no_meaning = RawCard {
            meaning: None,
            ..raw("c", "三", "three")
        };

        let (store, _storage, _clock) = create_test_store(vec![missing_state, partial_state, no_meaning]);

        assert_eq!(store.len(), 2);
        let a = store.get("a").unwrap();
        assert_eq!(a.srs.ease, DEFAULT_EASE);
        assert_eq!(a.srs.due, start());
        let b = store.get("b").unwrap();
        assert_eq!(b.srs.interval, 4);
        assert_eq!(b.srs.reps, 0);
        assert!(store.get("c").is_none());
    }

    #[test]
    fn test_merge_records() {
        let mut base = raw("a", "一", "one");
        base.updated_at = Some("2024-01-01".into());
        let (mut store, storage, _clock) = create_test_store(vec![base]);

        let mut newer = raw("a", "一", "uno");
        newer.updated_at = Some("2024-06-01".into());
        let fresh = RawCard {
            id: None,
            ..raw("", "二", "two")
        };
        let invalid = RawCard {
            hanzi: None,
            ..raw("z", "", "nothing")
        };

        let summary = store.merge_records(vec![newer, fresh, invalid]).unwrap();

        assert_eq!(summary, MergeSummary { added: 1, replaced: 1, kept: 0 });
        assert_eq!(store.get("a").unwrap().meaning, "uno");
        assert!(store.get("card-1").is_some());
        assert_eq!(storage.saved().unwrap().len(), 2);
    }

    #[test]
    fn test_build_deck_uses_store_clock() {
        let (mut store, _storage, clock) = create_test_store(Vec::new());
        let a = store.upsert(CardDraft::new("一", "one")).unwrap();
        let b = store.upsert(CardDraft::new("二", "two")).unwrap();
        store.grade(&a.id, Grade::Good).unwrap();

        let deck = store.build_deck(&DeckFilters::default(), true);
        assert_eq!(deck.len(), 1);
        assert_eq!(deck[0].id, b.id);

        clock.advance(Duration::days(1));
        let deck = store.build_deck(&DeckFilters::default(), true);
        assert_eq!(deck.len(), 2);
        assert_eq!(deck[0].id, b.id);
    }

    #[test]
    fn test_seed_examples_only_when_empty() {
        let (mut store, _storage, _clock) = create_test_store(Vec::new());

        assert_eq!(store.seed_examples().unwrap(), 2);
        assert_eq!(store.seed_examples().unwrap(), 0);
        assert_eq!(store.len(), 2);
        assert_eq!(store.cards()[0].hanzi, "学习");
    }

    #[test]
    fn test_save_failure_is_reported() {
        let (mut store, storage, _clock) = create_test_store(Vec::new());
        storage.set_fail_saves(true);

        let err = store.upsert(CardDraft::new("学习", "to study")).unwrap_err();

        assert!(matches!(err, StoreError::Storage(_)));
        assert!(storage.saved().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_failed_save_leaves_card_unchanged() {
        let (mut store, storage, clock) = create_test_store(vec![raw("a", "一", "one"), raw("b", "二", "two")]);
        let before = store.get("a").unwrap().clone();
        storage.set_fail_saves(true);
        clock.advance(Duration::hours(1));

        assert!(store.grade("a", Grade::Good).is_err());
        assert!(store.grade("a", Grade::Good).is_err());
        assert!(store.reset_due("a").is_err());
        assert!(store
            .upsert(CardDraft {
                id: Some("a".into()),
                ..CardDraft::new("一", "uno")
            })
            .is_err());
        assert!(store.delete("b").is_err());
        assert!(store.clear().is_err());
        assert!(store.merge_records(vec![raw("c", "三", "three")]).is_err());

        assert_eq!(store.get("a"), Some(&before));
        assert_eq!(store.len(), 2);

        storage.set_fail_saves(false);
        let graded = store.grade("a", Grade::Good).unwrap().unwrap();
        assert_eq!(graded.srs.reps, 1);
        assert_eq!(graded.srs.interval, 1);
    }

    #[test]
    fn test_reopen_round_trips_through_storage() {
        let (mut store, storage, clock) = create_test_store(Vec::new());
        let card = store.upsert(CardDraft::new("学习", "to study")).unwrap();
        store.grade(&card.id, Grade::Easy).unwrap();

        let reopened = CardStore::open(
            Box::new(storage.clone()),
            Box::new(clock.clone()),
            Box::new(SequentialIds::new("other")),
        );

        assert_eq!(reopened.cards(), store.cards());
    }
}
