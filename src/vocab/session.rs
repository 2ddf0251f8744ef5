//! Review session: walks a fixed deck, one card face at a time

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::deck::DeckFilters;
use super::models::{Grade, VocabCard};
use super::store::{CardStore, Result};

/// Which attribute is shown on the front of a card
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    /// Character on the front, meaning on the back
    #[default]
    HanziToMeaning,
    /// Meaning on the front, character on the back
    MeaningToHanzi,
}

impl DisplayMode {
    pub fn front<'a>(&self, card: &'a VocabCard) -> &'a str {
        match self {
            DisplayMode::HanziToMeaning => &card.hanzi,
            DisplayMode::MeaningToHanzi => &card.meaning,
        }
    }

    /// The attribute hidden until the card is flipped
    pub fn answer<'a>(&self, card: &'a VocabCard) -> &'a str {
        match self {
            DisplayMode::HanziToMeaning => &card.meaning,
            DisplayMode::MeaningToHanzi => &card.hanzi,
        }
    }

    pub fn reversed(&self) -> Self {
        match self {
            DisplayMode::HanziToMeaning => DisplayMode::MeaningToHanzi,
            DisplayMode::MeaningToHanzi => DisplayMode::HanziToMeaning,
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayMode::HanziToMeaning => f.write_str("hanzi-to-meaning"),
            DisplayMode::MeaningToHanzi => f.write_str("meaning-to-hanzi"),
        }
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hanzi-to-meaning" | "hanzi" => Ok(DisplayMode::HanziToMeaning),
            "meaning-to-hanzi" | "meaning" => Ok(DisplayMode::MeaningToHanzi),
            other => Err(format!("unknown display mode '{}'", other)),
        }
    }
}

/// Where the session is within its deck
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Deck has no cards
    Empty,
    /// Front of the card at the index is showing
    ShowingFront(usize),
    /// Back of the card at the index is showing
    ShowingBack(usize),
}

/// A review pass over a deck snapshot.
///
/// The deck is fixed for the lifetime of the session; rebuilding it starts a
/// new session. Graded cards are refreshed in the snapshot so the back face
/// shows the new schedule.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    deck: Vec<VocabCard>,
    state: SessionState,
    mode: DisplayMode,
}

impl ReviewSession {
    pub fn new(deck: Vec<VocabCard>, mode: DisplayMode) -> Self {
        let state = if deck.is_empty() {
            SessionState::Empty
        } else {
            SessionState::ShowingFront(0)
        };
        Self { deck, state, mode }
    }

    /// Build a deck from the store and start at its first card
    pub fn build(store: &CardStore, filters: &DeckFilters, due_only: bool, mode: DisplayMode) -> Self {
        Self::new(store.build_deck(filters, due_only), mode)
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Switch the presented direction; does not move the cursor
    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
    }

    pub fn deck(&self) -> &[VocabCard] {
        &self.deck
    }

    pub fn len(&self) -> usize {
        self.deck.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }

    pub fn index(&self) -> Option<usize> {
        match self.state {
            SessionState::Empty => None,
            SessionState::ShowingFront(i) | SessionState::ShowingBack(i) => Some(i),
        }
    }

    pub fn current(&self) -> Option<&VocabCard> {
        self.index().and_then(|i| self.deck.get(i))
    }

    pub fn is_showing_back(&self) -> bool {
        matches!(self.state, SessionState::ShowingBack(_))
    }

    /// Advance with wraparound, showing the front
    pub fn next(&mut self) {
        if let Some(i) = self.index() {
            self.state = SessionState::ShowingFront((i + 1) % self.deck.len());
        }
    }

    /// Step back with wraparound, showing the front
    pub fn previous(&mut self) {
        if let Some(i) = self.index() {
            let len = self.deck.len();
            self.state = SessionState::ShowingFront((i + len - 1) % len);
        }
    }

    /// Toggle between front and back
    pub fn flip(&mut self) {
        self.state = match self.state {
            SessionState::Empty => SessionState::Empty,
            SessionState::ShowingFront(i) => SessionState::ShowingBack(i),
            SessionState::ShowingBack(i) => SessionState::ShowingFront(i),
        };
    }

    /// Grade the current card through the store, then move to the next card.
    ///
    /// No-op on an empty session. If the card has been removed from the store
    /// since the deck was built, the cursor still advances. If the store fails
    /// to save, neither the card nor the cursor changes and the grade can be
    /// retried.
    pub fn grade(&mut self, store: &mut CardStore, grade: Grade) -> Result<Option<VocabCard>> {
        let Some(i) = self.index() else {
            return Ok(None);
        };

        let graded = store.grade(&self.deck[i].id, grade)?;
        if let Some(card) = &graded {
            self.deck[i] = card.clone();
        }
        self.next();
        Ok(graded)
    }
}
