//! Vocabulary cards and spaced repetition
//!
//! This module provides:
//! - Card models and the single normalisation path for ingested records
//! - The ease/interval scheduler
//! - Deck building, filtering and table listing
//! - Merge reconciliation for imports
//! - The review session state machine
//! - The card store that owns the collection

pub mod algorithm;
pub mod clock;
pub mod deck;
pub mod merge;
pub mod models;
pub mod session;
pub mod store;

pub use clock::{Clock, IdGenerator, ManualClock, SequentialIds, SystemClock, UuidGenerator};
pub use deck::{DeckFilters, SortOrder};
pub use merge::MergeSummary;
pub use models::*;
pub use session::{DisplayMode, ReviewSession, SessionState};
pub use store::{CardStore, StoreError};
