//! Personal Chinese vocabulary flashcards with spaced repetition

pub mod config;
pub mod interchange;
pub mod storage;
pub mod vocab;

pub use config::AppConfig;
pub use storage::{CardPersistence, JsonFileStorage};
pub use vocab::{CardStore, ReviewSession};
