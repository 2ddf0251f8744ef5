//! Data models for vocabulary cards

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::clock::{Clock, IdGenerator};

/// Lowest ease factor any card may reach
pub const MIN_EASE: f64 = 1.3;
/// Highest ease factor any card may reach
pub const MAX_EASE: f64 = 3.0;
/// Ease factor given to new and repaired cards
pub const DEFAULT_EASE: f64 = 2.5;

/// Spaced repetition state embedded in every card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingState {
    /// Current interval in days
    pub interval: u32,
    /// Multiplicative growth factor, always within [1.3, 3.0]
    pub ease: f64,
    /// When the card becomes eligible for review
    pub due: DateTime<Utc>,
    /// Number of completed reviews
    pub reps: u32,
}

impl SchedulingState {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            interval: 0,
            ease: DEFAULT_EASE,
            due: now,
            reps: 0,
        }
    }

    /// Check if the card is due at the given instant
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.due <= now
    }
}

/// A vocabulary entry with its scheduling state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabCard {
    pub id: String,
    pub hanzi: String,
    #[serde(default)]
    pub pinyin: String,
    pub meaning: String,
    #[serde(default)]
    pub part_of_speech: String,
    #[serde(default)]
    pub example: String,
    #[serde(default)]
    pub chapter: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub srs: SchedulingState,
}

impl VocabCard {
    pub fn new(id: String, hanzi: String, meaning: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            hanzi,
            pinyin: String::new(),
            meaning,
            part_of_speech: String::new(),
            example: String::new(),
            chapter: String::new(),
            created_at: now,
            updated_at: now,
            srs: SchedulingState::new(now),
        }
    }

    /// Copy the content fields of a validated draft onto this card
    pub fn apply_draft(&mut self, draft: &CardDraft) {
        self.hanzi = draft.hanzi.trim().to_string();
        self.meaning = draft.meaning.trim().to_string();
        self.pinyin = draft.pinyin.trim().to_string();
        self.part_of_speech = draft.part_of_speech.trim().to_string();
        self.example = draft.example.trim().to_string();
        self.chapter = draft.chapter.trim().to_string();
    }

    /// Mark the card as changed at `now`, keeping `updated_at >= created_at`
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now.max(self.created_at);
    }
}

/// Form payload used to create or edit a card
#[derive(Debug, Clone, Default)]
pub struct CardDraft {
    /// Existing card to overwrite; `None` creates a new card
    pub id: Option<String>,
    pub hanzi: String,
    pub pinyin: String,
    pub meaning: String,
    pub part_of_speech: String,
    pub example: String,
    pub chapter: String,
}

impl CardDraft {
    pub fn new(hanzi: impl Into<String>, meaning: impl Into<String>) -> Self {
        Self {
            hanzi: hanzi.into(),
            meaning: meaning.into(),
            ..Default::default()
        }
    }

    /// Start a draft from an existing card so individual fields can be edited
    pub fn from_card(card: &VocabCard) -> Self {
        Self {
            id: Some(card.id.clone()),
            hanzi: card.hanzi.clone(),
            pinyin: card.pinyin.clone(),
            meaning: card.meaning.clone(),
            part_of_speech: card.part_of_speech.clone(),
            example: card.example.clone(),
            chapter: card.chapter.clone(),
        }
    }

    /// Returns a description of the first missing required field
    pub fn validate(&self) -> Result<(), String> {
        if self.hanzi.trim().is_empty() {
            return Err("hanzi is required".to_string());
        }
        if self.meaning.trim().is_empty() {
            return Err("meaning is required".to_string());
        }
        Ok(())
    }
}

/// Self-reported recall quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    /// Failed recall
    Again,
    /// Recalled with some effort
    Good,
    /// Recalled confidently
    Easy,
}

impl Grade {
    pub const ALL: [Grade; 3] = [Grade::Again, Grade::Good, Grade::Easy];

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Again => "again",
            Grade::Good => "good",
            Grade::Easy => "easy",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "again" | "1" => Ok(Grade::Again),
            "good" | "2" => Ok(Grade::Good),
            "easy" | "3" => Ok(Grade::Easy),
            other => Err(format!("unknown grade '{}' (expected again, good or easy)", other)),
        }
    }
}

/// Counts over a card collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_cards: usize,
    pub due_cards: usize,
    /// Never reviewed
    pub new_cards: usize,
    /// Reviewed, but last recall failed
    pub learning_cards: usize,
    /// On a day-based interval
    pub review_cards: usize,
}

impl ReviewStats {
    pub fn collect(cards: &[VocabCard], now: DateTime<Utc>) -> Self {
        let mut stats = Self {
            total_cards: cards.len(),
            ..Default::default()
        };

        for card in cards {
            if card.srs.is_due(now) {
                stats.due_cards += 1;
            }
            match (card.srs.reps, card.srs.interval) {
                (0, _) => stats.new_cards += 1,
                (_, 0) => stats.learning_cards += 1,
                _ => stats.review_cards += 1,
            }
        }

        stats
    }
}

/// Scheduling fields as they appear in stored or imported data
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSchedulingState {
    #[serde(default)]
    pub interval: Option<f64>,
    #[serde(default)]
    pub ease: Option<f64>,
    #[serde(default)]
    pub due: Option<String>,
    #[serde(default)]
    pub reps: Option<f64>,
}

/// A card record before normalisation; every field may be absent.
///
/// Scheduling fields are accepted either nested under `srs` or flat on the
/// record, the nested values taking precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCard {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub hanzi: Option<String>,
    #[serde(default)]
    pub pinyin: Option<String>,
    #[serde(default)]
    pub meaning: Option<String>,
    #[serde(default, alias = "pos")]
    pub part_of_speech: Option<String>,
    #[serde(default)]
    pub example: Option<String>,
    #[serde(default)]
    pub chapter: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub srs: Option<RawSchedulingState>,
    #[serde(default)]
    pub interval: Option<f64>,
    #[serde(default)]
    pub ease: Option<f64>,
    #[serde(default)]
    pub due: Option<String>,
    #[serde(default)]
    pub reps: Option<f64>,
}

impl RawCard {
    /// True when both required text fields are present and non-blank
    pub fn is_well_formed(&self) -> bool {
        let filled = |v: &Option<String>| v.as_deref().map_or(false, |s| !s.trim().is_empty());
        filled(&self.hanzi) && filled(&self.meaning)
    }
}

impl From<&VocabCard> for RawCard {
    fn from(card: &VocabCard) -> Self {
        Self {
            id: Some(card.id.clone()),
            hanzi: Some(card.hanzi.clone()),
            pinyin: Some(card.pinyin.clone()),
            meaning: Some(card.meaning.clone()),
            part_of_speech: Some(card.part_of_speech.clone()),
            example: Some(card.example.clone()),
            chapter: Some(card.chapter.clone()),
            created_at: Some(card.created_at.to_rfc3339()),
            updated_at: Some(card.updated_at.to_rfc3339()),
            srs: Some(RawSchedulingState {
                interval: Some(f64::from(card.srs.interval)),
                ease: Some(card.srs.ease),
                due: Some(card.srs.due.to_rfc3339()),
                reps: Some(f64::from(card.srs.reps)),
            }),
            interval: None,
            ease: None,
            due: None,
            reps: None,
        }
    }
}

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC)
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn whole_count(value: Option<f64>) -> u32 {
    match value {
        Some(v) if v.is_finite() && v > 0.0 => v.round().min(f64::from(u32::MAX)) as u32,
        _ => 0,
    }
}

/// Turn any ingested record into a fully-populated card.
///
/// Applied at every ingestion boundary (load, import, merge). Optional text
/// fields default to empty strings, missing scheduling state gets the default
/// state due `now`, and ease is clamped into [1.3, 3.0]. Required fields are
/// not validated here; callers drop records failing [`RawCard::is_well_formed`].
pub fn normalize(raw: RawCard, clock: &dyn Clock, ids: &dyn IdGenerator) -> VocabCard {
    let now = clock.now();
    let srs = raw.srs.unwrap_or_default();

    let created_at = raw
        .created_at
        .as_deref()
        .and_then(parse_timestamp)
        .or_else(|| raw.updated_at.as_deref().and_then(parse_timestamp))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
    let updated_at = raw
        .updated_at
        .as_deref()
        .and_then(parse_timestamp)
        .unwrap_or(created_at)
        .max(created_at);

    let ease = match srs.ease.or(raw.ease) {
        Some(e) if e.is_finite() => e.clamp(MIN_EASE, MAX_EASE),
        _ => DEFAULT_EASE,
    };
    let due = srs
        .due
        .or(raw.due)
        .as_deref()
        .and_then(parse_timestamp)
        .unwrap_or(now);

    let id = raw
        .id
        .map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| ids.new_id());

    VocabCard {
        id,
        hanzi: raw.hanzi.unwrap_or_default(),
        pinyin: raw.pinyin.unwrap_or_default(),
        meaning: raw.meaning.unwrap_or_default(),
        part_of_speech: raw.part_of_speech.unwrap_or_default(),
        example: raw.example.unwrap_or_default(),
        chapter: raw.chapter.unwrap_or_default(),
        created_at,
        updated_at,
        srs: SchedulingState {
            interval: whole_count(srs.interval.or(raw.interval)),
            ease,
            due,
            reps: whole_count(srs.reps.or(raw.reps)),
        },
    }
}
