//! Deck building and table listing
//!
//! Both share the same conjunctive filters. A deck is always ordered by due
//! date, most overdue first; the table listing has its own sort orders.

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::models::VocabCard;

/// Conjunctive filters applied before building a deck or listing cards
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckFilters {
    /// Case-insensitive substring over hanzi, pinyin and meaning
    #[serde(default)]
    pub query: String,
    /// Exact part-of-speech match
    #[serde(default)]
    pub part_of_speech: Option<String>,
    /// Exact chapter match
    #[serde(default)]
    pub chapter: Option<String>,
}

impl DeckFilters {
    pub fn matches(&self, card: &VocabCard) -> bool {
        if let Some(pos) = self.part_of_speech.as_deref() {
            if card.part_of_speech != pos {
                return false;
            }
        }
        if let Some(chapter) = self.chapter.as_deref() {
            if card.chapter != chapter {
                return false;
            }
        }

        let query = self.query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        [&card.hanzi, &card.pinyin, &card.meaning]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

/// Select and order the cards for a review session.
///
/// Returns a snapshot sorted ascending by due date. With `due_only`, cards
/// due after `now` are left out. An empty result means nothing to review.
pub fn build_deck(
    cards: &[VocabCard],
    filters: &DeckFilters,
    due_only: bool,
    now: DateTime<Utc>,
) -> Vec<VocabCard> {
    let mut deck: Vec<VocabCard> = cards
        .iter()
        .filter(|card| filters.matches(card))
        .filter(|card| !due_only || card.srs.is_due(now))
        .cloned()
        .collect();

    // Stable sort keeps insertion order among cards due at the same instant
    deck.sort_by(|a, b| a.srs.due.cmp(&b.srs.due));
    deck
}

/// Table sort order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Most recently changed first
    #[default]
    Recent,
    /// By character form
    Hanzi,
    /// Earliest due first
    Priority,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "recent" => Ok(SortOrder::Recent),
            "hanzi" => Ok(SortOrder::Hanzi),
            "priority" | "due" => Ok(SortOrder::Priority),
            other => Err(format!("unknown sort order '{}'", other)),
        }
    }
}

/// Filter and sort cards for display
pub fn list_cards(cards: &[VocabCard], filters: &DeckFilters, sort: SortOrder) -> Vec<VocabCard> {
    let mut list: Vec<VocabCard> = cards
        .iter()
        .filter(|card| filters.matches(card))
        .cloned()
        .collect();

    match sort {
        SortOrder::Recent => list.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        SortOrder::Hanzi => list.sort_by(|a, b| a.hanzi.cmp(&b.hanzi)),
        SortOrder::Priority => list.sort_by(|a, b| a.srs.due.cmp(&b.srs.due)),
    }

    list
}

/// Distinct non-empty parts of speech, sorted
pub fn parts_of_speech(cards: &[VocabCard]) -> Vec<String> {
    distinct(cards.iter().map(|c| c.part_of_speech.as_str()))
}

/// Distinct non-empty chapters, sorted
pub fn chapters(cards: &[VocabCard]) -> Vec<String> {
    distinct(cards.iter().map(|c| c.chapter.as_str()))
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::models::parse_timestamp;
    use chrono::Duration;

    fn now() -> DateTime<Utc> {
        parse_timestamp("2024-06-01T12:00:00Z").unwrap()
    }

    fn card(id: &str, hanzi: &str, pinyin: &str, meaning: &str, due_in_days: i64) -> VocabCard {
        let mut card = VocabCard::new(id.into(), hanzi.into(), meaning.into(), now());
        card.pinyin = pinyin.into();
        card.srs.due = now() + Duration::days(due_in_days);
        card
    }

    fn sample() -> Vec<VocabCard> {
        let mut study = card("a", "学习", "xuéxí", "to study", -1);
        study.part_of_speech = "verb".into();
        study.chapter = "1".into();
        let mut coffee = card("b", "咖啡", "kāfēi", "Coffee", 2);
        coffee.part_of_speech = "noun".into();
        coffee.chapter = "1".into();
        let mut tea = card("c", "茶", "chá", "tea", -5);
        tea.part_of_speech = "noun".into();
        tea.chapter = "2".into();
        vec![study, coffee, tea]
    }

    fn ids(cards: &[VocabCard]) -> Vec<&str> {
        cards.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_deck_sorted_by_due() {
        let deck = build_deck(&sample(), &DeckFilters::default(), false, now());
        assert_eq!(ids(&deck), ["c", "a", "b"]);
    }

    #[test]
    fn test_due_only_excludes_future_cards() {
        let deck = build_deck(&sample(), &DeckFilters::default(), true, now());

        assert_eq!(ids(&deck), ["c", "a"]);
        assert!(deck.iter().all(|c| c.srs.due <= now()));
    }

    #[test]
    fn test_card_due_exactly_now_is_included() {
        let cards = vec![card("x", "水", "shuǐ", "water", 0)];
        let deck = build_deck(&cards, &DeckFilters::default(), true, now());
        assert_eq!(deck.len(), 1);
    }

    #[test]
    fn test_query_is_case_insensitive_over_three_fields() {
        let mut filters = DeckFilters {
            query: "  COFFEE ".into(),
            ..Default::default()
        };
        assert_eq!(ids(&build_deck(&sample(), &filters, false, now())), ["b"]);

        filters.query = "xué".into();
        assert_eq!(ids(&build_deck(&sample(), &filters, false, now())), ["a"]);

        filters.query = "茶".into();
        assert_eq!(ids(&build_deck(&sample(), &filters, false, now())), ["c"]);
    }

    #[test]
    fn test_filters_are_conjunctive() {
        let filters = DeckFilters {
            query: String::new(),
            part_of_speech: Some("noun".into()),
            chapter: Some("1".into()),
        };
        assert_eq!(ids(&build_deck(&sample(), &filters, false, now())), ["b"]);

        let filters = DeckFilters {
            part_of_speech: Some("noun".into()),
            ..Default::default()
        };
        assert_eq!(ids(&build_deck(&sample(), &filters, true, now())), ["c"]);
    }

    #[test]
    fn test_empty_deck() {
        let filters = DeckFilters {
            query: "nothing matches".into(),
            ..Default::default()
        };
        assert!(build_deck(&sample(), &filters, false, now()).is_empty());
        assert!(build_deck(&[], &DeckFilters::default(), true, now()).is_empty());
    }

    #[test]
    fn test_list_sort_orders() {
        let mut cards = sample();
        cards[1].updated_at = now() + Duration::hours(1);

        assert_eq!(ids(&list_cards(&cards, &DeckFilters::default(), SortOrder::Recent))[0], "b");
        assert_eq!(
            ids(&list_cards(&cards, &DeckFilters::default(), SortOrder::Priority)),
            ["c", "a", "b"]
        );
        // Code-point order: 咖 (U+5496) < 学 (U+5B66) < 茶 (U+8336)
        assert_eq!(
            ids(&list_cards(&cards, &DeckFilters::default(), SortOrder::Hanzi)),
            ["b", "a", "c"]
        );
    }

    #[test]
    fn test_distinct_tags() {
        let cards = sample();
        assert_eq!(parts_of_speech(&cards), ["noun", "verb"]);
        assert_eq!(chapters(&cards), ["1", "2"]);
    }

    #[test]
    fn test_sort_order_from_str() {
        assert_eq!("Priority".parse::<SortOrder>().unwrap(), SortOrder::Priority);
        assert!("alphabetical".parse::<SortOrder>().is_err());
    }
}
