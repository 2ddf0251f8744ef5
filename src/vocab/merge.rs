//! Reconcile two card collections by id, newest edit wins
//!
//! Incoming cards must already be normalised: the signature only admits
//! fully-shaped [`VocabCard`]s, so scheduling state and chapter are always
//! present when timestamps are compared.

use std::collections::HashMap;

use serde::Serialize;

use super::models::VocabCard;

/// What a merge did to the base collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeSummary {
    /// Incoming cards with ids not present in the base
    pub added: usize,
    /// Base cards replaced by a strictly newer incoming version
    pub replaced: usize,
    /// Incoming cards ignored because the base version was as new or newer
    pub kept: usize,
}

enum Outcome {
    Added,
    Replaced,
    Kept,
}

/// Merge `incoming` into `base`.
///
/// For a shared id the version with the strictly later `updated_at` wins;
/// ties keep the base version. The result order is not part of the contract.
pub fn merge(base: Vec<VocabCard>, incoming: Vec<VocabCard>) -> Vec<VocabCard> {
    merge_with_summary(base, incoming).0
}

/// [`merge`], also reporting how many cards were added, replaced or kept
pub fn merge_with_summary(
    base: Vec<VocabCard>,
    incoming: Vec<VocabCard>,
) -> (Vec<VocabCard>, MergeSummary) {
    let capacity = base.len() + incoming.len();
    let mut index: HashMap<String, usize> = HashMap::with_capacity(capacity);
    let mut merged: Vec<VocabCard> = Vec::with_capacity(capacity);

    // A base holding the same id twice collapses under the same rule
    for card in base {
        reconcile(&mut merged, &mut index, card);
    }

    let mut summary = MergeSummary::default();
    for card in incoming {
        match reconcile(&mut merged, &mut index, card) {
            Outcome::Added => summary.added += 1,
            Outcome::Replaced => summary.replaced += 1,
            Outcome::Kept => summary.kept += 1,
        }
    }

    (merged, summary)
}

fn reconcile(
    merged: &mut Vec<VocabCard>,
    index: &mut HashMap<String, usize>,
    card: VocabCard,
) -> Outcome {
    match index.get(&card.id) {
        Some(&pos) if card.updated_at > merged[pos].updated_at => {
            merged[pos] = card;
            Outcome::Replaced
        }
        Some(_) => Outcome::Kept,
        None => {
            index.insert(card.id.clone(), merged.len());
            merged.push(card);
            Outcome::Added
        }
    }
}
