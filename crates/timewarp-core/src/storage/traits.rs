//! The boundary between the core and whatever holds the cards.
//!
//! The core never caches: every preview or commit goes through a fresh
//! [`CardStore::resolve_scope`] and [`CardStore::read_snapshots`].

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::card::{CardId, ItemSnapshot};
use crate::error::DatabaseError;

/// Deck name that matches every card regardless of deck.
pub const ALL_DECKS: &str = "All";

/// Deck + tag selection of cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeFilter {
    pub deck: String,
    pub tags: BTreeSet<String>,
}

impl Default for ScopeFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl ScopeFilter {
    pub fn all() -> Self {
        Self {
            deck: ALL_DECKS.to_string(),
            tags: BTreeSet::new(),
        }
    }

    pub fn deck(name: impl Into<String>) -> Self {
        Self {
            deck: name.into(),
            tags: BTreeSet::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(
            tags.into_iter()
                .map(Into::into)
                .map(|t: String| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        );
        self
    }

    pub fn is_all_decks(&self) -> bool {
        self.deck.eq_ignore_ascii_case(ALL_DECKS)
    }

    /// Deck names match case-insensitively and include subdecks (`Parent::Child`).
    pub fn matches_deck(&self, deck_name: &str) -> bool {
        if self.is_all_decks() {
            return true;
        }
        let want = self.deck.to_lowercase();
        let have = deck_name.to_lowercase();
        have == want || have.starts_with(&format!("{want}::"))
    }

    /// A card matches when it carries every requested tag.
    pub fn matches_tags(&self, card_tags: &[String]) -> bool {
        self.tags.iter().all(|want| {
            card_tags
                .iter()
                .any(|have| have.eq_ignore_ascii_case(want))
        })
    }
}

/// Read/write access to the card collection.
///
/// Writes are all-or-nothing per call; partial application is the store's
/// concern, never the caller's.
pub trait CardStore {
    /// Ids of every card matching the filter.
    fn resolve_scope(&self, filter: &ScopeFilter) -> Result<Vec<CardId>, DatabaseError>;

    /// Current scheduling state of the given cards, in no particular order.
    fn read_snapshots(&self, ids: &[CardId]) -> Result<Vec<ItemSnapshot>, DatabaseError>;

    fn write_due_dates(&mut self, pairs: &[(CardId, NaiveDate)]) -> Result<(), DatabaseError>;

    /// Put cards back into the new queue, dropping their review position.
    fn set_state_new(&mut self, ids: &[CardId]) -> Result<(), DatabaseError>;

    /// Randomly permute the new-queue order of the given cards.
    fn shuffle_order(&mut self, ids: &[CardId], seed: u64) -> Result<(), DatabaseError>;

    /// Gather cards into a filtered deck, creating or rebuilding it. Returns the deck id.
    fn create_filtered_deck(&mut self, name: &str, ids: &[CardId]) -> Result<i64, DatabaseError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn all_matches_any_deck() {
        let f = ScopeFilter::all();
        assert!(f.matches_deck("Japanese"));
        assert!(f.matches_deck(""));
        assert!(ScopeFilter::deck("all").is_all_decks());
    }

    #[test]
    fn deck_match_includes_subdecks() {
        let f = ScopeFilter::deck("Languages");
        assert!(f.matches_deck("Languages"));
        assert!(f.matches_deck("languages::Spanish"));
        assert!(!f.matches_deck("Languages2"));
        assert!(!f.matches_deck("Math"));
    }

    #[test]
    fn every_tag_must_be_present() {
        let f = ScopeFilter::all().with_tags(["verb", "N5"]);
        assert!(f.matches_tags(&tags(&["n5", "verb", "kanji"])));
        assert!(!f.matches_tags(&tags(&["verb"])));
        assert!(ScopeFilter::all().matches_tags(&[]));
    }

    #[test]
    fn blank_tags_are_ignored() {
        let f = ScopeFilter::all().with_tags(["  ", "x "]);
        assert_eq!(f.tags.len(), 1);
        assert!(f.tags.contains("x"));
    }
}
