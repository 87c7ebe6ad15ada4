//! Writing a transformed set back to the collection.
//!
//! The adapter only decides which cards each write touches; atomicity of each
//! write is the store's job. Failures are reported as [`CoreError::Commit`] and
//! the core never retries.

use serde::{Deserialize, Serialize};

use crate::card::{CardId, CardState};
use crate::error::{CoreError, Result};
use crate::storage::{CardStore, ExportConfig, ExportMode};
use crate::warp::TransformedItem;

/// What to do with a transformed set on commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitOptions {
    pub mode: ExportMode,
    pub filtered_deck_name: String,
    pub shuffle_new: bool,
    pub set_new: bool,
    pub shuffle_seed: Option<u64>,
}

impl Default for CommitOptions {
    fn default() -> Self {
        ExportConfig::default().into()
    }
}

impl From<ExportConfig> for CommitOptions {
    fn from(cfg: ExportConfig) -> Self {
        Self {
            mode: cfg.mode,
            filtered_deck_name: cfg.filtered_deck_name,
            shuffle_new: cfg.shuffle_new,
            set_new: cfg.set_new,
            shuffle_seed: cfg.shuffle_seed,
        }
    }
}

/// Counts of what a commit touched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReport {
    pub due_dates_written: usize,
    pub filtered_deck: Option<String>,
    pub filtered_cards: usize,
    pub shuffled: usize,
    pub reset_to_new: usize,
}

fn commit_err(err: crate::error::DatabaseError) -> CoreError {
    CoreError::Commit(err)
}

/// Write each transformed card's new due date.
///
/// New and suspended cards are skipped since the transform leaves them alone.
/// Re-applying the same set leaves the store unchanged.
///
/// # Errors
/// Returns [`CoreError::Commit`] if the store rejects the write.
pub fn commit<S: CardStore + ?Sized>(store: &mut S, transformed: &[TransformedItem]) -> Result<usize> {
    let pairs: Vec<(CardId, chrono::NaiveDate)> = transformed
        .iter()
        .filter(|i| i.state.is_warpable())
        .map(|i| (i.id, i.due))
        .collect();
    if pairs.is_empty() {
        return Ok(0);
    }
    store.write_due_dates(&pairs).map_err(commit_err)?;
    Ok(pairs.len())
}

/// Randomize the order of the set's new cards. Returns how many were shuffled.
///
/// # Errors
/// Returns [`CoreError::Commit`] if the store rejects the write.
pub fn shuffle_new<S: CardStore + ?Sized>(
    store: &mut S,
    transformed: &[TransformedItem],
    seed: u64,
) -> Result<usize> {
    let ids: Vec<CardId> = transformed
        .iter()
        .filter(|i| i.state == CardState::New)
        .map(|i| i.id)
        .collect();
    if ids.len() < 2 {
        return Ok(ids.len());
    }
    store.shuffle_order(&ids, seed).map_err(commit_err)?;
    Ok(ids.len())
}

/// Force every card in the set back to new.
///
/// # Errors
/// Returns [`CoreError::Commit`] if the store rejects the write.
pub fn reset_to_new<S: CardStore + ?Sized>(
    store: &mut S,
    transformed: &[TransformedItem],
) -> Result<usize> {
    let ids: Vec<CardId> = transformed.iter().map(|i| i.id).collect();
    if ids.is_empty() {
        return Ok(0);
    }
    store.set_state_new(&ids).map_err(commit_err)?;
    Ok(ids.len())
}

/// Run a full export: due dates or filtered deck, then the optional bulk mutations.
///
/// # Errors
/// Stops at the first failing step; earlier steps stay applied.
pub fn apply<S: CardStore + ?Sized>(
    store: &mut S,
    transformed: &[TransformedItem],
    options: &CommitOptions,
) -> Result<CommitReport> {
    let mut report = CommitReport::default();

    match options.mode {
        ExportMode::WriteInPlace => {
            report.due_dates_written = commit(store, transformed)?;
        }
        ExportMode::FilteredDeck => {
            let ids: Vec<CardId> = transformed.iter().map(|i| i.id).collect();
            store
                .create_filtered_deck(&options.filtered_deck_name, &ids)
                .map_err(commit_err)?;
            report.filtered_deck = Some(options.filtered_deck_name.clone());
            report.filtered_cards = ids.len();
        }
    }

    if options.shuffle_new {
        let seed = options.shuffle_seed.unwrap_or_else(rand::random);
        report.shuffled = shuffle_new(store, transformed, seed)?;
    }
    if options.set_new {
        report.reset_to_new = reset_to_new(store, transformed)?;
    }

    tracing::info!(
        mode = %options.mode,
        due_dates = report.due_dates_written,
        filtered = report.filtered_cards,
        shuffled = report.shuffled,
        reset = report.reset_to_new,
        "committed time warp"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DatabaseError;
    use crate::preview::Preview;
    use crate::storage::{Collection, NewCard, ScopeFilter};
    use crate::warp::TransformParameters;
    use chrono::{Duration, NaiveDate};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 4, 10).unwrap()
    }

    fn collection() -> Collection {
        let col = Collection::open_memory().unwrap();
        let cards = [
            (CardState::Review, -6, 5),
            (CardState::Learning, 2, 1),
            (CardState::New, 0, 0),
            (CardState::New, 0, 0),
            (CardState::New, 0, 0),
            (CardState::Suspended, 8, 40),
        ];
        for (state, offset, interval) in cards {
            col.add_card(&NewCard {
                deck: "Deck".into(),
                state,
                due: today() + Duration::days(offset),
                interval,
                tags: vec![],
            })
            .unwrap();
        }
        col
    }

    fn warped(col: &Collection, params: TransformParameters) -> Vec<TransformedItem> {
        Preview::run(col, &ScopeFilter::all(), params, today())
            .unwrap()
            .items
    }

    #[test]
    fn commit_writes_only_warpable_cards() {
        let mut col = collection();
        let items = warped(&col, TransformParameters::default().with_shift(3));
        assert_eq!(commit(&mut col, &items).unwrap(), 2);

        let after = col.list_cards(&ScopeFilter::all()).unwrap();
        assert_eq!(after[0].due, today() + Duration::days(-3));
        assert_eq!(after[1].due, today() + Duration::days(5));
        assert_eq!(after[2].due, today());
        assert_eq!(after[5].due, today() + Duration::days(8));
    }

    #[test]
    fn commit_is_idempotent() {
        let mut col = collection();
        let items = warped(&col, TransformParameters::default().with_stretch(50));
        commit(&mut col, &items).unwrap();
        let once = col.list_cards(&ScopeFilter::all()).unwrap();
        commit(&mut col, &items).unwrap();
        assert_eq!(col.list_cards(&ScopeFilter::all()).unwrap(), once);
    }

    #[test]
    fn failed_write_is_a_commit_error() {
        let mut col = collection();
        let mut items = warped(&col, TransformParameters::default().with_shift(1));
        items[0].id = CardId(4242);
        let err = commit(&mut col, &items).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Commit(DatabaseError::NotFound { id: 4242, .. })
        ));
        // The other card was not written either.
        assert_eq!(col.card(CardId(2)).unwrap().due, today() + Duration::days(2));
    }

    #[test]
    fn shuffle_selects_new_cards_only() {
        let mut col = collection();
        let items = warped(&col, TransformParameters::default());
        assert_eq!(shuffle_new(&mut col, &items, 3).unwrap(), 3);

        let after = col.list_cards(&ScopeFilter::all()).unwrap();
        let mut new_positions: Vec<i64> = after[2..5].iter().map(|c| c.position).collect();
        new_positions.sort_unstable();
        assert_eq!(new_positions, vec![2, 3, 4]);
        assert_eq!(after[0].position, 0);
        assert_eq!(after[5].position, 5);
    }

    #[test]
    fn reset_to_new_covers_whole_set() {
        let mut col = collection();
        let items = warped(&col, TransformParameters::default());
        assert_eq!(reset_to_new(&mut col, &items).unwrap(), 6);
        assert!(col
            .list_cards(&ScopeFilter::all())
            .unwrap()
            .iter()
            .all(|c| c.state == CardState::New && c.interval == 0));
    }

    #[test]
    fn apply_write_mode_with_bulk_mutations() {
        let mut col = collection();
        let items = warped(&col, TransformParameters::default().with_collapse_overdue(true));
        let options = CommitOptions {
            shuffle_new: true,
            set_new: true,
            shuffle_seed: Some(1),
            ..CommitOptions::default()
        };
        let report = apply(&mut col, &items, &options).unwrap();
        assert_eq!(report.due_dates_written, 2);
        assert_eq!(report.shuffled, 3);
        assert_eq!(report.reset_to_new, 6);
        assert_eq!(report.filtered_deck, None);
        assert_eq!(col.card(CardId(1)).unwrap().due, today());
    }

    #[test]
    fn apply_filtered_mode_leaves_due_dates() {
        let mut col = collection();
        let items = warped(&col, TransformParameters::default().with_shift(10));
        let options = CommitOptions {
            mode: ExportMode::FilteredDeck,
            ..CommitOptions::default()
        };
        let report = apply(&mut col, &items, &options).unwrap();
        assert_eq!(report.filtered_deck.as_deref(), Some("TimeWarpFiltered"));
        assert_eq!(report.filtered_cards, 6);
        assert_eq!(report.due_dates_written, 0);

        let first = col.card(CardId(1)).unwrap();
        assert_eq!(first.deck, "TimeWarpFiltered");
        assert_eq!(first.due, today() + Duration::days(-6));
    }

    #[test]
    fn empty_set_commits_nothing() {
        let mut col = collection();
        let report = apply(&mut col, &[], &CommitOptions::default()).unwrap();
        assert_eq!(report, CommitReport::default());
    }
}
