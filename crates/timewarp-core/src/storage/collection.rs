//! SQLite-backed card collection.
//!
//! Implements [`CardStore`] over the schema in [`super::migrations`], plus the
//! helpers the CLI needs to populate and inspect a collection.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;
use rand::prelude::*;
use rand_pcg::Mcg128Xsl64;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use super::data_dir;
use super::migrations;
use super::traits::{CardStore, ScopeFilter};
use crate::card::{CardId, CardState, ItemSnapshot};
use crate::error::{CoreError, DatabaseError};

/// SQLite's default bound-parameter limit is 999; stay well below it.
const ID_CHUNK: usize = 500;

const DUE_FORMAT: &str = "%Y-%m-%d";

/// Convert a stored `ivl` to whole days.
///
/// Negative values are sub-day learning steps in seconds and round up to one day.
pub fn normalize_interval(raw: i64) -> i64 {
    if raw < 0 {
        1
    } else {
        raw
    }
}

/// Card to insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCard {
    pub deck: String,
    #[serde(default)]
    pub state: CardState,
    pub due: NaiveDate,
    /// Stored `ivl`; see [`normalize_interval`].
    #[serde(default)]
    pub interval: i64,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A stored card with its deck and queue data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardRecord {
    pub id: CardId,
    pub deck: String,
    /// Home deck while the card sits in a filtered deck.
    pub original_deck: Option<String>,
    pub state: CardState,
    pub due: NaiveDate,
    pub interval: i64,
    pub position: i64,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckInfo {
    pub id: i64,
    pub name: String,
    pub dynamic: bool,
    pub card_count: u64,
}

/// SQLite card collection.
pub struct Collection {
    conn: Connection,
}

fn parse_due(id: i64, raw: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(raw, DUE_FORMAT)
        .map_err(|e| DatabaseError::QueryFailed(format!("card {id}: bad due date '{raw}': {e}")))
}

fn parse_state(id: i64, raw: &str) -> Result<CardState, DatabaseError> {
    raw.parse::<CardState>()
        .map_err(|e| DatabaseError::QueryFailed(format!("card {id}: {e}")))
}

fn parse_tags(id: i64, raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        tracing::warn!(card = id, error = %e, "unreadable tags column, treating as untagged");
        Vec::new()
    })
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

impl Collection {
    /// Open (or create) the collection at `path`.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_connection(conn)
    }

    /// Open the collection at `~/.config/timewarp/collection.db`.
    ///
    /// # Errors
    /// Returns an error if the data directory or database is unavailable.
    pub fn open_default() -> Result<Self, CoreError> {
        let path = data_dir()?.join("collection.db");
        Ok(Self::open(&path)?)
    }

    /// Open an in-memory collection.
    ///
    /// # Errors
    /// Returns an error if migration fails.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, DatabaseError> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::migrate(&conn).map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    fn deck_id(&self, name: &str) -> Result<Option<(i64, bool)>, DatabaseError> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, dynamic FROM decks WHERE name = ?1",
                params![name],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, bool>(1)?)),
            )
            .optional()?)
    }

    /// Id of the regular deck `name`, creating it if needed.
    ///
    /// # Errors
    /// Fails if `name` is blank or names a filtered deck.
    pub fn ensure_deck(&self, name: &str) -> Result<i64, DatabaseError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DatabaseError::QueryFailed("deck name is empty".into()));
        }
        match self.deck_id(name)? {
            Some((_, true)) => Err(DatabaseError::QueryFailed(format!(
                "'{name}' is a filtered deck"
            ))),
            Some((id, false)) => Ok(id),
            None => {
                self.conn
                    .execute("INSERT INTO decks (name) VALUES (?1)", params![name])?;
                Ok(self.conn.last_insert_rowid())
            }
        }
    }

    fn next_position(&self) -> Result<i64, DatabaseError> {
        Ok(self.conn.query_row(
            "SELECT COALESCE(MAX(position), -1) + 1 FROM cards",
            [],
            |row| row.get(0),
        )?)
    }

    /// Insert a card at the end of the new queue.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn add_card(&self, card: &NewCard) -> Result<CardId, DatabaseError> {
        let deck_id = self.ensure_deck(&card.deck)?;
        let position = self.next_position()?;
        let tags = serde_json::to_string(&card.tags)
            .map_err(|e| DatabaseError::QueryFailed(e.to_string()))?;
        self.conn.execute(
            "INSERT INTO cards (deck_id, state, due, ivl, position, tags)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                deck_id,
                card.state.as_str(),
                card.due.format(DUE_FORMAT).to_string(),
                card.interval,
                position,
                tags,
            ],
        )?;
        Ok(CardId(self.conn.last_insert_rowid()))
    }

    /// Insert many cards in one transaction.
    ///
    /// # Errors
    /// Returns an error if any insert fails; none are kept in that case.
    pub fn import_cards(&mut self, cards: &[NewCard]) -> Result<Vec<CardId>, DatabaseError> {
        let tx = self.conn.unchecked_transaction()?;
        let mut ids = Vec::with_capacity(cards.len());
        for card in cards {
            ids.push(self.add_card(card)?);
        }
        tx.commit()?;
        tracing::info!(count = ids.len(), "imported cards");
        Ok(ids)
    }

    /// Every card matching `filter`, ordered by id.
    ///
    /// # Errors
    /// Returns an error if the query fails or a row is malformed.
    pub fn list_cards(&self, filter: &ScopeFilter) -> Result<Vec<CardRecord>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT c.id, d.name, od.name, c.state, c.due, c.ivl, c.position, c.tags
             FROM cards c
             JOIN decks d ON d.id = c.deck_id
             LEFT JOIN decks od ON od.id = c.original_deck_id
             ORDER BY c.id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, i64>(5)?,
                row.get::<_, i64>(6)?,
                row.get::<_, String>(7)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (id, deck, original_deck, state, due, ivl, position, tags) = row?;
            let tags = parse_tags(id, &tags);
            let deck_ok = filter.matches_deck(&deck)
                || original_deck.as_deref().is_some_and(|d| filter.matches_deck(d));
            if !deck_ok || !filter.matches_tags(&tags) {
                continue;
            }
            records.push(CardRecord {
                id: CardId(id),
                deck,
                original_deck,
                state: parse_state(id, &state)?,
                due: parse_due(id, &due)?,
                interval: ivl,
                position,
                tags,
            });
        }
        Ok(records)
    }

    /// Look up one card.
    ///
    /// # Errors
    /// Returns [`DatabaseError::NotFound`] for unknown ids.
    pub fn card(&self, id: CardId) -> Result<CardRecord, DatabaseError> {
        self.list_cards(&ScopeFilter::all())?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or(DatabaseError::NotFound { kind: "card", id: id.0 })
    }

    /// All decks with their card counts, ordered by name.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn decks(&self) -> Result<Vec<DeckInfo>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT d.id, d.name, d.dynamic, COUNT(c.id)
             FROM decks d
             LEFT JOIN cards c ON c.deck_id = d.id
             GROUP BY d.id
             ORDER BY d.name COLLATE NOCASE",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(DeckInfo {
                id: row.get(0)?,
                name: row.get(1)?,
                dynamic: row.get(2)?,
                card_count: u64::try_from(row.get::<_, i64>(3)?).unwrap_or(0),
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// `"All"` followed by every deck name, the order offered to the user.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn deck_names(&self) -> Result<Vec<String>, DatabaseError> {
        let mut names = vec![super::ALL_DECKS.to_string()];
        names.extend(self.decks()?.into_iter().map(|d| d.name));
        Ok(names)
    }

    /// Every tag in use, sorted and deduplicated case-insensitively.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub fn all_tags(&self) -> Result<Vec<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT id, tags FROM cards")?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?;
        let mut seen: HashMap<String, String> = HashMap::new();
        for row in rows {
            let (id, raw) = row?;
            for tag in parse_tags(id, &raw) {
                seen.entry(tag.to_lowercase()).or_insert(tag);
            }
        }
        let mut tags: Vec<String> = seen.into_values().collect();
        tags.sort_by_key(|t| t.to_lowercase());
        Ok(tags)
    }

    /// Fail with `NotFound` unless every id exists.
    fn require_cards(conn: &Connection, ids: &[CardId]) -> Result<(), DatabaseError> {
        for chunk in ids.chunks(ID_CHUNK) {
            let sql = format!(
                "SELECT id FROM cards WHERE id IN ({})",
                placeholders(chunk.len())
            );
            let mut stmt = conn.prepare(&sql)?;
            let found: Vec<i64> = stmt
                .query_map(params_from_iter(chunk.iter().map(|c| c.0)), |row| row.get(0))?
                .collect::<Result<_, _>>()?;
            if let Some(missing) = chunk.iter().find(|c| !found.contains(&c.0)) {
                return Err(DatabaseError::NotFound {
                    kind: "card",
                    id: missing.0,
                });
            }
        }
        Ok(())
    }

    /// Send every card borrowed by filtered deck `deck_id` back home.
    fn empty_filtered_deck(conn: &Connection, deck_id: i64) -> Result<usize, DatabaseError> {
        Ok(conn.execute(
            "UPDATE cards
             SET deck_id = original_deck_id, original_deck_id = NULL
             WHERE deck_id = ?1 AND original_deck_id IS NOT NULL",
            params![deck_id],
        )?)
    }
}

impl CardStore for Collection {
    fn resolve_scope(&self, filter: &ScopeFilter) -> Result<Vec<CardId>, DatabaseError> {
        let ids: Vec<CardId> = self.list_cards(filter)?.into_iter().map(|c| c.id).collect();
        tracing::debug!(deck = %filter.deck, tags = ?filter.tags, cards = ids.len(), "resolved scope");
        Ok(ids)
    }

    fn read_snapshots(&self, ids: &[CardId]) -> Result<Vec<ItemSnapshot>, DatabaseError> {
        let mut snapshots = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(ID_CHUNK) {
            let sql = format!(
                "SELECT id, state, due, ivl FROM cards WHERE id IN ({})",
                placeholders(chunk.len())
            );
            let mut stmt = self.conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(chunk.iter().map(|c| c.0)), |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, i64>(3)?,
                ))
            })?;
            for row in rows {
                let (id, state, due, ivl) = row?;
                snapshots.push(ItemSnapshot::new(
                    CardId(id),
                    parse_due(id, &due)?,
                    normalize_interval(ivl),
                    parse_state(id, &state)?,
                ));
            }
        }
        if snapshots.len() < ids.len() {
            tracing::warn!(
                requested = ids.len(),
                found = snapshots.len(),
                "some cards vanished between scope resolution and snapshot read"
            );
        }
        Ok(snapshots)
    }

    fn write_due_dates(&mut self, pairs: &[(CardId, NaiveDate)]) -> Result<(), DatabaseError> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare("UPDATE cards SET due = ?2 WHERE id = ?1")?;
            for (id, due) in pairs {
                let changed = stmt.execute(params![id.0, due.format(DUE_FORMAT).to_string()])?;
                if changed == 0 {
                    return Err(DatabaseError::NotFound { kind: "card", id: id.0 });
                }
            }
        }
        tx.commit()?;
        tracing::info!(cards = pairs.len(), "wrote due dates");
        Ok(())
    }

    fn set_state_new(&mut self, ids: &[CardId]) -> Result<(), DatabaseError> {
        let tx = self.conn.transaction()?;
        Self::require_cards(&tx, ids)?;
        let mut position: i64 =
            tx.query_row("SELECT COALESCE(MAX(position), -1) + 1 FROM cards", [], |row| {
                row.get(0)
            })?;
        {
            let mut stmt = tx.prepare(
                "UPDATE cards SET state = 'new', ivl = 0, position = ?2 WHERE id = ?1",
            )?;
            for id in ids {
                stmt.execute(params![id.0, position])?;
                position += 1;
            }
        }
        tx.commit()?;
        tracing::info!(cards = ids.len(), "reset cards to new");
        Ok(())
    }

    fn shuffle_order(&mut self, ids: &[CardId], seed: u64) -> Result<(), DatabaseError> {
        let tx = self.conn.transaction()?;
        Self::require_cards(&tx, ids)?;

        let mut slots: Vec<(i64, i64)> = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(ID_CHUNK) {
            let sql = format!(
                "SELECT id, position FROM cards WHERE id IN ({})",
                placeholders(chunk.len())
            );
            let mut stmt = tx.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(chunk.iter().map(|c| c.0)), |row| {
                Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
            })?;
            for row in rows {
                slots.push(row?);
            }
        }
        slots.sort_by_key(|(id, position)| (*position, *id));

        let positions: Vec<i64> = slots.iter().map(|(_, p)| *p).collect();
        let mut order: Vec<i64> = slots.iter().map(|(id, _)| *id).collect();
        let mut rng = Mcg128Xsl64::seed_from_u64(seed);
        order.shuffle(&mut rng);

        {
            let mut stmt = tx.prepare("UPDATE cards SET position = ?2 WHERE id = ?1")?;
            for (id, position) in order.iter().zip(&positions) {
                stmt.execute(params![id, position])?;
            }
        }
        tx.commit()?;
        tracing::info!(cards = ids.len(), seed, "shuffled new-card order");
        Ok(())
    }

    fn create_filtered_deck(&mut self, name: &str, ids: &[CardId]) -> Result<i64, DatabaseError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DatabaseError::QueryFailed("deck name is empty".into()));
        }
        let existing = self.deck_id(name)?;
        let tx = self.conn.transaction()?;
        Self::require_cards(&tx, ids)?;

        let deck_id = match existing {
            Some((_, false)) => {
                return Err(DatabaseError::QueryFailed(format!(
                    "'{name}' exists and is not a filtered deck"
                )))
            }
            Some((id, true)) => {
                let returned = Self::empty_filtered_deck(&tx, id)?;
                tracing::debug!(deck = name, returned, "emptied filtered deck before rebuild");
                id
            }
            None => {
                tx.execute(
                    "INSERT INTO decks (name, dynamic) VALUES (?1, 1)",
                    params![name],
                )?;
                tx.last_insert_rowid()
            }
        };

        {
            let mut stmt = tx.prepare(
                "UPDATE cards
                 SET original_deck_id = COALESCE(original_deck_id, deck_id), deck_id = ?2
                 WHERE id = ?1",
            )?;
            for id in ids {
                stmt.execute(params![id.0, deck_id])?;
            }
        }
        tx.commit()?;
        tracing::info!(deck = name, cards = ids.len(), "built filtered deck");
        Ok(deck_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(offset: i64) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap() + chrono::Duration::days(offset)
    }

    fn card(deck: &str, state: CardState, due: i64, ivl: i64, tags: &[&str]) -> NewCard {
        NewCard {
            deck: deck.into(),
            state,
            due: day(due),
            interval: ivl,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn seeded() -> (Collection, Vec<CardId>) {
        let mut col = Collection::open_memory().unwrap();
        let ids = col
            .import_cards(&[
                card("Spanish", CardState::Review, -3, 10, &["verbs"]),
                card("Spanish::Vocab", CardState::Learning, 0, -600, &["verbs", "a1"]),
                card("Math", CardState::New, 4, 0, &[]),
                card("Math", CardState::Suspended, 9, 21, &["A1"]),
            ])
            .unwrap();
        (col, ids)
    }

    #[test]
    fn scope_all_returns_every_card() {
        let (col, ids) = seeded();
        assert_eq!(col.resolve_scope(&ScopeFilter::all()).unwrap(), ids);
    }

    #[test]
    fn scope_deck_includes_subdecks() {
        let (col, ids) = seeded();
        let got = col.resolve_scope(&ScopeFilter::deck("spanish")).unwrap();
        assert_eq!(got, vec![ids[0], ids[1]]);
    }

    #[test]
    fn scope_tags_are_conjunctive() {
        let (col, ids) = seeded();
        let got = col
            .resolve_scope(&ScopeFilter::all().with_tags(["verbs", "a1"]))
            .unwrap();
        assert_eq!(got, vec![ids[1]]);
        let got = col.resolve_scope(&ScopeFilter::all().with_tags(["a1"])).unwrap();
        assert_eq!(got, vec![ids[1], ids[3]]);
    }

    #[test]
    fn unknown_deck_resolves_to_nothing() {
        let (col, _) = seeded();
        assert!(col.resolve_scope(&ScopeFilter::deck("French")).unwrap().is_empty());
    }

    #[test]
    fn snapshots_normalize_sub_day_intervals() {
        let (col, ids) = seeded();
        let snaps = col.read_snapshots(&ids).unwrap();
        assert_eq!(snaps.len(), 4);
        let learning = snaps.iter().find(|s| s.id == ids[1]).unwrap();
        assert_eq!(learning.interval, 1);
        assert_eq!(learning.state, CardState::Learning);
        let review = snaps.iter().find(|s| s.id == ids[0]).unwrap();
        assert_eq!(review.interval, 10);
        assert_eq!(review.original_due(), day(-3));
    }

    #[test]
    fn write_due_dates_updates_rows() {
        let (mut col, ids) = seeded();
        col.write_due_dates(&[(ids[0], day(7))]).unwrap();
        assert_eq!(col.card(ids[0]).unwrap().due, day(7));
    }

    #[test]
    fn write_due_dates_is_all_or_nothing() {
        let (mut col, ids) = seeded();
        let err = col
            .write_due_dates(&[(ids[0], day(7)), (CardId(999), day(1))])
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { id: 999, .. }));
        assert_eq!(col.card(ids[0]).unwrap().due, day(-3));
    }

    #[test]
    fn set_state_new_appends_to_queue() {
        let (mut col, ids) = seeded();
        col.set_state_new(&[ids[0], ids[3]]).unwrap();
        let a = col.card(ids[0]).unwrap();
        let b = col.card(ids[3]).unwrap();
        assert_eq!(a.state, CardState::New);
        assert_eq!(a.interval, 0);
        assert_eq!(a.due, day(-3));
        assert_eq!(a.position, 4);
        assert_eq!(b.position, 5);
    }

    #[test]
    fn shuffle_permutes_existing_positions() {
        let mut col = Collection::open_memory().unwrap();
        let cards: Vec<NewCard> = (0..20)
            .map(|_| card("Deck", CardState::New, 0, 0, &[]))
            .collect();
        let ids = col.import_cards(&cards).unwrap();

        col.shuffle_order(&ids, 7).unwrap();
        let mut positions: Vec<i64> = col
            .list_cards(&ScopeFilter::all())
            .unwrap()
            .iter()
            .map(|c| c.position)
            .collect();
        assert_ne!(positions, (0..20).collect::<Vec<_>>());
        positions.sort_unstable();
        assert_eq!(positions, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn shuffle_is_deterministic_per_seed() {
        let order = |seed| {
            let mut col = Collection::open_memory().unwrap();
            let cards: Vec<NewCard> = (0..10)
                .map(|_| card("Deck", CardState::New, 0, 0, &[]))
                .collect();
            let ids = col.import_cards(&cards).unwrap();
            col.shuffle_order(&ids, seed).unwrap();
            col.list_cards(&ScopeFilter::all())
                .unwrap()
                .iter()
                .map(|c| c.position)
                .collect::<Vec<_>>()
        };
        assert_eq!(order(11), order(11));
    }

    #[test]
    fn filtered_deck_borrows_and_returns_cards() {
        let (mut col, ids) = seeded();
        let deck = col.create_filtered_deck("TimeWarpFiltered", &[ids[0], ids[2]]).unwrap();

        let moved = col.card(ids[0]).unwrap();
        assert_eq!(moved.deck, "TimeWarpFiltered");
        assert_eq!(moved.original_deck.as_deref(), Some("Spanish"));
        // Still in scope of its home deck.
        assert!(col
            .resolve_scope(&ScopeFilter::deck("Spanish"))
            .unwrap()
            .contains(&ids[0]));

        // Rebuilding with a different set sends the old cards home.
        let again = col.create_filtered_deck("TimeWarpFiltered", &[ids[3]]).unwrap();
        assert_eq!(deck, again);
        let home = col.card(ids[0]).unwrap();
        assert_eq!(home.deck, "Spanish");
        assert_eq!(home.original_deck, None);
        assert_eq!(col.card(ids[3]).unwrap().original_deck.as_deref(), Some("Math"));

        let info = col.decks().unwrap();
        let filtered = info.iter().find(|d| d.name == "TimeWarpFiltered").unwrap();
        assert!(filtered.dynamic);
        assert_eq!(filtered.card_count, 1);
    }

    #[test]
    fn filtered_deck_name_cannot_shadow_regular_deck() {
        let (mut col, ids) = seeded();
        assert!(col.create_filtered_deck("Math", &[ids[0]]).is_err());
        assert!(col.ensure_deck("Math").is_ok());
    }

    #[test]
    fn regular_cards_cannot_be_added_to_filtered_deck() {
        let (mut col, ids) = seeded();
        col.create_filtered_deck("Cram", &[ids[0]]).unwrap();
        assert!(col.add_card(&card("Cram", CardState::New, 0, 0, &[])).is_err());
    }

    #[test]
    fn deck_names_start_with_all() {
        let (col, _) = seeded();
        assert_eq!(
            col.deck_names().unwrap(),
            vec!["All", "Math", "Spanish", "Spanish::Vocab"]
        );
    }

    #[test]
    fn all_tags_are_deduplicated() {
        let (col, _) = seeded();
        assert_eq!(col.all_tags().unwrap().len(), 2);
    }

    #[test]
    fn open_on_disk_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collection.db");
        {
            let col = Collection::open(&path).unwrap();
            col.add_card(&card("Deck", CardState::Review, 2, 3, &[])).unwrap();
        }
        let col = Collection::open(&path).unwrap();
        assert_eq!(col.list_cards(&ScopeFilter::all()).unwrap().len(), 1);
    }

    #[test]
    fn interval_normalization() {
        assert_eq!(normalize_interval(-600), 1);
        assert_eq!(normalize_interval(0), 0);
        assert_eq!(normalize_interval(12), 12);
    }
}
