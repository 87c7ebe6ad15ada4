//! Scope resolution and snapshot reading.

use crate::card::ItemSnapshot;
use crate::error::Result;
use crate::storage::{CardStore, ScopeFilter};

/// Resolve `filter` and read a fresh snapshot of every card in it, ordered by id.
///
/// # Errors
/// Returns an error if the store cannot be queried.
pub fn load_scope<S: CardStore + ?Sized>(store: &S, filter: &ScopeFilter) -> Result<Vec<ItemSnapshot>> {
    let ids = store.resolve_scope(filter)?;
    if ids.is_empty() {
        tracing::debug!(deck = %filter.deck, "scope is empty");
        return Ok(Vec::new());
    }
    let mut snapshots = store.read_snapshots(&ids)?;
    snapshots.sort_by_key(|s| s.id);
    Ok(snapshots)
}
