//! Preview pipeline: scope, snapshot, transform, forecast.
//!
//! Every call starts from a fresh snapshot; nothing is carried between previews.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::card::{CardId, ItemSnapshot};
use crate::error::Result;
use crate::scope::load_scope;
use crate::storage::{CardStore, ScopeFilter};
use crate::warp::{forecast, transform, Histogram, TransformParameters, TransformedItem};

/// One card whose due date the transform moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueChange {
    pub id: CardId,
    pub original_due: NaiveDate,
    pub due: NaiveDate,
    pub shift_days: i64,
}

impl fmt::Display for DueChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{card: {}, original: {}, new: {}}}",
            self.id, self.original_due, self.due
        )
    }
}

impl From<&TransformedItem> for DueChange {
    fn from(item: &TransformedItem) -> Self {
        Self {
            id: item.id,
            original_due: item.original_due,
            due: item.due,
            shift_days: item.shift_days(),
        }
    }
}

/// Result of one preview cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preview {
    pub today: NaiveDate,
    pub params: TransformParameters,
    pub cards_in_scope: usize,
    /// Cards in learning or review.
    pub in_review: usize,
    /// Forecast of the untouched schedule.
    pub baseline: Histogram,
    /// Forecast after the transform.
    pub forecast: Histogram,
    pub items: Vec<TransformedItem>,
}

impl Preview {
    /// Run the full preview for `filter` against `store`.
    ///
    /// # Errors
    /// Returns a validation error for out-of-range parameters, or a store error.
    pub fn run<S: CardStore + ?Sized>(
        store: &S,
        filter: &ScopeFilter,
        params: TransformParameters,
        today: NaiveDate,
    ) -> Result<Self> {
        params.validate()?;
        let snapshots = load_scope(store, filter)?;
        Ok(Self::from_snapshots(&snapshots, params, today))
    }

    /// Preview already-loaded snapshots. `params` must be valid.
    pub fn from_snapshots(
        snapshots: &[ItemSnapshot],
        params: TransformParameters,
        today: NaiveDate,
    ) -> Self {
        let items = transform(snapshots, &params, today);
        let baseline = forecast(snapshots, params.horizon_past, params.horizon_future, today);
        let warped = forecast(&items, params.horizon_past, params.horizon_future, today);
        Self {
            today,
            params,
            cards_in_scope: snapshots.len(),
            in_review: snapshots.iter().filter(|s| s.state.is_warpable()).count(),
            baseline,
            forecast: warped,
            items,
        }
    }

    /// Occurrences landing in the window after the transform.
    pub fn scheduled_occurrences(&self) -> u64 {
        self.forecast.total()
    }

    /// Cards whose due date moved, in id order.
    pub fn changes(&self) -> Vec<DueChange> {
        self.items
            .iter()
            .filter(|i| i.is_changed())
            .map(DueChange::from)
            .collect()
    }

    /// Per-offset difference `forecast - baseline`.
    pub fn delta(&self) -> Vec<(i64, i64)> {
        self.forecast
            .pairs()
            .into_iter()
            .zip(self.baseline.counts.iter())
            .map(|((offset, after), before)| (offset, i64::from(after) - i64::from(*before)))
            .collect()
    }
}
