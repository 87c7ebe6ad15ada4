//! Due-date transform: collapse, stretch and shift each card's distance from today.
//!
//! For a learning/review card with `delta = due - today`:
//!
//! 1. `delta = max(delta, 0)` when overdue collapse is on
//! 2. `delta = round(delta * (100 + stretch_pct) / 100)`, half away from zero
//! 3. `new_due = today + delta + shift_days`
//!
//! New and suspended cards pass through unchanged. The function is pure and
//! does not re-validate its parameters.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::params::TransformParameters;
use crate::card::{CardId, CardState, ItemSnapshot};

/// A snapshot after the transform, carrying both the new and the original due date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformedItem {
    pub id: CardId,
    pub state: CardState,
    pub interval: i64,
    /// Due date after the transform.
    pub due: NaiveDate,
    /// Due date as read from the store.
    pub original_due: NaiveDate,
}

impl TransformedItem {
    /// Days the transform moved this card; positive means later.
    pub fn shift_days(&self) -> i64 {
        (self.due - self.original_due).num_days()
    }

    pub fn is_changed(&self) -> bool {
        self.due != self.original_due
    }
}

/// Scale `delta` by `(100 + stretch_pct) / 100` in exact integer arithmetic,
/// rounding half away from zero so past and future offsets stretch symmetrically.
pub fn stretch_delta(delta: i64, stretch_pct: i64) -> i64 {
    let scaled = delta * (100 + stretch_pct);
    let quotient = scaled / 100;
    let remainder = scaled % 100;
    if remainder.abs() * 2 >= 100 {
        quotient + scaled.signum()
    } else {
        quotient
    }
}

/// New day offset from today for one eligible card.
pub fn warp_delta(delta: i64, params: &TransformParameters) -> i64 {
    let delta = if params.collapse_overdue && delta < 0 {
        0
    } else {
        delta
    };
    stretch_delta(delta, params.stretch_pct) + params.shift_days
}

/// Transform a single snapshot.
pub fn transform_one(
    snapshot: &ItemSnapshot,
    params: &TransformParameters,
    today: NaiveDate,
) -> TransformedItem {
    let due = if snapshot.state.is_warpable() {
        today + Duration::days(warp_delta(snapshot.days_from(today), params))
    } else {
        snapshot.due
    };

    TransformedItem {
        id: snapshot.id,
        state: snapshot.state,
        interval: snapshot.interval,
        due,
        original_due: snapshot.original_due(),
    }
}

/// Transform every snapshot, preserving input order.
pub fn transform(
    snapshots: &[ItemSnapshot],
    params: &TransformParameters,
    today: NaiveDate,
) -> Vec<TransformedItem> {
    let items: Vec<TransformedItem> = snapshots
        .iter()
        .map(|s| transform_one(s, params, today))
        .collect();
    tracing::debug!(
        cards = items.len(),
        moved = items.iter().filter(|i| i.is_changed()).count(),
        stretch_pct = params.stretch_pct,
        shift_days = params.shift_days,
        collapse_overdue = params.collapse_overdue,
        "transformed snapshots"
    );
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 20).unwrap()
    }

    fn card(id: i64, offset: i64, state: CardState) -> ItemSnapshot {
        ItemSnapshot::new(CardId(id), today() + Duration::days(offset), 7, state)
    }

    #[test]
    fn stretch_rounds_half_away_from_zero() {
        assert_eq!(stretch_delta(1, 50), 2); // 1.5
        assert_eq!(stretch_delta(-1, 50), -2); // -1.5
        assert_eq!(stretch_delta(3, -50), 2); // 1.5
        assert_eq!(stretch_delta(-3, -50), -2); // -1.5
        assert_eq!(stretch_delta(5, 10), 6); // 5.5
        assert_eq!(stretch_delta(4, 10), 4); // 4.4
        assert_eq!(stretch_delta(-4, 10), -4);
    }

    #[test]
    fn doubling_spacing_doubles_delta() {
        let params = TransformParameters::default().with_stretch(100);
        let out = transform_one(&card(1, 10, CardState::Review), &params, today());
        assert_eq!((out.due - today()).num_days(), 20);
    }

    #[test]
    fn full_compression_lands_everything_on_shift() {
        let params = TransformParameters::default().with_stretch(-100).with_shift(5);
        let items = [card(1, -12, CardState::Review), card(2, 40, CardState::Review)];
        let out = transform(&items, &params, today());
        assert!(out.iter().all(|i| i.due == today() + Duration::days(5)));
    }

    #[test]
    fn identity_parameters_leave_due_dates() {
        let params = TransformParameters::default();
        let items = [
            card(1, -8, CardState::Review),
            card(2, 0, CardState::Learning),
            card(3, 33, CardState::Review),
        ];
        for out in transform(&items, &params, today()) {
            assert_eq!(out.due, out.original_due);
            assert!(!out.is_changed());
        }
    }

    #[test]
    fn new_and_suspended_cards_pass_through() {
        let params = TransformParameters::default()
            .with_stretch(200)
            .with_shift(10)
            .with_collapse_overdue(true);
        let items = [card(1, -4, CardState::New), card(2, 9, CardState::Suspended)];
        let out = transform(&items, &params, today());
        assert_eq!(out[0].due, items[0].due);
        assert_eq!(out[1].due, items[1].due);
    }

    #[test]
    fn collapse_moves_overdue_to_today_before_shift() {
        let params = TransformParameters::default()
            .with_stretch(100)
            .with_shift(2)
            .with_collapse_overdue(true);
        let out = transform_one(&card(1, -15, CardState::Review), &params, today());
        assert_eq!(out.due, today() + Duration::days(2));
        assert_eq!(out.shift_days(), 17);
    }

    #[test]
    fn without_collapse_overdue_cards_stretch_further_back() {
        let params = TransformParameters::default().with_stretch(100);
        let out = transform_one(&card(1, -5, CardState::Review), &params, today());
        assert_eq!(out.due, today() - Duration::days(10));
    }

    #[test]
    fn learning_cards_collapse_like_review_cards() {
        let params = TransformParameters::default().with_collapse_overdue(true);
        let out = transform_one(&card(1, -3, CardState::Learning), &params, today());
        assert_eq!(out.due, today());
    }

    #[test]
    fn original_due_is_the_input_due() {
        let params = TransformParameters::default().with_stretch(300).with_shift(-7);
        let snap = card(4, 6, CardState::Review);
        let out = transform_one(&snap, &params, today());
        assert_eq!(out.original_due, snap.due);
        assert_ne!(out.due, out.original_due);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert!(transform(&[], &TransformParameters::default(), today()).is_empty());
    }
}
