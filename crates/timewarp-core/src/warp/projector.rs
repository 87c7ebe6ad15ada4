//! Due-occurrence projection over a bounded day window.
//!
//! A card with interval `k` due at offset `o` is marked at `o, o + k, o + 2k, ...`
//! for every offset inside `[-horizon_past, horizon_future)`. The walk never goes
//! backward from `o`, and a first occurrence before the window still anchors it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::transform::TransformedItem;
use crate::card::{CardId, CardState, ItemSnapshot};

/// Anything with a due date and repeat interval that can be forecast.
pub trait Schedulable {
    fn card_id(&self) -> CardId;
    fn due_date(&self) -> NaiveDate;
    /// Repeat interval; 0 for cards out of review rotation.
    fn interval_days(&self) -> i64;
}

/// New and suspended cards show up once at their due date and never repeat.
fn rotation_interval(state: CardState, interval: i64) -> i64 {
    if state.is_warpable() {
        interval
    } else {
        0
    }
}

impl Schedulable for ItemSnapshot {
    fn card_id(&self) -> CardId {
        self.id
    }
    fn due_date(&self) -> NaiveDate {
        self.due
    }
    fn interval_days(&self) -> i64 {
        rotation_interval(self.state, self.interval)
    }
}

impl Schedulable for TransformedItem {
    fn card_id(&self) -> CardId {
        self.id
    }
    fn due_date(&self) -> NaiveDate {
        self.due
    }
    fn interval_days(&self) -> i64 {
        rotation_interval(self.state, self.interval)
    }
}

/// The forecast window `[-past, future)` in day offsets relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub past: i64,
    pub future: i64,
}

impl Window {
    pub fn new(past: i64, future: i64) -> Self {
        Self {
            past: past.max(0),
            future: future.max(0),
        }
    }

    pub fn len(&self) -> usize {
        (self.past + self.future) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, offset: i64) -> bool {
        offset >= -self.past && offset < self.future
    }

    /// Column index for an offset inside the window.
    pub fn index_of(&self, offset: i64) -> Option<usize> {
        self.contains(offset).then(|| (offset + self.past) as usize)
    }

    pub fn offset_at(&self, index: usize) -> i64 {
        index as i64 - self.past
    }

    pub fn offsets(&self) -> impl Iterator<Item = i64> {
        -self.past..self.future
    }
}

/// Per-card marks, one column per day offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueRow {
    pub id: CardId,
    pub marks: Vec<u32>,
}

impl DueRow {
    pub fn marked_offsets(&self, window: &Window) -> Vec<i64> {
        self.marks
            .iter()
            .enumerate()
            .filter(|(_, m)| **m > 0)
            .map(|(i, _)| window.offset_at(i))
            .collect()
    }

    pub fn total(&self) -> u32 {
        self.marks.iter().sum()
    }
}

/// One row per card over a shared window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueMatrix {
    pub window: Window,
    pub rows: Vec<DueRow>,
}

impl DueMatrix {
    pub fn row(&self, id: CardId) -> Option<&DueRow> {
        self.rows.iter().find(|r| r.id == id)
    }
}

/// Column-wise sum of a [`DueMatrix`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    pub window: Window,
    pub counts: Vec<u32>,
}

impl Histogram {
    pub fn empty(window: Window) -> Self {
        Self {
            window,
            counts: vec![0; window.len()],
        }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }

    pub fn count_at(&self, offset: i64) -> Option<u32> {
        self.window.index_of(offset).map(|i| self.counts[i])
    }

    /// `(day_offset, count)` pairs in offset order; negative offsets are overdue.
    pub fn pairs(&self) -> Vec<(i64, u32)> {
        self.window.offsets().zip(self.counts.iter().copied()).collect()
    }

    /// Offset labels for chart axes.
    pub fn labels(&self) -> Vec<String> {
        self.window.offsets().map(|o| o.to_string()).collect()
    }

    /// Occurrences falling before today.
    pub fn overdue_total(&self) -> u64 {
        self.pairs()
            .into_iter()
            .filter(|(o, _)| *o < 0)
            .map(|(_, c)| u64::from(c))
            .sum()
    }

    pub fn peak(&self) -> Option<(i64, u32)> {
        self.pairs().into_iter().max_by_key(|(o, c)| (*c, -*o))
    }
}

/// Mark the occurrences of one card inside `window`.
pub fn project_one(offset0: i64, interval: i64, window: &Window) -> Vec<u32> {
    let mut marks = vec![0u32; window.len()];
    if interval <= 0 {
        if let Some(i) = window.index_of(offset0) {
            marks[i] += 1;
        }
        return marks;
    }

    // Jump straight to the first occurrence at or after the window start.
    let mut offset = if offset0 < -window.past {
        let behind = -window.past - offset0;
        let steps = (behind + interval - 1) / interval;
        offset0 + steps * interval
    } else {
        offset0
    };
    while offset < window.future {
        if let Some(i) = window.index_of(offset) {
            marks[i] += 1;
        }
        offset += interval;
    }
    marks
}

/// Build the due matrix for `items` over `[-horizon_past, horizon_future)`.
pub fn project<T: Schedulable>(
    items: &[T],
    horizon_past: i64,
    horizon_future: i64,
    today: NaiveDate,
) -> DueMatrix {
    let window = Window::new(horizon_past, horizon_future);
    let rows = items
        .iter()
        .map(|item| {
            let offset0 = (item.due_date() - today).num_days();
            DueRow {
                id: item.card_id(),
                marks: project_one(offset0, item.interval_days(), &window),
            }
        })
        .collect();
    DueMatrix { window, rows }
}

/// Sum the matrix column-wise into a histogram.
pub fn reduce(matrix: &DueMatrix) -> Histogram {
    let mut hist = Histogram::empty(matrix.window);
    for row in &matrix.rows {
        for (slot, mark) in hist.counts.iter_mut().zip(&row.marks) {
            *slot += mark;
        }
    }
    hist
}

/// Project and reduce in one step.
pub fn forecast<T: Schedulable>(
    items: &[T],
    horizon_past: i64,
    horizon_future: i64,
    today: NaiveDate,
) -> Histogram {
    let hist = reduce(&project(items, horizon_past, horizon_future, today));
    tracing::debug!(
        cards = items.len(),
        occurrences = hist.total(),
        horizon_past,
        horizon_future,
        "projected due occurrences"
    );
    hist
}
