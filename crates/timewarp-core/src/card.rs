//! Card identity and scheduling snapshot types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Stable card identifier, unique within a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub i64);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Scheduling state of a card.
///
/// Only `Learning` and `Review` cards take part in the due-date transform;
/// `New` and `Suspended` cards have no meaningful distance to scale.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CardState {
    #[default]
    New,
    Learning,
    Review,
    Suspended,
}

impl CardState {
    /// Whether the due-date transform applies to cards in this state.
    pub fn is_warpable(&self) -> bool {
        matches!(self, CardState::Learning | CardState::Review)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CardState::New => "new",
            CardState::Learning => "learning",
            CardState::Review => "review",
            CardState::Suspended => "suspended",
        }
    }
}

impl fmt::Display for CardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "new" => Ok(CardState::New),
            "learning" | "learn" | "relearning" => Ok(CardState::Learning),
            "review" => Ok(CardState::Review),
            "suspended" => Ok(CardState::Suspended),
            other => Err(ValidationError::InvalidValue {
                field: "state".into(),
                message: format!("unknown card state '{other}'"),
            }),
        }
    }
}

/// One card's scheduling state at read time.
///
/// `original_due` is captured when the snapshot is built and has no setter;
/// it travels through the pipeline so previews can diff against it.
/// Deserializing goes through [`ItemSnapshot::new`], so a serialized
/// `original_due` is ignored and reset to `due`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SnapshotFields")]
pub struct ItemSnapshot {
    pub id: CardId,
    pub due: NaiveDate,
    /// Days between occurrences; 0 for cards not in review rotation.
    pub interval: i64,
    pub state: CardState,
    original_due: NaiveDate,
}

#[derive(Deserialize)]
struct SnapshotFields {
    id: CardId,
    due: NaiveDate,
    interval: i64,
    state: CardState,
}

impl From<SnapshotFields> for ItemSnapshot {
    fn from(f: SnapshotFields) -> Self {
        Self::new(f.id, f.due, f.interval, f.state)
    }
}

impl ItemSnapshot {
    pub fn new(id: CardId, due: NaiveDate, interval: i64, state: CardState) -> Self {
        Self {
            id,
            due,
            interval,
            state,
            original_due: due,
        }
    }

    pub fn original_due(&self) -> NaiveDate {
        self.original_due
    }

    /// Signed day distance from `today` to the due date; negative when overdue.
    pub fn days_from(&self, today: NaiveDate) -> i64 {
        (self.due - today).num_days()
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due < today
    }
}
