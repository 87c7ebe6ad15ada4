//! # Time Warp Core Library
//!
//! Reshapes the future review schedule of a set of spaced-repetition cards:
//! stretch or compress the spacing of pending reviews, shift them in time, and
//! optionally collapse overdue backlog onto today, with a forecast of daily due
//! counts before and after to preview the effect.
//!
//! ## Architecture
//!
//! - **Warp**: the pure due-date transform and the occurrence projector
//! - **Storage**: the [`CardStore`] boundary, a SQLite [`Collection`] behind it,
//!   and TOML-based [`Config`]
//! - **Preview / Commit**: the scope → snapshot → transform → forecast pipeline
//!   and the write-back of its result
//!
//! ## Key Components
//!
//! - [`transform`]: maps each card's due date under [`TransformParameters`]
//! - [`project`] / [`reduce`]: per-card due matrix and its histogram
//! - [`Preview`]: one full preview cycle
//! - [`commit::apply`]: export a transformed set

pub mod card;
pub mod commit;
pub mod error;
pub mod preview;
pub mod scope;
pub mod storage;
pub mod warp;

pub use card::{CardId, CardState, ItemSnapshot};
pub use commit::{CommitOptions, CommitReport};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use preview::{DueChange, Preview};
pub use storage::{CardStore, Collection, Config, ExportMode, NewCard, ScopeFilter};
pub use warp::{
    forecast, project, reduce, transform, DueMatrix, Histogram, TransformParameters,
    TransformedItem,
};
