pub mod apply;
pub mod card;
pub mod config;
pub mod deck;
pub mod preview;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Args;
use timewarp_core::{Collection, Config, ScopeFilter, TransformParameters};

/// Global flags shared by every command.
pub struct Context {
    pub db: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub today: NaiveDate,
}

impl Context {
    pub fn open_collection(&self) -> Result<Collection, Box<dyn std::error::Error>> {
        let col = match &self.db {
            Some(path) => Collection::open(path)?,
            None => Collection::open_default()?,
        };
        Ok(col)
    }

    pub fn load_config(&self) -> Result<Config, Box<dyn std::error::Error>> {
        let cfg = match &self.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        Ok(cfg)
    }

    pub fn save_config(&self, cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.config {
            Some(path) => cfg.save_to(path)?,
            None => cfg.save()?,
        }
        Ok(())
    }
}

/// Scope and warp parameters for `preview` and `apply`.
#[derive(Args, Debug, Clone)]
pub struct WarpArgs {
    /// Deck to warp, including subdecks ("All" for every card)
    #[arg(long)]
    pub deck: Option<String>,
    /// Only cards carrying this tag (repeatable, all must match)
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    /// Stretch percent: -100 compresses onto today, 100 doubles the spacing
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub stretch: i64,
    /// Days to move every warped card
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub shift: i64,
    /// Bring overdue cards onto today before stretching
    #[arg(long)]
    pub collapse_overdue: bool,
    /// Forecast days before today
    #[arg(long)]
    pub past: Option<i64>,
    /// Forecast days from today
    #[arg(long)]
    pub future: Option<i64>,
}

impl WarpArgs {
    pub fn filter(&self, cfg: &Config) -> ScopeFilter {
        let deck = self
            .deck
            .clone()
            .unwrap_or_else(|| cfg.scope.default_deck.clone());
        ScopeFilter::deck(deck).with_tags(self.tags.iter().cloned())
    }

    pub fn params(&self, cfg: &Config) -> TransformParameters {
        let defaults = cfg.transform_defaults();
        TransformParameters::default()
            .with_stretch(self.stretch)
            .with_shift(self.shift)
            .with_collapse_overdue(self.collapse_overdue)
            .with_horizons(
                self.past.unwrap_or(defaults.horizon_past),
                self.future.unwrap_or(defaults.horizon_future),
            )
    }
}
