use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Subcommand;
use timewarp_core::{CardState, NewCard, ScopeFilter};

use super::Context;

#[derive(Subcommand)]
pub enum CardAction {
    /// Add a card
    Add {
        /// Deck name (created if missing)
        deck: String,
        /// Queue state: new, learning, review, suspended
        #[arg(long, default_value = "new")]
        state: CardState,
        /// Due date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        due: Option<NaiveDate>,
        /// Interval in days
        #[arg(long, default_value_t = 0)]
        interval: i64,
        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// List cards
    List {
        /// Deck filter, including subdecks
        #[arg(long)]
        deck: Option<String>,
        /// Tag filter (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Import cards from a JSON array file
    Import {
        /// Path to the JSON file
        file: PathBuf,
    },
}

pub fn run(ctx: &Context, action: CardAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CardAction::Add {
            deck,
            state,
            due,
            interval,
            tags,
        } => {
            let col = ctx.open_collection()?;
            let id = col.add_card(&NewCard {
                deck,
                state,
                due: due.unwrap_or(ctx.today),
                interval,
                tags,
            })?;
            println!("Card created: {id}");
        }
        CardAction::List { deck, tags, json } => {
            let col = ctx.open_collection()?;
            let filter = deck
                .map(ScopeFilter::deck)
                .unwrap_or_default()
                .with_tags(tags);
            let cards = col.list_cards(&filter)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&cards)?);
            } else if cards.is_empty() {
                println!("No cards found.");
            } else {
                for card in &cards {
                    println!(
                        "{:>6}  {:<10} {}  ivl {:>4}  {}",
                        card.id.0,
                        card.state.as_str(),
                        card.due,
                        card.interval,
                        card.deck
                    );
                }
            }
        }
        CardAction::Import { file } => {
            let content = std::fs::read_to_string(&file)?;
            let cards: Vec<NewCard> = serde_json::from_str(&content)?;
            let mut col = ctx.open_collection()?;
            let ids = col.import_cards(&cards)?;
            println!("Imported {} card(s)", ids.len());
        }
    }
    Ok(())
}
