use clap::Subcommand;

use super::Context;

#[derive(Subcommand)]
pub enum DeckAction {
    /// List decks with their card counts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(ctx: &Context, action: DeckAction) -> Result<(), Box<dyn std::error::Error>> {
    let col = ctx.open_collection()?;

    match action {
        DeckAction::List { json } => {
            let decks = col.decks()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&decks)?);
                return Ok(());
            }
            if decks.is_empty() {
                println!("No decks found.");
            }
            for deck in &decks {
                let kind = if deck.dynamic { " (filtered)" } else { "" };
                println!("{:>6}  {}{kind}", deck.card_count, deck.name);
            }
        }
    }
    Ok(())
}
