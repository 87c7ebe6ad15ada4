use clap::Args;
use timewarp_core::commit::{self, CommitOptions};
use timewarp_core::{ExportMode, Preview};

use super::{Context, WarpArgs};

#[derive(Args)]
pub struct ApplyArgs {
    #[command(flatten)]
    pub warp: WarpArgs,
    /// Export mode: "write" due dates or gather into a "filtered" deck
    #[arg(long)]
    pub mode: Option<ExportMode>,
    /// Filtered deck name (filtered mode only)
    #[arg(long)]
    pub deck_name: Option<String>,
    /// Shuffle the new cards in scope
    #[arg(long)]
    pub shuffle_new: bool,
    /// Reset every card in scope to new
    #[arg(long)]
    pub set_new: bool,
    /// Shuffle seed
    #[arg(long)]
    pub seed: Option<u64>,
    /// Commit without the dry-run listing
    #[arg(long, short)]
    pub yes: bool,
    /// Output the commit report as JSON
    #[arg(long)]
    pub json: bool,
}

impl ApplyArgs {
    fn options(&self, base: CommitOptions) -> CommitOptions {
        CommitOptions {
            mode: self.mode.unwrap_or(base.mode),
            filtered_deck_name: self
                .deck_name
                .clone()
                .unwrap_or(base.filtered_deck_name),
            shuffle_new: self.shuffle_new || base.shuffle_new,
            set_new: self.set_new || base.set_new,
            shuffle_seed: self.seed.or(base.shuffle_seed),
        }
    }
}

pub fn run(ctx: &Context, args: ApplyArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = ctx.load_config()?;
    let mut col = ctx.open_collection()?;
    let filter = args.warp.filter(&cfg);
    let preview = Preview::run(&col, &filter, args.warp.params(&cfg), ctx.today)?;
    let options = args.options(cfg.export.clone().into());

    if !args.yes {
        let changes = preview.changes();
        println!("Pending changes ({}):", changes.len());
        for change in &changes {
            println!("  {change}");
        }
        match options.mode {
            ExportMode::WriteInPlace => {}
            ExportMode::FilteredDeck => println!(
                "{} card(s) would move to filtered deck '{}'",
                preview.items.len(),
                options.filtered_deck_name
            ),
        }
        if options.shuffle_new {
            println!("New cards would be shuffled");
        }
        if options.set_new {
            println!("{} card(s) would be reset to new", preview.items.len());
        }
        eprintln!("dry run: nothing written, pass --yes to commit");
        return Ok(());
    }

    let report = commit::apply(&mut col, &preview.items, &options)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match &report.filtered_deck {
        Some(name) => println!("Moved {} card(s) to '{name}'", report.filtered_cards),
        None => println!("Wrote {} due date(s)", report.due_dates_written),
    }
    if options.shuffle_new {
        println!("Shuffled {} new card(s)", report.shuffled);
    }
    if options.set_new {
        println!("Reset {} card(s) to new", report.reset_to_new);
    }
    Ok(())
}
