use clap::Args;
use serde::Serialize;
use timewarp_core::{DueChange, Histogram, Preview};

use super::{Context, WarpArgs};

const BAR_WIDTH: u32 = 40;

#[derive(Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub warp: WarpArgs,
    /// List every card whose due date moves
    #[arg(long)]
    pub changes: bool,
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct PreviewOutput<'a> {
    today: chrono::NaiveDate,
    cards_in_scope: usize,
    in_review: usize,
    scheduled_occurrences: u64,
    baseline: Vec<(i64, u32)>,
    forecast: Vec<(i64, u32)>,
    changes: &'a [DueChange],
}

pub fn run(ctx: &Context, args: PreviewArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = ctx.load_config()?;
    let col = ctx.open_collection()?;
    let filter = args.warp.filter(&cfg);
    let preview = Preview::run(&col, &filter, args.warp.params(&cfg), ctx.today)?;
    let changes = preview.changes();

    if args.json {
        let out = PreviewOutput {
            today: preview.today,
            cards_in_scope: preview.cards_in_scope,
            in_review: preview.in_review,
            scheduled_occurrences: preview.scheduled_occurrences(),
            baseline: preview.baseline.pairs(),
            forecast: preview.forecast.pairs(),
            changes: &changes,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "Scope: {} ({} cards, {} in review, {} reviews in window)",
        filter.deck,
        preview.cards_in_scope,
        preview.in_review,
        preview.scheduled_occurrences()
    );
    print_histograms(&preview.baseline, &preview.forecast);
    println!("{} card(s) would move", changes.len());
    if args.changes {
        for change in &changes {
            println!("  {change}");
        }
    }
    Ok(())
}

/// Side-by-side bars for each offset where either histogram is nonzero.
pub fn print_histograms(before: &Histogram, after: &Histogram) {
    let peak = before
        .peak()
        .into_iter()
        .chain(after.peak())
        .map(|(_, c)| c)
        .max()
        .unwrap_or(0);
    if peak == 0 {
        println!("(no reviews in window)");
        return;
    }
    println!("{:>5} {:>6} {:>6}", "day", "before", "after");
    for ((offset, b), (_, a)) in before.pairs().into_iter().zip(after.pairs()) {
        if a == 0 && b == 0 {
            continue;
        }
        let mark = if offset < 0 { '!' } else { ' ' };
        let bar = "#".repeat((a * BAR_WIDTH).div_ceil(peak) as usize);
        println!("{offset:>5}{mark}{b:>6} {a:>6} {bar}");
    }
}
