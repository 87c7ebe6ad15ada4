use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "timewarp", version, about = "Reshape a spaced-repetition review schedule")]
struct Cli {
    /// Collection database (defaults to ~/.config/timewarp/collection.db)
    #[arg(long, global = true, env = "TIMEWARP_DB")]
    db: Option<PathBuf>,
    /// Config file (defaults to ~/.config/timewarp/config.toml)
    #[arg(long, global = true, env = "TIMEWARP_CONFIG")]
    config: Option<PathBuf>,
    /// Evaluate as if today were this date (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast daily due counts before and after a warp
    Preview(commands::preview::PreviewArgs),
    /// Commit a warp to the collection
    Apply(commands::apply::ApplyArgs),
    /// Card management
    Card {
        #[command(subcommand)]
        action: commands::card::CardAction,
    },
    /// Deck listing
    Deck {
        #[command(subcommand)]
        action: commands::deck::DeckAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "timewarp_core=debug,timewarp=debug",
        _ => "trace",
    };
    let filter = if verbose > 0 {
        EnvFilter::new(fallback)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = commands::Context {
        db: cli.db,
        config: cli.config,
        today: cli
            .today
            .unwrap_or_else(|| chrono::Local::now().date_naive()),
    };
    tracing::debug!(db = ?ctx.db, config = ?ctx.config, today = %ctx.today, "resolved context");

    let result = match cli.command {
        Commands::Preview(args) => commands::preview::run(&ctx, args),
        Commands::Apply(args) => commands::apply::run(&ctx, args),
        Commands::Card { action } => commands::card::run(&ctx, action),
        Commands::Deck { action } => commands::deck::run(&ctx, action),
        Commands::Config { action } => commands::config::run(&ctx, action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
