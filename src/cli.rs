use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "autodeck",
    about = "Build Commander decks from your card inventory"
)]
pub struct Cli {
    /// Directory for the card-data cache
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,
    /// Never contact Scryfall; only cached lookups resolve
    #[arg(long, global = true)]
    pub offline: bool,
    /// JSON array of card objects to use instead of Scryfall
    #[arg(long, global = true)]
    pub card_data: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the commanders your inventory can field
    Commanders {
        /// Inventory file, one `<qty> <name> (<SET>) <number>[ *F*]` per line
        #[arg(long, short)]
        inventory: PathBuf,
        /// Color symbols to stay within (e.g. "BG"; "C" for colorless)
        #[arg(long)]
        colors: Option<String>,
        /// Strategy to score candidates against (see `strategies`)
        #[arg(long)]
        strategy: Option<String>,
        /// Sort by total score or commander bonus (total, bonus)
        #[arg(long, default_value = "total")]
        sort: String,
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Build a 100-card deck around a commander
    Build {
        #[arg(long, short)]
        inventory: PathBuf,
        /// Exact commander name
        #[arg(long, short)]
        commander: String,
        #[arg(long)]
        colors: Option<String>,
        #[arg(long)]
        strategy: Option<String>,
        /// Seed for a reproducible build
        #[arg(long)]
        seed: Option<u64>,
        /// Write the export list to this file
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// List the strategies a deck can be built around
    Strategies,
    /// Delete the card-data cache
    ClearCache,
}
