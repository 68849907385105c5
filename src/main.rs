use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::Path;

use autodeck::cli::{Cli, Commands};
use autodeck::provider::summarize_missing;
use autodeck::{
    AutoDeck, BuiltDeck, Category, ColorSet, CommanderOrder, DeckError, Preferences,
};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let Cli {
        cache_dir,
        offline,
        card_data,
        command,
    } = cli;
    let open = || -> autodeck::Result<AutoDeck> {
        let mut builder = AutoDeck::builder().offline(offline);
        if let Some(dir) = &cache_dir {
            builder = builder.cache_dir(dir);
        }
        if let Some(path) = &card_data {
            builder = builder.card_data(path);
        }
        let deck = builder.build()?;
        log::debug!("{}", deck);
        Ok(deck)
    };

    match command {
        Commands::Commanders {
            inventory,
            colors,
            strategy,
            sort,
            limit,
        } => {
            let order: CommanderOrder = sort.parse().map_err(DeckError::InvalidArgument)?;
            let preferences = parse_preferences(colors.as_deref(), strategy.as_deref())?;
            let deck = open()?;
            let inventory = load(&deck, &inventory)?;
            let search = deck.commanders(&inventory, &preferences);
            if search.is_empty() {
                println!("No commander in your inventory matches these preferences.");
                return Ok(());
            }
            for (rank, c) in search.sorted(order).iter().take(limit).enumerate() {
                println!(
                    "{:>3}. {} [{}]{}  score {} (bonus {}, support {})",
                    rank + 1,
                    c.name,
                    c.details.color_identity,
                    c.relevance,
                    c.total_score,
                    c.commander_bonus,
                    c.support_cards
                );
            }
            if let Some(summary) = summarize_missing(&search.missing) {
                println!("\nNote: {summary}");
            }
        }
        Commands::Build {
            inventory,
            commander,
            colors,
            strategy,
            seed,
            output,
        } => {
            let preferences = parse_preferences(colors.as_deref(), strategy.as_deref())?;
            let deck = open()?;
            let inventory = load(&deck, &inventory)?;
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let built = deck.build_deck(&commander, &inventory, &preferences, &mut rng)?;
            print_report(&deck, &built);
            if let Some(path) = output {
                fs::write(&path, built.export_text() + "\n")?;
                println!("\nDeck list written to {}", path.display());
            } else {
                println!("\n== Deck list ==");
                println!("{}", built.export_text());
            }
        }
        Commands::Strategies => {
            for category in Category::KEYWORDED.into_iter().filter(|c| c.is_strategy()) {
                println!("{:<20} {}", category.label(), category.description());
            }
        }
        Commands::ClearCache => {
            if open()?.clear_cache()? {
                println!("Cache cleared.");
            } else {
                println!("No cache to clear.");
            }
        }
    }
    Ok(())
}

fn parse_preferences(
    colors: Option<&str>,
    strategy: Option<&str>,
) -> Result<Preferences, Box<dyn std::error::Error>> {
    let mut preferences = Preferences::default();
    if let Some(colors) = colors {
        let colors: ColorSet = colors.parse().map_err(DeckError::InvalidArgument)?;
        preferences = preferences.with_colors(colors);
    }
    if let Some(strategy) = strategy {
        let strategy = Category::parse_strategy(strategy).map_err(DeckError::InvalidArgument)?;
        preferences = preferences.with_strategy(strategy);
    }
    Ok(preferences)
}

fn load(deck: &AutoDeck, path: &Path) -> Result<autodeck::Inventory, Box<dyn std::error::Error>> {
    let load = deck.load_inventory(path)?;
    for issue in &load.issues {
        eprintln!("Skipped malformed line {issue}");
    }
    if load.inventory.is_empty() {
        return Err(format!("No cards found in {}", path.display()).into());
    }
    Ok(load.inventory)
}

fn print_report(deck: &AutoDeck, built: &BuiltDeck) {
    let rules = deck.rules();
    let stats = built.stats();

    let color_names: Vec<&str> = built.commander_colors.iter().map(|c| c.name()).collect();
    println!(
        "== {} [{}] ==",
        built.commander,
        if color_names.is_empty() {
            "Colorless".to_string()
        } else {
            color_names.join(", ")
        }
    );
    if let Some(adj) = built.color_adjustment {
        match adj.applied {
            Some(applied) => println!(
                "Preferred colors {} narrowed to {} to fit the commander.",
                adj.requested, applied
            ),
            None => println!(
                "Preferred colors {} do not fit the commander; using {}.",
                adj.requested, built.commander_colors
            ),
        }
    }
    if built.shortfall > 0 {
        println!(
            "Deck has {} of {} cards ({} short).",
            built.len(),
            rules.deck_size,
            built.shortfall
        );
    }
    if let Some(summary) = summarize_missing(&built.missing_cards) {
        println!("Note: {summary}");
    }

    println!("\nCards: {}  Lands: {}", stats.total_cards, stats.land_count);
    if let Some(avg) = stats.average_spell_cmc {
        println!("Average spell mana value: {avg:.2}");
    }
    let types: Vec<String> = stats
        .type_counts
        .iter()
        .map(|(t, n)| format!("{t} {n}"))
        .collect();
    println!("Types: {}", types.join(", "));

    println!("\n== Mana curve (have / target) ==");
    let curve = built.mana_curve();
    for (cmc, target) in &rules.cmc_targets {
        let have = curve.get(cmc).copied().unwrap_or(0);
        println!("{:>2}: {:>3} / {:<3} {}", cmc, have, target, "#".repeat(have));
    }

    println!("\n== Categories ==");
    for (label, count) in &built.category_tally {
        println!("{label:<20} {count}");
    }

    if let Some(strategy) = built.strategy {
        let cards = built.strategy_cards();
        println!("\n== {} cards ({}) ==", strategy.title(), cards.len());
        for name in cards {
            println!("  {name}");
        }
    }

    let hints = built.suggestions(rules);
    if !hints.is_empty() {
        println!("\n== Suggestions ==");
        for hint in hints {
            println!("- {hint}");
        }
    }
}
