use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use ndb_ascii::AsciiDb;
use ndb_core::config::{resolve_with_base, Config};
use ndb_ingest::ChunkReader;

fn parse_args(config: &Config) -> anyhow::Result<(PathBuf, Vec<String>)> {
    let mut args: Vec<String> = env::args().skip(1).collect();
    let data_dir = match args.first() {
        Some(first) if Path::new(first).is_dir() => {
            let dir = args.remove(0);
            resolve_with_base(&env::current_dir()?, dir)
        }
        _ => config.asciidb_dir()?,
    };
    if args.is_empty() {
        eprintln!("Usage: ndb-lookup [asciidb_dir] <term>...");
        std::process::exit(1);
    }
    Ok((data_dir, args))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let (data_dir, terms) = parse_args(&config)?;
    let reader = ChunkReader::from_config(&config)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_message(format!("Loading {}", data_dir.display()));
    let db = AsciiDb::read_database(&data_dir, &reader)
        .await
        .with_context(|| format!("loading database from {}", data_dir.display()))?;
    spinner.finish_with_message(format!("✅ Loaded {} foods", db.foods.len()));

    let index = db.search_index();
    println!("📊 {} terms, {} postings, depth {}", index.key_count(), index.token_count(), index.depth());

    for term in &terms {
        let term = term.to_lowercase();
        println!("\n🔎 {}", term);
        let Some(ids) = db.find_food(&term) else {
            println!("   no matches");
            continue;
        };
        let mut shown: Vec<&str> = Vec::new();
        for id in ids {
            if shown.contains(&id.as_str()) {
                continue;
            }
            shown.push(id);
            if let Some(food) = db.food(id) {
                println!("   {}  {}", food.ndb_id, food.long_description);
            }
        }
    }
    Ok(())
}
