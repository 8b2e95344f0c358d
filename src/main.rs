//! Visual dictionary → Anki deck builder.
//!
//! Reads the chapter/article/section/word tables of the dictionary database
//! and writes an `.apkg` with one deck per article, nested under its chapter.

mod db;
mod entry;
mod error;
mod fetch;
mod hierarchy;
mod package;
mod schema;
mod settings;
#[cfg(test)]
mod testutil;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use entry::Kind;
use fetch::EntryQuery;
use package::{apkg, Package};
use schema::PageWindow;
use settings::Settings;

#[derive(Parser)]
#[command(name = "vocab_deck", about = "Build Anki decks from a visual dictionary database")]
struct Cli {
    /// Settings file (default: ./vocab_deck.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Dictionary database
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Directory holding the audio files
    #[arg(long, global = true)]
    audio_dir: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// One deck per article, nested as <deck>::<chapter>::<article>
    Build {
        #[command(flatten)]
        output: OutputArgs,
        /// Add the article card even when the article has no audio
        #[arg(long)]
        always_article_card: bool,
    },
    /// Every entry in a single deck, in book order
    Flat {
        #[command(flatten)]
        output: OutputArgs,
    },
    /// List entries in book order
    Entries {
        /// Kinds to include (repeatable, default: all)
        #[arg(short, long, value_enum)]
        kind: Vec<Kind>,
        #[arg(long)]
        page_min: Option<i64>,
        #[arg(long)]
        page_max: Option<i64>,
        /// Max rows to display
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Print the first row of a table
    Describe {
        #[arg(value_enum)]
        kind: Kind,
    },
}

#[derive(clap::Args)]
struct OutputArgs {
    /// Output package
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Root deck name
    #[arg(long)]
    deck_name: Option<String>,
    /// Base deck id
    #[arg(long)]
    deck_id: Option<i64>,
}

impl OutputArgs {
    fn apply(self, settings: &mut Settings) {
        if let Some(output) = self.output {
            settings.output_file = output;
        }
        if let Some(name) = self.deck_name {
            settings.deck_name = name;
        }
        if let Some(id) = self.deck_id {
            settings.deck_id = id;
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    if let Some(db) = cli.db {
        settings.db_path = db;
    }
    if let Some(dir) = cli.audio_dir {
        settings.audio_dir = dir;
    }
    info!(settings = ?settings, "settings loaded");

    let result = match cli.command {
        Commands::Build {
            output,
            always_article_card,
        } => {
            output.apply(&mut settings);
            if always_article_card {
                settings.skip_silent_articles = false;
            }
            run_build(&settings, false)
        }
        Commands::Flat { output } => {
            output.apply(&mut settings);
            run_build(&settings, true)
        }
        Commands::Entries {
            kind,
            page_min,
            page_max,
            limit,
        } => {
            let kinds = if kind.is_empty() { Kind::ALL.to_vec() } else { kind };
            let query = EntryQuery::new(&kinds, PageWindow::new(page_min, page_max));
            let conn = db::connect(&settings.db_path)?;
            let entries = query.fetch(&conn)?;
            if entries.is_empty() {
                println!("No entries found.");
                return Ok(());
            }

            println!(
                "{:>6} | {:<7} | {:>4} | {:<24} | {:<24} | {}",
                "order", "kind", "page", "Front", "Back", "Audio"
            );
            println!("{}", "-".repeat(100));
            let shown = limit.unwrap_or(entries.len());
            for e in entries.iter().take(shown) {
                println!(
                    "{:>6} | {:<7} | {:>4} | {:<24} | {:<24} | {}",
                    e.order_id,
                    e.kind,
                    e.page_number,
                    truncate(&e.front, 24),
                    truncate(e.back.as_deref().unwrap_or("-"), 24),
                    e.audio.as_deref().unwrap_or("-"),
                );
            }
            println!("\n{} of {} entries", shown.min(entries.len()), entries.len());
            Ok(())
        }
        Commands::Describe { kind } => {
            let conn = db::connect(&settings.db_path)?;
            match db::describe_table(&conn, kind)? {
                Some(row) => println!("{}", serde_json::to_string_pretty(&row)?),
                None => println!("Table for {} is empty.", kind),
            }
            Ok(())
        }
    };

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    result
}

fn run_build(settings: &Settings, flat: bool) -> anyhow::Result<()> {
    let layout = settings.layout();
    let mut package = Package::new(settings.audio_dir.clone());

    // the connection is closed before anything is written
    let stats = {
        let conn = db::connect(&settings.db_path)?;
        println!("Database: {:?}", settings.db_path);
        if flat {
            hierarchy::build_flat(&conn, &mut package, &layout)?
        } else {
            let pb = ProgressBar::new(0);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .context("Invalid progress template")?
                    .progress_chars("#>-"),
            );
            hierarchy::build_decks(&conn, &mut package, &layout, &pb)?
        }
    };
    stats.print();
    println!("Registered {} media paths.", package.media().len());

    let summary = apkg::write_to_file(&package, &settings.output_file)
        .with_context(|| format!("Failed to write {:?}", settings.output_file))?;
    summary.print(&settings.output_file);
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max).collect();
        format!("{}...", truncated)
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}
