//! `snapmap`: manage the food-opportunity record store from the terminal.
//!
//! # Usage
//!
//! ```text
//! snapmap list
//! snapmap add "Eastside Pantry" --location "12 Oak St" --description "Tuesdays 9-12"
//! snapmap find Pittsburgh PA --count 15
//! snapmap backup
//! snapmap serve
//! ```
//!
//! Settings come from `snapmap.toml` (or `--config`), overlaid by
//! `SNAPMAP_*` environment variables; `--db` wins over both.

mod commands;
mod display;
mod prompt;
mod settings;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use settings::{Settings, expand_tilde};
use snapmap_core::RecordPatch;
use snapmap_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "snapmap", version, about = "Food opportunity record store")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, value_name = "FILE", default_value = "snapmap.toml")]
  config: PathBuf,

  /// SQLite database file (overrides `db_path` from the config).
  #[arg(long, value_name = "FILE", global = true)]
  db: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

/// Field values given on the command line.
#[derive(Args, Debug)]
struct FieldArgs {
  #[arg(long)]
  link:        Option<String>,
  #[arg(long)]
  location:    Option<String>,
  #[arg(long)]
  description: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Add a record; prompts for every field when no name is given.
  Add {
    name:   Option<String>,
    #[command(flatten)]
    fields: FieldArgs,
  },
  /// List every record, newest first.
  List,
  /// Show one record in full.
  Show { id: i64 },
  /// Search name, description and location.
  Search { term: String },
  /// Change fields of a record; prompts when no field flags are given.
  Update {
    id:     i64,
    #[arg(long)]
    name:   Option<String>,
    #[command(flatten)]
    fields: FieldArgs,
  },
  /// Delete a record.
  Delete {
    id:  i64,
    /// Skip the confirmation question.
    #[arg(short, long)]
    yes: bool,
  },
  /// Summary statistics.
  Stats,
  /// Export every record to CSV.
  Export {
    /// Output file; auto-named inside `backup_dir` when omitted.
    path: Option<PathBuf>,
  },
  /// Append the rows of a CSV file as new records.
  Import { path: PathBuf },
  /// Export to an auto-named CSV file and report its size.
  Backup,
  /// Import a CSV backup, asking first if the store is not empty.
  Restore { path: PathBuf },
  /// Delete every record after typed confirmation.
  Reset,
  /// Delete every record without asking.
  QuickReset {
    /// Skip the automatic backup.
    #[arg(long)]
    no_backup: bool,
  },
  /// Remove records with duplicate names, keeping the newest of each.
  Clean {
    #[arg(short, long)]
    yes: bool,
  },
  /// Ask the model for food opportunities in a city and store them.
  Find {
    /// City or area, e.g. `Pittsburgh PA`.
    #[arg(required = true, num_args = 1..)]
    place:   Vec<String>,
    /// How many to ask for (1-50); anything else means 10.
    #[arg(short = 'n', long, allow_hyphen_values = true)]
    count:   Option<String>,
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
  },
  /// Serve the read-only JSON API.
  Serve,
}

impl FieldArgs {
  fn into_patch(self, name: Option<String>) -> RecordPatch {
    RecordPatch {
      name,
      link: self.link,
      location: self.location,
      description: self.description,
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let mut settings = Settings::load(&cli.config)?;
  if let Some(db) = &cli.db {
    settings.db_path = expand_tilde(db);
  }

  let store = SqliteStore::open(&settings.db_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.db_path))?;

  let mut prompt = prompt::StdinPrompt;

  match cli.command {
    Command::Add { name, fields } => commands::add(&store, &mut prompt, name, fields).await,
    Command::List => commands::list(&store).await,
    Command::Show { id } => commands::show(&store, id).await,
    Command::Search { term } => commands::search(&store, &term).await,
    Command::Update { id, name, fields } => {
      commands::update(&store, &mut prompt, id, fields.into_patch(name)).await
    }
    Command::Delete { id, yes } => commands::delete(&store, &mut prompt, id, yes).await,
    Command::Stats => commands::stats(&store).await,
    Command::Export { path } => commands::export(&store, &settings, path).await,
    Command::Import { path } => commands::import(&store, &path).await,
    Command::Backup => commands::backup(&store, &settings).await,
    Command::Restore { path } => commands::restore(&store, &mut prompt, &path).await,
    Command::Reset => commands::reset(&store, &mut prompt, &settings).await,
    Command::QuickReset { no_backup } => commands::quick_reset(&store, &settings, !no_backup).await,
    Command::Clean { yes } => commands::clean(&store, &mut prompt, yes).await,
    Command::Find { place, count, api_key } => {
      if let Some(key) = api_key {
        settings.anthropic_api_key = key;
      }
      commands::find(&store, &settings, &place.join(" "), count.as_deref()).await
    }
    Command::Serve => commands::serve(store, &settings).await,
  }
}
