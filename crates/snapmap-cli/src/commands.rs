//! One async fn per subcommand.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::{Context as _, Result, bail};
use snapmap_admin::{
  Prompt,
  maintenance::{self, CleanOutcome, ResetOptions, ResetOutcome, RestoreOutcome},
};
use snapmap_core::{NewRecord, RecordPatch, RecordStore, UpdateOutcome};
use snapmap_ingest::{AnthropicClient, ingest, parse_count};
use snapmap_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::info;

use crate::{FieldArgs, display, settings::Settings};

// ─── Records ─────────────────────────────────────────────────────────────────

pub async fn add(
  store: &SqliteStore,
  prompt: &mut dyn Prompt,
  name: Option<String>,
  fields: FieldArgs,
) -> Result<()> {
  let record = match name {
    Some(name) => NewRecord {
      name,
      link: fields.link.unwrap_or_default(),
      location: fields.location.unwrap_or_default(),
      description: fields.description.unwrap_or_default(),
    },
    None => NewRecord {
      name:        prompt.ask("Name (required): "),
      link:        prompt.ask("Link (optional): "),
      location:    prompt.ask("Location: "),
      description: prompt.ask("Description: "),
    },
  };

  if record.name.trim().is_empty() {
    bail!("Name is required!");
  }

  let id = store.add(record).await?;
  println!("✓ Record added with ID {id}");
  Ok(())
}

pub async fn list(store: &SqliteStore) -> Result<()> {
  let records = store.get_all().await?;
  print!("{}", display::records_table(&records));
  Ok(())
}

pub async fn show(store: &SqliteStore, id: i64) -> Result<()> {
  match store.get_by_id(id).await? {
    Some(record) => print!("{}", display::record_detail(&record)),
    None => println!("Record {id} not found."),
  }
  Ok(())
}

pub async fn search(store: &SqliteStore, term: &str) -> Result<()> {
  let records = store.search(term).await?;
  println!("Found {} matching records.", records.len());
  print!("{}", display::records_table(&records));
  Ok(())
}

pub async fn update(
  store: &SqliteStore,
  prompt: &mut dyn Prompt,
  id: i64,
  patch: RecordPatch,
) -> Result<()> {
  let Some(current) = store.get_by_id(id).await? else {
    println!("Record {id} not found.");
    return Ok(());
  };

  let patch = if patch.is_empty() {
    print!("{}", display::record_detail(&current));
    println!("\nPress Enter to keep the current value.");
    let changed = |answer: String| (!answer.is_empty()).then_some(answer);
    RecordPatch {
      name:        changed(prompt.ask("New name: ")),
      link:        changed(prompt.ask("New link: ")),
      location:    changed(prompt.ask("New location: ")),
      description: changed(prompt.ask("New description: ")),
    }
  } else {
    patch
  };

  match store.update(id, patch).await? {
    UpdateOutcome::Updated => println!("✓ Record {id} updated"),
    UpdateOutcome::NotFound => println!("Record {id} not found."),
    UpdateOutcome::NothingToUpdate => println!("No changes made."),
  }
  Ok(())
}

pub async fn delete(store: &SqliteStore, prompt: &mut dyn Prompt, id: i64, yes: bool) -> Result<()> {
  let Some(record) = store.get_by_id(id).await? else {
    println!("Record {id} not found.");
    return Ok(());
  };

  if !yes && !prompt.confirm(&format!("Are you sure you want to delete '{}' (ID {id})?", record.name)) {
    println!("Deletion cancelled.");
    return Ok(());
  }

  if store.delete(id).await? {
    println!("✓ Record {id} deleted");
  } else {
    println!("Record {id} not found.");
  }
  Ok(())
}

pub async fn stats(store: &SqliteStore) -> Result<()> {
  let stats = store.stats().await?;
  print!("{}", display::stats_view(&stats));
  Ok(())
}

// ─── CSV ─────────────────────────────────────────────────────────────────────

pub async fn export(store: &SqliteStore, settings: &Settings, path: Option<PathBuf>) -> Result<()> {
  match snapmap_admin::export(store, path.as_deref(), &settings.backup_dir).await {
    Ok(path) => println!("✓ Exported records to {}", path.display()),
    Err(snapmap_admin::Error::NothingToExport) => println!("No records to export."),
    Err(e) => return Err(e.into()),
  }
  Ok(())
}

pub async fn import(store: &SqliteStore, path: &Path) -> Result<()> {
  let report = snapmap_admin::import(store, path)
    .await
    .with_context(|| format!("failed to import {}", path.display()))?;
  println!("✓ Imported {} records", report.imported);
  if report.failed > 0 {
    println!("  {} rows could not be imported", report.failed);
  }
  Ok(())
}

// ─── Maintenance ─────────────────────────────────────────────────────────────

pub async fn backup(store: &SqliteStore, settings: &Settings) -> Result<()> {
  match maintenance::backup(store, &settings.backup_dir).await {
    Ok(report) => {
      println!("✓ Backup created: {}", report.path.display());
      println!("  Records: {}", report.records);
      println!("  Size: {}", display::human_size(report.bytes));
    }
    Err(snapmap_admin::Error::NothingToExport) => println!("No records to back up."),
    Err(e) => return Err(e.into()),
  }
  Ok(())
}

pub async fn restore(store: &SqliteStore, prompt: &mut dyn Prompt, path: &Path) -> Result<()> {
  match maintenance::restore(store, path, prompt).await? {
    RestoreOutcome::Cancelled => println!("Restore cancelled."),
    RestoreOutcome::Restored { report, total } => {
      println!("✓ Restored {} records", report.imported);
      if report.failed > 0 {
        println!("  {} rows could not be imported", report.failed);
      }
      println!("  Total records now: {total}");
    }
  }
  Ok(())
}

pub async fn reset(store: &SqliteStore, prompt: &mut dyn Prompt, settings: &Settings) -> Result<()> {
  let opts = ResetOptions {
    require_confirmation: true,
    offer_backup:         true,
    backup_dir:           settings.backup_dir.clone(),
  };
  report_reset(maintenance::reset(store, &opts, prompt).await?);
  Ok(())
}

pub async fn quick_reset(store: &SqliteStore, settings: &Settings, backup: bool) -> Result<()> {
  report_reset(maintenance::quick_reset(store, backup, &settings.backup_dir).await?);
  Ok(())
}

fn report_reset(outcome: ResetOutcome) {
  match outcome {
    ResetOutcome::AlreadyEmpty => println!("Database is already empty."),
    ResetOutcome::Cancelled => println!("Reset cancelled."),
    ResetOutcome::Reset { removed, backup } => {
      if let Some(path) = backup {
        println!("✓ Backup saved to: {}", path.display());
      }
      println!("✓ Database reset; {removed} records deleted");
    }
  }
}

pub async fn clean(store: &SqliteStore, prompt: &mut dyn Prompt, yes: bool) -> Result<()> {
  let outcome = maintenance::clean(store, |groups| {
    print!("{}", display::duplicate_summary(groups));
    yes || prompt.confirm("\nRemove duplicates (keeping the newest of each)?")
  })
  .await?;

  match outcome {
    CleanOutcome::NoDuplicates => println!("✓ No duplicate records found!"),
    CleanOutcome::Cancelled { .. } => println!("Cleanup cancelled."),
    CleanOutcome::Collapsed(report) => {
      println!("✓ Removed {} duplicate records", report.removed);
      let remaining = store.count().await?;
      println!("  Records remaining: {remaining}");
    }
  }
  Ok(())
}

// ─── Ingestion ───────────────────────────────────────────────────────────────

pub async fn find(
  store: &SqliteStore,
  settings: &Settings,
  place: &str,
  count: Option<&str>,
) -> Result<()> {
  let count = parse_count(count);
  let client = AnthropicClient::new(settings.anthropic())?;

  println!("Searching for {count} food opportunities in {place}...");
  let report = ingest(store, &client, place, count, settings.generation_params())
    .await
    .with_context(|| format!("could not find opportunities in {place}"))?;

  println!("✓ Saved {} of {} opportunities", report.saved(), report.extracted);
  if report.failed > 0 {
    println!("  {} could not be saved", report.failed);
  }

  let mut saved = Vec::with_capacity(report.saved_ids.len());
  for id in &report.saved_ids {
    if let Some(record) = store.get_by_id(*id).await? {
      saved.push(record);
    }
  }
  println!("\nNewly saved records:");
  print!("{}", display::records_table(&saved));
  Ok(())
}

// ─── Server ──────────────────────────────────────────────────────────────────

pub async fn serve(store: SqliteStore, settings: &Settings) -> Result<()> {
  let app = snapmap_api::api_router(Arc::new(store));
  let address = settings.listen_address();

  info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}
