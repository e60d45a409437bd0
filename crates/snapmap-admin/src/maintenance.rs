//! Bulk operations layered on a [`RecordStore`]: guarded reset, quick
//! reset, backup, restore and duplicate cleanup.
//!
//! Anything that needs a human answer goes through [`Prompt`], so the same
//! flows run from an interactive terminal or from a scripted test.

use std::path::{Path, PathBuf};

use snapmap_core::{CollapseReport, DuplicateGroup, RecordStore};
use tracing::{info, warn};

use crate::{
  Error, Result,
  bridge::{ImportReport, export, import},
};

/// Literal the user must type to confirm a guarded reset.
pub const RESET_TOKEN: &str = "RESET";

// ─── Prompt ──────────────────────────────────────────────────────────────────

/// Source of answers for interactive confirmations.
pub trait Prompt {
  /// Show `question` and return the trimmed reply.
  fn ask(&mut self, question: &str) -> String;

  /// A yes/no question; only `y`/`Y` counts as yes.
  fn confirm(&mut self, question: &str) -> bool {
    self.ask(&format!("{question} (y/n): ")).eq_ignore_ascii_case("y")
  }
}

// ─── Reset ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ResetOptions {
  /// Ask for [`RESET_TOKEN`] before deleting anything.
  pub require_confirmation: bool,
  /// Offer a CSV backup first. Only consulted when confirming.
  pub offer_backup:         bool,
  /// Directory for auto-named backup files.
  pub backup_dir:           PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetOutcome {
  /// Confirmation was required but there was nothing to delete.
  AlreadyEmpty,
  /// The user declined; nothing was deleted.
  Cancelled,
  Reset {
    removed: u64,
    backup:  Option<PathBuf>,
  },
}

/// Wipe the store, optionally behind a confirmation token and a backup.
pub async fn reset<S: RecordStore>(
  store: &S,
  opts: &ResetOptions,
  prompt: &mut dyn Prompt,
) -> Result<ResetOutcome> {
  let count = store.count().await.map_err(Error::store)?;
  let mut backup = None;

  if opts.require_confirmation {
    if count == 0 {
      info!("database is already empty");
      return Ok(ResetOutcome::AlreadyEmpty);
    }

    warn!(count, "this will permanently delete ALL records; it cannot be undone");

    if opts.offer_backup && prompt.confirm("Would you like to create a backup first?") {
      backup = backup_or_warn(store, &opts.backup_dir).await;
    }

    let reply = prompt.ask(&format!(
      "Type '{RESET_TOKEN}' to confirm deletion of all records: "
    ));
    if reply != RESET_TOKEN {
      info!("reset cancelled");
      return Ok(ResetOutcome::Cancelled);
    }
  }

  store.wipe().await.map_err(Error::store)?;
  Ok(ResetOutcome::Reset { removed: count, backup })
}

/// Reset without confirmation. With `backup`, a non-empty store is first
/// exported to `backup_dir`; a failed export is logged and the reset goes on.
pub async fn quick_reset<S: RecordStore>(
  store: &S,
  backup: bool,
  backup_dir: &Path,
) -> Result<ResetOutcome> {
  let count = store.count().await.map_err(Error::store)?;

  let backup_path = if backup && count > 0 {
    info!(count, "creating automatic backup");
    backup_or_warn(store, backup_dir).await
  } else {
    None
  };

  store.wipe().await.map_err(Error::store)?;
  Ok(ResetOutcome::Reset { removed: count, backup: backup_path })
}

async fn backup_or_warn<S: RecordStore>(store: &S, dir: &Path) -> Option<PathBuf> {
  match export(store, None, dir).await {
    Ok(path) => Some(path),
    Err(e) => {
      warn!("backup failed: {e}");
      None
    }
  }
}

// ─── Backup / restore ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupReport {
  pub path:    PathBuf,
  pub records: u64,
  pub bytes:   u64,
}

/// Export every record to an auto-named file in `dir`.
pub async fn backup<S: RecordStore>(store: &S, dir: &Path) -> Result<BackupReport> {
  let records = store.count().await.map_err(Error::store)?;
  if records == 0 {
    return Err(Error::NothingToExport);
  }

  let path = export(store, None, dir).await?;
  let bytes = std::fs::metadata(&path)
    .map_err(|source| Error::Io { path: path.clone(), source })?
    .len();

  Ok(BackupReport { path, records, bytes })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
  Cancelled,
  Restored { report: ImportReport, total: u64 },
}

/// Import `path`, asking first when the store already holds records.
pub async fn restore<S: RecordStore>(
  store: &S,
  path: &Path,
  prompt: &mut dyn Prompt,
) -> Result<RestoreOutcome> {
  if !path.exists() {
    return Err(Error::Io {
      path:   path.to_path_buf(),
      source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
    });
  }

  let existing = store.count().await.map_err(Error::store)?;
  if existing > 0
    && !prompt.confirm(&format!("Database currently has {existing} records. Continue?"))
  {
    info!("restore cancelled");
    return Ok(RestoreOutcome::Cancelled);
  }

  let report = import(store, path).await?;
  let total = store.count().await.map_err(Error::store)?;
  Ok(RestoreOutcome::Restored { report, total })
}

// ─── Duplicate cleanup ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanOutcome {
  NoDuplicates,
  Cancelled { groups: Vec<DuplicateGroup> },
  Collapsed(CollapseReport),
}

/// Find names held by more than one record and, if `approve` agrees after
/// seeing them, keep only the newest (highest id) record of each.
pub async fn clean<S, F>(store: &S, approve: F) -> Result<CleanOutcome>
where
  S: RecordStore,
  F: FnOnce(&[DuplicateGroup]) -> bool,
{
  let groups = store.duplicate_groups().await.map_err(Error::store)?;
  if groups.is_empty() {
    info!("no duplicate records found");
    return Ok(CleanOutcome::NoDuplicates);
  }

  if !approve(&groups) {
    info!("cleanup cancelled");
    return Ok(CleanOutcome::Cancelled { groups });
  }

  let report = store.collapse_duplicates().await.map_err(Error::store)?;
  Ok(CleanOutcome::Collapsed(report))
}

#[cfg(test)]
mod tests {
  use std::collections::VecDeque;

  use snapmap_core::NewRecord;
  use snapmap_store_sqlite::SqliteStore;
  use tempfile::TempDir;

  use super::*;

  /// Replies in order; panics if asked more often than scripted.
  struct Scripted(VecDeque<&'static str>);

  impl Scripted {
    fn new(replies: &[&'static str]) -> Self { Self(replies.iter().copied().collect()) }
  }

  impl Prompt for Scripted {
    fn ask(&mut self, question: &str) -> String {
      self
        .0
        .pop_front()
        .unwrap_or_else(|| panic!("unexpected prompt: {question}"))
        .to_owned()
    }
  }

  async fn store_with(names: &[&str]) -> (TempDir, SqliteStore) {
    let dir = tempfile::tempdir().unwrap();
    let s = SqliteStore::open(dir.path().join("records.db")).await.unwrap();
    for n in names {
      s.add(NewRecord::named(*n)).await.unwrap();
    }
    (dir, s)
  }

  fn opts(dir: &TempDir) -> ResetOptions {
    ResetOptions {
      require_confirmation: true,
      offer_backup:         true,
      backup_dir:           dir.path().to_path_buf(),
    }
  }

  #[tokio::test]
  async fn confirmed_reset_of_empty_store_never_prompts() {
    let (dir, s) = store_with(&[]).await;
    let outcome = reset(&s, &opts(&dir), &mut Scripted::new(&[])).await.unwrap();
    assert_eq!(outcome, ResetOutcome::AlreadyEmpty);
  }

  #[tokio::test]
  async fn wrong_token_cancels() {
    let (dir, s) = store_with(&["A", "B"]).await;
    let outcome = reset(&s, &opts(&dir), &mut Scripted::new(&["n", "reset"]))
      .await
      .unwrap();
    assert_eq!(outcome, ResetOutcome::Cancelled);
    assert_eq!(s.count().await.unwrap(), 2);
  }

  #[tokio::test]
  async fn backup_then_reset() {
    let (dir, s) = store_with(&["A", "B"]).await;
    let outcome = reset(&s, &opts(&dir), &mut Scripted::new(&["y", "RESET"]))
      .await
      .unwrap();

    let ResetOutcome::Reset { removed, backup: Some(path) } = outcome else {
      panic!("expected a reset with backup, got {outcome:?}")
    };
    assert_eq!(removed, 2);
    assert!(path.exists());
    assert_eq!(s.count().await.unwrap(), 0);
  }

  #[tokio::test]
  async fn unconfirmed_reset_wipes_straight_away() {
    let (dir, s) = store_with(&["A"]).await;
    let mut o = opts(&dir);
    o.require_confirmation = false;

    let outcome = reset(&s, &o, &mut Scripted::new(&[])).await.unwrap();
    assert_eq!(outcome, ResetOutcome::Reset { removed: 1, backup: None });
    assert_eq!(s.add(NewRecord::named("B")).await.unwrap(), 1);
  }

  #[tokio::test]
  async fn quick_reset_backs_up_non_empty_store() {
    let (dir, s) = store_with(&["A", "B", "C"]).await;
    let outcome = quick_reset(&s, true, dir.path()).await.unwrap();

    let ResetOutcome::Reset { removed: 3, backup: Some(path) } = outcome else {
      panic!("unexpected {outcome:?}")
    };
    let restored = store_with(&[]).await;
    let report = import(&restored.1, &path).await.unwrap();
    assert_eq!(report.imported, 3);
  }

  #[tokio::test]
  async fn quick_reset_without_backup() {
    let (dir, s) = store_with(&["A"]).await;
    let outcome = quick_reset(&s, false, dir.path()).await.unwrap();
    assert_eq!(outcome, ResetOutcome::Reset { removed: 1, backup: None });
  }

  #[tokio::test]
  async fn backup_reports_size_and_count() {
    let (dir, s) = store_with(&["A", "B"]).await;
    let report = backup(&s, dir.path()).await.unwrap();
    assert_eq!(report.records, 2);
    assert!(report.bytes > 0);

    let (dir, empty) = store_with(&[]).await;
    assert!(matches!(backup(&empty, dir.path()).await, Err(Error::NothingToExport)));
  }

  #[tokio::test]
  async fn restore_asks_when_store_is_not_empty() {
    let (dir, s) = store_with(&["A"]).await;
    let path = export(&s, Some(&dir.path().join("b.csv")), dir.path()).await.unwrap();

    let outcome = restore(&s, &path, &mut Scripted::new(&["n"])).await.unwrap();
    assert_eq!(outcome, RestoreOutcome::Cancelled);

    let outcome = restore(&s, &path, &mut Scripted::new(&["y"])).await.unwrap();
    assert_eq!(
      outcome,
      RestoreOutcome::Restored {
        report: ImportReport { imported: 1, failed: 0 },
        total:  2,
      }
    );
  }

  #[tokio::test]
  async fn restore_missing_file_fails() {
    let (dir, s) = store_with(&[]).await;
    let err = restore(&s, &dir.path().join("gone.csv"), &mut Scripted::new(&[]))
      .await
      .unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
  }

  #[tokio::test]
  async fn clean_collapses_after_approval() {
    let (_dir, s) = store_with(&["A", "A", "B", "C", "C", "C"]).await;

    let outcome = clean(&s, |groups| {
      assert_eq!(groups.len(), 2);
      assert_eq!(groups[0].name, "C");
      groups.iter().map(DuplicateGroup::surplus).sum::<u64>() == 3
    })
    .await
    .unwrap();

    assert_eq!(outcome, CleanOutcome::Collapsed(CollapseReport { groups: 2, removed: 3 }));
    assert_eq!(s.count().await.unwrap(), 3);
  }

  #[tokio::test]
  async fn clean_respects_refusal_and_empty_case() {
    let (_dir, s) = store_with(&["A", "A"]).await;
    let outcome = clean(&s, |_| false).await.unwrap();
    assert!(matches!(outcome, CleanOutcome::Cancelled { ref groups } if groups.len() == 1));
    assert_eq!(s.count().await.unwrap(), 2);

    let (_dir, s) = store_with(&["A", "B"]).await;
    let outcome = clean(&s, |_| panic!("nothing to approve")).await.unwrap();
    assert_eq!(outcome, CleanOutcome::NoDuplicates);
  }
}
