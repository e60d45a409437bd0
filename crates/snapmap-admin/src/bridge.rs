//! Export a store to a CSV file and append a CSV file into a store.

use std::{
  fs::{self, File},
  io::{self, BufReader, BufWriter},
  path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use snapmap_core::{Record, RecordStore};
use tracing::{info, warn};

use crate::{
  Error, Result,
  codec::{read_rows, write_records},
};

/// `database_backup_YYYYMMDD_HHMMSS.csv` for the given local time.
pub fn default_backup_name(now: DateTime<Local>) -> String {
  format!("database_backup_{}.csv", now.format("%Y%m%d_%H%M%S"))
}

/// Write every record, newest first, to `path`.
///
/// Without a `path` the file is named by [`default_backup_name`] inside
/// `dir`. An empty store is [`Error::NothingToExport`] and creates no file;
/// a failed write removes the partial file.
pub async fn export<S: RecordStore>(
  store: &S,
  path: Option<&Path>,
  dir: &Path,
) -> Result<PathBuf> {
  let records = store.get_all().await.map_err(Error::store)?;
  if records.is_empty() {
    warn!("no records to export");
    return Err(Error::NothingToExport);
  }

  let path = match path {
    Some(p) => p.to_path_buf(),
    None => dir.join(default_backup_name(Local::now())),
  };

  let file = File::create(&path).map_err(|source| Error::Io { path: path.clone(), source })?;
  write_or_discard(&path, BufWriter::new(file), &records)?;

  info!(count = records.len(), path = %path.display(), "exported records");
  Ok(path)
}

/// Write `records` through `writer`, deleting `path` if that fails.
fn write_or_discard<W: io::Write>(path: &Path, writer: W, records: &[Record]) -> Result<()> {
  let Err(e) = write_records(writer, records) else {
    return Ok(());
  };
  match fs::remove_file(path) {
    Ok(()) => warn!(path = %path.display(), "export failed; partial file removed"),
    Err(rm) => warn!(path = %path.display(), "export failed; could not remove partial file: {rm}"),
  }
  Err(e)
}

/// Outcome of [`import`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
  pub imported: usize,
  /// Rows the store refused; each was logged and skipped.
  pub failed:   usize,
}

/// Append every data row of `path` as a new record.
///
/// Ids and timestamps in the file are ignored; each row gets fresh ones. A
/// missing or unreadable file fails before anything is inserted. A row the
/// store rejects is logged and the rest still go in.
pub async fn import<S: RecordStore>(store: &S, path: &Path) -> Result<ImportReport> {
  let file = File::open(path).map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
  let rows = read_rows(BufReader::new(file))?;

  let mut report = ImportReport::default();
  for row in rows {
    let name = row.name.clone();
    match store.add(row).await {
      Ok(_) => report.imported += 1,
      Err(e) => {
        warn!(name = %name, "failed to import row: {e}");
        report.failed += 1;
      }
    }
  }

  info!(
    imported = report.imported,
    failed = report.failed,
    path = %path.display(),
    "imported records"
  );
  Ok(report)
}
