//! [`SqliteStore`]: the SQLite implementation of [`RecordStore`].

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{OptionalExtension as _, types::Value};
use snapmap_core::{
  CollapseReport, DuplicateGroup, LocationCount, NewRecord, Record, RecordPatch,
  RecordQuery, RecordStore, SNAP_TERMS, StoreStats, UpdateOutcome,
};
use tracing::{debug, info, warn};

use crate::{
  Result,
  encode::{RawRecord, contains_pattern, decode_opt_dt, encode_dt},
  schema::{RECORD_COLUMNS, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A record store backed by a single SQLite file.
///
/// Holds only the path. Each operation acquires its own connection and
/// releases it before returning, including on error.
#[derive(Debug, Clone)]
pub struct SqliteStore {
  path: PathBuf,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let store = Self { path: path.as_ref().to_path_buf() };
    store.init_schema().await?;
    Ok(store)
  }

  pub fn path(&self) -> &Path { &self.path }

  async fn init_schema(&self) -> Result<()> {
    self
      .with_conn(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    debug!(path = %self.path.display(), "schema ready");
    Ok(())
  }

  /// Run `f` on a fresh connection, then close it whatever `f` returned.
  async fn with_conn<F, R>(&self, f: F) -> Result<R>
  where
    F: FnOnce(&mut rusqlite::Connection) -> tokio_rusqlite::Result<R> + Send + 'static,
    R: Send + 'static,
  {
    let conn = tokio_rusqlite::Connection::open(&self.path).await?;
    let out = conn.call(f).await;
    if let Err(e) = conn.close().await {
      warn!(path = %self.path.display(), "failed to close connection: {e}");
    }
    Ok(out?)
  }

  async fn select_records(
    &self,
    sql: String,
    params: Vec<String>,
  ) -> Result<Vec<Record>> {
    let raws: Vec<RawRecord> = self
      .with_conn(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), RawRecord::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawRecord::into_record).collect()
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = crate::Error;

  async fn initialize(&self) -> Result<()> { self.init_schema().await }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn add(&self, input: NewRecord) -> Result<i64> {
    let now = encode_dt(Utc::now());
    let name = input.name.clone();

    let id = self
      .with_conn(move |conn| {
        conn.execute(
          "INSERT INTO records (name, link, location, description, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
          rusqlite::params![
            input.name,
            input.link,
            input.location,
            input.description,
            now,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    info!(id, name = %name, "record added");
    Ok(id)
  }

  async fn update(&self, id: i64, patch: RecordPatch) -> Result<UpdateOutcome> {
    if patch.is_empty() {
      warn!(id, "no fields to update");
      return Ok(UpdateOutcome::NothingToUpdate);
    }

    // Column names come from the patch's static list; values are bound.
    let assignments = patch.assignments();
    let mut sets: Vec<String> = assignments
      .iter()
      .enumerate()
      .map(|(i, (col, _))| format!("{col} = ?{}", i + 1))
      .collect();
    let mut values: Vec<Value> = assignments
      .iter()
      .map(|(_, v)| Value::Text((*v).to_owned()))
      .collect();

    values.push(Value::Text(encode_dt(Utc::now())));
    sets.push(format!("updated_at = MAX(updated_at, ?{})", values.len()));
    values.push(Value::Integer(id));
    let sql = format!("UPDATE records SET {} WHERE id = ?{}", sets.join(", "), values.len());

    let changed = self
      .with_conn(move |conn| {
        Ok(conn.execute(&sql, rusqlite::params_from_iter(values.iter()))?)
      })
      .await?;

    if changed > 0 {
      info!(id, "record updated");
      Ok(UpdateOutcome::Updated)
    } else {
      warn!(id, "no record found");
      Ok(UpdateOutcome::NotFound)
    }
  }

  async fn delete(&self, id: i64) -> Result<bool> {
    let changed = self
      .with_conn(move |conn| {
        Ok(conn.execute("DELETE FROM records WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;

    if changed > 0 {
      info!(id, "record deleted");
    } else {
      warn!(id, "no record found");
    }
    Ok(changed > 0)
  }

  async fn wipe(&self) -> Result<()> {
    let removed = self
      .with_conn(|conn| {
        let tx = conn.transaction()?;
        let removed = tx.execute("DELETE FROM records", [])?;
        tx.execute("DELETE FROM sqlite_sequence WHERE name = 'records'", [])?;
        tx.commit()?;
        // VACUUM cannot run inside a transaction.
        conn.execute_batch("VACUUM")?;
        Ok(removed)
      })
      .await?;

    info!(removed, "all records deleted, id sequence reset");
    Ok(())
  }

  async fn collapse_duplicates(&self) -> Result<CollapseReport> {
    let report = self
      .with_conn(|conn| {
        let tx = conn.transaction()?;
        let groups: i64 = tx.query_row(
          "SELECT COUNT(*) FROM (
             SELECT name FROM records GROUP BY name HAVING COUNT(*) > 1
           )",
          [],
          |r| r.get(0),
        )?;
        let removed = tx.execute(
          "DELETE FROM records
           WHERE id NOT IN (SELECT MAX(id) FROM records GROUP BY name)",
          [],
        )?;
        tx.commit()?;
        Ok(CollapseReport { groups: groups as u64, removed: removed as u64 })
      })
      .await?;

    info!(groups = report.groups, removed = report.removed, "duplicates collapsed");
    Ok(report)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get_all(&self) -> Result<Vec<Record>> {
    self
      .select_records(
        format!("SELECT {RECORD_COLUMNS} FROM records ORDER BY created_at DESC, id DESC"),
        vec![],
      )
      .await
  }

  async fn get_by_id(&self, id: i64) -> Result<Option<Record>> {
    let raw: Option<RawRecord> = self
      .with_conn(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {RECORD_COLUMNS} FROM records WHERE id = ?1"),
              rusqlite::params![id],
              RawRecord::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawRecord::into_record).transpose()
  }

  async fn search(&self, term: &str) -> Result<Vec<Record>> {
    self
      .select_records(
        format!(
          "SELECT {RECORD_COLUMNS} FROM records
           WHERE name LIKE ?1 ESCAPE '\\'
              OR description LIKE ?1 ESCAPE '\\'
              OR location LIKE ?1 ESCAPE '\\'
           ORDER BY name"
        ),
        vec![contains_pattern(term)],
      )
      .await
  }

  async fn query(&self, query: &RecordQuery) -> Result<Vec<Record>> {
    fn like(column: &str, term: &str, params: &mut Vec<String>) -> String {
      params.push(contains_pattern(term));
      format!("{column} LIKE ?{} ESCAPE '\\'", params.len())
    }

    let mut conds: Vec<String> = Vec::new();
    let mut params: Vec<String> = Vec::new();

    if let Some(text) = &query.text {
      let name = like("name", text, &mut params);
      let description = like("description", text, &mut params);
      conds.push(format!("({name} OR {description})"));
    }

    if !query.locations.is_empty() {
      let any: Vec<String> = query
        .locations
        .iter()
        .map(|loc| like("location", loc, &mut params))
        .collect();
      conds.push(format!("({})", any.join(" OR ")));
    }

    if query.snap_accepting {
      let any: Vec<String> = SNAP_TERMS
        .iter()
        .map(|term| like("description", term, &mut params))
        .collect();
      conds.push(format!("({})", any.join(" OR ")));
    }

    let where_clause = if conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", conds.join(" AND "))
    };

    debug!(?query, "record query");
    self
      .select_records(
        format!("SELECT {RECORD_COLUMNS} FROM records {where_clause} ORDER BY name"),
        params,
      )
      .await
  }

  async fn count(&self) -> Result<u64> {
    let n: i64 = self
      .with_conn(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM records", [], |r| r.get(0))?)
      })
      .await?;
    Ok(n as u64)
  }

  async fn stats(&self) -> Result<StoreStats> {
    let (total, top, with_links, oldest, newest) = self
      .with_conn(|conn| {
        let total: i64 = conn.query_row("SELECT COUNT(*) FROM records", [], |r| r.get(0))?;

        let mut stmt = conn.prepare(
          "SELECT location, COUNT(*) AS count
           FROM records
           GROUP BY location
           ORDER BY count DESC
           LIMIT 5",
        )?;
        let top = stmt
          .query_map([], |r| {
            Ok(LocationCount {
              location: r.get::<_, Option<String>>(0)?.unwrap_or_default(),
              count:    r.get::<_, i64>(1)? as u64,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let with_links: i64 = conn.query_row(
          "SELECT COUNT(*) FROM records WHERE link != ''",
          [],
          |r| r.get(0),
        )?;

        let (oldest, newest): (Option<String>, Option<String>) = conn.query_row(
          "SELECT MIN(created_at), MAX(created_at) FROM records",
          [],
          |r| Ok((r.get(0)?, r.get(1)?)),
        )?;

        Ok((total as u64, top, with_links as u64, oldest, newest))
      })
      .await?;

    Ok(StoreStats {
      total,
      top_locations: top,
      with_links,
      without_links: total - with_links,
      oldest: decode_opt_dt(oldest)?,
      newest: decode_opt_dt(newest)?,
    })
  }

  async fn duplicate_groups(&self) -> Result<Vec<DuplicateGroup>> {
    self
      .with_conn(|conn| {
        let mut stmt = conn.prepare(
          "SELECT name, COUNT(*) AS count
           FROM records
           GROUP BY name
           HAVING count > 1
           ORDER BY count DESC, name",
        )?;
        let groups = stmt
          .query_map([], |r| {
            Ok(DuplicateGroup {
              name:  r.get(0)?,
              count: r.get::<_, i64>(1)? as u64,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(groups)
      })
      .await
  }
}
