//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are written as RFC 3339 UTC strings with a fixed microsecond
//! precision, so lexical order in SQL equals chronological order. Files
//! created by older tooling may hold `YYYY-MM-DD HH:MM:SS` values from
//! SQLite's `CURRENT_TIMESTAMP`; those decode as UTC.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use snapmap_core::Record;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.with_timezone(&Utc));
  }
  NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
    .map(|naive| naive.and_utc())
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

pub fn decode_opt_dt(s: Option<String>) -> Result<Option<DateTime<Utc>>> {
  s.as_deref().map(decode_dt).transpose()
}

// ─── LIKE patterns ───────────────────────────────────────────────────────────

/// `%term%` with `\`, `%` and `_` escaped, for `LIKE ?n ESCAPE '\'`, so the
/// term only ever matches as a literal substring.
pub fn contains_pattern(term: &str) -> String {
  let mut out = String::with_capacity(term.len() + 2);
  out.push('%');
  for c in term.chars() {
    if matches!(c, '\\' | '%' | '_') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('%');
  out
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `records` row.
///
/// Text columns are read as `Option` so rows written without the `NOT NULL`
/// defaults still load, as empty strings.
pub struct RawRecord {
  pub id:          i64,
  pub name:        Option<String>,
  pub link:        Option<String>,
  pub location:    Option<String>,
  pub description: Option<String>,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawRecord {
  /// Map a row selected with [`RECORD_COLUMNS`](crate::schema::RECORD_COLUMNS).
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      name:        row.get(1)?,
      link:        row.get(2)?,
      location:    row.get(3)?,
      description: row.get(4)?,
      created_at:  row.get(5)?,
      updated_at:  row.get(6)?,
    })
  }

  pub fn into_record(self) -> Result<Record> {
    Ok(Record {
      id:          self.id,
      name:        self.name.unwrap_or_default(),
      link:        self.link.unwrap_or_default(),
      location:    self.location.unwrap_or_default(),
      description: self.description.unwrap_or_default(),
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}
