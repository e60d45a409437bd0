//! CSV codec for records.
//!
//! Export writes every column, timestamps included. Import only reads the
//! `Name`, `Link`, `Location` and `Description` columns, matched by exact
//! header text; any other column (`ID`, timestamps) is ignored, and a
//! missing column reads as the empty string.

use std::io;

use chrono::SecondsFormat;
use snapmap_core::{NewRecord, Record};

use crate::Result;

/// Header row written by [`write_records`], in column order.
pub const HEADER: [&str; 7] =
  ["ID", "Name", "Link", "Location", "Description", "Created At", "Updated At"];

// ─── Write ───────────────────────────────────────────────────────────────────

/// Write a header row followed by one row per record.
pub fn write_records<W: io::Write>(writer: W, records: &[Record]) -> Result<()> {
  let mut w = csv::Writer::from_writer(writer);
  w.write_record(HEADER)?;
  for r in records {
    let id = r.id.to_string();
    let created = r.created_at.to_rfc3339_opts(SecondsFormat::Micros, true);
    let updated = r.updated_at.to_rfc3339_opts(SecondsFormat::Micros, true);
    w.write_record([
      id.as_str(),
      r.name.as_str(),
      r.link.as_str(),
      r.location.as_str(),
      r.description.as_str(),
      created.as_str(),
      updated.as_str(),
    ])?;
  }
  w.flush().map_err(csv::Error::from)?;
  Ok(())
}

// ─── Read ────────────────────────────────────────────────────────────────────

struct Columns {
  name:        Option<usize>,
  link:        Option<usize>,
  location:    Option<usize>,
  description: Option<usize>,
}

impl Columns {
  fn from_headers(headers: &csv::StringRecord) -> Self {
    let find = |wanted: &str| headers.iter().position(|h| h == wanted);
    Self {
      name:        find("Name"),
      link:        find("Link"),
      location:    find("Location"),
      description: find("Description"),
    }
  }
}

fn field(row: &csv::StringRecord, idx: Option<usize>) -> String {
  idx.and_then(|i| row.get(i)).unwrap_or_default().to_owned()
}

/// Read every data row into a [`NewRecord`].
///
/// Rows shorter than the header are accepted; absent cells become empty
/// strings. Any read error fails the whole call, so a caller never sees a
/// partial file.
pub fn read_rows<R: io::Read>(reader: R) -> Result<Vec<NewRecord>> {
  let mut rdr = csv::ReaderBuilder::new()
    .has_headers(true)
    .flexible(true)
    .from_reader(reader);

  let cols = Columns::from_headers(rdr.headers()?);

  let mut rows = Vec::new();
  for row in rdr.records() {
    let row = row?;
    rows.push(NewRecord {
      name:        field(&row, cols.name),
      link:        field(&row, cols.link),
      location:    field(&row, cols.location),
      description: field(&row, cols.description),
    });
  }
  Ok(rows)
}

#[cfg(test)]
mod tests {
  use chrono::{TimeZone, Utc};

  use super::*;

  fn record(id: i64, name: &str, description: &str) -> Record {
    let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
    Record {
      id,
      name: name.into(),
      link: "".into(),
      location: "Main St".into(),
      description: description.into(),
      created_at: at,
      updated_at: at,
    }
  }

  #[test]
  fn writes_header_and_rows() {
    let mut buf = Vec::new();
    write_records(&mut buf, &[record(7, "Soup Kitchen", "Hot meals")]).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let mut lines = text.lines();

    assert_eq!(
      lines.next(),
      Some("ID,Name,Link,Location,Description,Created At,Updated At")
    );
    assert_eq!(
      lines.next(),
      Some(
        "7,Soup Kitchen,,Main St,Hot meals,2025-01-02T03:04:05.000000Z,2025-01-02T03:04:05.000000Z"
      )
    );
    assert_eq!(lines.next(), None);
  }

  #[test]
  fn embedded_commas_and_newlines_survive() {
    let mut buf = Vec::new();
    write_records(&mut buf, &[record(1, "Bread, Inc.", "line one\nline two")]).unwrap();

    let rows = read_rows(buf.as_slice()).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Bread, Inc.");
    assert_eq!(rows[0].description, "line one\nline two");
  }

  #[test]
  fn import_ignores_id_and_timestamps_and_defaults_missing_columns() {
    let input = "ID,Name,Location,Created At\n99,Pantry,Oakland,2020-01-01\n";
    let rows = read_rows(input.as_bytes()).unwrap();

    assert_eq!(rows, vec![NewRecord::new("Pantry", "", "Oakland", "")]);
  }

  #[test]
  fn headers_are_case_sensitive() {
    let input = "name,Location\nPantry,Oakland\n";
    let rows = read_rows(input.as_bytes()).unwrap();
    assert_eq!(rows, vec![NewRecord::new("", "", "Oakland", "")]);
  }

  #[test]
  fn short_rows_import_with_empty_defaults() {
    let input = "Name,Link,Location,Description\nPantry\n";
    let rows = read_rows(input.as_bytes()).unwrap();
    assert_eq!(rows, vec![NewRecord::named("Pantry")]);
  }
}
