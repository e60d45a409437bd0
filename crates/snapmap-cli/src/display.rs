//! Plain-text rendering for terminal output.

use std::fmt::Write as _;

use chrono::{DateTime, Local, Utc};
use snapmap_core::{DuplicateGroup, Record, StoreStats};

const ID_WIDTH: usize = 5;
const NAME_WIDTH: usize = 20;
const LINK_WIDTH: usize = 30;
const LOCATION_WIDTH: usize = 20;
const DESCRIPTION_WIDTH: usize = 25;

const RULE_WIDTH: usize = 100;

/// Groups listed individually by [`duplicate_summary`].
const DUPLICATES_SHOWN: usize = 10;

/// Cut `s` to at most `width` characters, marking the cut with `...`.
pub fn truncate(s: &str, width: usize) -> String {
  if s.chars().count() <= width {
    return s.to_string();
  }
  let kept: String = s.chars().take(width.saturating_sub(3)).collect();
  format!("{kept}...")
}

fn local(ts: DateTime<Utc>) -> String {
  ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// Fixed-width table, one row per record.
pub fn records_table(records: &[Record]) -> String {
  if records.is_empty() {
    return "No records found.\n".to_string();
  }

  let mut out = String::new();
  let _ = writeln!(out, "\n{}", "=".repeat(RULE_WIDTH));
  let _ = writeln!(
    out,
    "{:<ID_WIDTH$} {:<NAME_WIDTH$} {:<LINK_WIDTH$} {:<LOCATION_WIDTH$} {:<DESCRIPTION_WIDTH$}",
    "ID", "Name", "Link", "Location", "Description"
  );
  let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
  for r in records {
    let _ = writeln!(
      out,
      "{:<ID_WIDTH$} {:<NAME_WIDTH$} {:<LINK_WIDTH$} {:<LOCATION_WIDTH$} {:<DESCRIPTION_WIDTH$}",
      r.id,
      truncate(&r.name, NAME_WIDTH),
      truncate(&r.link, LINK_WIDTH),
      truncate(&r.location, LOCATION_WIDTH),
      truncate(&r.description, DESCRIPTION_WIDTH),
    );
  }
  let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
  out
}

/// Every field of one record, untruncated.
pub fn record_detail(r: &Record) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "ID:          {}", r.id);
  let _ = writeln!(out, "Name:        {}", r.name);
  let _ = writeln!(out, "Link:        {}", r.link);
  let _ = writeln!(out, "Location:    {}", r.location);
  let _ = writeln!(out, "Description: {}", r.description);
  let _ = writeln!(out, "Created:     {}", local(r.created_at));
  let _ = writeln!(out, "Updated:     {}", local(r.updated_at));
  out
}

// ─── Stats ───────────────────────────────────────────────────────────────────

pub fn stats_view(stats: &StoreStats) -> String {
  let rule = "=".repeat(50);
  let mut out = String::new();
  let _ = writeln!(out, "\n{rule}\nDATABASE STATISTICS\n{rule}");
  let _ = writeln!(out, "\nTotal records: {}", stats.total);
  let _ = writeln!(out, "Records with links: {}", stats.with_links);
  let _ = writeln!(out, "Records without links: {}", stats.without_links);

  if let (Some(oldest), Some(newest)) = (stats.oldest, stats.newest) {
    let _ = writeln!(out, "\nDate range:");
    let _ = writeln!(out, "  Oldest: {}", local(oldest));
    let _ = writeln!(out, "  Newest: {}", local(newest));
  }

  if !stats.top_locations.is_empty() {
    let _ = writeln!(out, "\nTop locations:");
    for loc in &stats.top_locations {
      let _ = writeln!(out, "  • {}: {} records", loc.location, loc.count);
    }
  }
  let _ = writeln!(out, "{rule}");
  out
}

// ─── Maintenance ─────────────────────────────────────────────────────────────

/// `512 bytes`, `1.5 KB`, `2.3 MB`.
pub fn human_size(bytes: u64) -> String {
  const KB: u64 = 1024;
  const MB: u64 = 1024 * 1024;
  match bytes {
    b if b < KB => format!("{b} bytes"),
    b if b < MB => format!("{:.1} KB", b as f64 / KB as f64),
    b => format!("{:.1} MB", b as f64 / MB as f64),
  }
}

/// The first few duplicate groups and how many rows a collapse would remove.
pub fn duplicate_summary(groups: &[DuplicateGroup]) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "\nFound {} sets of duplicates:", groups.len());
  for g in groups.iter().take(DUPLICATES_SHOWN) {
    let _ = writeln!(out, "  • '{}': {} copies", truncate(&g.name, 40), g.count);
  }
  if groups.len() > DUPLICATES_SHOWN {
    let _ = writeln!(out, "  ... and {} more", groups.len() - DUPLICATES_SHOWN);
  }
  let surplus: u64 = groups.iter().map(DuplicateGroup::surplus).sum();
  let _ = writeln!(out, "\nTotal duplicate records that would be removed: {surplus}");
  out
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;
  use snapmap_core::LocationCount;

  use super::*;

  fn record(id: i64, name: &str, link: &str) -> Record {
    let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    Record {
      id,
      name: name.into(),
      link: link.into(),
      location: "Pittsburgh".into(),
      description: "Hot meals".into(),
      created_at: ts,
      updated_at: ts,
    }
  }

  #[test]
  fn truncation_marks_the_cut() {
    assert_eq!(truncate("short", 20), "short");
    assert_eq!(truncate("exactly twenty chars", 20), "exactly twenty chars");
    assert_eq!(truncate("twenty-one characters", 20), "twenty-one charac...");
    assert_eq!(truncate("ünïcödé wörds everywhere", 10), "ünïcödé...");
  }

  #[test]
  fn empty_table() {
    assert_eq!(records_table(&[]), "No records found.\n");
  }

  #[test]
  fn table_rows_are_fixed_width() {
    let table = records_table(&[
      record(1, "Community Food Bank of Greater Pittsburgh", "https://example.org"),
      record(22, "Pantry", ""),
    ]);
    let rows: Vec<&str> = table.lines().filter(|l| l.starts_with(|c: char| c.is_ascii_digit())).collect();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].starts_with("1     Community Food Ba... https://example.org"));
    assert!(rows[1].starts_with("22    Pantry "));
    assert!(table.contains("ID    Name"));
  }

  #[test]
  fn sizes() {
    assert_eq!(human_size(0), "0 bytes");
    assert_eq!(human_size(1023), "1023 bytes");
    assert_eq!(human_size(1536), "1.5 KB");
    assert_eq!(human_size(5 * 1024 * 1024), "5.0 MB");
  }

  #[test]
  fn duplicate_summary_caps_the_listing() {
    let groups: Vec<DuplicateGroup> = (0..12)
      .map(|i| DuplicateGroup { name: format!("Place {i}"), count: 3 })
      .collect();
    let text = duplicate_summary(&groups);
    assert!(text.contains("Found 12 sets of duplicates"));
    assert!(text.contains("'Place 9': 3 copies"));
    assert!(!text.contains("'Place 10'"));
    assert!(text.contains("... and 2 more"));
    assert!(text.contains("would be removed: 24"));
  }

  #[test]
  fn stats_without_records_skips_ranges() {
    let text = stats_view(&StoreStats::default());
    assert!(text.contains("Total records: 0"));
    assert!(!text.contains("Date range"));
    assert!(!text.contains("Top locations"));
  }

  #[test]
  fn stats_lists_top_locations() {
    let ts = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let stats = StoreStats {
      total:         3,
      top_locations: vec![LocationCount { location: "Oakland".into(), count: 2 }],
      with_links:    1,
      without_links: 2,
      oldest:        Some(ts),
      newest:        Some(ts),
    };
    let text = stats_view(&stats);
    assert!(text.contains("Records without links: 2"));
    assert!(text.contains("Date range"));
    assert!(text.contains("  • Oakland: 2 records"));
  }
}
