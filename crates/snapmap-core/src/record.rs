//! [`Record`], the single persisted entity, and the value types that travel
//! with it in and out of a [`RecordStore`](crate::store::RecordStore).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Record ──────────────────────────────────────────────────────────────────

/// A stored record. Always a snapshot; mutating it does not touch the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
  /// Assigned by the store on insertion, never reused until a wipe.
  pub id:          i64,
  pub name:        String,
  pub link:        String,
  pub location:    String,
  pub description: String,
  pub created_at:  DateTime<Utc>,
  /// Refreshed on every successful field update; never before `created_at`.
  pub updated_at:  DateTime<Utc>,
}

impl Record {
  pub fn has_link(&self) -> bool { !self.link.is_empty() }
}

/// Input for [`RecordStore::add`](crate::store::RecordStore::add).
///
/// Optional text fields default to the empty string, never to null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecord {
  pub name:        String,
  #[serde(default)]
  pub link:        String,
  #[serde(default)]
  pub location:    String,
  #[serde(default)]
  pub description: String,
}

impl NewRecord {
  /// A record with only a name; everything else empty.
  pub fn named(name: impl Into<String>) -> Self {
    Self { name: name.into(), ..Self::default() }
  }

  pub fn new(
    name: impl Into<String>,
    link: impl Into<String>,
    location: impl Into<String>,
    description: impl Into<String>,
  ) -> Self {
    Self {
      name:        name.into(),
      link:        link.into(),
      location:    location.into(),
      description: description.into(),
    }
  }
}

// ─── Partial update ──────────────────────────────────────────────────────────

/// A partial update: only the `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPatch {
  pub name:        Option<String>,
  pub link:        Option<String>,
  pub location:    Option<String>,
  pub description: Option<String>,
}

impl RecordPatch {
  pub fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.link.is_none()
      && self.location.is_none()
      && self.description.is_none()
  }

  pub fn name(mut self, v: impl Into<String>) -> Self {
    self.name = Some(v.into());
    self
  }

  pub fn link(mut self, v: impl Into<String>) -> Self {
    self.link = Some(v.into());
    self
  }

  pub fn location(mut self, v: impl Into<String>) -> Self {
    self.location = Some(v.into());
    self
  }

  pub fn description(mut self, v: impl Into<String>) -> Self {
    self.description = Some(v.into());
    self
  }

  /// Column/value pairs for the supplied fields, in a fixed column order.
  ///
  /// Column names are static; only values come from the caller.
  pub fn assignments(&self) -> Vec<(&'static str, &str)> {
    [
      ("name", self.name.as_deref()),
      ("link", self.link.as_deref()),
      ("location", self.location.as_deref()),
      ("description", self.description.as_deref()),
    ]
    .into_iter()
    .filter_map(|(col, v)| v.map(|v| (col, v)))
    .collect()
  }
}

/// The result of [`RecordStore::update`](crate::store::RecordStore::update).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
  Updated,
  /// No record has the requested id.
  NotFound,
  /// The patch carried no fields; the store was not touched.
  NothingToUpdate,
}

impl UpdateOutcome {
  pub fn is_updated(self) -> bool { matches!(self, Self::Updated) }
}

// ─── Query ───────────────────────────────────────────────────────────────────

/// Description terms that mark a place as accepting SNAP benefits.
pub const SNAP_TERMS: [&str; 3] = ["SNAP", "EBT", "food stamps"];

/// Structured filter for [`RecordStore::query`](crate::store::RecordStore::query).
///
/// Every populated filter must match. All matching is substring matching,
/// ASCII case-insensitive; an empty query matches every record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordQuery {
  /// Substring of the name or the description (not the location).
  pub text:           Option<String>,
  /// Substrings of the location; matching any one of them is enough.
  pub locations:      Vec<String>,
  /// Only records whose description mentions one of [`SNAP_TERMS`].
  pub snap_accepting: bool,
}

impl RecordQuery {
  pub fn text(mut self, v: impl Into<String>) -> Self {
    self.text = Some(v.into());
    self
  }

  /// Add a location alternative. Empty strings are ignored.
  pub fn location(mut self, v: impl Into<String>) -> Self {
    let v = v.into();
    if !v.is_empty() {
      self.locations.push(v);
    }
    self
  }

  pub fn snap_accepting(mut self) -> Self {
    self.snap_accepting = true;
    self
  }
}

// ─── Aggregates ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationCount {
  pub location: String,
  pub count:    u64,
}

/// Aggregate view returned by [`RecordStore::stats`](crate::store::RecordStore::stats).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStats {
  pub total:         u64,
  /// At most five entries, most frequent first.
  pub top_locations: Vec<LocationCount>,
  pub with_links:    u64,
  pub without_links: u64,
  /// `None` when the store is empty.
  pub oldest:        Option<DateTime<Utc>>,
  pub newest:        Option<DateTime<Utc>>,
}

/// A set of records sharing the exact same name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
  pub name:  String,
  pub count: u64,
}

impl DuplicateGroup {
  /// Rows a collapse would delete from this group.
  pub fn surplus(&self) -> u64 { self.count.saturating_sub(1) }
}

/// What a duplicate collapse found and did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollapseReport {
  pub groups:  u64,
  pub removed: u64,
}
