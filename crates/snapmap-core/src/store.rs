//! The `RecordStore` trait.
//!
//! Implemented by storage backends (e.g. `snapmap-store-sqlite`). The CSV
//! bridge, maintenance operations, the ingestion pipeline and the JSON API
//! all depend on this abstraction, not on a concrete backend.

use std::future::Future;

use crate::record::{
  CollapseReport, DuplicateGroup, NewRecord, Record, RecordPatch, RecordQuery,
  StoreStats, UpdateOutcome,
};

/// Abstraction over a record store backend.
///
/// "Not found" is an ordinary outcome (`Option`, `bool`, [`UpdateOutcome`]);
/// `Self::Error` is reserved for the backend itself failing.
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Schema ────────────────────────────────────────────────────────────

  /// Ensure the backing table and its `name` index exist. Idempotent.
  fn initialize(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Insert a record and return its freshly assigned id.
  ///
  /// Both timestamps are set to the current time. An empty name is
  /// accepted; callers that need a name must check for themselves.
  fn add(
    &self,
    input: NewRecord,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// Overwrite only the fields present in `patch`, refreshing `updated_at`.
  fn update(
    &self,
    id: i64,
    patch: RecordPatch,
  ) -> impl Future<Output = Result<UpdateOutcome, Self::Error>> + Send + '_;

  /// Remove a record. Returns `false` when no record has that id.
  fn delete(&self, id: i64) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Delete every record, restart the id sequence and compact storage.
  ///
  /// Unguarded; confirmation and backup live in the maintenance layer.
  fn wipe(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Delete all but the highest-id record of every name shared by more
  /// than one record.
  fn collapse_duplicates(
    &self,
  ) -> impl Future<Output = Result<CollapseReport, Self::Error>> + Send + '_;

  // ── Reads ─────────────────────────────────────────────────────────────

  /// All records, newest first.
  fn get_all(&self) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + '_;

  fn get_by_id(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Record>, Self::Error>> + Send + '_;

  /// Records whose name, description or location contains `term`, ordered
  /// by name. An empty term matches everything.
  fn search<'a>(
    &'a self,
    term: &'a str,
  ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + 'a;

  /// Records passing every filter in `query`, ordered by name.
  fn query<'a>(
    &'a self,
    query: &'a RecordQuery,
  ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + 'a;

  fn count(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  fn stats(&self) -> impl Future<Output = Result<StoreStats, Self::Error>> + Send + '_;

  /// Names held by more than one record, largest group first.
  fn duplicate_groups(
    &self,
  ) -> impl Future<Output = Result<Vec<DuplicateGroup>, Self::Error>> + Send + '_;
}
