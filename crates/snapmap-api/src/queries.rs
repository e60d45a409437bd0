//! Narrow lookups built on [`RecordQuery`]: SNAP acceptance, resource type,
//! dietary requirement and place.
//!
//! Text terms match name or description only; a `location` parameter is
//! ANDed on in SQL. Results are ordered by name.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use snapmap_core::{Record, RecordQuery, RecordStore};

use crate::error::ApiError;

// ─── Params ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize, Default)]
pub struct SnapParams {
  #[serde(default)]
  pub location: String,
}

#[derive(Debug, Deserialize)]
pub struct TypeParams {
  /// e.g. `food bank`, `soup kitchen`.
  #[serde(rename = "type")]
  pub kind:     String,
  #[serde(default)]
  pub location: String,
}

#[derive(Debug, Deserialize)]
pub struct DietaryParams {
  /// e.g. `halal`, `kosher`, `vegan`.
  pub requirement: String,
  #[serde(default)]
  pub location:    String,
}

#[derive(Debug, Deserialize, Default)]
pub struct PlaceParams {
  #[serde(default)]
  pub city:  String,
  #[serde(default)]
  pub state: String,
}

// ─── Handlers ────────────────────────────────────────────────────────────────

async fn run<S: RecordStore>(store: &S, query: RecordQuery) -> Result<Json<Vec<Record>>, ApiError> {
  let records = store.query(&query).await.map_err(ApiError::store)?;
  Ok(Json(records))
}

/// `GET /api/snap[?location=...]`: records whose description mentions SNAP,
/// EBT or food stamps.
pub async fn snap<S: RecordStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<SnapParams>,
) -> Result<Json<Vec<Record>>, ApiError> {
  run(store.as_ref(), RecordQuery::default().snap_accepting().location(params.location)).await
}

/// `GET /api/resources?type=...[&location=...]`
pub async fn by_type<S: RecordStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<TypeParams>,
) -> Result<Json<Vec<Record>>, ApiError> {
  run(store.as_ref(), RecordQuery::default().text(params.kind).location(params.location)).await
}

/// `GET /api/dietary?requirement=...[&location=...]`
pub async fn by_dietary<S: RecordStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<DietaryParams>,
) -> Result<Json<Vec<Record>>, ApiError> {
  run(
    store.as_ref(),
    RecordQuery::default().text(params.requirement).location(params.location),
  )
  .await
}

/// `GET /api/location[?city=...][&state=...]`: location contains either.
/// Neither given means every record.
pub async fn by_place<S: RecordStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<PlaceParams>,
) -> Result<Json<Vec<Record>>, ApiError> {
  run(store.as_ref(), RecordQuery::default().location(params.city).location(params.state)).await
}
