//! Handlers for `/api/records` and `/api/stats`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use snapmap_core::{Record, RecordStore, StoreStats};

use crate::error::ApiError;

/// `GET /api/records`, newest first.
pub async fn list<S: RecordStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Record>>, ApiError> {
  let records = store.get_all().await.map_err(ApiError::store)?;
  Ok(Json(records))
}

/// `GET /api/records/{id}`
pub async fn get_one<S: RecordStore>(
  State(store): State<Arc<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Record>, ApiError> {
  store
    .get_by_id(id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("record {id}")))
}

/// `GET /api/stats`
pub async fn stats<S: RecordStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<StoreStats>, ApiError> {
  let stats = store.stats().await.map_err(ApiError::store)?;
  Ok(Json(stats))
}
