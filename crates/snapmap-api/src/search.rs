//! Handler for `GET /api/search`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use snapmap_core::{Record, RecordStore};

use crate::error::ApiError;

#[derive(Debug, Deserialize, Default)]
pub struct SearchParams {
  /// Substring matched against name, description and location.
  #[serde(default)]
  pub q:        String,
  /// Further restrict to records whose location contains this, ignoring
  /// ASCII case.
  pub location: Option<String>,
}

/// `GET /api/search[?q=...][&location=...]`, ordered by name.
pub async fn handler<S: RecordStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Record>>, ApiError> {
  let mut records = store.search(&params.q).await.map_err(ApiError::store)?;

  if let Some(loc) = params.location.filter(|l| !l.is_empty()) {
    let needle = loc.to_ascii_lowercase();
    records.retain(|r| r.location.to_ascii_lowercase().contains(&needle));
  }

  Ok(Json(records))
}
