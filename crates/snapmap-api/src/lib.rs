//! Read-only JSON API over a snapmap record store.
//!
//! Exposes an axum [`Router`] backed by any [`snapmap_core::RecordStore`].
//! Auth, TLS, and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = snapmap_api::api_router(Arc::new(store));
//! axum::serve(listener, app).await?;
//! ```

pub mod error;
pub mod queries;
pub mod records;
pub mod search;

use std::sync::Arc;

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use snapmap_core::RecordStore;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

/// Build the API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: RecordStore + 'static,
{
  Router::new()
    .route("/health", get(health))
    .route("/api/records", get(records::list::<S>))
    .route("/api/records/{id}", get(records::get_one::<S>))
    .route("/api/search", get(search::handler::<S>))
    .route("/api/snap", get(queries::snap::<S>))
    .route("/api/resources", get(queries::by_type::<S>))
    .route("/api/dietary", get(queries::by_dietary::<S>))
    .route("/api/location", get(queries::by_place::<S>))
    .route("/api/stats", get(records::stats::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(store)
}

async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }

#[cfg(test)]
mod tests;
