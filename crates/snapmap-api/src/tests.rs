//! Router tests against a temporary SQLite store.

use std::sync::Arc;

use axum::{
  Router,
  body::{Body, to_bytes},
  http::{Request, StatusCode},
};
use serde_json::Value;
use snapmap_core::{NewRecord, RecordStore};
use snapmap_store_sqlite::SqliteStore;
use tempfile::TempDir;
use tower::ServiceExt as _;

use crate::api_router;

async fn app() -> (TempDir, Router) {
  let dir = tempfile::tempdir().unwrap();
  let store = SqliteStore::open(dir.path().join("records.db")).await.unwrap();
  store
    .add(NewRecord::new("Soup Kitchen", "", "Main St, Pittsburgh", "Hot meals, accepts EBT"))
    .await
    .unwrap();
  store
    .add(NewRecord::new("Food Bank", "https://fb", "Oakland", "Groceries; SNAP accepted"))
    .await
    .unwrap();
  store
    .add(NewRecord::new("Pantry", "", "Pittsburgh", "Food boxes, halal options"))
    .await
    .unwrap();
  (dir, api_router(Arc::new(store)))
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
  let resp = app
    .oneshot(Request::get(uri).body(Body::empty()).unwrap())
    .await
    .unwrap();
  let status = resp.status();
  let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  (status, serde_json::from_slice(&bytes).unwrap())
}

fn names(v: &Value) -> Vec<&str> {
  v.as_array()
    .unwrap()
    .iter()
    .map(|r| r["name"].as_str().unwrap())
    .collect()
}

#[tokio::test]
async fn health_is_ok() {
  let (_dir, app) = app().await;
  let (status, body) = get(app, "/health").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn list_is_newest_first() {
  let (_dir, app) = app().await;
  let (status, body) = get(app, "/api/records").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(names(&body), vec!["Pantry", "Food Bank", "Soup Kitchen"]);
}

#[tokio::test]
async fn get_one_and_missing() {
  let (_dir, app) = app().await;
  let (status, body) = get(app.clone(), "/api/records/2").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["name"], "Food Bank");
  assert_eq!(body["link"], "https://fb");

  let (status, body) = get(app, "/api/records/99").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "record 99");
}

#[tokio::test]
async fn search_with_location_filter() {
  let (_dir, app) = app().await;

  let (_, all) = get(app.clone(), "/api/search?q=food").await;
  assert_eq!(names(&all), vec!["Food Bank", "Pantry"]);

  let (_, narrowed) = get(app.clone(), "/api/search?q=food&location=pittsburgh").await;
  assert_eq!(names(&narrowed), vec!["Pantry"]);

  let (_, everything) = get(app, "/api/search").await;
  assert_eq!(names(&everything), vec!["Food Bank", "Pantry", "Soup Kitchen"]);
}

#[tokio::test]
async fn snap_lookup_with_optional_location() {
  let (_dir, app) = app().await;

  let (status, body) = get(app.clone(), "/api/snap").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(names(&body), vec!["Food Bank", "Soup Kitchen"]);

  let (_, body) = get(app, "/api/snap?location=pittsburgh").await;
  assert_eq!(names(&body), vec!["Soup Kitchen"]);
}

#[tokio::test]
async fn type_lookup_ignores_location_text() {
  let (_dir, app) = app().await;

  let (status, body) = get(app.clone(), "/api/resources?type=food").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(names(&body), vec!["Food Bank", "Pantry"]);

  let (_, body) = get(app.clone(), "/api/resources?type=oakland").await;
  assert!(names(&body).is_empty());

  let (_, body) = get(app, "/api/resources?type=food&location=pittsburgh").await;
  assert_eq!(names(&body), vec!["Pantry"]);
}

#[tokio::test]
async fn type_lookup_requires_a_type() {
  let (_dir, app) = app().await;
  let resp = app
    .oneshot(Request::get("/api/resources").body(Body::empty()).unwrap())
    .await
    .unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn dietary_lookup() {
  let (_dir, app) = app().await;

  let (_, body) = get(app.clone(), "/api/dietary?requirement=Halal").await;
  assert_eq!(names(&body), vec!["Pantry"]);

  let (_, body) = get(app, "/api/dietary?requirement=halal&location=Oakland").await;
  assert!(names(&body).is_empty());
}

#[tokio::test]
async fn place_lookup_matches_city_or_state() {
  let (_dir, app) = app().await;

  let (_, body) = get(app.clone(), "/api/location?city=Oakland&state=Main%20St").await;
  assert_eq!(names(&body), vec!["Food Bank", "Soup Kitchen"]);

  let (_, body) = get(app, "/api/location?city=Oakland").await;
  assert_eq!(names(&body), vec!["Food Bank"]);
}

#[tokio::test]
async fn stats_summarises_store() {
  let (_dir, app) = app().await;
  let (status, body) = get(app, "/api/stats").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["total"], 3);
  assert_eq!(body["with_links"], 1);
  assert_eq!(body["without_links"], 2);
  assert_eq!(body["top_locations"].as_array().unwrap().len(), 3);
}
