//! Router tests against an in-memory SQLite store.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use chrono::NaiveDate;
use driftline_core::{
  article::NewArticle, config::WipeScope, rebuild::RebuildCoordinator,
  similarity::DateProximity, store::CatalogStore,
};
use driftline_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{ApiState, api_router};

async fn make_state() -> ApiState<SqliteStore> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  ApiState::new(
    Arc::new(store),
    RebuildCoordinator::new(DateProximity::new(3), WipeScope::Full),
  )
}

async fn seed(state: &ApiState<SqliteStore>, days: &[u32]) {
  for &d in days {
    let mut input = NewArticle::dated(NaiveDate::from_ymd_opt(2024, 1, d).unwrap());
    input.title = Some(format!("report {d}"));
    state.store.add_article(input).await.unwrap();
  }
}

fn router(state: &ApiState<SqliteStore>) -> Router { api_router(state.clone()) }

async fn send(
  state: &ApiState<SqliteStore>,
  method: &str,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, Value) {
  let builder = Request::builder().method(method).uri(uri);
  let req = match body {
    Some(b) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(b.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };
  let resp = router(state).oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

// ── Articles ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_fetch_article() {
  let state = make_state().await;
  let (status, created) = send(
    &state,
    "POST",
    "/articles",
    Some(json!({ "title": "Boat sinks", "date": "2024-03-05", "number_dead": 12 })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(created["relevant"], json!(true));

  let id = created["article_id"].as_i64().unwrap();
  let (status, fetched) = send(&state, "GET", &format!("/articles/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(fetched, created);
  assert_eq!(fetched["date"], json!("2024-03-05"));
}

#[tokio::test]
async fn missing_article_is_404() {
  let state = make_state().await;
  let (status, body) = send(&state, "GET", "/articles/7", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].as_str().unwrap().contains("article 7"));
}

#[tokio::test]
async fn flag_article_irrelevant() {
  let state = make_state().await;
  seed(&state, &[1]).await;

  let (status, body) =
    send(&state, "POST", "/articles/1/relevant", Some(json!({ "relevant": false }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["relevant"], json!(false));

  let (status, _) =
    send(&state, "POST", "/articles/99/relevant", Some(json!({ "relevant": false }))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_body_is_400_with_error_json() {
  let state = make_state().await;
  seed(&state, &[1]).await;

  let (status, body) =
    send(&state, "POST", "/articles/1/relevant", Some(json!({ "relevant": "nope" }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().starts_with("bad request"));

  let (status, _) = send(&state, "POST", "/articles", Some(json!([1, 2]))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Rebuild ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn rebuild_groups_articles_and_exposes_incidents() {
  let state = make_state().await;
  seed(&state, &[1, 2, 10]).await;

  let (status, report) = send(&state, "POST", "/rebuild", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(report["incidents_created"], json!(2));
  assert_eq!(report["mappings_written"], json!(3));

  let first = report["assignments"][0]["incident_id"].as_i64().unwrap();
  let (status, view) = send(&state, "GET", &format!("/incidents/{first}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(view["article_ids"], json!([1, 2]));
  assert_eq!(view["title"], json!("report 1"));
  assert_eq!(view["verified"], json!(true));

  let (_, incidents) = send(&state, "GET", "/incidents", None).await;
  assert_eq!(incidents.as_array().unwrap().len(), 2);

  let (_, mappings) = send(&state, "GET", "/mappings", None).await;
  assert_eq!(mappings.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn rebuild_on_empty_store_reports_zero() {
  let state = make_state().await;
  let (status, report) = send(&state, "POST", "/rebuild", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(report["articles_seen"], json!(0));
  assert_eq!(report["assignments"], json!([]));
}

// ── Incidents ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn unverify_incident() {
  let state = make_state().await;
  seed(&state, &[4]).await;
  let (_, report) = send(&state, "POST", "/rebuild", None).await;
  let id = report["assignments"][0]["incident_id"].as_i64().unwrap();

  let (status, body) = send(
    &state,
    "POST",
    &format!("/incidents/{id}/verified"),
    Some(json!({ "verified": false })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["verified"], json!(false));
}

#[tokio::test]
async fn missing_incident_is_404() {
  let state = make_state().await;
  let (status, _) = send(&state, "GET", "/incidents/3", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}
