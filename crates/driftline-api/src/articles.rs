//! Handlers for `/articles` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/articles` | Ascending id order |
//! | `POST` | `/articles` | Body: a `NewArticle`; 201 |
//! | `GET`  | `/articles/{id}` | 404 if not found |
//! | `POST` | `/articles/{id}/relevant` | Body: `{"relevant":false}` |
//!
//! Bodies that do not parse as the expected JSON are answered with 400.

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
  http::StatusCode,
  response::IntoResponse,
};
use driftline_core::{
  article::{Article, ArticleId, NewArticle},
  store::CatalogStore,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /articles`
pub async fn list<S>(State(state): State<ApiState<S>>) -> Result<Json<Vec<Article>>, ApiError>
where
  S: CatalogStore,
{
  let articles = state.store.list_articles().await.map_err(ApiError::store)?;
  Ok(Json(articles))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /articles`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  body: Result<Json<NewArticle>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogStore,
{
  let Json(body) = body?;
  let article = state.store.add_article(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(article)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /articles/{id}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<ArticleId>,
) -> Result<Json<Article>, ApiError>
where
  S: CatalogStore,
{
  let article = state
    .store
    .get_article(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("article {id} not found")))?;
  Ok(Json(article))
}

// ─── Relevance ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RelevantBody {
  pub relevant: bool,
}

/// `POST /articles/{id}/relevant`, body: `{"relevant":false}`
pub async fn set_relevant<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<ArticleId>,
  body: Result<Json<RelevantBody>, JsonRejection>,
) -> Result<Json<Article>, ApiError>
where
  S: CatalogStore,
{
  let Json(body) = body?;
  let article = state
    .store
    .set_article_relevant(id, body.relevant)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("article {id} not found")))?;
  Ok(Json(article))
}
