//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::JsonRejection,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use driftline_core::StoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] StoreError),

  #[error(transparent)]
  Rebuild(#[from] driftline_core::Error),
}

impl ApiError {
  /// Classify a backend error from a catalog call.
  pub fn store<E: Into<StoreError>>(e: E) -> Self { ApiError::Store(e.into()) }

  fn status(&self) -> StatusCode {
    match self {
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
      ApiError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
      ApiError::Store(StoreError::ArticleNotFound(_)) => StatusCode::NOT_FOUND,
      ApiError::Store(StoreError::Query(_)) => StatusCode::INTERNAL_SERVER_ERROR,
      ApiError::Rebuild(e) if e.is_unavailable() => StatusCode::SERVICE_UNAVAILABLE,
      ApiError::Rebuild(driftline_core::Error::InvalidConfig(_)) => StatusCode::BAD_REQUEST,
      ApiError::Rebuild(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self { ApiError::BadRequest(rejection.body_text()) }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    let body = match &self {
      ApiError::Rebuild(e) => json!({ "error": self.to_string(), "phase": e.phase() }),
      _ => json!({ "error": self.to_string() }),
    };
    (status, Json(body)).into_response()
  }
}
