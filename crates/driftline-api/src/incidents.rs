//! Handlers for `/incidents` and `/mappings`.
//!
//! Incidents are regenerated by every rebuild, so an id fetched before a
//! rebuild is not expected to resolve after it.

use axum::{
  Json,
  extract::{Path, State, rejection::JsonRejection},
};
use driftline_core::{
  incident::{Incident, IncidentId, IncidentView, Mapping},
  store::CatalogStore,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

/// `GET /incidents`
pub async fn list<S>(State(state): State<ApiState<S>>) -> Result<Json<Vec<Incident>>, ApiError>
where
  S: CatalogStore,
{
  let incidents = state.store.list_incidents().await.map_err(ApiError::store)?;
  Ok(Json(incidents))
}

/// `GET /incidents/{id}`: the incident flattened, plus `article_ids`.
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<IncidentId>,
) -> Result<Json<IncidentView>, ApiError>
where
  S: CatalogStore,
{
  let view = state
    .store
    .get_incident(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("incident {id} not found")))?;
  Ok(Json(view))
}

#[derive(Debug, Deserialize)]
pub struct VerifiedBody {
  pub verified: bool,
}

/// `POST /incidents/{id}/verified`, body: `{"verified":false}`
pub async fn set_verified<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<IncidentId>,
  body: Result<Json<VerifiedBody>, JsonRejection>,
) -> Result<Json<Incident>, ApiError>
where
  S: CatalogStore,
{
  let Json(body) = body?;
  let incident = state
    .store
    .set_incident_verified(id, body.verified)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("incident {id} not found")))?;
  Ok(Json(incident))
}

/// `GET /mappings`
pub async fn mappings<S>(State(state): State<ApiState<S>>) -> Result<Json<Vec<Mapping>>, ApiError>
where
  S: CatalogStore,
{
  let rows = state.store.list_mappings().await.map_err(ApiError::store)?;
  Ok(Json(rows))
}
