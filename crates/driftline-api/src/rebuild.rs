//! `POST /rebuild`: recompute every incident and mapping.

use axum::{Json, extract::State};
use driftline_core::{rebuild::RebuildReport, store::CatalogStore};

use crate::{ApiState, error::ApiError};

/// Runs a full rebuild with the configured coordinator. Takes no body.
///
/// A failure leaves the previous incidents and mappings in place; the error
/// body names the phase that failed.
pub async fn handler<S>(State(state): State<ApiState<S>>) -> Result<Json<RebuildReport>, ApiError>
where
  S: CatalogStore,
{
  let coordinator = (*state.coordinator).clone();
  let report = state.store.rebuild(coordinator).await?;
  tracing::info!(
    incidents = report.incidents_created,
    mappings = report.mappings_written,
    "rebuild requested over HTTP completed"
  );
  Ok(Json(report))
}
