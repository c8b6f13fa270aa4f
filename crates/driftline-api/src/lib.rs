//! JSON REST API for Driftline.
//!
//! Exposes an axum [`Router`] backed by any [`driftline_core::store::CatalogStore`]:
//! article intake and review flags, read access to incidents and mappings,
//! and a trigger for full rebuilds. Auth, TLS, and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", driftline_api::api_router(state))
//! ```

pub mod articles;
pub mod error;
pub mod incidents;
pub mod rebuild;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use driftline_core::{rebuild::RebuildCoordinator, store::CatalogStore};

pub use error::ApiError;

/// Shared state threaded through all handlers.
#[derive(Clone)]
pub struct ApiState<S> {
  pub store:       Arc<S>,
  /// Configuration used by `POST /rebuild`.
  pub coordinator: Arc<RebuildCoordinator>,
}

impl<S> ApiState<S> {
  pub fn new(store: Arc<S>, coordinator: RebuildCoordinator) -> Self {
    Self { store, coordinator: Arc::new(coordinator) }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: CatalogStore + Clone + Send + Sync + 'static,
{
  Router::new()
    // Articles
    .route("/articles", get(articles::list::<S>).post(articles::create::<S>))
    .route("/articles/{id}", get(articles::get_one::<S>))
    .route("/articles/{id}/relevant", post(articles::set_relevant::<S>))
    // Incidents
    .route("/incidents", get(incidents::list::<S>))
    .route("/incidents/{id}", get(incidents::get_one::<S>))
    .route("/incidents/{id}/verified", post(incidents::set_verified::<S>))
    .route("/mappings", get(incidents::mappings::<S>))
    // Rebuild
    .route("/rebuild", post(rebuild::handler::<S>))
    .with_state(state)
}

#[cfg(test)]
mod tests;
