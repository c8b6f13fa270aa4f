//! Storage traits.
//!
//! The rebuild engine is synchronous and talks to storage through
//! [`ArticleRepository`] (reads) and [`IncidentSink`] (transactional writes).
//! A backend typically implements both on one connection-bound session.
//!
//! [`CatalogStore`] is the async, request-oriented surface used by the HTTP
//! layer and the CLI. Higher layers depend on these abstractions, not on any
//! concrete backend.

use std::future::Future;

use crate::{
  StoreError,
  article::{Article, ArticleId, ArticleSummary, NewArticle},
  config::WipeScope,
  incident::{Incident, IncidentDraft, IncidentId, IncidentView, Mapping},
  rebuild::{RebuildCoordinator, RebuildReport},
  similarity::SimilarityPredicate,
};

// ─── Engine-facing traits ────────────────────────────────────────────────────

/// Read-only access to the article store.
pub trait ArticleRepository {
  /// All articles as clustering projections, in ascending id order.
  fn fetch_for_clustering(&self) -> Result<Vec<ArticleSummary>, StoreError>;

  /// The complete record for `id`. A missing article is
  /// [`StoreError::ArticleNotFound`].
  fn fetch_full(&self, id: ArticleId) -> Result<Article, StoreError>;
}

/// Opens the transaction a rebuild writes through.
pub trait IncidentSink {
  type Transaction<'t>: RebuildTransaction
  where
    Self: 't;

  fn begin(&self) -> Result<Self::Transaction<'_>, StoreError>;
}

/// One open rebuild transaction.
///
/// Nothing written through it is visible to other readers until
/// [`commit`](Self::commit). Dropping it without committing must discard
/// every change, exactly as [`rollback`](Self::rollback) does.
pub trait RebuildTransaction: Sized {
  /// Delete existing rows per `scope`. Returns the number of mapping rows
  /// removed.
  fn wipe(&mut self, scope: WipeScope) -> Result<usize, StoreError>;

  /// Insert an incident and return its freshly generated id.
  fn insert_incident(&mut self, draft: &IncidentDraft) -> Result<IncidentId, StoreError>;

  fn insert_mapping(&mut self, mapping: Mapping) -> Result<(), StoreError>;

  fn commit(self) -> Result<(), StoreError>;

  fn rollback(self) -> Result<(), StoreError>;
}

// ─── Catalog trait ───────────────────────────────────────────────────────────

/// Async catalog access for request handlers.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait CatalogStore: Send + Sync {
  /// Backend error. Converting it into a [`StoreError`] tells callers
  /// whether the store itself is unreachable.
  type Error: std::error::Error + Into<StoreError> + Send + Sync + 'static;

  // ── Articles ──────────────────────────────────────────────────────────

  /// Persist a new article; the store assigns its id.
  fn add_article(
    &self,
    input: NewArticle,
  ) -> impl Future<Output = Result<Article, Self::Error>> + Send + '_;

  fn get_article(
    &self,
    id: ArticleId,
  ) -> impl Future<Output = Result<Option<Article>, Self::Error>> + Send + '_;

  /// All articles in ascending id order.
  fn list_articles(
    &self,
  ) -> impl Future<Output = Result<Vec<Article>, Self::Error>> + Send + '_;

  /// Set the reviewer-owned relevance flag. Returns `None` if the article
  /// does not exist.
  fn set_article_relevant(
    &self,
    id: ArticleId,
    relevant: bool,
  ) -> impl Future<Output = Result<Option<Article>, Self::Error>> + Send + '_;

  // ── Incidents ─────────────────────────────────────────────────────────

  fn list_incidents(
    &self,
  ) -> impl Future<Output = Result<Vec<Incident>, Self::Error>> + Send + '_;

  /// An incident with its mapped article ids. Returns `None` if not found.
  fn get_incident(
    &self,
    id: IncidentId,
  ) -> impl Future<Output = Result<Option<IncidentView>, Self::Error>> + Send + '_;

  fn set_incident_verified(
    &self,
    id: IncidentId,
    verified: bool,
  ) -> impl Future<Output = Result<Option<Incident>, Self::Error>> + Send + '_;

  fn list_mappings(
    &self,
  ) -> impl Future<Output = Result<Vec<Mapping>, Self::Error>> + Send + '_;

  // ── Rebuild ───────────────────────────────────────────────────────────

  /// Run a full rebuild with `coordinator` against this store.
  fn rebuild<P>(
    &self,
    coordinator: RebuildCoordinator<P>,
  ) -> impl Future<Output = crate::Result<RebuildReport>> + Send + '_
  where
    P: SimilarityPredicate + Send + 'static;
}
