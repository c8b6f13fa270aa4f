//! Error types for `driftline-core`.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::article::ArticleId;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

// ─── Phases ──────────────────────────────────────────────────────────────────

/// The rebuild phase an operation belongs to. Every rebuild error names one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
  Fetching,
  Clustering,
  Wiping,
  Writing,
  Committing,
}

impl Phase {
  pub fn as_str(self) -> &'static str {
    match self {
      Phase::Fetching => "fetching",
      Phase::Clustering => "clustering",
      Phase::Wiping => "wiping",
      Phase::Writing => "writing",
      Phase::Committing => "committing",
    }
  }
}

impl fmt::Display for Phase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

// ─── Store errors ────────────────────────────────────────────────────────────

/// Failure reported by a storage backend through the traits in
/// [`crate::store`]. Backends classify their native errors into these.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("store unavailable: {0}")]
  Unavailable(#[source] BoxError),

  #[error("query failed: {0}")]
  Query(#[source] BoxError),

  #[error("article not found: {0}")]
  ArticleNotFound(ArticleId),
}

// ─── Engine errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum Error {
  #[error("store unavailable during {phase}: {source}")]
  StoreUnavailable {
    phase:  Phase,
    #[source]
    source: StoreError,
  },

  #[error("query failed during {phase}: {source}")]
  QueryFailure {
    phase:  Phase,
    #[source]
    source: StoreError,
  },

  /// A failure after the rebuild transaction was opened. The transaction was
  /// rolled back, so the store still holds its pre-rebuild state.
  #[error("rebuild aborted during {phase}, changes rolled back: {source}")]
  RebuildAborted {
    phase:  Phase,
    #[source]
    source: StoreError,
  },

  /// The rebuild failed and the rollback also failed.
  #[error("rebuild aborted during {phase} ({source}) and rollback failed: {rollback}")]
  RollbackFailed {
    phase:    Phase,
    #[source]
    source:   StoreError,
    rollback: StoreError,
  },

  #[error("article {0} appears more than once in the clustering input")]
  DuplicateArticle(ArticleId),

  #[error("invalid configuration: {0}")]
  InvalidConfig(String),
}

impl Error {
  /// Classify a store failure that happened outside the rebuild transaction.
  pub fn store(phase: Phase, source: StoreError) -> Self {
    match source {
      StoreError::Unavailable(_) => Error::StoreUnavailable { phase, source },
      _ => Error::QueryFailure { phase, source },
    }
  }

  /// The rebuild phase that failed, if the error came out of a rebuild.
  pub fn phase(&self) -> Option<Phase> {
    match self {
      Error::StoreUnavailable { phase, .. }
      | Error::QueryFailure { phase, .. }
      | Error::RebuildAborted { phase, .. }
      | Error::RollbackFailed { phase, .. } => Some(*phase),
      Error::DuplicateArticle(_) => Some(Phase::Clustering),
      Error::InvalidConfig(_) => None,
    }
  }

  pub fn is_unavailable(&self) -> bool {
    matches!(self, Error::StoreUnavailable { .. })
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
