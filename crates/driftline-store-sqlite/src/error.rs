//! Error type for `driftline-store-sqlite`.

use driftline_core::StoreError;
use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  #[error("article not found: {0}")]
  ArticleNotFound(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Whether a SQLite failure means the database itself cannot be reached, as
/// opposed to a problem with one statement.
fn is_unavailable(err: &rusqlite::Error) -> bool {
  matches!(
    err.sqlite_error_code(),
    Some(
      ErrorCode::CannotOpen
        | ErrorCode::DatabaseBusy
        | ErrorCode::DatabaseLocked
        | ErrorCode::NotADatabase
        | ErrorCode::SystemIoFailure
    )
  )
}

impl From<Error> for StoreError {
  fn from(err: Error) -> Self {
    match err {
      Error::ArticleNotFound(id) => StoreError::ArticleNotFound(id),
      Error::Sqlite(e) if is_unavailable(&e) => StoreError::Unavailable(Box::new(e)),
      Error::Database(tokio_rusqlite::Error::Rusqlite(e)) if is_unavailable(&e) => {
        StoreError::Unavailable(Box::new(e))
      }
      Error::Database(tokio_rusqlite::Error::ConnectionClosed) => {
        StoreError::Unavailable(Box::new(tokio_rusqlite::Error::ConnectionClosed))
      }
      other => StoreError::Query(Box::new(other)),
    }
  }
}
