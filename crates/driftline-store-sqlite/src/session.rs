//! The synchronous, connection-bound side of the store.
//!
//! The rebuild engine is synchronous; [`SqliteStore`](crate::SqliteStore)
//! hands it a session on the connection thread. The session serves as both
//! the article repository and the incident sink, so representative lookups
//! and writes share the same connection and transaction.

use driftline_core::{
  StoreError,
  article::{Article, ArticleId, ArticleSummary},
  config::WipeScope,
  incident::{IncidentDraft, IncidentId, Mapping},
  store::{ArticleRepository, IncidentSink, RebuildTransaction},
};
use rusqlite::{Connection, OptionalExtension as _, Transaction, TransactionBehavior};

use crate::{
  Error, Result,
  encode::{ARTICLE_COLUMNS, RawArticle, RawSummary, SUMMARY_COLUMNS, encode_date},
};

pub struct SqliteSession<'c> {
  conn: &'c Connection,
}

impl<'c> SqliteSession<'c> {
  pub fn new(conn: &'c Connection) -> Self { Self { conn } }

  fn summaries(&self) -> Result<Vec<ArticleSummary>> {
    let mut stmt = self.conn.prepare(&format!(
      "SELECT {SUMMARY_COLUMNS} FROM articles ORDER BY article_id ASC"
    ))?;
    let raws = stmt
      .query_map([], RawSummary::read)?
      .collect::<rusqlite::Result<Vec<_>>>()?;
    raws.into_iter().map(RawSummary::into_summary).collect()
  }

  fn article(&self, id: ArticleId) -> Result<Article> {
    self
      .conn
      .query_row(
        &format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE article_id = ?1"),
        [id],
        RawArticle::read,
      )
      .optional()?
      .ok_or(Error::ArticleNotFound(id))?
      .into_article()
  }
}

impl ArticleRepository for SqliteSession<'_> {
  fn fetch_for_clustering(&self) -> Result<Vec<ArticleSummary>, StoreError> {
    Ok(self.summaries()?)
  }

  fn fetch_full(&self, id: ArticleId) -> Result<Article, StoreError> {
    Ok(self.article(id)?)
  }
}

impl IncidentSink for SqliteSession<'_> {
  type Transaction<'t>
    = SqliteRebuild<'t>
  where
    Self: 't;

  /// Opens an `IMMEDIATE` transaction so the write lock is taken up front and
  /// concurrent readers keep seeing the pre-rebuild state until commit.
  fn begin(&self) -> Result<SqliteRebuild<'_>, StoreError> {
    let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)
      .map_err(Error::from)?;
    Ok(SqliteRebuild { tx })
  }
}

// ─── Transaction ─────────────────────────────────────────────────────────────

/// An open rebuild transaction. Dropping it without committing rolls back.
pub struct SqliteRebuild<'t> {
  tx: Transaction<'t>,
}

impl SqliteRebuild<'_> {
  fn delete(&self, scope: WipeScope) -> Result<usize> {
    let removed = self.tx.execute("DELETE FROM mapping", [])?;
    if scope == WipeScope::Full {
      self.tx.execute("DELETE FROM incidents", [])?;
    }
    Ok(removed)
  }

  fn insert(&self, draft: &IncidentDraft) -> Result<IncidentId> {
    let date_str = draft.date.map(encode_date);
    let id = self.tx.query_row(
      "INSERT INTO incidents (
         title, verified, date, number_dead, number_missing, number_survivors,
         country_of_origin, region_of_origin, cause_of_death,
         region_of_incident, country_of_incident, location_of_incident,
         latitude, longitude
       ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
       RETURNING incident_id",
      rusqlite::params![
        draft.title,
        draft.verified,
        date_str,
        draft.number_dead,
        draft.number_missing,
        draft.number_survivors,
        draft.country_of_origin,
        draft.region_of_origin,
        draft.cause_of_death,
        draft.region_of_incident,
        draft.country_of_incident,
        draft.location_of_incident,
        draft.latitude,
        draft.longitude,
      ],
      |row| row.get(0),
    )?;
    Ok(id)
  }

  fn map(&self, mapping: Mapping) -> Result<()> {
    self.tx.execute(
      "INSERT INTO mapping (incident_id, article_id) VALUES (?1, ?2)",
      [mapping.incident_id, mapping.article_id],
    )?;
    Ok(())
  }
}

impl RebuildTransaction for SqliteRebuild<'_> {
  fn wipe(&mut self, scope: WipeScope) -> Result<usize, StoreError> {
    Ok(self.delete(scope)?)
  }

  fn insert_incident(&mut self, draft: &IncidentDraft) -> Result<IncidentId, StoreError> {
    Ok(self.insert(draft)?)
  }

  fn insert_mapping(&mut self, mapping: Mapping) -> Result<(), StoreError> {
    Ok(self.map(mapping)?)
  }

  fn commit(self) -> Result<(), StoreError> {
    self.tx.commit().map_err(Error::from)?;
    Ok(())
  }

  fn rollback(self) -> Result<(), StoreError> {
    self.tx.rollback().map_err(Error::from)?;
    Ok(())
  }
}
