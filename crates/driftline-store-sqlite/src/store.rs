//! The SQLite implementation of [`CatalogStore`].

use std::path::Path;

use driftline_core::{
  Error as CoreError, Phase,
  article::{Article, ArticleId, NewArticle},
  incident::{Incident, IncidentId, IncidentView, Mapping},
  rebuild::{RebuildCoordinator, RebuildReport},
  similarity::SimilarityPredicate,
  store::CatalogStore,
};
use rusqlite::OptionalExtension as _;

use crate::{
  Error, Result,
  encode::{
    ARTICLE_COLUMNS, INCIDENT_COLUMNS, RawArticle, RawIncident, encode_date, encode_keywords,
  },
  schema::SCHEMA,
  session::SqliteSession,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Driftline catalog backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All calls,
/// including rebuilds, are serialised on the connection's thread.
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn incident_row(&self, id: IncidentId) -> Result<Option<Incident>> {
    let raw: Option<RawIncident> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {INCIDENT_COLUMNS} FROM incidents WHERE incident_id = ?1"),
              [id],
              RawIncident::read,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawIncident::into_incident).transpose()
  }
}

// ─── CatalogStore impl ───────────────────────────────────────────────────────

impl CatalogStore for SqliteStore {
  type Error = Error;

  // ── Articles ──────────────────────────────────────────────────────────────

  async fn add_article(&self, input: NewArticle) -> Result<Article> {
    let keywords_str = encode_keywords(&input.keywords)?;
    let date_str     = input.date.map(encode_date);
    let row          = input.clone();

    let article_id: ArticleId = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "INSERT INTO articles (
             title, summary, website, content, keywords, date,
             number_dead, number_missing, number_survivors,
             country_of_origin, region_of_origin, cause_of_death,
             region_of_incident, country_of_incident, location_of_incident,
             latitude, longitude, relevant
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
           RETURNING article_id",
          rusqlite::params![
            row.title,
            row.summary,
            row.website,
            row.content,
            keywords_str,
            date_str,
            row.number_dead,
            row.number_missing,
            row.number_survivors,
            row.country_of_origin,
            row.region_of_origin,
            row.cause_of_death,
            row.region_of_incident,
            row.country_of_incident,
            row.location_of_incident,
            row.latitude,
            row.longitude,
            row.relevant,
          ],
          |r| r.get(0),
        )?)
      })
      .await?;

    tracing::debug!(article_id, "article recorded");
    Ok(input.into_article(article_id))
  }

  async fn get_article(&self, id: ArticleId) -> Result<Option<Article>> {
    let raw: Option<RawArticle> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE article_id = ?1"),
              [id],
              RawArticle::read,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawArticle::into_article).transpose()
  }

  async fn list_articles(&self) -> Result<Vec<Article>> {
    let raws: Vec<RawArticle> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ARTICLE_COLUMNS} FROM articles ORDER BY article_id ASC"
        ))?;
        let rows = stmt
          .query_map([], RawArticle::read)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawArticle::into_article).collect()
  }

  async fn set_article_relevant(&self, id: ArticleId, relevant: bool) -> Result<Option<Article>> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE articles SET relevant = ?1 WHERE article_id = ?2",
          rusqlite::params![relevant, id],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_article(id).await
  }

  // ── Incidents ─────────────────────────────────────────────────────────────

  async fn list_incidents(&self) -> Result<Vec<Incident>> {
    let raws: Vec<RawIncident> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {INCIDENT_COLUMNS} FROM incidents ORDER BY incident_id ASC"
        ))?;
        let rows = stmt
          .query_map([], RawIncident::read)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawIncident::into_incident).collect()
  }

  async fn get_incident(&self, id: IncidentId) -> Result<Option<IncidentView>> {
    let incident = match self.incident_row(id).await? {
      Some(i) => i,
      None    => return Ok(None),
    };

    let article_ids: Vec<ArticleId> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT article_id FROM mapping WHERE incident_id = ?1 ORDER BY article_id ASC",
        )?;
        let rows = stmt
          .query_map([id], |r| r.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(Some(IncidentView { incident, article_ids }))
  }

  async fn set_incident_verified(&self, id: IncidentId, verified: bool) -> Result<Option<Incident>> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE incidents SET verified = ?1 WHERE incident_id = ?2",
          rusqlite::params![verified, id],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.incident_row(id).await
  }

  async fn list_mappings(&self) -> Result<Vec<Mapping>> {
    let rows = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT incident_id, article_id FROM mapping ORDER BY incident_id, article_id",
        )?;
        let rows = stmt
          .query_map([], |r| {
            Ok(Mapping {
              incident_id: r.get(0)?,
              article_id:  r.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  // ── Rebuild ───────────────────────────────────────────────────────────────

  async fn rebuild<P>(&self, coordinator: RebuildCoordinator<P>) -> driftline_core::Result<RebuildReport>
  where
    P: SimilarityPredicate + Send + 'static,
  {
    self
      .conn
      .call(move |conn| {
        let session = SqliteSession::new(conn);
        Ok(coordinator.run(&session, &session))
      })
      .await
      .map_err(|e| CoreError::store(Phase::Fetching, Error::from(e).into()))?
  }
}
