//! The rebuild coordinator.
//!
//! A rebuild moves through `Fetching → Clustering → Wiping → Writing` and ends
//! either committed or rolled back. Fetching and clustering have no side
//! effects. Wiping and writing share a single [`RebuildTransaction`], so a
//! failure at any point after the wipe leaves the store exactly as it was
//! before the rebuild started.

use serde::Serialize;
use tracing::{debug, error, info, info_span, warn};

use crate::{
  Error, Phase, Result, StoreError,
  article::ArticleId,
  cluster::{ClusterBuilder, Group},
  config::{ClusterConfig, WipeScope},
  incident::{IncidentId, Mapping},
  similarity::{DateProximity, SimilarityPredicate},
  store::{ArticleRepository, IncidentSink, RebuildTransaction},
  synthesize::IncidentSynthesizer,
};

/// The articles written onto one new incident.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
  pub incident_id: IncidentId,
  pub article_ids: Vec<ArticleId>,
}

/// Outcome of a committed rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RebuildReport {
  pub articles_seen:     usize,
  pub incidents_created: usize,
  pub mappings_written:  usize,
  /// Mapping rows deleted by the wipe.
  pub mappings_removed:  usize,
  pub assignments:       Vec<Assignment>,
}

/// Runs full rebuilds. Holds only configuration; every run recomputes from
/// the article store.
#[derive(Debug, Clone)]
pub struct RebuildCoordinator<P = DateProximity> {
  builder:     ClusterBuilder<P>,
  synthesizer: IncidentSynthesizer,
  wipe:        WipeScope,
}

impl RebuildCoordinator<DateProximity> {
  pub fn from_config(config: &ClusterConfig) -> Result<Self> {
    config.validate()?;
    Ok(Self::new(DateProximity::new(config.threshold_days), config.wipe))
  }
}

impl<P: SimilarityPredicate> RebuildCoordinator<P> {
  pub fn new(predicate: P, wipe: WipeScope) -> Self {
    Self {
      builder: ClusterBuilder::new(predicate),
      synthesizer: IncidentSynthesizer,
      wipe,
    }
  }

  pub fn builder(&self) -> &ClusterBuilder<P> { &self.builder }

  pub fn wipe_scope(&self) -> WipeScope { self.wipe }

  /// Recompute every incident and mapping from `articles`, writing through
  /// `sink`.
  ///
  /// On success the new state is committed. On failure the error names the
  /// phase that failed; if the transaction had been opened it was rolled back.
  pub fn run<R, S>(&self, articles: &R, sink: &S) -> Result<RebuildReport>
  where
    R: ArticleRepository + ?Sized,
    S: IncidentSink,
  {
    let span = info_span!("rebuild", wipe = ?self.wipe);
    let _guard = span.enter();

    debug!(phase = %Phase::Fetching, "entering phase");
    let summaries = articles
      .fetch_for_clustering()
      .map_err(|e| Error::store(Phase::Fetching, e))?;

    debug!(phase = %Phase::Clustering, articles = summaries.len(), "entering phase");
    let groups = self.builder.build(&summaries)?;

    debug!(phase = %Phase::Wiping, groups = groups.len(), "entering phase");
    let mut tx = sink.begin().map_err(|e| Error::store(Phase::Wiping, e))?;

    match self.write(&mut tx, articles, &groups) {
      Ok((mappings_removed, assignments)) => {
        tx.commit().map_err(|source| Error::RebuildAborted {
          phase: Phase::Committing,
          source,
        })?;

        let report = RebuildReport {
          articles_seen: summaries.len(),
          incidents_created: assignments.len(),
          mappings_written: assignments.iter().map(|a| a.article_ids.len()).sum(),
          mappings_removed,
          assignments,
        };
        info!(
          articles = report.articles_seen,
          incidents = report.incidents_created,
          mappings = report.mappings_written,
          "rebuild committed"
        );
        Ok(report)
      }
      Err((phase, source)) => {
        warn!(%phase, error = %source, "rebuild failed, rolling back");
        match tx.rollback() {
          Ok(()) => Err(Error::RebuildAborted { phase, source }),
          Err(rollback) => {
            error!(%phase, error = %rollback, "rollback failed");
            Err(Error::RollbackFailed { phase, source, rollback })
          }
        }
      }
    }
  }

  fn write<R, T>(
    &self,
    tx: &mut T,
    articles: &R,
    groups: &[Group],
  ) -> Result<(usize, Vec<Assignment>), (Phase, StoreError)>
  where
    R: ArticleRepository + ?Sized,
    T: RebuildTransaction,
  {
    let removed = tx.wipe(self.wipe).map_err(|e| (Phase::Wiping, e))?;
    debug!(phase = %Phase::Writing, removed, "entering phase");

    let mut assignments = Vec::with_capacity(groups.len());
    for group in groups {
      let draft = self
        .synthesizer
        .synthesize(articles, group)
        .map_err(|e| (Phase::Writing, e))?;
      let incident_id = tx
        .insert_incident(&draft)
        .map_err(|e| (Phase::Writing, e))?;

      for &article_id in group.members() {
        tx.insert_mapping(Mapping { incident_id, article_id })
          .map_err(|e| (Phase::Writing, e))?;
      }

      assignments.push(Assignment {
        incident_id,
        article_ids: group.members().to_vec(),
      });
    }

    Ok((removed, assignments))
  }
}
