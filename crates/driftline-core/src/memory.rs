//! In-memory store used by the engine's unit tests.
//!
//! Transactions stage a copy of the tables and swap it in on commit, so a
//! dropped or rolled-back transaction leaves no trace. Faults can be injected
//! into fetching and mapping inserts.

use std::{
  cell::{Cell, RefCell},
  collections::{BTreeMap, BTreeSet},
};

use crate::{
  StoreError,
  article::{Article, ArticleId, ArticleSummary, NewArticle},
  config::WipeScope,
  incident::{IncidentDraft, IncidentId, Mapping},
  store::{ArticleRepository, IncidentSink, RebuildTransaction},
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tables {
  pub incidents: BTreeMap<IncidentId, IncidentDraft>,
  pub mappings:  BTreeSet<Mapping>,
  last_id:       IncidentId,
}

pub struct MemoryStore {
  articles:     Vec<Article>,
  tables:       RefCell<Tables>,
  unavailable:  Cell<bool>,
  fail_mapping: Cell<Option<usize>>,
  faults:       Cell<Faults>,
  missing:      Cell<Option<ArticleId>>,
}

/// Transaction steps that can be made to fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct Faults {
  pub wipe:     bool,
  pub commit:   bool,
  pub rollback: bool,
}

impl MemoryStore {
  /// Assigns ids 1, 2, 3, … in input order.
  pub fn with_articles(inputs: Vec<NewArticle>) -> Self {
    let articles = inputs
      .into_iter()
      .zip(1..)
      .map(|(input, id)| input.into_article(id))
      .collect();
    Self {
      articles,
      tables: RefCell::new(Tables::default()),
      unavailable: Cell::new(false),
      fail_mapping: Cell::new(None),
      faults: Cell::new(Faults::default()),
      missing: Cell::new(None),
    }
  }

  pub fn article(&self, id: ArticleId) -> Article {
    self
      .articles
      .iter()
      .find(|a| a.article_id == id)
      .cloned()
      .unwrap()
  }

  pub fn tables(&self) -> Tables { self.tables.borrow().clone() }

  pub fn seed(&self, tables: Tables) { *self.tables.borrow_mut() = tables; }

  pub fn make_unavailable(&self) { self.unavailable.set(true); }

  /// The mapping insert after `n` successful ones fails.
  pub fn fail_mapping_after(&self, n: usize) { self.fail_mapping.set(Some(n)); }

  pub fn inject(&self, faults: Faults) { self.faults.set(faults); }

  /// `fetch_full` reports `id` as missing while it still appears in the
  /// clustering projection.
  pub fn lose_article(&self, id: ArticleId) { self.missing.set(Some(id)); }

  fn check_available(&self) -> Result<(), StoreError> {
    if self.unavailable.get() {
      return Err(StoreError::Unavailable("connection refused".into()));
    }
    Ok(())
  }
}

impl ArticleRepository for MemoryStore {
  fn fetch_for_clustering(&self) -> Result<Vec<ArticleSummary>, StoreError> {
    self.check_available()?;
    Ok(self.articles.iter().map(Article::summary).collect())
  }

  fn fetch_full(&self, id: ArticleId) -> Result<Article, StoreError> {
    self.check_available()?;
    if self.missing.get() == Some(id) {
      return Err(StoreError::ArticleNotFound(id));
    }
    self
      .articles
      .iter()
      .find(|a| a.article_id == id)
      .cloned()
      .ok_or(StoreError::ArticleNotFound(id))
  }
}

impl IncidentSink for MemoryStore {
  type Transaction<'t>
    = MemoryTx<'t>
  where
    Self: 't;

  fn begin(&self) -> Result<MemoryTx<'_>, StoreError> {
    self.check_available()?;
    Ok(MemoryTx {
      store:    self,
      staged:   self.tables(),
      inserted: 0,
    })
  }
}

pub struct MemoryTx<'t> {
  store:    &'t MemoryStore,
  staged:   Tables,
  inserted: usize,
}

impl RebuildTransaction for MemoryTx<'_> {
  fn wipe(&mut self, scope: WipeScope) -> Result<usize, StoreError> {
    if self.store.faults.get().wipe {
      return Err(StoreError::Query("injected wipe failure".into()));
    }
    let removed = self.staged.mappings.len();
    self.staged.mappings.clear();
    if scope == WipeScope::Full {
      self.staged.incidents.clear();
    }
    Ok(removed)
  }

  fn insert_incident(&mut self, draft: &IncidentDraft) -> Result<IncidentId, StoreError> {
    self.staged.last_id += 1;
    let id = self.staged.last_id;
    self.staged.incidents.insert(id, draft.clone());
    Ok(id)
  }

  fn insert_mapping(&mut self, mapping: Mapping) -> Result<(), StoreError> {
    if self.store.fail_mapping.get() == Some(self.inserted) {
      return Err(StoreError::Query("injected failure".into()));
    }
    if !self.staged.incidents.contains_key(&mapping.incident_id)
      || !self.store.articles.iter().any(|a| a.article_id == mapping.article_id)
    {
      return Err(StoreError::Query("foreign key violation".into()));
    }
    if !self.staged.mappings.insert(mapping) {
      return Err(StoreError::Query("duplicate mapping".into()));
    }
    self.inserted += 1;
    Ok(())
  }

  fn commit(self) -> Result<(), StoreError> {
    if self.store.faults.get().commit {
      return Err(StoreError::Unavailable("injected commit failure".into()));
    }
    *self.store.tables.borrow_mut() = self.staged;
    Ok(())
  }

  fn rollback(self) -> Result<(), StoreError> {
    if self.store.faults.get().rollback {
      return Err(StoreError::Unavailable("injected rollback failure".into()));
    }
    Ok(())
  }
}
