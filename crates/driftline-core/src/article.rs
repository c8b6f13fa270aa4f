//! Articles: raw incident reports, the input unit of clustering.
//!
//! Articles are written by the ingestion path and are never mutated by the
//! clustering engine. The `relevant` flag is an opaque attribute owned by
//! external reviewers; the engine does not read or filter on it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type ArticleId = i64;

// ─── Full record ─────────────────────────────────────────────────────────────

/// A persisted article with every extracted field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
  pub article_id:           ArticleId,
  pub title:                Option<String>,
  pub summary:              Option<String>,
  /// URL of the page the report was scraped from.
  pub website:              Option<String>,
  pub content:              Option<String>,
  pub keywords:             Vec<String>,
  /// Date of the incident the article reports on (not the publish date).
  pub date:                 Option<NaiveDate>,
  pub number_dead:          Option<u32>,
  pub number_missing:       Option<u32>,
  pub number_survivors:     Option<u32>,
  pub country_of_origin:    Option<String>,
  pub region_of_origin:     Option<String>,
  pub cause_of_death:       Option<String>,
  pub region_of_incident:   Option<String>,
  pub country_of_incident:  Option<String>,
  pub location_of_incident: Option<String>,
  pub latitude:             Option<f64>,
  pub longitude:            Option<f64>,
  pub relevant:             bool,
}

impl Article {
  /// The lightweight projection the cluster builder works on.
  pub fn summary(&self) -> ArticleSummary {
    ArticleSummary {
      article_id:           self.article_id,
      date:                 self.date,
      cause_of_death:       self.cause_of_death.clone(),
      location_of_incident: self.location_of_incident.clone(),
      country_of_incident:  self.country_of_incident.clone(),
      region_of_incident:   self.region_of_incident.clone(),
    }
  }
}

// ─── Clustering projection ───────────────────────────────────────────────────

/// The subset of article fields fetched for clustering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleSummary {
  pub article_id:           ArticleId,
  pub date:                 Option<NaiveDate>,
  pub cause_of_death:       Option<String>,
  pub location_of_incident: Option<String>,
  pub country_of_incident:  Option<String>,
  pub region_of_incident:   Option<String>,
}

// ─── Input type ──────────────────────────────────────────────────────────────

/// Input for creating an article. The id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewArticle {
  pub title:                Option<String>,
  pub summary:              Option<String>,
  pub website:              Option<String>,
  pub content:              Option<String>,
  pub keywords:             Vec<String>,
  pub date:                 Option<NaiveDate>,
  pub number_dead:          Option<u32>,
  pub number_missing:       Option<u32>,
  pub number_survivors:     Option<u32>,
  pub country_of_origin:    Option<String>,
  pub region_of_origin:     Option<String>,
  pub cause_of_death:       Option<String>,
  pub region_of_incident:   Option<String>,
  pub country_of_incident:  Option<String>,
  pub location_of_incident: Option<String>,
  pub latitude:             Option<f64>,
  pub longitude:            Option<f64>,
  pub relevant:             bool,
}

impl Default for NewArticle {
  fn default() -> Self {
    Self {
      title:                None,
      summary:              None,
      website:              None,
      content:              None,
      keywords:             Vec::new(),
      date:                 None,
      number_dead:          None,
      number_missing:       None,
      number_survivors:     None,
      country_of_origin:    None,
      region_of_origin:     None,
      cause_of_death:       None,
      region_of_incident:   None,
      country_of_incident:  None,
      location_of_incident: None,
      latitude:             None,
      longitude:            None,
      relevant:             true,
    }
  }
}

impl NewArticle {
  /// An article with only an incident date set; relevant by default.
  pub fn dated(date: NaiveDate) -> Self {
    Self { date: Some(date), ..Self::default() }
  }

  /// Attach the store-assigned id.
  pub fn into_article(self, article_id: ArticleId) -> Article {
    Article {
      article_id,
      title:                self.title,
      summary:              self.summary,
      website:              self.website,
      content:              self.content,
      keywords:             self.keywords,
      date:                 self.date,
      number_dead:          self.number_dead,
      number_missing:       self.number_missing,
      number_survivors:     self.number_survivors,
      country_of_origin:    self.country_of_origin,
      region_of_origin:     self.region_of_origin,
      cause_of_death:       self.cause_of_death,
      region_of_incident:   self.region_of_incident,
      country_of_incident:  self.country_of_incident,
      location_of_incident: self.location_of_incident,
      latitude:             self.latitude,
      longitude:            self.longitude,
      relevant:             self.relevant,
    }
  }
}
