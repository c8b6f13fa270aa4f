//! Incidents and the article↔incident mapping.
//!
//! Incidents are derived data: every rebuild destroys and recreates them, so
//! incident ids carry no meaning across rebuilds.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::article::{Article, ArticleId};

pub type IncidentId = i64;

/// A canonical incident record, not yet persisted.
///
/// Every field is copied from the group's representative article; sibling
/// members never contribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentDraft {
  pub title:                Option<String>,
  pub verified:             bool,
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
}

impl IncidentDraft {
  /// Copy the incident fields of `article`. Synthesised incidents start out
  /// verified.
  pub fn from_representative(article: &Article) -> Self {
    Self {
      title:                article.title.clone(),
      verified:             true,
      date:                 article.date,
      number_dead:          article.number_dead,
      number_missing:       article.number_missing,
      number_survivors:     article.number_survivors,
      country_of_origin:    article.country_of_origin.clone(),
      region_of_origin:     article.region_of_origin.clone(),
      cause_of_death:       article.cause_of_death.clone(),
      region_of_incident:   article.region_of_incident.clone(),
      country_of_incident:  article.country_of_incident.clone(),
      location_of_incident: article.location_of_incident.clone(),
      latitude:             article.latitude,
      longitude:            article.longitude,
    }
  }

  /// Attach the store-generated id.
  pub fn into_incident(self, incident_id: IncidentId) -> Incident {
    Incident { incident_id, draft: self }
  }
}

/// A persisted incident.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Incident {
  pub incident_id: IncidentId,
  #[serde(flatten)]
  pub draft:       IncidentDraft,
}

/// One row of the mapping relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Mapping {
  pub incident_id: IncidentId,
  pub article_id:  ArticleId,
}

/// An incident together with the articles mapped onto it, in ascending id
/// order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncidentView {
  #[serde(flatten)]
  pub incident:    Incident,
  pub article_ids: Vec<ArticleId>,
}
