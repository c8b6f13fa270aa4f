//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Dates are stored as `YYYY-MM-DD` strings and keyword lists as compact JSON.
//! Booleans are stored as 0/1 integers.

use chrono::NaiveDate;
use driftline_core::{
  article::{Article, ArticleSummary},
  incident::{Incident, IncidentDraft},
};

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Keywords ────────────────────────────────────────────────────────────────

pub fn encode_keywords(keywords: &[String]) -> Result<String> {
  Ok(serde_json::to_string(keywords)?)
}

pub fn decode_keywords(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawArticle::read`].
pub const ARTICLE_COLUMNS: &str = "article_id, title, summary, website, content, keywords,
  date, number_dead, number_missing, number_survivors,
  country_of_origin, region_of_origin, cause_of_death,
  region_of_incident, country_of_incident, location_of_incident,
  latitude, longitude, relevant";

/// Raw values read directly from an `articles` row.
pub struct RawArticle {
  pub article_id:           i64,
  pub title:                Option<String>,
  pub summary:              Option<String>,
  pub website:              Option<String>,
  pub content:              Option<String>,
  pub keywords:             String,
  pub date:                 Option<String>,
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

impl RawArticle {
  pub fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      article_id:           row.get(0)?,
      title:                row.get(1)?,
      summary:              row.get(2)?,
      website:              row.get(3)?,
      content:              row.get(4)?,
      keywords:             row.get(5)?,
      date:                 row.get(6)?,
      number_dead:          row.get(7)?,
      number_missing:       row.get(8)?,
      number_survivors:     row.get(9)?,
      country_of_origin:    row.get(10)?,
      region_of_origin:     row.get(11)?,
      cause_of_death:       row.get(12)?,
      region_of_incident:   row.get(13)?,
      country_of_incident:  row.get(14)?,
      location_of_incident: row.get(15)?,
      latitude:             row.get(16)?,
      longitude:            row.get(17)?,
      relevant:             row.get(18)?,
    })
  }

  pub fn into_article(self) -> Result<Article> {
    Ok(Article {
      article_id:           self.article_id,
      title:                self.title,
      summary:              self.summary,
      website:              self.website,
      content:              self.content,
      keywords:             decode_keywords(&self.keywords)?,
      date:                 self.date.as_deref().map(decode_date).transpose()?,
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
    })
  }
}

/// Column list matching [`RawSummary::read`].
pub const SUMMARY_COLUMNS: &str = "article_id, date, cause_of_death,
  location_of_incident, country_of_incident, region_of_incident";

/// Raw values for the clustering projection of an article.
pub struct RawSummary {
  pub article_id:           i64,
  pub date:                 Option<String>,
  pub cause_of_death:       Option<String>,
  pub location_of_incident: Option<String>,
  pub country_of_incident:  Option<String>,
  pub region_of_incident:   Option<String>,
}

impl RawSummary {
  pub fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      article_id:           row.get(0)?,
      date:                 row.get(1)?,
      cause_of_death:       row.get(2)?,
      location_of_incident: row.get(3)?,
      country_of_incident:  row.get(4)?,
      region_of_incident:   row.get(5)?,
    })
  }

  pub fn into_summary(self) -> Result<ArticleSummary> {
    Ok(ArticleSummary {
      article_id:           self.article_id,
      date:                 self.date.as_deref().map(decode_date).transpose()?,
      cause_of_death:       self.cause_of_death,
      location_of_incident: self.location_of_incident,
      country_of_incident:  self.country_of_incident,
      region_of_incident:   self.region_of_incident,
    })
  }
}

/// Column list matching [`RawIncident::read`].
pub const INCIDENT_COLUMNS: &str = "incident_id, title, verified, date,
  number_dead, number_missing, number_survivors,
  country_of_origin, region_of_origin, cause_of_death,
  region_of_incident, country_of_incident, location_of_incident,
  latitude, longitude";

/// Raw values read directly from an `incidents` row.
pub struct RawIncident {
  pub incident_id:          i64,
  pub title:                Option<String>,
  pub verified:             bool,
  pub date:                 Option<String>,
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

impl RawIncident {
  pub fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      incident_id:          row.get(0)?,
      title:                row.get(1)?,
      verified:             row.get(2)?,
      date:                 row.get(3)?,
      number_dead:          row.get(4)?,
      number_missing:       row.get(5)?,
      number_survivors:     row.get(6)?,
      country_of_origin:    row.get(7)?,
      region_of_origin:     row.get(8)?,
      cause_of_death:       row.get(9)?,
      region_of_incident:   row.get(10)?,
      country_of_incident:  row.get(11)?,
      location_of_incident: row.get(12)?,
      latitude:             row.get(13)?,
      longitude:            row.get(14)?,
    })
  }

  pub fn into_incident(self) -> Result<Incident> {
    let draft = IncidentDraft {
      title:                self.title,
      verified:             self.verified,
      date:                 self.date.as_deref().map(decode_date).transpose()?,
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
    };
    Ok(draft.into_incident(self.incident_id))
  }
}
