//! Incident synthesis from a group's representative article.

use crate::{
  StoreError,
  cluster::Group,
  incident::IncidentDraft,
  store::ArticleRepository,
};

/// Builds one [`IncidentDraft`] per group by re-fetching the representative's
/// full record. Fields of the other members are not consulted.
#[derive(Debug, Clone, Copy, Default)]
pub struct IncidentSynthesizer;

impl IncidentSynthesizer {
  pub fn synthesize<R>(&self, articles: &R, group: &Group) -> Result<IncidentDraft, StoreError>
  where
    R: ArticleRepository + ?Sized,
  {
    let representative = articles.fetch_full(group.representative())?;
    Ok(IncidentDraft::from_representative(&representative))
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;
  use crate::{
    article::NewArticle,
    cluster::ClusterBuilder,
    memory::MemoryStore,
    similarity::DateProximity,
    store::ArticleRepository,
  };

  fn report(day: u32, dead: u32, location: &str) -> NewArticle {
    NewArticle {
      title: Some(format!("{dead} dead near {location}")),
      date: NaiveDate::from_ymd_opt(2024, 6, day),
      number_dead: Some(dead),
      number_missing: Some(dead / 2),
      number_survivors: Some(40),
      country_of_origin: Some("Syria".into()),
      region_of_origin: Some("Middle East".into()),
      cause_of_death: Some("Drowning".into()),
      region_of_incident: Some("Mediterranean".into()),
      country_of_incident: Some("Greece".into()),
      location_of_incident: Some(location.into()),
      latitude: Some(36.9),
      longitude: Some(21.7),
      ..NewArticle::default()
    }
  }

  #[test]
  fn copies_the_representative_only() {
    let store = MemoryStore::with_articles(vec![
      report(14, 78, "Pylos"),
      report(15, 82, "Kalamata"),
      report(16, 600, "Ionian Sea"),
    ]);
    let summaries = store.fetch_for_clustering().unwrap();
    let groups = ClusterBuilder::new(DateProximity::new(3)).build(&summaries).unwrap();
    assert_eq!(groups.len(), 1);

    let draft = IncidentSynthesizer.synthesize(&store, &groups[0]).unwrap();
    let first = store.fetch_full(groups[0].representative()).unwrap();

    assert!(draft.verified);
    assert_eq!(draft.title, first.title);
    assert_eq!(draft.date, first.date);
    assert_eq!(draft.number_dead, Some(78));
    assert_eq!(draft.number_missing, Some(39));
    assert_eq!(draft.number_survivors, first.number_survivors);
    assert_eq!(draft.country_of_origin, first.country_of_origin);
    assert_eq!(draft.region_of_origin, first.region_of_origin);
    assert_eq!(draft.cause_of_death, first.cause_of_death);
    assert_eq!(draft.region_of_incident, first.region_of_incident);
    assert_eq!(draft.country_of_incident, first.country_of_incident);
    assert_eq!(draft.location_of_incident.as_deref(), Some("Pylos"));
    assert_eq!(draft.latitude, first.latitude);
    assert_eq!(draft.longitude, first.longitude);
  }

  #[test]
  fn missing_representative_is_reported() {
    let store = MemoryStore::with_articles(vec![report(1, 3, "Lampedusa")]);
    let mut summaries = store.fetch_for_clustering().unwrap();
    summaries[0].article_id = 404;
    let groups = ClusterBuilder::new(DateProximity::new(3)).build(&summaries).unwrap();

    let err = IncidentSynthesizer.synthesize(&store, &groups[0]).unwrap_err();
    assert!(matches!(err, StoreError::ArticleNotFound(404)));
  }
}
