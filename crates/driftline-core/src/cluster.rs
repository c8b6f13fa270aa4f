//! Leader-based partitioning of articles into incident groups.
//!
//! The builder makes one pass over the ordered input. Each article that has
//! not yet been claimed becomes the *leader* of a new group and claims every
//! later unclaimed article that is similar to it. Later members are never
//! compared against each other, so with a non-transitive predicate
//! A~B and B~C does not put C in A's group unless A~C as well.

use std::collections::HashSet;

use serde::Serialize;

use crate::{
  Error, Result,
  article::{ArticleId, ArticleSummary},
  similarity::SimilarityPredicate,
};

// ─── Group ───────────────────────────────────────────────────────────────────

/// An ordered, non-empty list of article ids believed to describe one
/// incident. The first id is the representative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Group {
  members: Vec<ArticleId>,
}

impl Group {
  fn led_by(representative: ArticleId) -> Self {
    Self { members: vec![representative] }
  }

  pub fn representative(&self) -> ArticleId { self.members[0] }

  pub fn members(&self) -> &[ArticleId] { &self.members }
}

// ─── Builder ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ClusterBuilder<P> {
  predicate: P,
}

impl<P: SimilarityPredicate> ClusterBuilder<P> {
  pub fn new(predicate: P) -> Self { Self { predicate } }

  pub fn predicate(&self) -> &P { &self.predicate }

  /// Partition `articles` into groups. Input order decides leadership, so
  /// callers pass articles in ascending id order.
  ///
  /// Fails with [`Error::DuplicateArticle`] if an id appears twice, since the
  /// result would no longer be a partition.
  pub fn build(&self, articles: &[ArticleSummary]) -> Result<Vec<Group>> {
    let mut seen = HashSet::with_capacity(articles.len());
    for article in articles {
      if !seen.insert(article.article_id) {
        return Err(Error::DuplicateArticle(article.article_id));
      }
    }

    let mut consumed = vec![false; articles.len()];
    let mut groups = Vec::new();

    for (i, leader) in articles.iter().enumerate() {
      if consumed[i] {
        continue;
      }
      let mut group = Group::led_by(leader.article_id);

      for (j, candidate) in articles.iter().enumerate().skip(i + 1) {
        if consumed[j] {
          continue;
        }
        if self.predicate.is_similar(leader, candidate) {
          group.members.push(candidate.article_id);
          consumed[j] = true;
        }
      }

      consumed[i] = true;
      groups.push(group);
    }

    Ok(groups)
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Days, NaiveDate};

  use super::*;
  use crate::similarity::DateProximity;

  fn base() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() }

  /// Articles with ids 1..=n, each `offsets[k]` days after the base date.
  fn articles(offsets: &[u64]) -> Vec<ArticleSummary> {
    offsets
      .iter()
      .enumerate()
      .map(|(k, off)| ArticleSummary {
        article_id:           k as i64 + 1,
        date:                 base().checked_add_days(Days::new(*off)),
        cause_of_death:       None,
        location_of_incident: None,
        country_of_incident:  None,
        region_of_incident:   None,
      })
      .collect()
  }

  fn ids(groups: &[Group]) -> Vec<Vec<ArticleId>> {
    groups.iter().map(|g| g.members().to_vec()).collect()
  }

  fn builder(threshold: u32) -> ClusterBuilder<DateProximity> {
    ClusterBuilder::new(DateProximity::new(threshold))
  }

  #[test]
  fn empty_input_yields_no_groups() {
    assert!(builder(3).build(&[]).unwrap().is_empty());
  }

  #[test]
  fn scenario_two_close_one_far() {
    // 2024-01-01, 2024-01-02, 2024-01-10
    let groups = builder(3).build(&articles(&[0, 1, 9])).unwrap();
    assert_eq!(ids(&groups), vec![vec![1, 2], vec![3]]);
    assert_eq!(groups[0].representative(), 1);
    assert_eq!(groups[1].representative(), 3);
  }

  #[test]
  fn boundary_exactly_threshold_groups() {
    let groups = builder(3).build(&articles(&[0, 3])).unwrap();
    assert_eq!(ids(&groups), vec![vec![1, 2]]);
  }

  #[test]
  fn boundary_threshold_plus_one_splits() {
    let groups = builder(3).build(&articles(&[0, 4])).unwrap();
    assert_eq!(ids(&groups), vec![vec![1], vec![2]]);
  }

  #[test]
  fn members_are_compared_to_leader_only() {
    // A(day 0) ~ B(day 3), B ~ C(day 6), but A !~ C.
    let groups = builder(3).build(&articles(&[0, 3, 6])).unwrap();
    assert_eq!(ids(&groups), vec![vec![1, 2], vec![3]]);
  }

  #[test]
  fn later_leader_does_not_reclaim_consumed_articles() {
    // 1(d0) claims 2(d2); 3(d4) leads and may not take 2 even though 2~3.
    let groups = builder(2).build(&articles(&[0, 2, 4, 5])).unwrap();
    assert_eq!(ids(&groups), vec![vec![1, 2], vec![3, 4]]);
  }

  #[test]
  fn input_order_decides_leadership() {
    let mut input = articles(&[0, 3, 6]);
    input.reverse();
    let groups = builder(3).build(&input).unwrap();
    assert_eq!(ids(&groups), vec![vec![3, 2], vec![1]]);
  }

  #[test]
  fn result_is_a_partition_of_the_input() {
    let offsets = [5, 0, 17, 3, 3, 40, 11, 12, 9, 100, 2, 41];
    let input = articles(&offsets);
    let groups = builder(3).build(&input).unwrap();

    let mut flattened: Vec<ArticleId> =
      groups.iter().flat_map(|g| g.members().iter().copied()).collect();
    let total = flattened.len();
    flattened.sort_unstable();
    flattened.dedup();
    assert_eq!(flattened.len(), total, "an article landed in two groups");

    let mut expected: Vec<ArticleId> = input.iter().map(|a| a.article_id).collect();
    expected.sort_unstable();
    assert_eq!(flattened, expected);
  }

  #[test]
  fn repeated_builds_are_identical() {
    let input = articles(&[8, 1, 1, 30, 4, 29, 2]);
    let b = builder(3);
    assert_eq!(b.build(&input).unwrap(), b.build(&input).unwrap());
  }

  #[test]
  fn dateless_articles_stand_alone() {
    let mut input = articles(&[0, 0, 0]);
    input[1].date = None;
    let groups = builder(3).build(&input).unwrap();
    assert_eq!(ids(&groups), vec![vec![1, 3], vec![2]]);
  }

  #[test]
  fn duplicate_ids_are_rejected() {
    let mut input = articles(&[0, 1]);
    input[1].article_id = 1;
    assert!(matches!(builder(3).build(&input), Err(Error::DuplicateArticle(1))));
  }
}
