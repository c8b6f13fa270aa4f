//! Pairwise similarity between articles.
//!
//! A [`SimilarityPredicate`] decides whether two reports describe the same
//! real-world incident. Implementations must be pure and symmetric. They are
//! *not* required to be transitive, and the date predicate is not.

use serde::{Deserialize, Serialize};

use crate::article::ArticleSummary;

/// Default maximum date distance, in days, for two articles to match.
pub const DEFAULT_THRESHOLD_DAYS: u32 = 3;

pub trait SimilarityPredicate {
  fn is_similar(&self, a: &ArticleSummary, b: &ArticleSummary) -> bool;

  /// Combine with another predicate by logical AND. This is how further
  /// criteria (e.g. geographic proximity) are layered onto the date check.
  fn and<Q>(self, other: Q) -> Both<Self, Q>
  where
    Self: Sized,
    Q: SimilarityPredicate,
  {
    Both { left: self, right: other }
  }
}

// ─── Date proximity ──────────────────────────────────────────────────────────

/// Two articles match when their incident dates are at most
/// `threshold_days` apart (inclusive). An article without a date matches
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateProximity {
  pub threshold_days: u32,
}

impl DateProximity {
  pub fn new(threshold_days: u32) -> Self { Self { threshold_days } }
}

impl Default for DateProximity {
  fn default() -> Self { Self::new(DEFAULT_THRESHOLD_DAYS) }
}

impl SimilarityPredicate for DateProximity {
  fn is_similar(&self, a: &ArticleSummary, b: &ArticleSummary) -> bool {
    match (a.date, b.date) {
      (Some(da), Some(db)) => {
        (da - db).num_days().abs() <= i64::from(self.threshold_days)
      }
      _ => false,
    }
  }
}

// ─── Combinators ─────────────────────────────────────────────────────────────

/// Logical AND of two predicates. See [`SimilarityPredicate::and`].
#[derive(Debug, Clone, Copy)]
pub struct Both<A, B> {
  left:  A,
  right: B,
}

impl<A, B> SimilarityPredicate for Both<A, B>
where
  A: SimilarityPredicate,
  B: SimilarityPredicate,
{
  fn is_similar(&self, a: &ArticleSummary, b: &ArticleSummary) -> bool {
    self.left.is_similar(a, b) && self.right.is_similar(a, b)
  }
}

impl<F> SimilarityPredicate for F
where
  F: Fn(&ArticleSummary, &ArticleSummary) -> bool,
{
  fn is_similar(&self, a: &ArticleSummary, b: &ArticleSummary) -> bool {
    self(a, b)
  }
}
