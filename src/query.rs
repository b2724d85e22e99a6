//! Query engine over the corpus: filtered search and random draws.
//!
//! Randomness always comes from the caller. Pass `StdRng::seed_from_u64` for
//! reproducible draws.

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, instrument};

use crate::corpus::Corpus;
use crate::domain::QuestionRecord;
use crate::error::QueryError;
use crate::util::trunc_for_log;

/// Recognized search options. Every field is optional; a default filter matches everything.
#[derive(Clone, Debug, Default)]
pub struct SearchFilter {
  /// Restrict to one topic (case-insensitive exact name).
  pub topic: Option<String>,
  /// Case-insensitive substring over question, answer and explanation.
  pub text: Option<String>,
  /// Cap on result count.
  pub limit: Option<usize>,
}

impl SearchFilter {
  pub fn topic(name: impl Into<String>) -> Self {
    Self { topic: Some(name.into()), ..Self::default() }
  }

  #[allow(dead_code)]
  pub fn text(needle: impl Into<String>) -> Self {
    Self { text: Some(needle.into()), ..Self::default() }
  }

  fn needle(&self) -> Option<String> {
    self.text
      .as_deref()
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .map(str::to_lowercase)
  }
}

impl Corpus {
  /// Matching records in corpus order. No match is an empty vector, not an error.
  #[instrument(level = "debug", skip(self, filter), fields(
    topic = ?filter.topic,
    text = %filter.text.as_deref().map(|t| trunc_for_log(t, 40)).unwrap_or_default(),
    limit = ?filter.limit
  ))]
  pub fn search(&self, filter: &SearchFilter) -> Vec<&QuestionRecord> {
    let pool = match &filter.topic {
      Some(t) => self.questions_for_topic(t),
      None => self.questions().iter().collect(),
    };
    let needle = filter.needle();
    let hits: Vec<&QuestionRecord> = pool
      .into_iter()
      .filter(|q| needle.as_deref().map_or(true, |n| q.matches_text(n)))
      .take(filter.limit.unwrap_or(usize::MAX))
      .collect();
    debug!(target: "query", hits = hits.len(), "Search done");
    hits
  }

  /// One uniformly chosen record, optionally restricted to a topic.
  pub fn random_question<R: Rng + ?Sized>(
    &self,
    topic: Option<&str>,
    rng: &mut R,
  ) -> Result<&QuestionRecord, QueryError> {
    let filter = SearchFilter { topic: topic.map(str::to_string), ..SearchFilter::default() };
    let pool = self.search(&filter);
    let chosen = pool
      .choose(rng)
      .copied()
      .ok_or_else(|| QueryError::EmptyCorpus { topic: topic.map(str::to_string) })?;
    debug!(target: "query", id = %chosen.id, topic = %chosen.topic, "Random question drawn");
    Ok(chosen)
  }

  /// Up to `count` distinct records matching `filter`, in random order.
  /// Fewer candidates than requested yields all of them.
  pub fn draw<R: Rng + ?Sized>(
    &self,
    filter: &SearchFilter,
    count: Option<usize>,
    rng: &mut R,
  ) -> Vec<&QuestionRecord> {
    let mut pool = self.search(filter);
    pool.shuffle(rng);
    if let Some(n) = count {
      pool.truncate(n);
    }
    debug!(target: "query", drawn = pool.len(), requested = ?count, "Questions drawn");
    pool
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use rand::rngs::StdRng;
  use rand::SeedableRng;

  use super::*;
  use crate::corpus::tests::sample;

  #[test]
  fn search_results_resolve_and_respect_topic() {
    let c = sample();
    let hits = c.search(&SearchFilter::topic("inheritance"));
    assert_eq!(hits.len(), 5);
    for q in hits {
      assert_eq!(c.get_question(q.id).unwrap().topic, "Inheritance");
    }
  }

  #[test]
  fn text_match_is_case_insensitive() {
    let c = sample();
    let hits = c.search(&SearchFilter::text("VIRTUAL"));
    let topics: Vec<_> = hits.iter().map(|q| q.topic.as_str()).collect();
    assert_eq!(topics, ["Polymorphism", "Inheritance"]);
  }

  #[test]
  fn limit_and_combined_filters() {
    let c = sample();
    let f = SearchFilter { topic: None, text: Some("answer".into()), limit: Some(4) };
    assert_eq!(c.search(&f).len(), 4);

    let f = SearchFilter { topic: Some("Friendship".into()), text: Some("virtual".into()), limit: None };
    assert!(c.search(&f).is_empty());

    let f = SearchFilter { topic: None, text: Some("   ".into()), limit: None };
    assert_eq!(c.search(&f).len(), 15);
  }

  #[test]
  fn unknown_topic_yields_empty() {
    assert!(sample().search(&SearchFilter::topic("Templates")).is_empty());
  }

  #[test]
  fn seeded_random_question_is_deterministic() {
    let c = sample();
    for seed in [0u64, 7, 42, 1234] {
      let a = c.random_question(Some("Polymorphism"), &mut StdRng::seed_from_u64(seed)).unwrap().id;
      let b = c.random_question(Some("Polymorphism"), &mut StdRng::seed_from_u64(seed)).unwrap().id;
      assert_eq!(a, b);
      assert_eq!(c.get_question(a).unwrap().topic, "Polymorphism");
    }
  }

  #[test]
  fn random_question_on_empty_pool_fails() {
    let c = sample();
    let err = c.random_question(Some("Templates"), &mut StdRng::seed_from_u64(1)).unwrap_err();
    assert_eq!(err, QueryError::EmptyCorpus { topic: Some("Templates".into()) });
  }

  #[test]
  fn draw_has_no_repeats_and_caps_at_available() {
    let c = sample();
    let mut rng = StdRng::seed_from_u64(9);
    let all = c.draw(&SearchFilter::default(), Some(100), &mut rng);
    assert_eq!(all.len(), 15);
    let ids: HashSet<_> = all.iter().map(|q| q.id).collect();
    assert_eq!(ids.len(), 15);

    let three = c.draw(&SearchFilter::topic("Friendship"), Some(3), &mut rng);
    assert_eq!(three.len(), 3);
  }
}
