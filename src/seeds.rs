//! Built-in corpus compiled into the binary, so the tool works without any file.

use crate::corpus::Corpus;
use crate::error::CorpusLoadError;

/// OOP reference corpus: polymorphism, aggregation, association, composition,
/// friendship and inheritance.
pub const BUILTIN_CORPUS_TOML: &str = include_str!("../corpus/oop.toml");

pub fn builtin_corpus() -> Result<Corpus, CorpusLoadError> {
  Corpus::from_toml_str(BUILTIN_CORPUS_TOML)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::query::SearchFilter;

  #[test]
  fn builtin_corpus_loads_all_topics() {
    let c = builtin_corpus().unwrap();
    let names: Vec<_> = c.list_topics().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
      names,
      ["Polymorphism", "Aggregation", "Association", "Composition", "Friendship", "Inheritance"]
    );
    for t in c.list_topics() {
      assert!(!c.questions_for_topic(&t.name).is_empty(), "{} has no questions", t.name);
    }
  }

  #[test]
  fn virtual_search_finds_dispatch_and_virtual_inheritance_only() {
    let c = builtin_corpus().unwrap();
    let hits = c.search(&SearchFilter::text("virtual"));

    assert!(hits.iter().any(|q| q.topic == "Polymorphism" && q.question.contains("virtual functions")));
    assert!(hits.iter().any(|q| q.topic == "Inheritance" && q.question.contains("virtual inheritance")));
    assert!(hits.iter().all(|q| q.topic == "Polymorphism" || q.topic == "Inheritance"));
  }

  #[test]
  fn snippets_carry_language_tags() {
    let c = builtin_corpus().unwrap();
    let snippets: Vec<_> = c.questions().iter().flat_map(|q| &q.snippets).collect();
    assert!(!snippets.is_empty());
    assert!(snippets.iter().all(|s| s.language.as_deref() == Some("cpp")));
  }
}
