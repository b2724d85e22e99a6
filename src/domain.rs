//! Domain models: topics, question records and their illustrative snippets.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Corpus-wide question identifier. Assigned sequentially (1-based) at load time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub u32);

impl fmt::Display for QuestionId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// A named category grouping related questions (e.g. "Inheritance").
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Topic {
  pub name: String,
  /// Position in the source file; display order.
  pub ordinal: usize,
}

/// Illustrative code. Never compiled, never executed.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snippet {
  #[serde(default)] pub language: Option<String>,
  pub code: String,
}

/// One reference entry.
#[derive(Clone, Debug)]
pub struct QuestionRecord {
  pub id: QuestionId,
  /// Name of the owning topic. Topics outlive records, so this is a reference by name.
  pub topic: String,
  pub question: String,
  pub answer: String,
  pub explanation: String,
  pub snippets: Vec<Snippet>,
}

impl QuestionRecord {
  /// Case-insensitive substring match over question, answer and explanation.
  /// `needle` must already be lowercased.
  pub fn matches_text(&self, needle: &str) -> bool {
    [&self.question, &self.answer, &self.explanation]
      .iter()
      .any(|field| field.to_lowercase().contains(needle))
  }
}
