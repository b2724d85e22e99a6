//! Corpus configuration (TOML schema) and environment settings.
//!
//! Expected corpus layout:
//!
//! ```toml
//! [[topics]]
//! name = "Inheritance"
//!
//!   [[topics.questions]]
//!   question = "..."
//!   answer = "..."
//!   explanation = "..."
//!
//!     [[topics.questions.snippets]]
//!     language = "cpp"
//!     code = '''...'''
//! ```

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::Snippet;
use crate::error::CorpusLoadError;

pub const CORPUS_PATH_ENV: &str = "OOPQUIZ_CORPUS_PATH";
pub const RECORD_PATH_ENV: &str = "OOPQUIZ_RECORD_PATH";

#[derive(Clone, Debug, Deserialize)]
pub struct CorpusCfg {
  #[serde(default)]
  pub topics: Vec<TopicCfg>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct TopicCfg {
  pub name: String,
  #[serde(default)]
  pub questions: Vec<QuestionCfg>,
}

/// Question entry accepted in TOML. All three text fields are required and must be non-blank.
#[derive(Clone, Debug, Deserialize)]
pub struct QuestionCfg {
  pub question: String,
  pub answer: String,
  pub explanation: String,
  #[serde(default)] pub snippets: Vec<Snippet>,
}

impl CorpusCfg {
  pub fn from_toml_str(s: &str) -> Result<Self, CorpusLoadError> {
    let cfg = toml::from_str::<CorpusCfg>(s)?;
    debug!(target: "corpus", topics = cfg.topics.len(), "Parsed corpus TOML");
    Ok(cfg)
  }
}

/// Read the corpus file. IO failures are reported with the offending path.
pub fn read_corpus_file(path: &std::path::Path) -> Result<String, CorpusLoadError> {
  let s = std::fs::read_to_string(path).map_err(|source| CorpusLoadError::Io {
    path: path.display().to_string(),
    source,
  })?;
  info!(target: "oop_quiz", path = %path.display(), bytes = s.len(), "Read corpus file");
  Ok(s)
}

/// Corpus path from OOPQUIZ_CORPUS_PATH, if set and non-empty.
pub fn corpus_path_from_env() -> Option<PathBuf> {
  path_from_env(CORPUS_PATH_ENV)
}

/// Session record path from OOPQUIZ_RECORD_PATH, if set and non-empty.
pub fn record_path_from_env() -> Option<PathBuf> {
  path_from_env(RECORD_PATH_ENV)
}

fn path_from_env(key: &str) -> Option<PathBuf> {
  std::env::var(key)
    .ok()
    .filter(|v| !v.trim().is_empty())
    .map(PathBuf::from)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_nested_topics_and_snippets() {
    let cfg = CorpusCfg::from_toml_str(
      r#"
        [[topics]]
        name = "Friendship"
          [[topics.questions]]
          question = "Is friendship inherited?"
          answer = "No."
          explanation = "A friend of a base class is not a friend of derived classes."
            [[topics.questions.snippets]]
            language = "cpp"
            code = "class A { friend class B; };"
            [[topics.questions.snippets]]
            code = "// no language"
      "#,
    )
    .unwrap();
    assert_eq!(cfg.topics.len(), 1);
    let q = &cfg.topics[0].questions[0];
    assert_eq!(q.snippets.len(), 2);
    assert_eq!(q.snippets[0].language.as_deref(), Some("cpp"));
    assert_eq!(q.snippets[1].language, None);
  }

  #[test]
  fn missing_required_field_is_a_parse_error() {
    let err = CorpusCfg::from_toml_str(
      r#"
        [[topics]]
        name = "Friendship"
          [[topics.questions]]
          question = "Is friendship inherited?"
          answer = "No."
      "#,
    )
    .unwrap_err();
    assert!(matches!(err, CorpusLoadError::Parse(_)));
  }

  #[test]
  fn unreadable_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    let err = read_corpus_file(&missing).unwrap_err();
    match err {
      CorpusLoadError::Io { path, .. } => assert!(path.ends_with("nope.toml")),
      other => panic!("unexpected error: {other:?}"),
    }
  }
}
