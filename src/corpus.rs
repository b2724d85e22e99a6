//! Corpus store: topics and question records, loaded once and read-only afterwards.
//!
//! Validation happens on a scratch copy; a `Corpus` only exists if every entry
//! passed, so callers never observe a partially loaded corpus.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use tracing::{info, instrument, warn};

use crate::config::{read_corpus_file, CorpusCfg};
use crate::domain::{QuestionId, QuestionRecord, Topic};
use crate::error::CorpusLoadError;

#[derive(Debug)]
pub struct Corpus {
  topics: Vec<Topic>,
  /// All records in file order; `QuestionId(n)` lives at index `n - 1`.
  questions: Vec<QuestionRecord>,
  /// Lowercased topic name -> indices into `questions`.
  by_topic: HashMap<String, Vec<usize>>,
}

impl Corpus {
  /// Parse and validate a TOML corpus.
  #[instrument(level = "info", skip_all, fields(bytes = source.len()))]
  pub fn from_toml_str(source: &str) -> Result<Self, CorpusLoadError> {
    let cfg = CorpusCfg::from_toml_str(source)?;
    Self::from_cfg(cfg)
  }

  /// Read, parse and validate a corpus file.
  #[instrument(level = "info", skip(path), fields(path = %path.display()))]
  pub fn from_path(path: &Path) -> Result<Self, CorpusLoadError> {
    let source = read_corpus_file(path)?;
    Self::from_toml_str(&source)
  }

  pub fn from_cfg(cfg: CorpusCfg) -> Result<Self, CorpusLoadError> {
    let mut topics = Vec::with_capacity(cfg.topics.len());
    let mut questions = Vec::new();
    let mut by_topic = HashMap::<String, Vec<usize>>::new();
    let mut seen = HashSet::<String>::new();

    for (ordinal, tc) in cfg.topics.into_iter().enumerate() {
      let name = tc.name.trim().to_string();
      if name.is_empty() {
        return Err(CorpusLoadError::Invalid(format!("topic #{} has a blank name", ordinal + 1)));
      }
      let key = name.to_lowercase();
      if !seen.insert(key.clone()) {
        return Err(CorpusLoadError::Invalid(format!("duplicate topic '{name}'")));
      }
      if tc.questions.is_empty() {
        warn!(target: "corpus", topic = %name, "Topic has no questions");
      }

      let indices = by_topic.entry(key).or_default();
      for (n, qc) in tc.questions.into_iter().enumerate() {
        let at = || format!("topic '{}', question #{}", name, n + 1);
        for (field, value) in [("question", &qc.question), ("answer", &qc.answer), ("explanation", &qc.explanation)] {
          if value.trim().is_empty() {
            return Err(CorpusLoadError::Invalid(format!("{}: blank {}", at(), field)));
          }
        }
        if qc.snippets.iter().any(|s| s.code.trim().is_empty()) {
          return Err(CorpusLoadError::Invalid(format!("{}: blank snippet code", at())));
        }

        let id = u32::try_from(questions.len() + 1)
          .map_err(|_| CorpusLoadError::Invalid("too many questions".into()))?;
        indices.push(questions.len());
        questions.push(QuestionRecord {
          id: QuestionId(id),
          topic: name.clone(),
          question: qc.question.trim().to_string(),
          answer: qc.answer.trim().to_string(),
          explanation: qc.explanation.trim().to_string(),
          snippets: qc.snippets,
        });
      }
      topics.push(Topic { name, ordinal });
    }

    if topics.is_empty() || questions.is_empty() {
      return Err(CorpusLoadError::Empty);
    }

    for t in &topics {
      let n = by_topic.get(&t.name.to_lowercase()).map_or(0, Vec::len);
      info!(target: "corpus", topic = %t.name, questions = n, "Corpus inventory");
    }
    info!(target: "corpus", topics = topics.len(), questions = questions.len(), "Corpus loaded");

    Ok(Self { topics, questions, by_topic })
  }

  /// Every topic exactly once, in file order.
  pub fn list_topics(&self) -> &[Topic] {
    &self.topics
  }

  /// Case-insensitive topic lookup.
  pub fn topic(&self, name: &str) -> Option<&Topic> {
    let key = name.trim().to_lowercase();
    self.topics.iter().find(|t| t.name.to_lowercase() == key)
  }

  pub fn get_question(&self, id: QuestionId) -> Option<&QuestionRecord> {
    let idx = (id.0 as usize).checked_sub(1)?;
    self.questions.get(idx)
  }

  /// Records of a topic in file order. Unknown topic yields an empty vector.
  pub fn questions_for_topic(&self, name: &str) -> Vec<&QuestionRecord> {
    self.by_topic
      .get(&name.trim().to_lowercase())
      .map(|ids| ids.iter().map(|&i| &self.questions[i]).collect())
      .unwrap_or_default()
  }

  pub fn questions(&self) -> &[QuestionRecord] {
    &self.questions
  }

  pub fn len(&self) -> usize {
    self.questions.len()
  }
}
