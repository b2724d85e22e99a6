//! Error taxonomy.
//!
//! Load errors are fatal at startup. Query and session errors are local to the
//! call and never touch the corpus or other sessions.

use thiserror::Error;

use crate::domain::QuestionId;
use crate::session::SessionState;

/// Corpus could not be loaded. Loading is all-or-nothing.
#[derive(Debug, Error)]
pub enum CorpusLoadError {
  #[error("failed to read corpus {path}: {source}")]
  Io {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("malformed corpus: {0}")]
  Parse(#[from] toml::de::Error),

  #[error("invalid corpus: {0}")]
  Invalid(String),

  #[error("corpus is empty: no topics or no questions")]
  Empty,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
  #[error("no question available{}", .topic.as_ref().map(|t| format!(" for topic '{t}'")).unwrap_or_default())]
  EmptyCorpus { topic: Option<String> },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
  #[error("cannot {op} while session is {state}")]
  InvalidState { op: &'static str, state: SessionState },

  #[error("question {0} was not drawn in this session")]
  UnknownQuestion(QuestionId),
}

#[derive(Debug, Error)]
pub enum RecordError {
  #[error("failed to write session record {path}: {source}")]
  Io {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to serialize session record: {0}")]
  Serialize(#[from] serde_json::Error),
}

/// Everything a command can fail with.
#[derive(Debug, Error)]
pub enum AppError {
  #[error(transparent)]
  Load(#[from] CorpusLoadError),

  #[error(transparent)]
  Query(#[from] QueryError),

  #[error(transparent)]
  Session(#[from] SessionError),

  #[error(transparent)]
  Record(#[from] RecordError),

  #[error("question {0} not found")]
  NotFound(QuestionId),

  #[error("output error: {0}")]
  Output(#[from] std::io::Error),

  #[error("failed to encode output: {0}")]
  Json(#[from] serde_json::Error),
}
