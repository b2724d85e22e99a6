//! Append-only record of finished quiz sessions, one JSON object per line.
//!
//! This is the only state that outlives a process. Nothing ever reads it back.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::RecordError;
use crate::session::{QuizSession, SessionSummary};

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionRecord {
  pub session_id: Uuid,
  pub started_at: DateTime<Utc>,
  pub finished_at: DateTime<Utc>,
  pub seed: u64,
  #[serde(default)] pub topic: Option<String>,
  pub correct: usize,
  pub incorrect: usize,
  pub unanswered: usize,
  pub total: usize,
}

impl SessionRecord {
  pub fn new(session: &QuizSession, summary: &SessionSummary, seed: u64, topic: Option<String>) -> Self {
    Self {
      session_id: session.id(),
      started_at: session.started_at(),
      finished_at: Utc::now(),
      seed,
      topic,
      correct: summary.correct,
      incorrect: summary.incorrect,
      unanswered: summary.unanswered,
      total: summary.total,
    }
  }
}

/// Append one line to `path`, creating the file if needed.
#[instrument(level = "info", skip(path, record), fields(path = %path.display(), session = %record.session_id))]
pub async fn append_record(path: &Path, record: &SessionRecord) -> Result<(), RecordError> {
  let mut line = serde_json::to_string(record)?;
  line.push('\n');

  let io_err = |source: std::io::Error| RecordError::Io { path: path.display().to_string(), source };
  let mut file = tokio::fs::OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .await
    .map_err(io_err)?;
  file.write_all(line.as_bytes()).await.map_err(io_err)?;
  file.flush().await.map_err(io_err)?;

  info!(target: "session", "Session record appended");
  Ok(())
}

#[cfg(test)]
mod tests {
  use rand::rngs::StdRng;
  use rand::SeedableRng;

  use super::*;
  use crate::corpus::tests::sample;
  use crate::session::QuizRequest;

  #[tokio::test]
  async fn appends_one_line_per_session() {
    let corpus = sample();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.jsonl");

    for seed in [1u64, 2] {
      let mut s = QuizSession::new();
      let first = s.start(&corpus, &QuizRequest::default(), &mut StdRng::seed_from_u64(seed)).unwrap()[0];
      s.submit_answer(first, true).unwrap();
      let summary = s.finish(&corpus).unwrap();
      append_record(&path, &SessionRecord::new(&s, &summary, seed, None)).await.unwrap();
    }

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<SessionRecord> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].seed, 2);
    assert_eq!((lines[0].correct, lines[0].total), (1, 15));
  }

  #[tokio::test]
  async fn missing_directory_is_an_io_error() {
    let corpus = sample();
    let mut s = QuizSession::new();
    s.start(&corpus, &QuizRequest::default(), &mut StdRng::seed_from_u64(0)).unwrap();
    let summary = s.finish(&corpus).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no/such/dir/history.jsonl");
    let err = append_record(&path, &SessionRecord::new(&s, &summary, 0, None)).await.unwrap_err();
    assert!(matches!(err, RecordError::Io { .. }));
  }
}
