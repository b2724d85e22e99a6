//! Quiz session tracker.
//!
//! A session moves `NotStarted -> InProgress -> Completed` and never back. It
//! only stores question ids; the corpus is passed in wherever records are needed.
//!
//! Submitting an answer twice for the same question overwrites the earlier
//! result. `submit_answer` returns the previous value so callers can tell.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::corpus::Corpus;
use crate::domain::QuestionId;
use crate::error::SessionError;
use crate::query::SearchFilter;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
  NotStarted,
  InProgress,
  Completed,
}

impl fmt::Display for SessionState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      SessionState::NotStarted => "not started",
      SessionState::InProgress => "in progress",
      SessionState::Completed => "completed",
    })
  }
}

/// What to draw when a session starts. `count: None` draws every match.
#[derive(Clone, Debug, Default)]
pub struct QuizRequest {
  pub filter: SearchFilter,
  pub count: Option<usize>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TopicTally {
  pub topic: String,
  pub correct: usize,
  pub incorrect: usize,
  pub unanswered: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
  /// Only topics that appeared in the draw, in corpus order.
  pub topics: Vec<TopicTally>,
  pub correct: usize,
  pub incorrect: usize,
  pub unanswered: usize,
  /// Number of questions presented.
  pub total: usize,
}

impl SessionSummary {
  #[allow(dead_code)]
  pub fn topic(&self, name: &str) -> Option<&TopicTally> {
    self.topics.iter().find(|t| t.topic == name)
  }
}

impl fmt::Display for SessionSummary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for t in &self.topics {
      write!(f, "{}: {} correct, {} incorrect", t.topic, t.correct, t.incorrect)?;
      if t.unanswered > 0 {
        write!(f, ", {} unanswered", t.unanswered)?;
      }
      writeln!(f)?;
    }
    write!(f, "Overall: {}/{}", self.correct, self.total)
  }
}

#[derive(Debug)]
pub struct QuizSession {
  id: Uuid,
  started_at: DateTime<Utc>,
  state: SessionState,
  /// Asking order.
  presented: Vec<QuestionId>,
  answers: HashMap<QuestionId, bool>,
}

impl Default for QuizSession {
  fn default() -> Self {
    Self::new()
  }
}

impl QuizSession {
  pub fn new() -> Self {
    Self {
      id: Uuid::new_v4(),
      started_at: Utc::now(),
      state: SessionState::NotStarted,
      presented: Vec::new(),
      answers: HashMap::new(),
    }
  }

  pub fn id(&self) -> Uuid { self.id }
  pub fn started_at(&self) -> DateTime<Utc> { self.started_at }
  #[allow(dead_code)]
  pub fn state(&self) -> SessionState { self.state }
  pub fn presented(&self) -> &[QuestionId] { &self.presented }

  #[allow(dead_code)]
  pub fn answer_for(&self, id: QuestionId) -> Option<bool> {
    self.answers.get(&id).copied()
  }

  /// First presented question without a recorded answer.
  #[allow(dead_code)]
  pub fn next_unanswered(&self) -> Option<QuestionId> {
    self.presented.iter().copied().find(|id| !self.answers.contains_key(id))
  }

  /// Draw the questions for this session. Fewer matches than requested is not an error.
  #[instrument(level = "info", skip(self, corpus, request, rng), fields(session = %self.id, topic = ?request.filter.topic, count = ?request.count))]
  pub fn start<R: Rng + ?Sized>(
    &mut self,
    corpus: &Corpus,
    request: &QuizRequest,
    rng: &mut R,
  ) -> Result<&[QuestionId], SessionError> {
    self.expect_state("start", SessionState::NotStarted)?;
    self.presented = corpus
      .draw(&request.filter, request.count, rng)
      .into_iter()
      .map(|q| q.id)
      .collect();
    self.started_at = Utc::now();
    self.state = SessionState::InProgress;
    if request.count.is_some_and(|n| n > self.presented.len()) {
      warn!(target: "session", session = %self.id, drawn = self.presented.len(), "Fewer questions available than requested");
    }
    info!(target: "session", session = %self.id, drawn = self.presented.len(), "Session started");
    Ok(self.presented.as_slice())
  }

  /// Record a self-assessed result. Returns the previous result when overwriting.
  #[instrument(level = "debug", skip(self), fields(session = %self.id))]
  pub fn submit_answer(&mut self, question: QuestionId, correct: bool) -> Result<Option<bool>, SessionError> {
    self.expect_state("submit an answer", SessionState::InProgress)?;
    if !self.presented.contains(&question) {
      return Err(SessionError::UnknownQuestion(question));
    }
    let previous = self.answers.insert(question, correct);
    if let Some(prev) = previous {
      warn!(target: "session", session = %self.id, %question, prev, correct, "Answer resubmitted; overwriting");
    }
    Ok(previous)
  }

  /// Close the session and tally results per topic and overall.
  #[instrument(level = "info", skip(self, corpus), fields(session = %self.id))]
  pub fn finish(&mut self, corpus: &Corpus) -> Result<SessionSummary, SessionError> {
    self.expect_state("finish", SessionState::InProgress)?;
    self.state = SessionState::Completed;

    // ordinal -> tally, so topics come out in corpus order
    let mut by_topic = BTreeMap::<usize, TopicTally>::new();
    let mut summary = SessionSummary { total: self.presented.len(), ..SessionSummary::default() };

    for id in &self.presented {
      let Some(record) = corpus.get_question(*id) else {
        warn!(target: "session", session = %self.id, question = %id, "Drawn question missing from corpus");
        continue;
      };
      let ordinal = corpus.topic(&record.topic).map_or(usize::MAX, |t| t.ordinal);
      let tally = by_topic.entry(ordinal).or_insert_with(|| TopicTally {
        topic: record.topic.clone(),
        ..TopicTally::default()
      });
      match self.answers.get(id) {
        Some(true) => { tally.correct += 1; summary.correct += 1; }
        Some(false) => { tally.incorrect += 1; summary.incorrect += 1; }
        None => { tally.unanswered += 1; summary.unanswered += 1; }
      }
    }
    summary.topics = by_topic.into_values().collect();

    info!(target: "session", session = %self.id, correct = summary.correct, incorrect = summary.incorrect, unanswered = summary.unanswered, total = summary.total, "Session finished");
    Ok(summary)
  }

  fn expect_state(&self, op: &'static str, want: SessionState) -> Result<(), SessionError> {
    if self.state == want {
      Ok(())
    } else {
      Err(SessionError::InvalidState { op, state: self.state })
    }
  }
}
