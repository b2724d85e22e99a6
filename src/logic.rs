//! Command behaviors behind the CLI.
//!
//! Every command writes its result to a caller-supplied async writer, so the
//! same code drives stdout in the binary and in-memory buffers in tests.

use std::future::Future;
use std::io::BufRead;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use crate::domain::{QuestionId, QuestionRecord};
use crate::error::{AppError, QueryError};
use crate::protocol::*;
use crate::query::SearchFilter;
use crate::record::{append_record, SessionRecord};
use crate::session::{QuizRequest, QuizSession, SessionSummary};
use crate::state::AppState;
use crate::util::indent;

/// How an interactive quiz ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizEnd {
  /// Every drawn question was shown.
  Exhausted,
  /// The learner typed `q`.
  Quit,
  /// Input closed.
  Eof,
  /// Interrupted (Ctrl-C).
  Interrupted,
}

/// Learner input, one line per message. A closed channel means end of input.
pub type LineSource = mpsc::Receiver<std::io::Result<String>>;

/// Read `reader` line by line on a dedicated OS thread.
///
/// A pending blocking read on that thread never holds up the runtime, so an
/// interrupted quiz can return and the process can exit while the learner
/// has not pressed Enter.
pub fn spawn_line_reader<B>(reader: B) -> LineSource
where
  B: BufRead + Send + 'static,
{
  let (tx, rx) = mpsc::channel(16);
  std::thread::spawn(move || {
    for line in reader.lines() {
      if tx.blocking_send(line).is_err() {
        break;
      }
    }
  });
  rx
}

/// Use the given seed, or pick one and log it so the run can be replayed.
pub fn resolve_seed(seed: Option<u64>) -> u64 {
  match seed {
    Some(s) => s,
    None => {
      let s = rand::thread_rng().gen();
      info!(target: "oop_quiz", seed = s, "No seed given; generated one");
      s
    }
  }
}

#[instrument(level = "info", skip_all)]
pub async fn list_topics<W: AsyncWrite + Unpin>(
  state: &AppState,
  format: OutputFormat,
  out: &mut W,
) -> Result<(), AppError> {
  let corpus = &state.corpus;
  let topics: Vec<TopicOut> = corpus.list_topics().iter().map(|t| topic_out(corpus, t)).collect();
  let text = match format {
    OutputFormat::Json => serde_json::to_string_pretty(&topics)?,
    OutputFormat::Text => topics
      .iter()
      .map(|t| format!("{:<14} {:>3} question{}", t.name, t.questions, if t.questions == 1 { "" } else { "s" }))
      .collect::<Vec<_>>()
      .join("\n"),
  };
  emit(out, &text).await
}

#[instrument(level = "info", skip(state, out), fields(topic = ?filter.topic, limit = ?filter.limit))]
pub async fn search<W: AsyncWrite + Unpin>(
  state: &AppState,
  filter: &SearchFilter,
  format: OutputFormat,
  out: &mut W,
) -> Result<(), AppError> {
  let hits = state.corpus.search(filter);
  info!(target: "query", hits = hits.len(), "Search served");
  let text = match format {
    OutputFormat::Json => {
      let list: Vec<QuestionOut> = hits.iter().map(|q| question_out(q)).collect();
      serde_json::to_string_pretty(&list)?
    }
    OutputFormat::Text if hits.is_empty() => "No matching questions.".to_string(),
    OutputFormat::Text => hits
      .iter()
      .map(|q| format!("#{:<3} [{}] {}", q.id, q.topic, q.question))
      .collect::<Vec<_>>()
      .join("\n"),
  };
  emit(out, &text).await
}

#[instrument(level = "info", skip(state, out))]
pub async fn show<W: AsyncWrite + Unpin>(
  state: &AppState,
  id: QuestionId,
  format: OutputFormat,
  out: &mut W,
) -> Result<(), AppError> {
  let q = state.corpus.get_question(id).ok_or(AppError::NotFound(id))?;
  emit(out, &render_record(q, format)?).await
}

#[instrument(level = "info", skip(state, out))]
pub async fn random<W: AsyncWrite + Unpin>(
  state: &AppState,
  topic: Option<&str>,
  seed: u64,
  format: OutputFormat,
  out: &mut W,
) -> Result<(), AppError> {
  let mut rng = StdRng::seed_from_u64(seed);
  let q = state.corpus.random_question(topic, &mut rng)?;
  info!(target: "query", id = %q.id, topic = %q.topic, seed, "Random question served");
  emit(out, &render_record(q, format)?).await
}

/// Run a full quiz: draw, ask interactively, tally, optionally record, print the summary.
///
/// `interrupt` resolving ends the quiz early; answers given so far still count.
#[instrument(level = "info", skip(state, input, out, interrupt))]
pub async fn ask<W, F>(
  state: &AppState,
  request: &QuizRequest,
  seed: u64,
  format: OutputFormat,
  mut input: LineSource,
  out: &mut W,
  interrupt: F,
) -> Result<SessionSummary, AppError>
where
  W: AsyncWrite + Unpin,
  F: Future<Output = ()>,
{
  let corpus = &state.corpus;
  let mut session = QuizSession::new();
  let drawn = session.start(corpus, request, &mut StdRng::seed_from_u64(seed))?.len();
  if drawn == 0 {
    return Err(QueryError::EmptyCorpus { topic: request.filter.topic.clone() }.into());
  }

  // Lines already typed are consumed before the interrupt is looked at.
  let end = tokio::select! {
    biased;
    res = run_quiz(state, &mut session, &mut input, out) => res?,
    _ = interrupt => QuizEnd::Interrupted,
  };
  if end != QuizEnd::Exhausted {
    warn!(target: "session", session = %session.id(), ?end, "Quiz ended early");
  }

  let summary = session.finish(corpus)?;

  if let Some(path) = &state.record_path {
    let record = SessionRecord::new(&session, &summary, seed, request.filter.topic.clone());
    append_record(path, &record).await?;
  }

  let text = match format {
    OutputFormat::Json => serde_json::to_string_pretty(&QuizOut {
      session_id: session.id().to_string(),
      seed,
      summary: &summary,
    })?,
    OutputFormat::Text => format!("\n{summary}"),
  };
  emit(out, &text).await?;
  Ok(summary)
}

/// Interactive loop over an already started session.
///
/// Per question: Enter reveals the answer, `s` skips, `q` quits. After the
/// reveal the learner self-assesses with `y` or `n`.
async fn run_quiz<W: AsyncWrite + Unpin>(
  state: &AppState,
  session: &mut QuizSession,
  input: &mut LineSource,
  out: &mut W,
) -> Result<QuizEnd, AppError> {
  let ids = session.presented().to_vec();
  let n = ids.len();

  for (i, id) in ids.into_iter().enumerate() {
    let Some(q) = state.corpus.get_question(id) else {
      warn!(target: "session", question = %id, "Drawn question missing from corpus; skipping");
      continue;
    };
    prompt(out, &format!("\n[{}/{}] {}\n{}\n(Enter = reveal, s = skip, q = quit) ", i + 1, n, q.topic, q.question)).await?;

    let Some(line) = input.recv().await.transpose()? else { return Ok(QuizEnd::Eof) };
    match line.trim().to_lowercase().as_str() {
      "q" | "quit" => return Ok(QuizEnd::Quit),
      "s" | "skip" => {
        debug!(target: "session", question = %id, "Skipped");
        continue;
      }
      _ => {}
    }

    prompt(out, &format!("{}\nDid you get it right? [y/n] ", render_reveal(q))).await?;
    let correct = loop {
      let Some(line) = input.recv().await.transpose()? else { return Ok(QuizEnd::Eof) };
      match line.trim().to_lowercase().as_str() {
        "y" | "yes" => break true,
        "n" | "no" => break false,
        "q" | "quit" => return Ok(QuizEnd::Quit),
        _ => prompt(out, "Please answer y or n. ").await?,
      }
    };
    session.submit_answer(id, correct)?;
  }
  Ok(QuizEnd::Exhausted)
}

fn render_record(q: &QuestionRecord, format: OutputFormat) -> Result<String, AppError> {
  Ok(match format {
    OutputFormat::Json => serde_json::to_string_pretty(&question_detail_out(q))?,
    OutputFormat::Text => format!("#{} [{}] {}\n{}", q.id, q.topic, q.question, render_reveal(q)),
  })
}

/// Answer, explanation and snippets.
fn render_reveal(q: &QuestionRecord) -> String {
  let mut s = format!("Answer: {}\n\n{}\n", q.answer, q.explanation);
  for snip in &q.snippets {
    s.push_str(&format!("\n  ```{}\n{}\n  ```\n", snip.language.as_deref().unwrap_or(""), indent(snip.code.trim_end(), "  ")));
  }
  s
}

async fn emit<W: AsyncWrite + Unpin>(out: &mut W, text: &str) -> Result<(), AppError> {
  out.write_all(text.as_bytes()).await?;
  out.write_all(b"\n").await?;
  out.flush().await?;
  Ok(())
}

async fn prompt<W: AsyncWrite + Unpin>(out: &mut W, text: &str) -> Result<(), AppError> {
  out.write_all(text.as_bytes()).await?;
  out.flush().await?;
  Ok(())
}
