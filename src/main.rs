//! OOP Quiz · Q&A reference and self-assessed quiz over object-oriented concepts
//!
//! - Static corpus (built-in, or a TOML file) loaded once at startup
//! - Topic / text search, lookup by id, seeded random draws
//! - Interactive quiz with a per-topic summary and an optional JSONL record
//!
//! Important env variables:
//!   OOPQUIZ_CORPUS_PATH : TOML corpus to load instead of the built-in one
//!   OOPQUIZ_RECORD_PATH : append finished quiz summaries here (JSON lines)
//!   LOG_LEVEL           : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT          : "pretty" (default) or "json"
//!
//! Results are written to stdout; logs and errors to stderr.

mod telemetry;
mod util;
mod domain;
mod error;
mod config;
mod seeds;
mod corpus;
mod query;
mod session;
mod record;
mod state;
mod protocol;
mod logic;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;

use crate::domain::QuestionId;
use crate::error::AppError;
use crate::protocol::OutputFormat;
use crate::query::SearchFilter;
use crate::session::QuizRequest;
use crate::state::AppState;

/// Q&A reference and quiz over object-oriented programming concepts
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
  /// TOML corpus to load (defaults to OOPQUIZ_CORPUS_PATH, then the built-in corpus)
  #[arg(long, global = true)]
  corpus: Option<PathBuf>,

  /// Output format for results
  #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
  format: OutputFormat,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// List topics with their question counts
  ListTopics,

  /// Search questions by topic and/or text
  Search {
    /// Case-insensitive substring matched against question, answer and explanation
    #[arg(long)]
    text: Option<String>,
    /// Restrict to one topic
    #[arg(long)]
    topic: Option<String>,
    /// Maximum number of results
    #[arg(long)]
    limit: Option<usize>,
  },

  /// Show one question with its explanation and snippets
  Show {
    id: u32,
  },

  /// Show one random question
  Random {
    #[arg(long)]
    topic: Option<String>,
    /// Seed for a reproducible draw
    #[arg(long)]
    seed: Option<u64>,
  },

  /// Run an interactive self-assessed quiz
  Ask {
    #[arg(long)]
    topic: Option<String>,
    /// Number of questions (all matching questions if omitted)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    count: Option<u32>,
    /// Seed for a reproducible draw
    #[arg(long)]
    seed: Option<u64>,
    /// Append the finished session to this JSONL file (defaults to OOPQUIZ_RECORD_PATH)
    #[arg(long)]
    record: Option<PathBuf>,
  },
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
  telemetry::init_tracing();
  let cli = Cli::parse();

  exit_code(run(cli).await, &mut std::io::stderr())
}

/// Failures are reported once, as a single line on `err`.
fn exit_code(result: Result<(), AppError>, err: &mut impl std::io::Write) -> std::process::ExitCode {
  match result {
    Ok(()) => std::process::ExitCode::SUCCESS,
    Err(e) => {
      let _ = writeln!(err, "error: {e}");
      std::process::ExitCode::FAILURE
    }
  }
}

async fn run(cli: Cli) -> Result<(), AppError> {
  let record_path = match &cli.command {
    Command::Ask { record, .. } => record.clone(),
    _ => None,
  };
  let state = AppState::load(cli.corpus, record_path)?;
  info!(target: "oop_quiz", topics = state.corpus.list_topics().len(), questions = state.corpus.len(), "Ready");

  let mut out = tokio::io::stdout();
  match cli.command {
    Command::ListTopics => logic::list_topics(&state, cli.format, &mut out).await,

    Command::Search { text, topic, limit } => {
      let filter = SearchFilter { topic, text, limit };
      logic::search(&state, &filter, cli.format, &mut out).await
    }

    Command::Show { id } => logic::show(&state, QuestionId(id), cli.format, &mut out).await,

    Command::Random { topic, seed } => {
      let seed = logic::resolve_seed(seed);
      logic::random(&state, topic.as_deref(), seed, cli.format, &mut out).await
    }

    Command::Ask { topic, count, seed, .. } => {
      let seed = logic::resolve_seed(seed);
      let request = QuizRequest {
        filter: topic.map(SearchFilter::topic).unwrap_or_default(),
        count: count.map(|n| n as usize),
      };
      let input = logic::spawn_line_reader(std::io::BufReader::new(std::io::stdin()));
      let interrupt = async {
        if tokio::signal::ctrl_c().await.is_err() {
          // no signal handler available; never interrupt
          std::future::pending::<()>().await;
        }
      };
      logic::ask(&state, &request, seed, cli.format, input, &mut out, interrupt).await.map(|_| ())
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn failure_is_reported_once() {
    let mut err = Vec::<u8>::new();
    exit_code(Err(AppError::NotFound(QuestionId(99))), &mut err);
    assert_eq!(String::from_utf8(err).unwrap(), "error: question 99 not found\n");
  }

  #[test]
  fn success_writes_nothing() {
    let mut err = Vec::<u8>::new();
    exit_code(Ok(()), &mut err);
    assert!(err.is_empty());
  }
}
